pub mod reports;
pub mod retry;
pub mod util;

pub use retry::{Attempt, Retry, RetryOutcome, RetryPolicy, pause, retry_until};
pub use util::{artifacts_dir, capture_artifacts};
