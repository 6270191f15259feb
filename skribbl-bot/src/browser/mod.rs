#[cfg(test)]
pub mod fake;
pub mod probe;
pub mod room;
pub mod session;
pub mod webdriver;

pub use probe::{Marker, PageProbe};
pub use room::{create_room, join_room};
pub use session::{BrowserConfig, BrowserKind, WindowSlot, new_session};
pub use webdriver::WebDriverProbe;
