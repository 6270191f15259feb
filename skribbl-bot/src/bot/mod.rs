pub mod classify;
pub mod coordinator;
pub mod game_loop;
pub mod guess;
pub mod lobby;
pub mod partner;
pub mod word_select;

pub use coordinator::{BotSetup, SelfPlaySummary, run_self_play, run_solo};
pub use game_loop::LoopStats;
