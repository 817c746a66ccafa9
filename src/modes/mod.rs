pub mod check;
pub mod demo;
pub mod play;
pub mod terminal;
pub mod watch;

pub use check::CheckMode;
pub use demo::{DemoConfig, DemoMode};
pub use play::PlayMode;
pub use watch::{PlaybackSpeed, WatchMode};
