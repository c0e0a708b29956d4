#![cfg_attr(not(test), warn(clippy::unwrap_used))]

pub mod change;
pub mod config;
#[cfg(feature = "logger")]
pub mod logger;
pub mod patch;
pub mod sequence;
#[cfg(any(test, feature = "test"))]
pub mod test;
pub mod updates;
pub mod wip;

pub use change::{Change, ChangeId, ChangeMessage, Revision, Status};
pub use config::Config;
pub use patch::{PatchNum, PatchRange};
pub use sequence::PatchSet;
pub use updates::{ChangeSource, Updates};
