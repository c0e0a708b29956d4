pub mod check;
pub mod latest;
pub mod list;

pub use check as patchset_check;
pub use latest as patchset_latest;
pub use list as patchset_list;
