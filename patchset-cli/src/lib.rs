#![cfg_attr(not(test), warn(clippy::unwrap_used))]
pub mod commands;
pub mod terminal;
