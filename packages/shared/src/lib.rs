//! Utilities shared by the pairchat packages.

pub mod logger;
pub mod time;
