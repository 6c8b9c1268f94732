//! Filesystem wrappers

pub mod dir;
pub mod file;
