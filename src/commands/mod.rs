//! Command implementations

pub mod completions;
pub mod helpers;
pub mod install;
pub mod install_file;
pub mod version;
