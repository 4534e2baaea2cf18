//! Library components for the `slice-config` command-line tool.

pub mod commands;
pub mod logging;
