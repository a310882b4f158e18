//! Library side of the `ordex` command: configuration layering, logging and
//! the end-to-end runs the subcommands drive.

pub mod config;
pub mod logging;
pub mod workflow;
