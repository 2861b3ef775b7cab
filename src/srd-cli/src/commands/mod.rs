//! Command handlers for srd CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod db;
pub mod sync;
