//! Subcommand modules for the `tredraw` binary.

pub mod diff;
pub mod pdf;
pub mod to_json;
