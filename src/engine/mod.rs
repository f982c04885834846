//! Engine module: CLI surface, run handler, and pure helpers.

pub mod arg_parser;
pub mod handlers;
pub mod tools;

pub use arg_parser::Cli;
pub use handlers::handle_run;
pub use tools::{destination_path, dotted_extension, matches_extension};
