//! # CLI Layer
//!
//! One possible client of the snipz library, and the only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Parses arguments
//! - Initializes logging
//! - Formats output for humans
//!
//! `get` and `save` write raw data to stdout, so their messages go to stderr.
//! Everything else prints its messages to stdout.
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: `run()` and the per-command `handle_*` functions
//! - `print`: message colors, the list table and plain rows
//! - `shorthand`: `@tag` / `-@tag` words

mod commands;
mod print;
mod setup;
mod shorthand;

pub use commands::run;
