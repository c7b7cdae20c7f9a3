//! logwatch CLI library.
//!
//! Exposes the argument model, command handlers and output helpers for
//! integration testing. The `logwatch` binary is a thin wrapper (main.rs).

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
