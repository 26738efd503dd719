//! `morsel-sales` library crate.
//!
//! The binary (`morsel`) is a thin wrapper around this library so that:
//!
//! - the aggregation core is testable without spawning processes
//! - the query layer can sit behind other front-ends (the TUI is one)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod sales;
pub mod tui;
