//! # CLI Behavior
//!
//! This is **one possible client** for erlapp, not the widget itself. The CLI
//! is the only place that knows about terminal I/O, exit codes and output
//! formatting.
//!
//! ## Scenarios
//!
//! A scenario is a JSON file describing the layouts a registry offers, the
//! widget settings and a list of steps. Steps are either client gestures
//! (drag, move up/down) that only touch the structural editor, or posts that
//! submit the whole form to the widget, optionally with a triggering action.
//! After every post the widget is re-rendered and the editor re-attached, the
//! way a browser would after an element refresh.
//!
//! ## Settings
//!
//! `--config erl.toml` wins over settings inlined in the scenario. Without
//! either, settings come from the environment and compiled defaults.
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `ERL_LOG` takes a filter
//! directive (`ERL_LOG=erlapp=debug`); `--verbose` raises the default level.
//!
//! ## Module Structure
//!
//! - `commands`: `run()` and per-command handlers
//! - `render`: Text output for views and messages
//! - `scenario`: Scenario files and their replay
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styles

mod commands;
mod render;
mod scenario;
pub mod setup;
mod styles;

pub use commands::run;
