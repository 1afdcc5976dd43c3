//! # erl CLI Architecture
//!
//! `erl` replays editing sessions of a layout-region field widget from the
//! command line. The binary is intentionally thin: the CLI lives in `src/cli/`,
//! while this file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/erlapp/`: the widget library (placement, session, persistence)
//! - `crates/erl/`: this CLI, one client of the library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/erl/src/cli/)                            │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Scenario replay against a widget (scenario.rs)           │
//! │  - Terminal rendering with console styles (render.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  erlapp: StructuralEditor (client) and WidgetApi (server)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything inside `erlapp` is UI agnostic. The CLI is responsible for all
//! user-facing concerns: argument parsing, loading scenario files, logging
//! setup, error reporting and rendering.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
