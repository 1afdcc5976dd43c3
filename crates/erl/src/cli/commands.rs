//! # CLI Layer
//!
//! The CLI layer is the **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Reads scenario and settings files named on the command line
//! - Installs the tracing subscriber
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_tracing()`: Routes `tracing` events to stderr
//! - `handle_*()`: Per-command handlers that drive the widget and print

use super::render::{print_messages, render_settings, render_stored, render_view};
use super::scenario::{Driver, Scenario};
use super::setup::{Cli, Commands};
use anyhow::{bail, Context, Result};
use clap::Parser;
use erlapp::config::WidgetSettings;
use erlapp::persist::{FieldValue, StoredValue};
use erlapp::view::WidgetView;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "ERL_LOG";

#[derive(Serialize)]
struct RunOutput {
    view: WidgetView,
    values: Vec<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored: Option<Vec<StoredValue>>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            scenario,
            json,
            commit,
        } => handle_run(&scenario, cli.config.as_deref(), json, commit),
        Commands::Settings => handle_settings(cli.config.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("erl={level},erlapp={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `--config` wins over inline scenario settings, which win over the
/// environment and defaults.
fn resolve_settings(
    config: Option<&Path>,
    inline: Option<WidgetSettings>,
) -> Result<WidgetSettings> {
    match (config, inline) {
        (Some(path), _) if !path.exists() => {
            bail!("settings file {} not found", path.display())
        }
        (Some(path), _) => WidgetSettings::load(Some(path))
            .with_context(|| format!("loading settings {}", path.display())),
        (None, Some(settings)) => Ok(settings),
        (None, None) => Ok(WidgetSettings::load(None)?),
    }
}

fn handle_run(path: &Path, config: Option<&Path>, json: bool, commit: bool) -> Result<()> {
    let scenario = Scenario::from_file(path)?;
    let settings = resolve_settings(config, scenario.settings)?;
    tracing::info!(
        steps = scenario.steps.len(),
        layouts = scenario.layouts.len(),
        "replaying scenario"
    );

    let mut driver = Driver::new(&scenario.field_name, scenario.layouts, settings);
    for (index, step) in scenario.steps.iter().enumerate() {
        let messages = driver
            .apply(step)
            .with_context(|| format!("step {} ({})", index + 1, step.name()))?;
        if !json {
            print_messages(&messages);
        }
    }

    let view = driver.view();
    let values = driver.widget().flatten();
    let stored = if commit {
        Some(driver.widget_mut().commit()?)
    } else {
        None
    };

    if json {
        let output = RunOutput {
            view,
            values,
            stored,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", render_view(&view));
    if let Some(stored) = stored {
        println!();
        print!("{}", render_stored(&stored));
    }
    Ok(())
}

fn handle_settings(config: Option<&Path>) -> Result<()> {
    let settings = resolve_settings(config, None)?;
    print!("{}", render_settings(&settings));
    Ok(())
}
