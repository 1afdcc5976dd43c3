use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "erl", bin_name = "erl", version)]
#[command(about = "Replay layout-region widget sessions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Widget settings file (TOML)
    #[arg(short, long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scenario and print the resulting widget
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Print the view and field values as JSON
        #[arg(long)]
        json: bool,

        /// Save every entity at the end and print the stored field values
        #[arg(long)]
        commit: bool,
    },

    /// Print the effective widget settings
    Settings,
}
