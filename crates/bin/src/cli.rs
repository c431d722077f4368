//! CLI argument definitions for the Pagestack binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Aligned tables and plain lines
    Human,
    /// One JSON document per result
    Json,
}

/// Pagestack navigation coordinator
#[derive(Parser, Debug)]
#[command(name = "pagestack")]
#[command(about = "Pagestack: stack-of-stacks navigation for page-oriented UIs")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human", env = "PAGESTACK_FORMAT")]
    pub format: Format,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted navigation session against a logging platform
    Demo(DemoArgs),
    /// Print the effective navigator configuration
    Config(ConfigArgs),
}

/// Arguments for the demo command
#[derive(clap::Args, Debug, Default)]
pub struct DemoArgs {
    /// Animate page pushes and pops
    #[arg(short, long, env = "PAGESTACK_ANIMATE")]
    pub animate: bool,

    /// How long each transition takes before the platform reports it finished
    #[arg(short, long, default_value_t = 0, env = "PAGESTACK_TRANSITION_MS")]
    pub transition_ms: u64,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Where the navigator configuration comes from
#[derive(clap::Args, Debug, Default)]
pub struct ConfigArgs {
    /// JSON configuration file. Defaults apply to missing fields.
    #[arg(short, long, env = "PAGESTACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fail operations whose transition takes longer than this many milliseconds
    #[arg(long, env = "PAGESTACK_TRANSITION_TIMEOUT_MS")]
    pub transition_timeout_ms: Option<u64>,
}
