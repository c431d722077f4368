mod cli;
mod commands;
mod output;
mod platform;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, DemoArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("pagestack=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Demo(args)) => commands::demo::run(&args, cli.format).await,
        Some(Commands::Config(args)) => commands::config::run(&args, cli.format),
        None => commands::demo::run(&DemoArgs::default(), cli.format).await,
    }
}
