//! Config command - resolves and prints the navigator configuration.

use pagestack::NavigatorConfig;

use crate::cli::{ConfigArgs, Format};

/// Build the configuration from the file (if any) and command-line overrides.
pub fn load(args: &ConfigArgs) -> pagestack::Result<NavigatorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration");
            NavigatorConfig::from_json_file(path)?
        }
        None => NavigatorConfig::default(),
    };

    if let Some(timeout_ms) = args.transition_timeout_ms {
        config.transition_timeout_ms = Some(timeout_ms);
    }
    config.validate()?;
    Ok(config)
}

/// Run the config command
pub fn run(args: &ConfigArgs, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(args)?;

    match format {
        Format::Human => {
            let timeout = config
                .transition_timeout()
                .map(|t| format!("{t:?}"))
                .unwrap_or_else(|| "none".to_string());
            println!("Command buffer:      {}", config.command_buffer);
            println!("Transition timeout:  {timeout}");
            println!("Animate modals:      {}", config.animate_modals);
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
