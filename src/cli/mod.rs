//! CLI module for Maestro
//!
//! Provides command-line interface parsing and handling for the maestro-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use crate::agents::domains::profile_for;
use crate::utils::config::{ConfigError, MaestroConfig};
use clap::{Parser, Subcommand};
use output::Output;
use std::path::PathBuf;

/// Maestro - supervisor-routed multi-agent assistant
///
/// Routes each request to one domain specialist, enriches it with long-term
/// memory and search results, and streams the answer back.
#[derive(Parser, Debug)]
#[command(
    name = "maestro-server",
    version,
    about = "Maestro - supervisor-routed multi-agent assistant server",
    long_about = "Routes each request to one domain specialist (research, finance, travel,\n\
                  shopping, jobs, recipes), enriches it with long-term memory and search\n\
                  results, and streams the answer back over Server-Sent Events.\n\n\
                  Run without arguments to start the server.",
    after_help = "EXAMPLES:\n    \
                  maestro-server                        # Start the server (reads maestro.toml)\n    \
                  maestro-server --config prod.toml     # Use a custom config file\n    \
                  maestro-server check-config           # Validate the configuration\n    \
                  maestro-server agents                 # List the configured agents"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "maestro.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List the configured domain agents without starting the server
    Agents,

    /// Load and validate the configuration file
    CheckConfig,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn output(&self) -> Output {
        if self.no_color {
            Output::no_color()
        } else {
            Output::new()
        }
    }
}

/// Print the agents a configuration enables
pub fn show_agents(config: &MaestroConfig, output: &Output) -> Result<(), ConfigError> {
    let domains = config.enabled_domains()?;
    let default = config.default_domain()?;

    output.header("Configured Agents");
    output.table_header(&["Domain", "Tools"]);
    for domain in &domains {
        let descriptor = profile_for(*domain).descriptor();
        let name = if *domain == default {
            format!("{} (default)", domain)
        } else {
            domain.to_string()
        };
        let tools = descriptor.tools.join(", ");
        output.table_row(&[name.as_str(), tools.as_str()]);
        output.hint_line(&descriptor.capability);
    }
    output.newline();
    Ok(())
}

/// Validate the configuration at `cli.config` and report the result.
///
/// Returns the error so the binary can exit non-zero.
pub fn check_config(cli: &Cli, output: &Output) -> Result<MaestroConfig, ConfigError> {
    output.header("Configuration");
    output.kv("file", &cli.config.display().to_string());

    match MaestroConfig::load(&cli.config) {
        Ok(config) => {
            output.kv("provider", &format!("{} ({})", config.provider.kind(), config.provider.model()));
            output.kv("listen", &format!("{}:{}", config.server.host, config.server.port));
            output.kv(
                "memory",
                &if config.memory.enabled {
                    format!("{:?}", config.memory.backend).to_lowercase()
                } else {
                    "disabled".to_string()
                },
            );
            output.kv("default domain", &config.router.default_domain);
            output.success("Configuration is valid");
            Ok(config)
        }
        Err(e) => {
            output.error(&e.to_string());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["maestro-server"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("maestro.toml"));
        assert!(!cli.verbose && !cli.log_json && !cli.no_color);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_subcommands_and_global_flags() {
        let cli = Cli::try_parse_from(["maestro-server", "check-config", "--config", "x.toml", "--no-color"])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::CheckConfig));
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(cli.no_color);

        let cli = Cli::try_parse_from(["maestro-server", "-v", "agents"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Agents));
        assert!(cli.verbose);
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["maestro-server", "init"]).is_err());
    }

    #[test]
    fn test_check_config_missing_file() {
        let cli = Cli::try_parse_from(["maestro-server", "--config", "/nonexistent/maestro.toml"]).unwrap();
        let result = check_config(&cli, &Output::no_color());
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
