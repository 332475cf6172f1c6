pub mod config;
pub mod oneshot;

use clap::{Parser, Subcommand};

/// MirrorLoop, a reflective journaling companion.
#[derive(Debug, Parser)]
#[command(name = "mirrorloop", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Reflect on a single entry and print the structured reply.
    Reflect {
        /// The journal text.
        text: String,
        /// Reply profile (`basic` or `extended`); defaults to the configured one.
        #[arg(long)]
        profile: Option<String>,
        /// Print the reply as JSON instead of one field per line.
        #[arg(long)]
        json: bool,
    },
    /// Run the line cleaner over `text` locally and print the result.
    Clean {
        text: String,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `ML_CONFIG` (or
/// `config.toml` by default).  Returns the parsed [`Config`] and the
/// path that was used.  A missing file yields the defaults.
///
/// [`Config`]: ml_domain::config::Config
pub fn load_config() -> anyhow::Result<(ml_domain::config::Config, String)> {
    let config_path = std::env::var("ML_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        tracing::warn!(path = %config_path, "config file not found, using defaults");
        ml_domain::config::Config::default()
    };

    Ok((config, config_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["mirrorloop"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn reflect_flags_parse() {
        let cli =
            Cli::try_parse_from(["mirrorloop", "reflect", "疲れた", "--profile", "extended", "--json"])
                .unwrap();
        match cli.command {
            Some(Command::Reflect { text, profile, json }) => {
                assert_eq!(text, "疲れた");
                assert_eq!(profile.as_deref(), Some("extended"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_subcommands_parse() {
        let cli = Cli::try_parse_from(["mirrorloop", "config", "validate"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Config(ConfigCommand::Validate))));
        let cli = Cli::try_parse_from(["mirrorloop", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Config(ConfigCommand::Show))));
    }
}
