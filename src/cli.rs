use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

use commands::{generate, print_openapi, serve};

#[derive(Parser)]
#[command(name = "forecast-mock")]
#[command(about = "Deterministic mock backend for the weather forecast front end")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format of the OpenAPI document
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DocFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,

        /// Optional configuration file (TOML, YAML or JSON)
        ///
        /// Environment variables override values from the file.
        #[arg(short, long, env = "FORECAST_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print a single mock forecast as JSON
    ///
    /// Examples:
    ///   forecast-mock generate --lat 35.6812 --lon 139.7671
    ///   forecast-mock generate --lat -33.87 --lon 151.21 --tz Australia/Sydney
    Generate {
        /// Latitude in degrees
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lon: f64,

        /// Timezone identifier echoed in the metadata
        #[arg(long, default_value = common::DEFAULT_TIMEZONE)]
        tz: String,
    },
    /// Print the OpenAPI document
    Openapi {
        #[arg(short, long, value_enum, default_value_t = DocFormat::Json)]
        format: DocFormat,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { bind_address, config } => {
                serve(bind_address, config.as_deref()).await?;
            }
            Commands::Generate { lat, lon, tz } => {
                generate(lat, lon, &tz)?;
            }
            Commands::Openapi { format } => {
                print_openapi(format)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "forecast-mock",
            "generate",
            "--lat",
            "-33.87",
            "--lon",
            "151.21",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate { lat, lon, tz } => {
                assert_eq!(lat, -33.87);
                assert_eq!(lon, 151.21);
                assert_eq!(tz, "Asia/Tokyo");
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_openapi_format_defaults_to_json() {
        let cli = Cli::try_parse_from(["forecast-mock", "openapi"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Openapi {
                format: DocFormat::Json
            }
        ));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
