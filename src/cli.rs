//! Command-line interface argument parsing
//!
//! Defines the `om2m` commands and how their options combine with the
//! configuration file.

use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::resource::NameStyle;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// om2m - register a device with a oneM2M CSE and publish its data
#[derive(Parser, Debug)]
#[command(name = "om2m")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Register a device with a oneM2M CSE and publish its telemetry")]
#[command(long_about = concat!(
    "om2m (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Registers an Application Entity on a oneM2M CSE, provisions its containers,\n",
    "and uploads ContentInstances.\n\n",
    "Options given on the command line override the configuration file\n",
    "(~/.config/om2m/config.toml) and the OM2M_CREDENTIAL environment variable."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSE hostname or IP address
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// CSE HTTP port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// CSE type tag (mn, in, asn, ...)
    #[arg(long, global = true)]
    pub cse_type: Option<String>,

    /// Device (Application Entity) name
    #[arg(long, global = true)]
    pub device: Option<String>,

    /// Data container name
    #[arg(long, global = true)]
    pub container: Option<String>,

    /// Originator credential (user:pass)
    #[arg(long, global = true)]
    pub credential: Option<String>,

    /// Use oneM2M short attribute names (m2m:ae, rn, api, ...)
    #[arg(long, global = true)]
    pub short_names: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register the device's Application Entity
    ///
    /// Example:
    ///   om2m register
    #[command(display_order = 1)]
    Register,

    /// Ensure the data container exists
    ///
    /// Example:
    ///   om2m container
    #[command(display_order = 2)]
    Container,

    /// Ensure the DESCRIPTOR container exists
    ///
    /// Example:
    ///   om2m descriptor
    #[command(display_order = 3)]
    Descriptor,

    /// Register the AE and create both containers
    ///
    /// Example:
    ///   om2m provision
    #[command(display_order = 4)]
    Provision,

    /// Upload one data point
    ///
    /// Examples:
    ///   om2m send '{"temp": 21.5}'
    ///   om2m send '{"v": 1, "unit": "C"}'
    #[command(visible_alias = "publish")]
    #[command(display_order = 5)]
    Send {
        /// JSON object to publish
        payload: String,
    },

    /// Show the resolved configuration and resource URLs
    ///
    /// Example:
    ///   om2m config
    #[command(display_order = 6)]
    Config,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Build the effective configuration
    ///
    /// Starts from `--config` (or the default config file when present),
    /// applies `OM2M_CREDENTIAL`, then the command-line options. Without a
    /// config file `--host`, `--device` and `--container` are required.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, a required option is
    /// missing, or the result does not validate.
    pub fn resolve_config(&self) -> Result<ClientConfig, ConfigError> {
        let file = match &self.config {
            Some(path) => Some(ClientConfig::load_from(path)?),
            None => match ClientConfig::load() {
                Ok(config) => Some(config),
                Err(ConfigError::NotFound(_) | ConfigError::NoConfigDir) => None,
                Err(e) => return Err(e),
            },
        };

        let mut config = match file {
            Some(config) => config,
            None => ClientConfig::new(
                required(self.host.as_deref(), "--host")?,
                required(self.device.as_deref(), "--device")?,
                required(self.container.as_deref(), "--container")?,
            ),
        };

        config.apply_env();
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.cse_host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.cse_port = port;
        }
        if let Some(cse_type) = &self.cse_type {
            config.cse_type = cse_type.as_str().into();
        }
        if let Some(device) = &self.device {
            config.device_name.clone_from(device);
        }
        if let Some(container) = &self.container {
            config.container_name.clone_from(container);
        }
        if let Some(credential) = &self.credential {
            config.credential.clone_from(credential);
        }
        if self.short_names {
            config.name_style = NameStyle::Short;
        }
    }
}

fn required<'a>(value: Option<&'a str>, flag: &str) -> Result<&'a str, ConfigError> {
    value.ok_or_else(|| {
        ConfigError::Invalid(format!(
            "{flag} is required when no configuration file is present"
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::CseType;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_options_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        ClientConfig::new("10.0.0.5", "sensor01", "readings")
            .save_to(&path)
            .unwrap();

        let cli = Cli::try_parse_from([
            "om2m",
            "--config",
            path.to_str().unwrap(),
            "--port",
            "9090",
            "--cse-type",
            "in",
            "--credential",
            "ops:secret",
            "--short-names",
            "provision",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.cse_host, "10.0.0.5");
        assert_eq!(config.cse_port, 9090);
        assert_eq!(config.cse_type, CseType::In);
        assert_eq!(config.credential, "ops:secret");
        assert_eq!(config.name_style, NameStyle::Short);
    }

    #[test]
    fn test_send_takes_payload() {
        let cli = Cli::try_parse_from(["om2m", "send", r#"{"temp": 21.5}"#]).unwrap();
        match cli.command {
            Commands::Send { payload } => assert_eq!(payload, r#"{"temp": 21.5}"#),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let cli =
            Cli::try_parse_from(["om2m", "--config", path.to_str().unwrap(), "register"]).unwrap();
        assert!(matches!(cli.resolve_config(), Err(ConfigError::Read { .. })));
    }
}
