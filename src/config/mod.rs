//! Configuration management for the oneM2M client
//!
//! Holds the CSE location, the device identity and the originator credential.
//! A configuration can be built in code or loaded from a TOML file.

use crate::error::ConfigError;
use crate::resource::NameStyle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;

pub use defaults::*;

/// Kind of CSE the device attaches to
///
/// The tag selects the CSE resource name (`<tag>-name`) used in every URL and
/// the CSE identifier (`<tag>-cse`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CseType {
    /// Middle node CSE
    #[default]
    Mn,
    /// Infrastructure node CSE
    In,
    /// Application service node CSE
    Asn,
    /// Any other deployment-specific tag
    Other(String),
}

impl CseType {
    /// The raw tag (`mn`, `in`, `asn`, ...)
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mn => "mn",
            Self::In => "in",
            Self::Asn => "asn",
            Self::Other(tag) => tag,
        }
    }

    /// CSE resource name, e.g. `mn-name`
    #[must_use]
    pub fn cse_name(&self) -> String {
        format!("{}-name", self.as_str())
    }

    /// CSE identifier, e.g. `mn-cse`
    #[must_use]
    pub fn cse_id(&self) -> String {
        format!("{}-cse", self.as_str())
    }
}

impl From<&str> for CseType {
    fn from(tag: &str) -> Self {
        match tag {
            "mn" => Self::Mn,
            "in" => Self::In,
            "asn" => Self::Asn,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for CseType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<CseType> for String {
    fn from(cse_type: CseType) -> Self {
        cse_type.as_str().to_string()
    }
}

impl fmt::Display for CseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// CSE hostname or IP address
    pub cse_host: String,

    /// CSE HTTP port
    #[serde(default = "defaults::default_cse_port")]
    pub cse_port: u16,

    /// CSE type tag
    #[serde(default)]
    pub cse_type: CseType,

    /// Application Entity resource name
    pub device_name: String,

    /// Data container resource name
    pub container_name: String,

    /// Originator credential (`user:pass`), sent verbatim in `X-M2M-Origin`
    #[serde(default = "defaults::default_credential")]
    pub credential: String,

    /// Attribute naming used in request bodies
    #[serde(default)]
    pub name_style: NameStyle,

    /// Request timeout in seconds
    #[serde(default = "defaults::default_timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "defaults::default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration with default port, CSE type and credential
    pub fn new(
        cse_host: impl Into<String>,
        device_name: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            cse_host: cse_host.into(),
            cse_port: default_cse_port(),
            cse_type: CseType::default(),
            device_name: device_name.into(),
            container_name: container_name.into(),
            credential: default_credential(),
            name_style: NameStyle::default(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }

    /// Set the CSE port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.cse_port = port;
        self
    }

    /// Set the CSE type tag
    #[must_use]
    pub fn with_cse_type(mut self, cse_type: impl Into<CseType>) -> Self {
        self.cse_type = cse_type.into();
        self
    }

    /// Set the originator credential
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    /// Set the attribute naming style
    #[must_use]
    pub const fn with_name_style(mut self, name_style: NameStyle) -> Self {
        self.name_style = name_style;
        self
    }

    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Load configuration from the default location
    ///
    /// Tries in order:
    /// 1. `XDG_CONFIG_HOME/om2m/config.toml`
    /// 2. `~/.config/om2m/config.toml`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no file exists, or a read/parse error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // Config holds the credential
        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, Permissions::from_mode(0o600)).map_err(|e| {
                ConfigError::Write {
                    path: path.to_path_buf(),
                    reason: format!("Failed to set permissions: {e}"),
                }
            })?;
        }

        Ok(())
    }

    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when neither `XDG_CONFIG_HOME` nor a
    /// home directory is available.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        config_home
            .ok_or(ConfigError::NoConfigDir)
            .map(|path| path.join("om2m").join("config.toml"))
    }

    /// Replace the credential with `OM2M_CREDENTIAL` if it is set
    pub fn apply_env(&mut self) {
        if let Ok(credential) = std::env::var(CREDENTIAL_ENV) {
            if !credential.is_empty() {
                self.credential = credential;
            }
        }
    }

    /// Credential with the secret part hidden, for display
    #[must_use]
    pub fn masked_credential(&self) -> String {
        match self.credential.split_once(':') {
            Some((user, _)) => format!("{user}:****"),
            None => "****".to_string(),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first unusable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cse_host.trim().is_empty() {
            return Err(ConfigError::Invalid("cse_host cannot be empty".to_string()));
        }

        if self.cse_port == 0 {
            return Err(ConfigError::Invalid(
                "cse_port must be greater than 0".to_string(),
            ));
        }

        if self.cse_type.as_str().is_empty() {
            return Err(ConfigError::Invalid("cse_type cannot be empty".to_string()));
        }

        validate_resource_name("device_name", &self.device_name)?;
        validate_resource_name("container_name", &self.container_name)?;

        if self.credential.is_empty() {
            return Err(ConfigError::Invalid(
                "credential cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_resource_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} cannot be empty")));
    }
    if name.contains('/') {
        return Err(ConfigError::Invalid(format!(
            "{field} cannot contain '/': {name}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> ClientConfig {
        ClientConfig::new("10.0.0.5", "sensor01", "readings")
    }

    #[test]
    fn test_default_values() {
        let config = sample();
        assert_eq!(config.cse_port, 8282);
        assert_eq!(config.cse_type, CseType::Mn);
        assert_eq!(config.credential, "admin:admin");
        assert_eq!(config.name_style, NameStyle::Long);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cse_type_suffixes() {
        assert_eq!(CseType::Mn.cse_name(), "mn-name");
        assert_eq!(CseType::In.cse_id(), "in-cse");
        assert_eq!(CseType::from("asn"), CseType::Asn);

        let custom = CseType::from("gw");
        assert_eq!(custom, CseType::Other("gw".to_string()));
        assert_eq!(custom.cse_name(), "gw-name");
    }

    #[test]
    fn test_validation_rejects_bad_fields() {
        assert!(ClientConfig::new("", "d", "c").validate().is_err());
        assert!(ClientConfig::new("h", "", "c").validate().is_err());
        assert!(ClientConfig::new("h", "d", "a/b").validate().is_err());
        assert!(sample().with_port(0).validate().is_err());
        assert!(sample().with_credential("").validate().is_err());
        assert!(sample().with_cse_type("").validate().is_err());

        let mut config = sample();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            cse_host = "10.0.0.5"
            device_name = "sensor01"
            container_name = "readings"
            "#,
        )
        .unwrap();
        assert_eq!(config, sample());
    }

    #[test]
    fn test_toml_custom_cse_type_and_style() {
        let config: ClientConfig = toml::from_str(
            r#"
            cse_host = "cse.local"
            cse_port = 8080
            cse_type = "in"
            device_name = "pump"
            container_name = "flow"
            credential = "ops:secret"
            name_style = "short"
            "#,
        )
        .unwrap();
        assert_eq!(config.cse_type, CseType::In);
        assert_eq!(config.cse_port, 8080);
        assert_eq!(config.name_style, NameStyle::Short);
        assert_eq!(config.masked_credential(), "ops:****");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = sample().with_cse_type("asn").with_port(9000);

        config.save_to(&path).unwrap();
        let loaded = ClientConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
