//! Default configuration values

/// Default CSE HTTP port
pub const fn default_cse_port() -> u16 {
    8282
}

/// Default originator credential
pub fn default_credential() -> String {
    "admin:admin".to_string()
}

/// Default request timeout in seconds
pub const fn default_timeout() -> u64 {
    30
}

/// Default connect timeout in seconds
pub const fn default_connect_timeout() -> u64 {
    10
}

/// Environment variable overriding the configured credential
pub const CREDENTIAL_ENV: &str = "OM2M_CREDENTIAL";

/// Resource name of the descriptor container created under every AE
pub const DESCRIPTOR_NAME: &str = "DESCRIPTOR";

/// Content info attached to every ContentInstance
pub const CONTENT_INFO_JSON: &str = "application/json";
