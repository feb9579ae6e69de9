#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # oneM2M client
//!
//! Registers a device with a oneM2M Common Service Entity and publishes its
//! telemetry over HTTP.
//!
//! ## Architecture
//!
//! - **[`config`]** - Client configuration, defaults and TOML persistence
//! - **[`resource`]** - oneM2M resource types and request bodies
//! - **[`client`]** - The blocking CSE client and its four operations
//! - **[`error`]** - Error types
//! - **[`cli`]** - Command-line arguments for the `om2m` binary
//!
//! ## Quick Start
//!
//! ```no_run
//! use om2m_client::{ClientConfig, CseClient};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CseClient::new(ClientConfig::new("10.0.0.5", "sensor01", "readings"))?;
//! client.provision()?;
//! client.send_data(&json!({"temp": 21.5}))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod resource;

pub use client::{CseClient, Outcome, Provisioned};
pub use config::{ClientConfig, CseType};
pub use error::{ConfigError, CseOperationError, Result};
pub use resource::NameStyle;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
