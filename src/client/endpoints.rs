//! Resource URLs derived from the configuration

use crate::config::{ClientConfig, DESCRIPTOR_NAME};
use std::net::Ipv6Addr;

/// URLs of the resources the client talks to, computed once per client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// CSE base resource: `http://{host}:{port}/~/{type}-name`
    pub base: String,
    /// Application Entity: `{base}/{device}`
    pub ae: String,
    /// Data container: `{ae}/{container}`
    pub container: String,
    /// Descriptor container: `{ae}/DESCRIPTOR`
    pub descriptor: String,
}

impl Endpoints {
    /// Derive all URLs from `config`
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let base = format!(
            "http://{}:{}/~/{}",
            authority_host(&config.cse_host),
            config.cse_port,
            config.cse_type.cse_name()
        );
        let ae = format!("{base}/{}", config.device_name);
        let container = format!("{ae}/{}", config.container_name);
        let descriptor = format!("{ae}/{DESCRIPTOR_NAME}");

        Self {
            base,
            ae,
            container,
            descriptor,
        }
    }
}

/// IPv6 literals need brackets to sit in front of the port
fn authority_host(host: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{host}]")
    } else {
        host.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_deployment_urls() {
        let config = ClientConfig::new("10.0.0.5", "sensor01", "readings");
        let endpoints = Endpoints::new(&config);

        assert_eq!(endpoints.base, "http://10.0.0.5:8282/~/mn-name");
        assert_eq!(endpoints.ae, "http://10.0.0.5:8282/~/mn-name/sensor01");
        assert_eq!(
            endpoints.container,
            "http://10.0.0.5:8282/~/mn-name/sensor01/readings"
        );
        assert_eq!(
            endpoints.descriptor,
            "http://10.0.0.5:8282/~/mn-name/sensor01/DESCRIPTOR"
        );
    }

    #[test]
    fn test_urls_compose_for_any_config() {
        let configs = [
            ClientConfig::new("cse.example.org", "pump-7", "flow"),
            ClientConfig::new("::1", "a", "b").with_port(80).with_cse_type("in"),
            ClientConfig::new("[fe80::1]", "a", "b"),
            ClientConfig::new("gw", "dev", "data").with_cse_type("asn"),
        ];

        for config in &configs {
            let endpoints = Endpoints::new(config);
            assert_eq!(endpoints.ae, format!("{}/{}", endpoints.base, config.device_name));
            assert_eq!(
                endpoints.container,
                format!("{}/{}", endpoints.ae, config.container_name)
            );
            assert!(endpoints
                .base
                .ends_with(&format!("/~/{}-name", config.cse_type)));
        }
    }

    #[test]
    fn test_ipv6_hosts_are_bracketed() {
        let config = ClientConfig::new("::1", "sensor01", "readings");
        assert_eq!(Endpoints::new(&config).base, "http://[::1]:8282/~/mn-name");

        let config = ClientConfig::new("[::1]", "sensor01", "readings");
        assert_eq!(Endpoints::new(&config).base, "http://[::1]:8282/~/mn-name");

        let config = ClientConfig::new("2001:db8::5", "sensor01", "readings").with_port(80);
        assert_eq!(
            Endpoints::new(&config).container,
            "http://[2001:db8::5]:80/~/mn-name/sensor01/readings"
        );
    }
}
