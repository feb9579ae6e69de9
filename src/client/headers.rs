//! Per-resource-type request headers

use crate::error::ConfigError;
use crate::resource::ResourceType;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};

/// oneM2M originator header
pub const X_M2M_ORIGIN: &str = "x-m2m-origin";

/// Header sets for AE, Container and ContentInstance requests
///
/// The three sets differ only in the `ty` discriminator of `Content-Type`.
#[derive(Debug, Clone)]
pub struct HeaderSets {
    ae: HeaderMap,
    container: HeaderMap,
    data: HeaderMap,
}

impl HeaderSets {
    /// Build all header sets for `credential`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the credential is not a valid header value.
    pub fn new(credential: &str) -> Result<Self, ConfigError> {
        let mut origin = HeaderValue::from_str(credential).map_err(|e| {
            ConfigError::Invalid(format!("credential is not a valid header value: {e}"))
        })?;
        origin.set_sensitive(true);

        Ok(Self {
            ae: build(ResourceType::Ae, &origin)?,
            container: build(ResourceType::Container, &origin)?,
            data: build(ResourceType::ContentInstance, &origin)?,
        })
    }

    /// Headers for requests on resources of `resource_type`
    #[must_use]
    pub const fn for_type(&self, resource_type: ResourceType) -> &HeaderMap {
        match resource_type {
            ResourceType::Ae => &self.ae,
            ResourceType::Container => &self.container,
            ResourceType::ContentInstance => &self.data,
        }
    }
}

fn build(resource_type: ResourceType, origin: &HeaderValue) -> Result<HeaderMap, ConfigError> {
    let content_type = HeaderValue::from_str(&resource_type.content_type())
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let mut headers = HeaderMap::new();
    let _ = headers.insert(HeaderName::from_static(X_M2M_ORIGIN), origin.clone());
    let _ = headers.insert(CONTENT_TYPE, content_type);
    let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}
