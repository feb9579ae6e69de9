//! oneM2M resource representations
//!
//! Request bodies are built from typed resources serialized with their long
//! attribute names, then optionally rewritten to the short names most CSE
//! deployments (OM2M included) expect on the wire.

use crate::config::{CONTENT_INFO_JSON, DESCRIPTOR_NAME};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// oneM2M resource type, sent as the `ty` parameter of the content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// Application Entity
    Ae,
    /// Container
    Container,
    /// ContentInstance
    ContentInstance,
}

impl ResourceType {
    /// Numeric `ty` discriminator
    #[must_use]
    pub const fn ty(self) -> u8 {
        match self {
            Self::Ae => 2,
            Self::Container => 3,
            Self::ContentInstance => 4,
        }
    }

    /// `Content-Type` header value for creating this resource type
    #[must_use]
    pub fn content_type(self) -> String {
        format!("application/json;ty={}", self.ty())
    }

    /// Root key of a request body
    #[must_use]
    pub const fn root_key(self, style: NameStyle) -> &'static str {
        match (self, style) {
            (Self::Ae, NameStyle::Long) => "ae",
            (Self::Container, NameStyle::Long) => "cnt",
            (Self::ContentInstance, NameStyle::Long) => "cin",
            (Self::Ae, NameStyle::Short) => "m2m:ae",
            (Self::Container, NameStyle::Short) => "m2m:cnt",
            (Self::ContentInstance, NameStyle::Short) => "m2m:cin",
        }
    }
}

/// Attribute naming used when serializing request bodies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    /// `resourceName`, `appID`, ... under `ae` / `cnt` / `cin`
    #[default]
    Long,
    /// `rn`, `api`, ... under `m2m:ae` / `m2m:cnt` / `m2m:cin`
    Short,
}

/// A resource that can be created on a CSE
pub trait Resource: Serialize {
    /// Type discriminator sent with the create request
    const TYPE: ResourceType;
}

/// Application Entity representing the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ae {
    /// Resource name (`rn`)
    #[serde(rename = "resourceName")]
    pub resource_name: String,
    /// Application identifier (`api`)
    #[serde(rename = "appID")]
    pub app_id: String,
    /// Whether the CSE may send requests to the AE (`rr`)
    #[serde(rename = "requestReachability")]
    pub request_reachability: bool,
    /// Labels (`lbl`)
    pub labels: Vec<String>,
}

impl Ae {
    /// AE for a device: named after it, app id `<device>_api`, labelled with its name
    #[must_use]
    pub fn for_device(device_name: &str) -> Self {
        Self {
            resource_name: device_name.to_string(),
            app_id: format!("{device_name}_api"),
            request_reachability: true,
            labels: vec![device_name.to_string()],
        }
    }
}

impl Resource for Ae {
    const TYPE: ResourceType = ResourceType::Ae;
}

/// Container resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    /// Resource name (`rn`)
    #[serde(rename = "resourceName")]
    pub resource_name: String,
}

impl Container {
    /// Container with the given resource name
    pub fn named(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
        }
    }

    /// The `DESCRIPTOR` container
    #[must_use]
    pub fn descriptor() -> Self {
        Self::named(DESCRIPTOR_NAME)
    }
}

impl Resource for Container {
    const TYPE: ResourceType = ResourceType::Container;
}

/// ContentInstance carrying one data point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentInstance {
    /// MIME type of `content` (`cnf`)
    #[serde(rename = "contentInfo")]
    pub content_info: String,
    /// Encoded data point (`con`)
    pub content: String,
}

impl ContentInstance {
    /// Encode `payload` as a JSON string and wrap it as `application/json` content
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` cannot be serialized to JSON.
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content_info: CONTENT_INFO_JSON.to_string(),
            content: serde_json::to_string(payload)?,
        })
    }
}

impl Resource for ContentInstance {
    const TYPE: ResourceType = ResourceType::ContentInstance;
}

/// Build the create-request body for `resource`
///
/// # Errors
///
/// Returns an error if the resource cannot be converted to JSON.
pub fn request_body<R: Resource>(resource: &R, style: NameStyle) -> Result<Value, serde_json::Error> {
    let attributes = serde_json::to_value(resource)?;
    let attributes = match style {
        NameStyle::Long => attributes,
        NameStyle::Short => abbreviate(attributes),
    };

    let mut body = Map::new();
    let _ = body.insert(R::TYPE.root_key(style).to_string(), attributes);
    Ok(Value::Object(body))
}

fn short_name(long: &str) -> Option<&'static str> {
    let short = match long {
        "resourceName" => "rn",
        "appID" => "api",
        "requestReachability" => "rr",
        "labels" => "lbl",
        "contentInfo" => "cnf",
        "content" => "con",
        _ => return None,
    };
    Some(short)
}

fn abbreviate(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let key = short_name(&key).map_or(key, str::to_string);
                    (key, abbreviate(value))
                })
                .collect(),
        ),
        other => other,
    }
}
