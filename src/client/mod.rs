//! oneM2M CSE client
//!
//! [`CseClient`] turns the resource lifecycle of a device (register the AE,
//! make sure its containers exist, publish ContentInstances) into blocking
//! HTTP requests against a CSE and interprets the replies.
//!
//! Every operation returns an [`Outcome`] on success. `Created` and
//! `AlreadyExists` are both success; anything else is a
//! [`CseOperationError`](crate::error::CseOperationError).

pub mod endpoints;
pub mod headers;
pub mod http;

pub use endpoints::Endpoints;
pub use headers::HeaderSets;

use crate::config::ClientConfig;
use crate::error::{ConfigError, CseOperationError, Operation, Result};
use crate::resource::{request_body, Ae, Container, ContentInstance, Resource, ResourceType};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{field, info, instrument, Span};

/// Successful result of a resource operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The CSE created (or accepted) the resource
    Created,
    /// The resource was already present on the CSE
    AlreadyExists,
}

impl Outcome {
    /// Whether this call created the resource
    #[must_use]
    pub const fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

/// Outcomes of a full provisioning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provisioned {
    /// AE registration
    pub ae: Outcome,
    /// Data container
    pub container: Outcome,
    /// DESCRIPTOR container
    pub descriptor: Outcome,
}

/// Client bound to one device on one CSE
///
/// URLs and headers are derived once at construction. The client keeps no
/// record of what exists remotely; every call asks the CSE again.
#[derive(Debug, Clone)]
pub struct CseClient {
    config: ClientConfig,
    endpoints: Endpoints,
    headers: HeaderSets,
    http: Client,
}

impl CseClient {
    /// Create a client from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = http::create_client(&config)?;
        Self::with_http_client(config, http)
    }

    /// Create a client that sends requests through `http`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_http_client(
        config: ClientConfig,
        http: Client,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoints = Endpoints::new(&config);
        let headers = HeaderSets::new(&config.credential)?;

        Ok(Self {
            config,
            endpoints,
            headers,
            http,
        })
    }

    /// Configuration this client was built from
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// All derived resource URLs
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// CSE base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.endpoints.base
    }

    /// AE URL
    #[must_use]
    pub fn ae_url(&self) -> &str {
        &self.endpoints.ae
    }

    /// Data container URL
    #[must_use]
    pub fn container_url(&self) -> &str {
        &self.endpoints.container
    }

    /// DESCRIPTOR container URL
    #[must_use]
    pub fn descriptor_url(&self) -> &str {
        &self.endpoints.descriptor
    }

    /// Register the device's Application Entity
    ///
    /// 201 and 409 are both success.
    ///
    /// # Errors
    ///
    /// Returns [`CseOperationError`] on any other status or on transport failure.
    #[instrument(skip_all, fields(device = %self.config.device_name, status = field::Empty), err(level = "warn"))]
    pub fn register_ae(&self) -> Result<Outcome> {
        let operation = Operation::RegisterAe;
        let ae = Ae::for_device(&self.config.device_name);
        let response = self.post(operation, &self.endpoints.base, &ae)?;
        let outcome = creation_outcome(operation, response)?;

        match outcome {
            Outcome::Created => info!("AE registered successfully"),
            Outcome::AlreadyExists => info!("AE already exists"),
        }
        Ok(outcome)
    }

    /// Make sure the data container exists under the AE
    ///
    /// Issues a GET on the container first and returns without creating
    /// anything if it answers 200. Otherwise POSTs the container; a 409 there
    /// means another creator won the race and is treated as success.
    ///
    /// # Errors
    ///
    /// Returns [`CseOperationError`] if either request fails at the transport
    /// level or the creation answers anything but 201/409.
    #[instrument(skip_all, fields(container = %self.config.container_name, status = field::Empty), err(level = "warn"))]
    pub fn create_container(&self) -> Result<Outcome> {
        let check = self.http.get(&self.endpoints.container);
        let check = self.send(
            Operation::CheckContainer,
            check,
            ResourceType::Container,
        )?;
        if check.status() == StatusCode::OK {
            info!("Container already exists");
            return Ok(Outcome::AlreadyExists);
        }

        let operation = Operation::CreateContainer;
        let container = Container::named(self.config.container_name.as_str());
        let response = self.post(operation, &self.endpoints.ae, &container)?;
        let outcome = creation_outcome(operation, response)?;

        match outcome {
            Outcome::Created => info!("Container created successfully"),
            Outcome::AlreadyExists => info!("Container already exists"),
        }
        Ok(outcome)
    }

    /// Create the `DESCRIPTOR` container under the AE
    ///
    /// Unlike [`create_container`](Self::create_container) there is no
    /// existence check: the POST is always sent and 409 is treated as success.
    ///
    /// # Errors
    ///
    /// Returns [`CseOperationError`] on any status other than 201/409 or on
    /// transport failure.
    #[instrument(skip_all, fields(status = field::Empty), err(level = "warn"))]
    pub fn create_descriptor(&self) -> Result<Outcome> {
        let operation = Operation::CreateDescriptor;
        let response = self.post(operation, &self.endpoints.ae, &Container::descriptor())?;
        let outcome = creation_outcome(operation, response)?;

        match outcome {
            Outcome::Created => info!("Descriptor created successfully"),
            Outcome::AlreadyExists => info!("Descriptor already exists"),
        }
        Ok(outcome)
    }

    /// Publish `payload` as a ContentInstance in the data container
    ///
    /// The payload is encoded to a JSON string which becomes the `content`
    /// attribute of the ContentInstance. Failed uploads are not retried or
    /// buffered.
    ///
    /// # Errors
    ///
    /// Returns [`CseOperationError`] if the payload cannot be encoded, the
    /// request fails, or the CSE answers anything but 200/201/202.
    #[instrument(skip_all, fields(status = field::Empty), err(level = "warn"))]
    pub fn send_data<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Outcome> {
        let operation = Operation::SendData;
        let cin = ContentInstance::json(payload).map_err(|e| {
            CseOperationError::Serialization {
                operation,
                reason: e.to_string(),
            }
        })?;
        let response = self.post(operation, &self.endpoints.container, &cin)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => {
                info!("Data uploaded successfully");
                Ok(Outcome::Created)
            }
            _ => Err(unexpected_status(operation, response)),
        }
    }

    /// Register the AE, then ensure the data and descriptor containers exist
    ///
    /// Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the first operation that failed.
    pub fn provision(&self) -> Result<Provisioned> {
        Ok(Provisioned {
            ae: self.register_ae()?,
            container: self.create_container()?,
            descriptor: self.create_descriptor()?,
        })
    }

    fn post<R: Resource>(&self, operation: Operation, url: &str, resource: &R) -> Result<Response> {
        let body = request_body(resource, self.config.name_style)
            .and_then(|body| serde_json::to_vec(&body))
            .map_err(|e| CseOperationError::Serialization {
                operation,
                reason: e.to_string(),
            })?;

        self.send(operation, self.http.post(url).body(body), R::TYPE)
    }

    fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
        resource_type: ResourceType,
    ) -> Result<Response> {
        let response = request
            .headers(self.headers.for_type(resource_type).clone())
            .send()
            .map_err(|e| CseOperationError::transport(operation, &e))?;

        let _ = Span::current().record("status", response.status().as_u16());
        Ok(response)
    }
}

fn creation_outcome(operation: Operation, response: Response) -> Result<Outcome> {
    match response.status() {
        StatusCode::CREATED => Ok(Outcome::Created),
        StatusCode::CONFLICT => Ok(Outcome::AlreadyExists),
        _ => Err(unexpected_status(operation, response)),
    }
}

fn unexpected_status(operation: Operation, response: Response) -> CseOperationError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .unwrap_or_else(|e| format!("<unreadable response body: {e}>"));

    CseOperationError::Status {
        operation,
        status,
        body,
    }
}
