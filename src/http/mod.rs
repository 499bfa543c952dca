//! HTTP dispatch module
//!
//! `NetClient` wraps the underlying transport (`reqwest`), applying the
//! configured trust policy at construction and classifying raw transport
//! outcomes into the crate's error taxonomy.

use reqwest::{Client, ClientBuilder, Method};
use serde::de::DeserializeOwned;

use crate::config::{HttpMethod, Settings};
use crate::error::{NetError, Result};
use crate::logging;

pub mod auth;
pub mod request;
pub mod response;

pub use request::{RequestBuilder, RequestDescriptor};
pub use response::NetworkResponse;

/// Dispatcher: owns the transport client and the settings it was built from.
///
/// Each dispatched request is an independent unit of work; the client holds
/// no per-request state. Settings mutations (environment switch, token
/// provider) are configure-then-read: perform them between requests, not
/// concurrently with one. The trust policy is applied once at construction,
/// so trust changes require a new client.
pub struct NetClient {
    settings: Settings,
    client: Client,
}

impl NetClient {
    /// Build a transport client from the given settings
    pub fn new(settings: Settings) -> Result<Self> {
        let builder = ClientBuilder::new();
        let builder = settings.trust_policy().apply(builder)?;
        let client = builder.build().map_err(NetError::RequestFailed)?;
        Ok(NetClient { settings, client })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Start a fluent request for a path under the active environment host
    pub fn request(&self, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(path)
    }

    /// Dispatch a finalized descriptor and classify the raw outcome.
    ///
    /// Exactly one terminal outcome per call. When logging is enabled for
    /// the active environment, the request is logged before dispatch and the
    /// response (or error) after completion; logging never changes the
    /// outcome.
    pub async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<NetworkResponse> {
        if self.settings.logging_enabled() {
            logging::log_request(descriptor);
        }

        let method = match descriptor.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut request = self.client.request(method, descriptor.url.clone());
        for (key, value) in &descriptor.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &descriptor.body {
            request = request.body(body.clone());
        }
        request = request.timeout(descriptor.timeout);

        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                match response.bytes().await {
                    Ok(bytes) => {
                        let body = if bytes.is_empty() {
                            None
                        } else {
                            Some(bytes.to_vec())
                        };
                        Ok(NetworkResponse {
                            status,
                            headers,
                            body,
                        })
                    }
                    Err(e) => Err(classify_transport_error(e)),
                }
            }
            Err(e) => Err(classify_transport_error(e)),
        };

        if self.settings.logging_enabled() {
            match &outcome {
                Ok(response) => logging::log_response(Some(response), None),
                Err(error) => logging::log_response(None, Some(error)),
            }
        }

        outcome
    }

    /// Dispatch a descriptor and decode the response body into `T`
    pub async fn send<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let response = self.dispatch(&descriptor).await?;
        response.decode()
    }
}

/// Deadline conditions map to `Timeout`, everything else stays a wrapped
/// transport failure so callers can apply their own retry policy.
fn classify_transport_error(error: reqwest::Error) -> NetError {
    if error.is_timeout() {
        NetError::Timeout
    } else {
        NetError::RequestFailed(error)
    }
}
