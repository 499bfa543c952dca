//! Chainable request builder and the finalized request descriptor

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{HttpMethod, Settings};
use crate::encoding::{ParamValue, ParameterEncoding, Parameters};
use crate::error::{NetError, Result};
use crate::http::auth::Auth;
use crate::http::response::NetworkResponse;
use crate::http::NetClient;

/// Finalized, immutable representation of a request ready for transport
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: Url,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

/// Accumulates request configuration across chained calls.
///
/// Every setter consumes and returns the builder, so a request reads as one
/// fluent chain. The builder is not tied to a client or settings instance:
/// the base host, default headers and timeout are resolved in [`build`],
/// so an environment switch between construction and build still takes
/// effect.
///
/// [`build`]: RequestBuilder::build
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    path: String,
    absolute_url: Option<String>,
    method: Option<HttpMethod>,
    headers: HashMap<String, String>,
    parameters: Parameters,
    encoding: Option<ParameterEncoding>,
    timeout: Option<Duration>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Start a request for a path resolved against the active environment's
    /// base host at build time
    pub fn new(path: impl Into<String>) -> Self {
        RequestBuilder {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Start a request for an absolute URL, bypassing the environment host
    pub fn from_url(url: impl Into<String>) -> Self {
        RequestBuilder {
            absolute_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Replace the target path, resolved against the environment host
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self.absolute_url = None;
        self
    }

    /// Replace the target with an absolute URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.absolute_url = Some(url.into());
        self
    }

    /// Set the HTTP method (GET when never called)
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a header. Last write wins per key, and explicit headers override
    /// environment defaults.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merge a header map, last write wins per key
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Replace the parameter map
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Add a single parameter
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Select the body parameter encoding (JSON when never called)
    pub fn encoding(mut self, encoding: ParameterEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Override the environment's default timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a raw body, taking precedence over parameter-derived bodies
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a basic auth `Authorization` header
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        self.header("Authorization", Auth::basic_auth(username, password))
    }

    /// Finalize into an immutable descriptor against the given settings.
    ///
    /// GET and DELETE requests place non-empty parameters into the URL query
    /// component (always query-string encoded, whatever encoding was
    /// selected); POST and PUT encode them into the body using the selected
    /// encoding, JSON by default, and set the matching `Content-Type`. A
    /// POST/PUT body is emitted even for an empty parameter map (`{}` under
    /// JSON) unless a raw body was set.
    pub fn build(&self, settings: &Settings) -> Result<RequestDescriptor> {
        let raw_url = match &self.absolute_url {
            Some(url) => url.clone(),
            None => format!("{}{}", settings.host(), self.path),
        };
        let mut url = Url::parse(&raw_url)
            .map_err(|e| NetError::InvalidUrl(format!("'{}': {}", raw_url, e)))?;

        let method = self.method.unwrap_or(HttpMethod::Get);
        let mut body = self.body.clone();
        let mut body_content_type = None;

        match method {
            HttpMethod::Get | HttpMethod::Delete => {
                if !self.parameters.is_empty() {
                    let encoded = ParameterEncoding::QueryString.encode(&self.parameters)?;
                    let query = String::from_utf8(encoded)
                        .map_err(|e| NetError::DecodingFailed(e.to_string()))?;
                    let merged = match url.query() {
                        Some(existing) if !existing.is_empty() => {
                            format!("{}&{}", existing, query)
                        }
                        _ => query,
                    };
                    url.set_query(Some(&merged));
                }
            }
            HttpMethod::Post | HttpMethod::Put => {
                // An explicit raw body wins over encoded parameters. An
                // empty map still encodes, so a JSON POST carries `{}`.
                if body.is_none() {
                    let encoding = self.encoding.unwrap_or(ParameterEncoding::Json);
                    body = Some(encoding.encode(&self.parameters)?);
                    body_content_type = Some(encoding.content_type());
                }
            }
        }

        let mut headers = settings.default_headers();
        if let Some(content_type) = body_content_type {
            headers.insert("Content-Type".to_string(), content_type.to_string());
        }
        for (key, value) in &self.headers {
            headers.insert(key.clone(), value.clone());
        }
        if let Some(token) = settings.bearer_token() {
            headers.insert("Authorization".to_string(), Auth::bearer_token(&token));
        }

        let timeout = self.timeout.unwrap_or_else(|| settings.timeout());

        Ok(RequestDescriptor {
            url,
            method,
            headers,
            body,
            timeout,
        })
    }

    /// Build against the client's settings, dispatch, and decode the body
    pub async fn send<T: DeserializeOwned>(self, client: &NetClient) -> Result<T> {
        let descriptor = self.build(client.settings())?;
        client.send(descriptor).await
    }

    /// Build against the client's settings and dispatch without decoding
    pub async fn dispatch(self, client: &NetClient) -> Result<NetworkResponse> {
        let descriptor = self.build(client.settings())?;
        client.dispatch(&descriptor).await
    }
}
