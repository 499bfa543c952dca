//! Logging initialization and request/response records.

use env_logger::Env;
use log::debug;

use crate::error::NetError;
use crate::http::request::RequestDescriptor;
use crate::http::response::NetworkResponse;

/// Initialize logging with a default filter level.
pub fn init() {
    let env = Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();
}

/// Emit a record of an outgoing request before dispatch.
pub(crate) fn log_request(descriptor: &RequestDescriptor) {
    debug!("> {} {}", descriptor.method, descriptor.url);
    for (key, value) in &descriptor.headers {
        debug!("> {}: {}", key, value);
    }
    match &descriptor.body {
        Some(body) => debug!("> body: {}", String::from_utf8_lossy(body)),
        None => debug!("> body: empty"),
    }
}

/// Emit a record of a completed exchange, successful or not.
pub(crate) fn log_response(response: Option<&NetworkResponse>, error: Option<&NetError>) {
    if let Some(response) = response {
        debug!("< status: {}", response.status);
        for (name, value) in response.headers.iter() {
            debug!("< {}: {}", name, value.to_str().unwrap_or("<non-utf8>"));
        }
        match &response.body {
            Some(body) => debug!("< body: {}", String::from_utf8_lossy(body)),
            None => debug!("< body: empty"),
        }
    }
    if let Some(error) = error {
        debug!("< error: {}", error);
    }
}
