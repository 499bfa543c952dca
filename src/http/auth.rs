//! HTTP authentication utilities

use base64::Engine;

/// Authentication header helpers
pub struct Auth;

impl Auth {
    /// Create basic auth header value
    pub fn basic_auth(username: &str, password: &str) -> String {
        let credentials = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    /// Create bearer token header value
    pub fn bearer_token(token: &str) -> String {
        format!("Bearer {}", token)
    }
}
