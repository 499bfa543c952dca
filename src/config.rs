//! Configuration management for chainreq
//!
//! `Settings` is an explicitly passed configuration object, owned by the
//! caller and handed to `NetClient`. There is no global state: construction
//! and update points are explicit, and every derived default (host, headers,
//! timeout, logging) reads the single active `Environment` field, so an
//! environment switch updates all of them together.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{NetError, Result};
use crate::ssl::{Certificate, TrustPolicy};

/// HTTP method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(()),
        }
    }
}

/// Named configuration profile selecting per-environment defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    /// Default header set for requests built under this environment
    pub fn default_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// Default request timeout for this environment
    pub fn timeout(&self) -> Duration {
        match self {
            Environment::Development | Environment::Testing => Duration::from_secs(60),
            Environment::Production => Duration::from_secs(30),
        }
    }

    /// Whether request/response logging is on for this environment
    pub fn logging_enabled(&self) -> bool {
        match self {
            Environment::Development | Environment::Testing => true,
            Environment::Production => false,
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

/// Callback supplying the current bearer token, if any
pub type BearerTokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Network configuration: environment hosts, auth, certificates, trust
#[derive(Clone)]
pub struct Settings {
    environment_hosts: HashMap<Environment, String>,
    env: Environment,
    bearer_token_provider: Option<BearerTokenProvider>,
    certificates: HashMap<String, Certificate>,
    trust_policy: TrustPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            environment_hosts: HashMap::new(),
            env: Environment::Development,
            bearer_token_provider: None,
            certificates: HashMap::new(),
            trust_policy: TrustPolicy::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the base host for an environment
    pub fn set_host(&mut self, env: Environment, host: impl Into<String>) {
        self.environment_hosts.insert(env, host.into());
    }

    /// Switch the active environment. Host, default headers, timeout and the
    /// logging flag all derive from this field, so the switch is atomic.
    pub fn set_environment(&mut self, env: Environment) {
        self.env = env;
    }

    pub fn environment(&self) -> Environment {
        self.env
    }

    /// Base host for the active environment, empty when none is registered
    pub fn host(&self) -> &str {
        self.environment_hosts
            .get(&self.env)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn default_headers(&self) -> HashMap<String, String> {
        self.env.default_headers()
    }

    pub fn timeout(&self) -> Duration {
        self.env.timeout()
    }

    pub fn logging_enabled(&self) -> bool {
        self.env.logging_enabled()
    }

    /// Set the bearer token provider invoked at request build time
    pub fn set_bearer_token_provider<F>(&mut self, provider: F)
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.bearer_token_provider = Some(Arc::new(provider));
    }

    /// Current bearer token. Empty tokens are treated as absent.
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer_token_provider
            .as_ref()
            .and_then(|provider| provider())
            .filter(|token| !token.is_empty())
    }

    /// Load named certificates from disk into the settings store
    pub fn load_certificates(&mut self, entries: &[(String, PathBuf)]) -> Result<()> {
        for (name, path) in entries {
            let certificate = Certificate::from_file(path)?;
            self.certificates.insert(name.clone(), certificate);
        }
        Ok(())
    }

    pub fn certificates(&self) -> &HashMap<String, Certificate> {
        &self.certificates
    }

    /// Certificates by name, failing on the first unknown name
    pub fn certificates_named(&self, names: &[&str]) -> Result<Vec<Certificate>> {
        names
            .iter()
            .map(|name| {
                self.certificates
                    .get(*name)
                    .cloned()
                    .ok_or_else(|| NetError::Config(format!("unknown certificate: {}", name)))
            })
            .collect()
    }

    /// Switch to a pinning trust policy built from previously loaded
    /// certificates, by name. The current policy is untouched when a name
    /// is unknown.
    pub fn pin_certificates(
        &mut self,
        names: &[&str],
        validate_chain: bool,
        validate_host: bool,
    ) -> Result<()> {
        let certificates = self.certificates_named(names)?;
        self.trust_policy = TrustPolicy::PinCertificates {
            certificates,
            validate_chain,
            validate_host,
        };
        Ok(())
    }

    pub fn set_trust_policy(&mut self, policy: TrustPolicy) {
        self.trust_policy = policy;
    }

    pub fn trust_policy(&self) -> &TrustPolicy {
        &self.trust_policy
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("environment_hosts", &self.environment_hosts)
            .field("env", &self.env)
            .field(
                "bearer_token_provider",
                &self.bearer_token_provider.as_ref().map(|_| "<fn>"),
            )
            .field("certificates", &self.certificates.keys())
            .field("trust_policy", &self.trust_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Environment, HttpMethod, Settings};
    use std::time::Duration;

    fn settings_with_hosts() -> Settings {
        let mut settings = Settings::new();
        settings.set_host(Environment::Development, "https://dev.example.com");
        settings.set_host(Environment::Testing, "https://test.example.com");
        settings.set_host(Environment::Production, "https://prod.example.com");
        settings
    }

    #[test]
    fn host_follows_active_environment() {
        let mut settings = settings_with_hosts();

        settings.set_environment(Environment::Development);
        assert_eq!(settings.host(), "https://dev.example.com");

        settings.set_environment(Environment::Testing);
        assert_eq!(settings.host(), "https://test.example.com");

        settings.set_environment(Environment::Production);
        assert_eq!(settings.host(), "https://prod.example.com");
    }

    #[test]
    fn environment_switch_updates_all_defaults_together() {
        let mut settings = settings_with_hosts();
        settings.set_environment(Environment::Development);
        assert_eq!(settings.timeout(), Duration::from_secs(60));
        assert!(settings.logging_enabled());

        settings.set_environment(Environment::Production);
        assert_eq!(settings.host(), "https://prod.example.com");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert!(!settings.logging_enabled());
        assert_eq!(
            settings.default_headers().get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn missing_host_is_empty() {
        let settings = Settings::new();
        assert_eq!(settings.host(), "");
    }

    #[test]
    fn bearer_token_filters_empty_values() {
        let mut settings = Settings::new();
        assert_eq!(settings.bearer_token(), None);

        settings.set_bearer_token_provider(|| Some(String::new()));
        assert_eq!(settings.bearer_token(), None);

        settings.set_bearer_token_provider(|| Some("token-123".to_string()));
        assert_eq!(settings.bearer_token(), Some("token-123".to_string()));
    }

    #[test]
    fn load_certificates_stores_by_name() {
        use crate::error::NetError;
        use std::fs;
        use std::path::PathBuf;
        use tempfile::tempdir;

        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("api.der");
        fs::write(&path, [1u8, 2, 3]).expect("write cert");

        let mut settings = Settings::new();
        settings
            .load_certificates(&[("api".to_string(), path)])
            .expect("load");
        assert_eq!(settings.certificates().len(), 1);

        let certs = settings.certificates_named(&["api"]).expect("named");
        assert_eq!(certs[0].as_bytes(), [1, 2, 3]);

        let err = settings
            .certificates_named(&["missing"])
            .expect_err("unknown name");
        assert!(matches!(err, NetError::Config(_)));

        let err = settings
            .load_certificates(&[("gone".to_string(), PathBuf::from("/nonexistent/cert"))])
            .expect_err("missing file");
        assert!(matches!(err, NetError::Io(_)));
    }

    #[test]
    fn pin_certificates_builds_policy_from_named_certs() {
        use crate::error::NetError;
        use crate::ssl::TrustPolicy;
        use std::fs;
        use tempfile::tempdir;

        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("api.der");
        fs::write(&path, [7u8, 7, 7]).expect("write cert");

        let mut settings = Settings::new();
        settings
            .load_certificates(&[("api".to_string(), path)])
            .expect("load");

        settings
            .pin_certificates(&["api"], true, true)
            .expect("pin");
        match settings.trust_policy() {
            TrustPolicy::PinCertificates {
                certificates,
                validate_chain,
                validate_host,
            } => {
                assert_eq!(certificates.len(), 1);
                assert_eq!(certificates[0].as_bytes(), [7, 7, 7]);
                assert!(*validate_chain);
                assert!(*validate_host);
            }
            other => panic!("unexpected policy: {:?}", other),
        }

        let err = settings
            .pin_certificates(&["missing"], true, true)
            .expect_err("unknown name");
        assert!(matches!(err, NetError::Config(_)));
        // Failed pinning leaves the previous policy in place.
        assert!(matches!(
            settings.trust_policy(),
            TrustPolicy::PinCertificates { .. }
        ));
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("DELETE".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("TRACE".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("production".parse::<Environment>(), Ok(Environment::Production));
        assert!("staging".parse::<Environment>().is_err());
    }
}
