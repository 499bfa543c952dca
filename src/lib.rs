//! chainreq - a chainable HTTP client builder
//!
//! Assembles an outbound HTTP request from incremental configuration calls,
//! dispatches it through `reqwest`, and decodes the response into a typed
//! value. Defaults (base host, headers, timeout, logging) come from an
//! explicitly passed [`Settings`] object scoped by [`Environment`].
//!
//! ```no_run
//! use chainreq::{Environment, HttpMethod, NetClient, RequestBuilder, Settings};
//!
//! # #[derive(serde::Deserialize)] struct User { name: String }
//! # async fn demo() -> chainreq::Result<()> {
//! let mut settings = Settings::new();
//! settings.set_host(Environment::Development, "https://dev.example.com");
//! let client = NetClient::new(settings)?;
//!
//! let user: User = RequestBuilder::new("/users/1")
//!     .method(HttpMethod::Get)
//!     .header("X-Request-Id", "42")
//!     .send(&client)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod http;
pub mod logging;
pub mod ssl;

pub use config::{Environment, HttpMethod, Settings};
pub use encoding::{ParamValue, ParameterEncoding, Parameters};
pub use error::{NetError, Result};
pub use http::{NetClient, NetworkResponse, RequestBuilder, RequestDescriptor};
pub use ssl::{Certificate, ServerIdentity, TrustDecision, TrustPolicy};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
