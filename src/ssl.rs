//! Server trust policies and certificate handling
//!
//! The trust policy is handed to the transport at client construction. It
//! plays no part in request building: `decide` is the accept/reject hook the
//! transport consults against a presented server identity, and `apply` wires
//! the policy into the underlying `reqwest` client.

use std::path::Path;

use crate::error::{NetError, Result};

/// A certificate loaded from disk, kept as its raw PEM or DER bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    data: Vec<u8>,
}

impl Certificate {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Certificate { data }
    }

    /// Read a certificate file (PEM or DER) into memory
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Certificate { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Convert into the transport's native credential representation
    pub fn to_reqwest(&self) -> Result<reqwest::Certificate> {
        let parsed = if self.data.starts_with(b"-----BEGIN") {
            reqwest::Certificate::from_pem(&self.data)
        } else {
            reqwest::Certificate::from_der(&self.data)
        };
        parsed.map_err(|e| NetError::Ssl(format!("invalid certificate: {}", e)))
    }
}

/// Identity presented by a server during connection setup
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    pub host: String,
    /// Certificate chain as presented, leaf first
    pub certificate_chain: Vec<Vec<u8>>,
}

/// Outcome of a trust evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustDecision {
    /// Peer accepted, optionally with the matched pinned credential
    Accept(Option<Certificate>),
    Reject,
}

/// Server trust policy
#[derive(Debug, Clone)]
pub enum TrustPolicy {
    /// Delegate to the platform trust store
    DefaultEvaluation { validate_host: bool },
    /// Accept only peers presenting a pinned certificate
    PinCertificates {
        certificates: Vec<Certificate>,
        /// When false, only the leaf certificate is compared against the
        /// pinned set instead of the whole presented chain.
        validate_chain: bool,
        validate_host: bool,
    },
    /// Accept everything. Test environments only; gated behind the
    /// `insecure-trust` feature so it cannot ship in a release build.
    #[cfg(feature = "insecure-trust")]
    DisableEvaluation,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        TrustPolicy::DefaultEvaluation {
            validate_host: true,
        }
    }
}

impl TrustPolicy {
    /// Decide whether a presented server identity is acceptable.
    ///
    /// Default evaluation accepts and defers to the platform trust store,
    /// which the transport consults anyway. Pinning accepts only when a
    /// presented certificate matches the pinned set; the matched pinned
    /// credential is returned for the transport to use.
    pub fn decide(&self, identity: &ServerIdentity) -> TrustDecision {
        match self {
            TrustPolicy::DefaultEvaluation { .. } => TrustDecision::Accept(None),
            TrustPolicy::PinCertificates {
                certificates,
                validate_chain,
                ..
            } => {
                let presented: &[Vec<u8>] = if *validate_chain {
                    &identity.certificate_chain
                } else {
                    // Leaf only
                    identity
                        .certificate_chain
                        .get(..1)
                        .unwrap_or(&identity.certificate_chain)
                };
                let matched = certificates.iter().find(|pinned| {
                    presented.iter().any(|cert| cert.as_slice() == pinned.as_bytes())
                });
                match matched {
                    Some(credential) => TrustDecision::Accept(Some(credential.clone())),
                    None => TrustDecision::Reject,
                }
            }
            #[cfg(feature = "insecure-trust")]
            TrustPolicy::DisableEvaluation => TrustDecision::Accept(None),
        }
    }

    /// Evaluate an identity, mapping a rejection to `ServerTrustFailed`.
    ///
    /// Rejections are security-significant and must surface as errors, never
    /// as a downgraded success.
    pub fn evaluate(&self, identity: &ServerIdentity) -> Result<Option<Certificate>> {
        match self.decide(identity) {
            TrustDecision::Accept(credential) => Ok(credential),
            TrustDecision::Reject => Err(NetError::ServerTrustFailed(identity.host.clone())),
        }
    }

    /// Wire this policy into the transport's client builder.
    ///
    /// Pinned certificates replace the built-in root set so only pinned
    /// roots can validate a peer, for both `validate_chain` values: the
    /// leaf-only comparison exists at the `decide` level, while the
    /// transport always performs full verification against the pinned set.
    /// Trust is never widened here. Host validation is enforced by the
    /// transport's TLS stack and cannot be switched off there; the
    /// `validate_host` flag only affects `decide`-level evaluation.
    pub fn apply(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder> {
        match self {
            TrustPolicy::DefaultEvaluation { .. } => Ok(builder),
            TrustPolicy::PinCertificates { certificates, .. } => {
                let mut builder = builder.tls_built_in_root_certs(false);
                for certificate in certificates {
                    builder = builder.add_root_certificate(certificate.to_reqwest()?);
                }
                Ok(builder)
            }
            #[cfg(feature = "insecure-trust")]
            TrustPolicy::DisableEvaluation => Ok(builder.danger_accept_invalid_certs(true)),
        }
    }
}
