// configuration.rs
use std::time::Duration;

use crate::error::{VerificationError, VerificationResult};

pub const DEFAULT_SIGNATURE_HEADER: &str = "X-Signature";
pub const DEFAULT_TIMESTAMP_HEADER: &str = "X-Timestamp";
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(5 * 60);

/// Verification parameters shared by every request.
///
/// Built once by the embedding application and read-only afterwards; wrap it
/// in an `Arc` to share across handlers. Only the secret has to be set, the
/// header names and tolerance have defaults.
#[derive(Clone)]
pub struct Configuration {
    secret: Option<Vec<u8>>,
    signature_header_name: String,
    timestamp_header_name: String,
    tolerance: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            secret: None,
            signature_header_name: DEFAULT_SIGNATURE_HEADER.to_string(),
            timestamp_header_name: DEFAULT_TIMESTAMP_HEADER.to_string(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_secret(&mut self, secret: impl Into<Vec<u8>>) {
        self.secret = Some(secret.into());
    }

    pub fn set_signature_header_name(&mut self, name: impl Into<String>) {
        self.signature_header_name = name.into();
    }

    pub fn set_timestamp_header_name(&mut self, name: impl Into<String>) {
        self.timestamp_header_name = name.into();
    }

    pub fn set_tolerance(&mut self, tolerance: Duration) {
        self.tolerance = tolerance;
    }

    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.set_secret(secret);
        self
    }

    pub fn with_signature_header_name(mut self, name: impl Into<String>) -> Self {
        self.set_signature_header_name(name);
        self
    }

    pub fn with_timestamp_header_name(mut self, name: impl Into<String>) -> Self {
        self.set_timestamp_header_name(name);
        self
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.set_tolerance(tolerance);
        self
    }

    /// The configured secret, `None` when unset or empty.
    pub fn secret(&self) -> Option<&[u8]> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn signature_header_name(&self) -> &str {
        &self.signature_header_name
    }

    pub fn timestamp_header_name(&self) -> &str {
        &self.timestamp_header_name
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Fails with [`VerificationError::ConfigurationMissing`] when no usable
    /// secret is set. Call this at startup, before serving requests.
    pub fn validate(&self) -> VerificationResult<()> {
        self.secret()
            .map(|_| ())
            .ok_or(VerificationError::ConfigurationMissing)
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("signature_header_name", &self.signature_header_name)
            .field("timestamp_header_name", &self.timestamp_header_name)
            .field("tolerance", &self.tolerance)
            .finish()
    }
}
