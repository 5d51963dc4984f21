// verifier.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::configuration::Configuration;
use crate::error::{VerificationError, VerificationResult};
use crate::request::VerificationRequest;

type HmacSha256 = Hmac<Sha256>;

/// Per-call overrides. Anything left as `None` falls back to the
/// [`Configuration`] passed alongside.
#[derive(Clone, Default)]
pub struct VerifyOptions {
    pub secret: Option<Vec<u8>>,
    pub tolerance: Option<Duration>,
    pub signature_header_name: Option<String>,
    pub timestamp_header_name: Option<String>,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_signature_header_name(mut self, name: impl Into<String>) -> Self {
        self.signature_header_name = Some(name.into());
        self
    }

    pub fn with_timestamp_header_name(mut self, name: impl Into<String>) -> Self {
        self.timestamp_header_name = Some(name.into());
        self
    }
}

impl std::fmt::Debug for VerifyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyOptions")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("tolerance", &self.tolerance)
            .field("signature_header_name", &self.signature_header_name)
            .field("timestamp_header_name", &self.timestamp_header_name)
            .finish()
    }
}

/// Verify `request` against the shared configuration.
pub fn verify<R>(request: &R, config: &Configuration) -> VerificationResult<()>
where
    R: VerificationRequest + ?Sized,
{
    verify_with(request, config, &VerifyOptions::default())
}

/// Verify with per-call overrides taking precedence over `config`.
pub fn verify_with<R>(
    request: &R,
    config: &Configuration,
    options: &VerifyOptions,
) -> VerificationResult<()>
where
    R: VerificationRequest + ?Sized,
{
    verify_at(request, config, options, Utc::now())
}

/// Verify as of `now`.
///
/// Only the age of the timestamp is bounded: a timestamp ahead of `now`
/// passes the freshness check no matter how far ahead it is, so a sender
/// with a fast clock is still accepted.
pub fn verify_at<R>(
    request: &R,
    config: &Configuration,
    options: &VerifyOptions,
    now: DateTime<Utc>,
) -> VerificationResult<()>
where
    R: VerificationRequest + ?Sized,
{
    let secret = options
        .secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| config.secret())
        .ok_or_else(|| reject(VerificationError::ConfigurationMissing))?;
    let signature_header = options
        .signature_header_name
        .as_deref()
        .unwrap_or(config.signature_header_name());
    let timestamp_header = options
        .timestamp_header_name
        .as_deref()
        .unwrap_or(config.timestamp_header_name());
    let tolerance = options.tolerance.unwrap_or(config.tolerance());

    let signature = request.header(signature_header).ok_or_else(|| {
        debug!(header = signature_header, "signature header absent");
        reject(VerificationError::MissingSignature)
    })?;
    let timestamp = request.header(timestamp_header).ok_or_else(|| {
        debug!(header = timestamp_header, "timestamp header absent");
        reject(VerificationError::MissingTimestamp)
    })?;

    if !is_fresh(timestamp, now, tolerance) {
        return Err(reject(VerificationError::TimestampTooOld));
    }

    let expected = compute_signature(secret, timestamp, request.body()).map_err(reject)?;
    if !signatures_match(&expected, signature) {
        return Err(reject(VerificationError::InvalidSignature));
    }

    Ok(())
}

/// Lowercase hex HMAC-SHA256 of `timestamp || body` under `secret`.
///
/// `timestamp` is hashed exactly as sent in the header, with no separator
/// before the body. A key the MAC refuses is reported as
/// [`VerificationError::ConfigurationMissing`].
pub fn compute_signature(
    secret: &[u8],
    timestamp: &str,
    body: &[u8],
) -> VerificationResult<String> {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => return Err(VerificationError::ConfigurationMissing),
    };

    mac.update(timestamp.as_bytes());
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Unparsable timestamps are never fresh.
fn is_fresh(timestamp: &str, now: DateTime<Utc>, tolerance: Duration) -> bool {
    let Ok(sent_at) = timestamp.trim().parse::<i64>() else {
        debug!("timestamp is not an integer");
        return false;
    };

    let age = now.timestamp().saturating_sub(sent_at);
    let max_age = i64::try_from(tolerance.as_secs()).unwrap_or(i64::MAX);
    if age > max_age {
        debug!(age_secs = age, max_age_secs = max_age, "timestamp outside tolerance");
        return false;
    }
    true
}

// Length is not secret; the digest bytes are compared without early exit.
fn signatures_match(expected: &str, provided: &str) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

fn reject(error: VerificationError) -> VerificationError {
    debug!(reason = %error, "webhook verification failed");
    error
}

/// Cheap-to-clone verifier bound to one shared [`Configuration`].
#[derive(Debug, Clone)]
pub struct Verifier {
    config: Arc<Configuration>,
}

impl Verifier {
    pub fn new(config: Configuration) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn verify<R>(&self, request: &R) -> VerificationResult<()>
    where
        R: VerificationRequest + ?Sized,
    {
        verify(request, &self.config)
    }

    pub fn verify_with<R>(&self, request: &R, options: &VerifyOptions) -> VerificationResult<()>
    where
        R: VerificationRequest + ?Sized,
    {
        verify_with(request, &self.config, options)
    }
}

impl From<Arc<Configuration>> for Verifier {
    fn from(config: Arc<Configuration>) -> Self {
        Self { config }
    }
}
