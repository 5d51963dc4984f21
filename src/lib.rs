//! HMAC-SHA256 verification for inbound webhooks.
//!
//! A sender signs `timestamp || body` with a shared secret and sends the
//! lowercase hex digest and the Unix timestamp in two headers (by default
//! `X-Signature` and `X-Timestamp`). The receiver recomputes the digest,
//! compares it in constant time and rejects requests older than the
//! configured tolerance.
//!
//! Timestamps from the future are not rejected. There is no nonce tracking,
//! so a captured request can be replayed within the tolerance window.

pub mod configuration;
pub mod error;
pub mod middleware;
pub mod request;
pub mod verifier;

pub use configuration::{
    Configuration, DEFAULT_SIGNATURE_HEADER, DEFAULT_TIMESTAMP_HEADER, DEFAULT_TOLERANCE,
};
pub use error::{VerificationError, VerificationResult};
pub use middleware::{verify_webhook, WebhookGuard, DEFAULT_BODY_LIMIT};
pub use request::{BufferedRequest, VerificationRequest};
pub use verifier::{compute_signature, verify, verify_at, verify_with, Verifier, VerifyOptions};
