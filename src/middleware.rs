// middleware.rs
use axum::{
    body::{self, Body},
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use tracing::warn;

use crate::configuration::Configuration;
use crate::verifier::Verifier;

pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// State for [`verify_webhook`].
#[derive(Debug, Clone)]
pub struct WebhookGuard {
    verifier: Verifier,
    body_limit: usize,
}

impl WebhookGuard {
    pub fn new(config: Configuration) -> Self {
        Self::from(Verifier::new(config))
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }
}

impl From<Verifier> for WebhookGuard {
    fn from(verifier: Verifier) -> Self {
        Self {
            verifier,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Reads the body once, verifies the request and hands the same bytes to the
/// next handler, which can extract them as `Bytes` or `String` as usual.
///
/// A body over the limit is answered with 413, any other read failure with
/// 400.
///
/// ```ignore
/// let app = Router::new()
///     .route("/webhook", post(handler))
///     .route_layer(middleware::from_fn_with_state(guard, verify_webhook));
/// ```
pub async fn verify_webhook(
    State(guard): State<WebhookGuard>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match body::to_bytes(body, guard.body_limit).await {
        Ok(bytes) => bytes,
        Err(e) if exceeds_limit(&e) => {
            warn!("Webhook body over {} bytes", guard.body_limit);
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
        Err(e) => {
            warn!("Failed to read webhook body: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let buffered = Request::from_parts(parts, bytes);
    if let Err(e) = guard.verifier.verify(&buffered) {
        warn!("Rejected webhook: {}", e);
        return e.into_response();
    }

    next.run(buffered.map(Body::from)).await
}

fn exceeds_limit(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
