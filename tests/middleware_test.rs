use axum::{
    body::{self, Body, Bytes},
    http::{Request, StatusCode},
    middleware,
    routing::post,
    Router,
};
use chrono::Utc;
use tower::ServiceExt;
use webhook_verifier::{compute_signature, verify_webhook, Configuration, WebhookGuard};

const SECRET: &[u8] = b"a6b14ed482348570244e774962fd96c10b44f6bcd0149ee5efa9c720ecbf44e1";
const BODY: &str = r#"{"name":"John","id":"123"}"#;

async fn echo(body: Bytes) -> Bytes {
    body
}

fn app(guard: WebhookGuard) -> Router {
    Router::new()
        .route("/webhook", post(echo))
        .route_layer(middleware::from_fn_with_state(guard, verify_webhook))
}

fn guard() -> WebhookGuard {
    WebhookGuard::new(Configuration::new().with_secret(SECRET))
}

fn request(signature: Option<&str>, timestamp: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/webhook");
    if let Some(signature) = signature {
        builder = builder.header("X-Signature", signature);
    }
    if let Some(timestamp) = timestamp {
        builder = builder.header("X-Timestamp", timestamp);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn now() -> String {
    Utc::now().timestamp().to_string()
}

#[tokio::test]
async fn valid_request_reaches_handler_with_body() {
    let timestamp = now();
    let signature = compute_signature(SECRET, &timestamp, BODY.as_bytes()).unwrap();

    let response = app(guard())
        .oneshot(request(Some(signature.as_str()), Some(timestamp.as_str()), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let echoed = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&echoed[..], BODY.as_bytes());
}

#[tokio::test]
async fn invalid_signature_is_unauthorized() {
    let response = app(guard())
        .oneshot(request(Some("invalidsignature"), Some(now().as_str()), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn modified_body_is_unauthorized() {
    let timestamp = now();
    let signature = compute_signature(SECRET, &timestamp, BODY.as_bytes()).unwrap();

    let response = app(guard())
        .oneshot(request(
            Some(signature.as_str()),
            Some(timestamp.as_str()),
            r#"{"name":"Invalid","id":"999"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_headers_are_bad_requests() {
    let timestamp = now();
    let signature = compute_signature(SECRET, &timestamp, BODY.as_bytes()).unwrap();

    let response = app(guard())
        .oneshot(request(None, Some(timestamp.as_str()), BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app(guard())
        .oneshot(request(Some(signature.as_str()), None, BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stale_request_is_unauthorized() {
    let timestamp = (Utc::now().timestamp() - 600).to_string();
    let signature = compute_signature(SECRET, &timestamp, BODY.as_bytes()).unwrap();

    let response = app(guard())
        .oneshot(request(Some(signature.as_str()), Some(timestamp.as_str()), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_secret_is_server_error() {
    let timestamp = now();
    let signature = compute_signature(SECRET, &timestamp, BODY.as_bytes()).unwrap();

    let response = app(WebhookGuard::new(Configuration::new()))
        .oneshot(request(Some(signature.as_str()), Some(timestamp.as_str()), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let timestamp = now();
    let signature = compute_signature(SECRET, &timestamp, BODY.as_bytes()).unwrap();

    let response = app(guard().with_body_limit(4))
        .oneshot(request(Some(signature.as_str()), Some(timestamp.as_str()), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unreadable_body_is_bad_request() {
    let timestamp = now();
    let signature = compute_signature(SECRET, &timestamp, BODY.as_bytes()).unwrap();

    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"{\"name\":")),
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "client went away",
        )),
    ];
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("X-Signature", signature)
        .header("X-Timestamp", timestamp)
        .body(Body::from_stream(futures::stream::iter(chunks)))
        .unwrap();

    let response = app(guard()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
