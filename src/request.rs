// request.rs
use axum::http::Request;

/// What the verifier needs from an inbound request.
///
/// The body must already be buffered: transports usually hand out a
/// single-read stream, so the caller reads it once and keeps the bytes for
/// whoever handles the request next.
pub trait VerificationRequest {
    /// Header value by name. Lookup is case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;

    fn body(&self) -> &[u8];
}

/// Owned request view for receivers that are not built on `http` types.
#[derive(Debug, Clone, Default)]
pub struct BufferedRequest {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl BufferedRequest {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn from_parts<I, K, V>(headers: I, body: impl Into<Vec<u8>>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl VerificationRequest for BufferedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn body(&self) -> &[u8] {
        &self.body
    }
}

// Values that are not visible ASCII are treated as absent.
impl<B: AsRef<[u8]>> VerificationRequest for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn body(&self) -> &[u8] {
        Request::body(self).as_ref()
    }
}
