//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it. The server turns it
//! into a hyper response; handlers never see hyper types.

use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// The content-type values this service sends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Css,        // text/css
    Gif,        // image/gif
    Html,       // text/html
    Javascript, // text/javascript
    Jpeg,       // image/jpeg
    Json,       // application/json
    Png,        // image/png
    Text,       // text/plain
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Css        => "text/css",
            Self::Gif        => "image/gif",
            Self::Html       => "text/html",
            Self::Javascript => "text/javascript",
            Self::Jpeg       => "image/jpeg",
            Self::Json       => "application/json",
            Self::Png        => "image/png",
            Self::Text       => "text/plain",
        }
    }

    /// Best-effort guess from a file extension (without the dot).
    ///
    /// Returns `None` for anything unrecognised; the caller then sends no
    /// `content-type` at all and lets the browser sniff.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "css"          => Some(Self::Css),
            "gif"          => Some(Self::Gif),
            "html"         => Some(Self::Html),
            "js"           => Some(Self::Javascript),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png"          => Some(Self::Png),
            "txt"          => Some(Self::Text),
            _              => None,
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use rolodex::{Response, Status};
///
/// Response::json(br#"{"status":"ok"}"#.to_vec());
/// Response::text("hello");
/// Response::status(Status::NoContent);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use rolodex::{ContentType, Response, Status};
///
/// Response::builder()
///     .status(Status::NotFound)
///     .text("404 NOT FOUND");
///
/// Response::builder()
///     .bytes(ContentType::Png, vec![0x89, b'P', b'N', b'G']);
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK`, `application/json`.
    pub fn json(body: Vec<u8>) -> Self {
        Self::bytes_raw(ContentType::Json, body)
    }

    /// `200 OK`, `text/plain`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::bytes_raw(ContentType::Text, body.into().into_bytes())
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    pub fn status_code(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn bytes_raw(content_type: ContentType, body: Vec<u8>) -> Self {
        Self {
            body,
            headers: vec![("content-type".to_owned(), content_type.as_str().to_owned())],
            status: Status::Ok,
        }
    }

    /// Converts into the hyper response the connection writes.
    ///
    /// Headers that fail to parse are logged and dropped rather than
    /// failing the whole response.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();
        let headers = res.headers_mut();
        for (name, value) in self.headers {
            match (
                http::HeaderName::from_bytes(name.as_bytes()),
                http::HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => error!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method, so you always know what you're sending.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish(ContentType::Json, body)
    }

    /// Terminate with a plain-text body (`text/plain`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text, body.into().into_bytes())
    }

    /// Terminate with a typed body. Use this for HTML, CSS, images, etc.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        self.finish(content_type, body)
    }

    /// Terminate with a body and whatever headers were set, adding no
    /// `content-type` of its own.
    pub fn raw(self, body: Vec<u8>) -> Response {
        Response { body, headers: self.headers, status: self.status }
    }

    /// Terminate with no body (e.g. `Status::NoContent`).
    pub fn no_body(self) -> Response {
        self.raw(Vec::new())
    }

    fn finish(self, content_type: ContentType, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.as_str().to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`Status`] directly from a handler: `return Status::NotFound`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v)  => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

/// A `200 OK` JSON body serialised with serde_json.
///
/// ```rust
/// use rolodex::{IntoResponse, Json};
///
/// let res = Json(serde_json::json!({ "status": "ok" })).into_response();
/// assert_eq!(res.body(), br#"{"status":"ok"}"#);
/// ```
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("json serialisation failed: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_puts_content_type_first() {
        let res = Response::builder()
            .status(Status::BadRequest)
            .header("x-request-id", "abc")
            .json(b"{}".to_vec());
        assert_eq!(res.headers[0], ("content-type".to_owned(), "application/json".to_owned()));
        assert_eq!(res.header("X-Request-Id"), Some("abc"));
        assert_eq!(res.status_code(), Status::BadRequest);
    }

    #[test]
    fn into_inner_carries_status_and_headers() {
        let res = Response::builder()
            .status(Status::NotFound)
            .text("404 NOT FOUND")
            .into_inner();
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(res.headers()["content-type"], "text/plain");
    }

    #[test]
    fn raw_sends_no_content_type() {
        let res = Response::builder().raw(b"??".to_vec());
        assert!(res.header("content-type").is_none());
    }

    #[test]
    fn unknown_extensions_have_no_content_type() {
        assert_eq!(ContentType::from_extension("jpg"), Some(ContentType::Jpeg));
        assert_eq!(ContentType::from_extension("js"), Some(ContentType::Javascript));
        assert_eq!(ContentType::from_extension("wasm"), None);
    }
}
