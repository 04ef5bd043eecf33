//! Serves the browser app out of a public directory.
//!
//! `/` is `index.html`; any other path names a file under the root. No
//! caching headers, no ranges, no directory listings.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::status::Status;

const INDEX: &str = "index.html";
const NOT_FOUND_BODY: &str = "404 NOT FOUND";

/// A directory of files served as-is.
#[derive(Clone, Debug)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a URL path onto a file path under the root.
    ///
    /// Returns `None` when the path cannot be served from inside the root:
    /// bad percent-encoding, a `..` segment, or a backslash or NUL anywhere.
    pub fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let decoded = urlencoding::decode(url_path).ok()?;
        if decoded.contains(['\\', '\0']) {
            return None;
        }

        let mut path = self.root.clone();
        let mut segments = 0;
        for segment in decoded.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." {
                return None;
            }
            path.push(segment);
            segments += 1;
        }
        if segments == 0 {
            path.push(INDEX);
        }
        Some(path)
    }

    /// Answers a `GET` or `HEAD` for a file; anything else is `405`.
    pub async fn serve(&self, req: &Request) -> Response {
        if !matches!(*req.method(), http::Method::GET | http::Method::HEAD) {
            return Response::builder()
                .status(Status::MethodNotAllowed)
                .header("allow", "GET, HEAD")
                .no_body();
        }

        let Some(path) = self.resolve(req.path()) else {
            debug!(path = req.path(), "rejected path outside public root");
            return not_found();
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return not_found(),
            Err(e) if e.kind() == ErrorKind::NotFound => return not_found(),
            Err(e) => return read_failed(&path, &e),
        }

        match tokio::fs::read(&path).await {
            Ok(body) => match media_type(&path) {
                Some(ct) => Response::builder().bytes(ct, body),
                None => Response::builder().raw(body),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => not_found(),
            Err(e) => read_failed(&path, &e),
        }
    }
}

fn media_type(path: &Path) -> Option<ContentType> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    ContentType::from_extension(&ext)
}

fn not_found() -> Response {
    Response::builder()
        .status(Status::NotFound)
        .text(NOT_FOUND_BODY)
}

fn read_failed(path: &Path, e: &std::io::Error) -> Response {
    error!(path = %path.display(), "failed to read static file: {e}");
    Response::status(Status::InternalServerError)
}
