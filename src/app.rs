//! Wires the contact API, health probes and static site into one router.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{self, Api, ApiError};
use crate::health;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use crate::static_files::StaticFiles;
use crate::store::ContactStore;

/// Builds the application router around a fresh, empty contact store.
pub fn app(public_dir: impl Into<PathBuf>) -> Router {
    with_store(ContactStore::new(), public_dir)
}

/// Like [`app`], starting from an existing store.
pub fn with_store(store: ContactStore, public_dir: impl Into<PathBuf>) -> Router {
    let api = Arc::new(Api::new(store));
    let files = Arc::new(StaticFiles::new(public_dir));

    let site = {
        let files = Arc::clone(&files);
        move |req: Request| {
            let files = Arc::clone(&files);
            async move { fallback(&files, req).await }
        }
    };

    api::routes(Router::new(), api)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness(files))
        .fallback(site)
}

/// Unmatched `/api` requests are routing errors; everything else is a file.
async fn fallback(files: &StaticFiles, req: Request) -> Response {
    if api::is_api_path(req.path()) {
        return ApiError::Routing.into_response();
    }
    files.serve(&req).await
}
