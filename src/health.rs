//! Health-check handlers for the orchestrator.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can it serve the app? Failure → pulled from the load balancer. |

use std::sync::Arc;

use tracing::warn;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::static_files::StaticFiles;
use crate::status::Status;

/// Liveness probe. Always `200 OK` with body `"ok"`; it has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe: `200 ready` while the public directory is present,
/// `503` otherwise. The contact store lives in memory and is always ready.
pub fn readiness(files: Arc<StaticFiles>) -> impl Handler {
    move |_req: Request| {
        let files = Arc::clone(&files);
        async move {
            match tokio::fs::metadata(files.root()).await {
                Ok(meta) if meta.is_dir() => Response::text("ready"),
                _ => {
                    warn!(root = %files.root().display(), "public directory unavailable");
                    Response::builder()
                        .status(Status::ServiceUnavailable)
                        .text("public directory unavailable")
                }
            }
        }
    }
}
