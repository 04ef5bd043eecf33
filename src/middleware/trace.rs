//! Per-request span and completion log line.
//!
//! Every request gets a `request` span carrying method and path, and emits
//! exactly one event when its response is ready:
//!
//! ```text
//! INFO request{method=PATCH path=/api/people/1}: served status=200 elapsed_us=84
//! ```

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, error, info, info_span};

use crate::response::Response;

/// Runs `fut` inside a request span and logs its outcome.
///
/// Server errors log at `error`, everything else at `info`.
pub async fn traced<F>(method: &http::Method, path: &str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", %method, path);
    async move {
        let started = Instant::now();
        let res = fut.await;
        let status = u16::from(res.status_code());
        let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        if status >= 500 {
            error!(status, elapsed_us, "served");
        } else {
            info!(status, elapsed_us, "served");
        }
        res
    }
    .instrument(span)
    .await
}
