//! HTTP server and graceful shutdown.
//!
//! On SIGTERM (or Ctrl-C) the server:
//! 1. Immediately stops `listener.accept()`, so no new connections are made.
//! 2. Tells every open connection to close: idle keep-alive connections
//!    close at once, in-flight requests run to completion first.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::middleware::trace::traced;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to listen on `addr`.
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Parses a `host:port` string and configures the server to listen on it.
    ///
    /// ```rust
    /// use rolodex::Server;
    /// assert!(Server::bind("0.0.0.0:9001").is_ok());
    /// assert!(Server::bind("nowhere").is_err());
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        Ok(Self::new(addr.parse()?))
    }

    /// Binds, then accepts connections and dispatches them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        serve_with_shutdown(listener, router, shutdown_signal()).await
    }
}

/// Serves `router` on an already-bound listener until `shutdown` resolves,
/// then asks every open connection to close and waits for them.
///
/// Idle keep-alive connections are closed immediately; requests already in
/// flight run to completion first.
///
/// Tests bind `127.0.0.1:0` themselves and pass a oneshot receiver here.
pub async fn serve_with_shutdown<S>(
    listener: TcpListener,
    router: Router,
    shutdown: S,
) -> Result<(), Error>
where
    S: Future<Output = ()>,
{
    let router = Arc::new(router);
    info!(addr = %listener.local_addr()?, "rolodex listening");

    let mut tasks = tokio::task::JoinSet::new();
    // Flipped once on shutdown; every connection task watches it.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Check shutdown first so a SIGTERM stops accepting even when
            // more connections are queued.
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let router = Arc::clone(&router);
                let mut stop = stop_rx.clone();
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    // Called once per request on the connection.
                    let svc = service_fn(move |req| {
                        let router = Arc::clone(&router);
                        async move { dispatch(router, req).await }
                    });

                    // HTTP/1.1 or HTTP/2, whichever the client negotiates.
                    let builder = ConnBuilder::new(TokioExecutor::new());
                    let conn = builder.serve_connection(io, svc);
                    tokio::pin!(conn);

                    // On shutdown an idle keep-alive connection closes at
                    // once; a busy one finishes its current request first.
                    let res = tokio::select! {
                        res = conn.as_mut() => res,
                        _ = stop.changed() => {
                            conn.as_mut().graceful_shutdown();
                            conn.await
                        }
                    };
                    if let Err(e) = res {
                        warn!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the set stays small.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    // Receivers also wake if the sender is gone, so the result is moot.
    let _ = stop_tx.send(true);
    while tasks.join_next().await.is_some() {}

    info!("rolodex stopped");
    Ok(())
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces one response.
///
/// Every failure becomes a response, so hyper never sees an error.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<http_body_util::Full<bytes::Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();

    let response = traced(&method, &path, async {
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!("failed to read request body: {e}");
                return Response::status(Status::BadRequest);
            }
        };
        let (handler, params) = router.lookup(&parts.method, &path);
        handler.call(Request::from_parts(parts, body, params)).await
    })
    .await;

    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// SIGTERM and SIGINT on Unix, Ctrl-C elsewhere. A signal that cannot be
/// installed is logged and simply never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
