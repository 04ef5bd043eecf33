//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Requests that match
//! nothing go to a single fallback handler.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    fallback: BoxedHandler,
}

impl Router {
    /// An empty router whose fallback answers `404 Not Found`.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            fallback: not_found.into_boxed_handler(),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use rolodex::{Method, Request, Response, Router};
    /// # async fn get_person(_: Request) -> Response { Response::text("") }
    /// # async fn create_person(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/api/people/{id}", get_person)
    ///     .on(Method::Post, "/api/people",      create_person);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with a route already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error rather than a runtime condition.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Patch, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Replace the handler for requests that match no route, including
    /// requests whose method is not one [`Method`] knows.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = handler.into_boxed_handler();
        self
    }

    /// Finds the handler for a request, falling back when nothing matches.
    ///
    /// `HEAD` without a route of its own uses the `GET` route for the same
    /// path; hyper drops the body and keeps the headers.
    pub(crate) fn lookup(
        &self,
        method: &http::Method,
        path: &str,
    ) -> (BoxedHandler, HashMap<String, String>) {
        let at = |m: Method| self.routes.get(&m).and_then(|tree| tree.at(path).ok());
        let matched = match Method::try_from(method) {
            Ok(Method::Head) => at(Method::Head).or_else(|| at(Method::Get)),
            Ok(m) => at(m),
            Err(_) => None,
        };

        match matched {
            Some(matched) => {
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                (Arc::clone(matched.value), params)
            }
            None => (Arc::clone(&self.fallback), HashMap::new()),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

async fn not_found(_req: Request) -> Status {
    Status::NotFound
}
