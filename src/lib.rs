//! # rolodex
//!
//! A small contact-list web service: a static site, a JSON API over an
//! in-process contact store, and the browser script that ties them together.
//!
//! ## Identifier stability
//!
//! Contacts get ids from a counter that only moves forward, starting at 0.
//! Deleting a contact leaves a tombstone behind rather than shifting later
//! entries down, so an id handed to the browser keeps naming the same
//! contact for the life of the process. `GET /api/people` returns one array
//! element per id ever assigned, `null` where the contact was deleted.
//!
//! ## Layout
//!
//! - [`store`]: the [`ContactStore`] and its invariants.
//! - [`api`]: the `/api/people` routes over a shared store.
//! - [`static_files`]: everything outside `/api`.
//! - [`Router`], [`Server`], [`Request`], [`Response`]: the thin HTTP layer
//!   on hyper and matchit that carries them.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rolodex::{Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rolodex::Error> {
//!     Server::bind("0.0.0.0:9001")?.serve(app("public")).await
//! }
//! ```

mod app;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod contact;
pub mod health;
pub mod middleware;
pub mod static_files;
pub mod store;

pub use app::{app, with_store};
pub use config::Config;
pub use contact::{Contact, ContactError, ContactFields, ContactId, ContactPatch};
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, serve_with_shutdown};
pub use status::Status;
pub use store::ContactStore;
