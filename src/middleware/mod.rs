//! Middleware layer.
//!
//! Cross-cutting concerns that wrap every request regardless of which
//! handler serves it. Currently only request tracing.

pub mod trace;
