//! HTTP layer for scribe.
//!
//! This crate provides the request surface:
//!
//! - **Endpoints**: feed, post, social-graph and group routes
//! - **Extractors**: authentication, page-number parsing
//! - **Middleware**: bearer-token auth, the short-TTL page cache
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
