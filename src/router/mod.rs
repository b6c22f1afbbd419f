//! # Router Module
//!
//! Maps request paths to handlers.
//!
//! ## Overview
//!
//! - Matching is on the exact path string: no patterns, no trailing-slash
//!   normalisation, the method is not part of the key
//! - An unmatched path falls back to a fixed 404 response
//! - Handlers receive the parsed [`Request`](crate::server::Request) and the
//!   shared [`AppState`](crate::state::AppState) and return a complete
//!   [`Response`](crate::server::Response)
//! - Global [`Middleware`](crate::middleware::Middleware) runs around every
//!   dispatch
//!
//! ## Example
//!
//! ```rust
//! use kuweb::router::{handler, Router};
//! use kuweb::server::Response;
//!
//! let router = Router::new().route("/ping", handler(|_req, _state| Ok(Response::html("pong"))));
//! assert!(router.lookup("/ping").is_some());
//! assert!(router.lookup("/ping/").is_none());
//! ```

mod core;

pub use self::core::{handler, Handler, HandlerResult, Router};
