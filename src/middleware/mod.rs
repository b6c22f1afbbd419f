//! Request middleware.
//!
//! - [`Middleware`] hooks run around every dispatch
//! - [`AuthMiddleware`] / [`login_required`] gate handlers on a valid session
//! - [`TracingMiddleware`] logs each handled request

mod auth;
mod core;
mod tracing;

pub use self::auth::{login_required, AuthMiddleware, LOGIN_PATH};
pub use self::core::Middleware;
pub use self::tracing::TracingMiddleware;
