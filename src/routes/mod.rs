//! Application pages.
//!
//! Each submodule exposes a `routes()` table; [`app_router`] merges them
//! and installs the access-log middleware.

mod index;
mod message;
mod todo;
mod user;

pub use user::{LOGIN_FAILED, LOGIN_SUCCEEDED, REGISTER_FAILED, REGISTER_SUCCEEDED};

use crate::error::Error;
use crate::middleware::TracingMiddleware;
use crate::model::User;
use crate::router::Router;
use crate::server::Request;
use crate::state::AppState;

/// The full routing table of the application.
pub fn app_router() -> Router {
    Router::new()
        .merge(index::routes())
        .merge(user::routes())
        .merge(message::routes())
        .merge(todo::routes())
        .with_middleware(TracingMiddleware)
}

fn current_user(req: &Request, state: &AppState) -> Result<Option<User>, Error> {
    Ok(state.sessions.current_user(&state.store, req)?)
}

/// Username of the session's user, or `""` for anonymous visitors.
fn current_username(req: &Request, state: &AppState) -> Result<String, Error> {
    Ok(current_user(req, state)?
        .map(|u| u.username)
        .unwrap_or_default())
}
