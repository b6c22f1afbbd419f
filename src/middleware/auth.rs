use std::sync::Arc;

use tracing::{debug, error};

use super::Middleware;
use crate::router::Handler;
use crate::server::{Request, Response};
use crate::state::AppState;

/// Path anonymous visitors are redirected to.
pub const LOGIN_PATH: &str = "/login";

/// Session gate: lets a request through only when its cookie resolves to a
/// stored user, otherwise answers with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    login_path: String,
}

impl Default for AuthMiddleware {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl AuthMiddleware {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }
}

impl Middleware for AuthMiddleware {
    fn before(&self, req: &Request, state: &AppState) -> Option<Response> {
        match state.sessions.current_user(&state.store, req) {
            Ok(Some(_)) => None,
            Ok(None) => {
                debug!(request_id = %req.request_id, path = %req.path, "No session, redirecting to login");
                Some(Response::redirect(&self.login_path))
            }
            Err(e) => {
                error!(request_id = %req.request_id, error = %e, "Session lookup failed");
                Some(Response::internal_error())
            }
        }
    }
}

/// Wrap `handler` so it only runs for logged-in users.
pub fn login_required(handler: Handler) -> Handler {
    let gate = AuthMiddleware::default();
    Arc::new(move |req: &Request, state: &AppState| match gate.before(req, state) {
        Some(response) => Ok(response),
        None => handler(req, state),
    })
}
