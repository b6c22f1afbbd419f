use std::time::Duration;

use crate::server::{Request, Response};
use crate::state::AppState;

/// Hook run around handler dispatch.
///
/// `before` may short-circuit by returning a response; the handler is then
/// skipped but `after` hooks still run.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &Request, _state: &AppState) -> Option<Response> {
        None
    }
    fn after(&self, _req: &Request, _res: &mut Response, _latency: Duration) {}
}
