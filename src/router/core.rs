use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::error::Error;
use crate::middleware::Middleware;
use crate::server::{Request, Response};
use crate::state::AppState;

/// Outcome of a handler call.
pub type HandlerResult = Result<Response, Error>;

/// A route handler: parsed request plus shared state to a full response.
pub type Handler = Arc<dyn Fn(&Request, &AppState) -> HandlerResult + Send + Sync>;

/// Box a closure or function as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Request, &AppState) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Exact-path routing table plus the global middleware chain.
#[derive(Clone, Default)]
pub struct Router {
    routes: HashMap<String, Handler>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths = self.paths();
        paths.sort_unstable();
        f.debug_struct("Router")
            .field("routes", &paths)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `path`, replacing any previous handler.
    pub fn route(mut self, path: &str, handler: Handler) -> Self {
        self.add_route(path, handler);
        self
    }

    pub fn add_route(&mut self, path: &str, handler: Handler) {
        if self.routes.insert(path.to_string(), handler).is_some() {
            debug!(path = %path, "Route handler replaced");
        }
    }

    /// Absorb every route of `other`; its entries win on conflicts.
    pub fn merge(mut self, other: Router) -> Self {
        self.routes.extend(other.routes);
        self.middlewares.extend(other.middlewares);
        self
    }

    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn lookup(&self, path: &str) -> Option<&Handler> {
        self.routes.get(path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    /// Run middleware and the matching handler for `req`.
    ///
    /// Unknown paths get the fixed 404 response; handler errors are logged
    /// and answered with 500.
    pub fn dispatch(&self, req: &Request, state: &AppState) -> Response {
        let start = Instant::now();

        let short_circuit = self.middlewares.iter().find_map(|mw| mw.before(req, state));
        let mut response = match short_circuit {
            Some(response) => response,
            None => match self.lookup(&req.path) {
                Some(handler) => handler(req, state).unwrap_or_else(|e| {
                    error!(
                        request_id = %req.request_id,
                        path = %req.path,
                        error = %e,
                        "Handler failed"
                    );
                    Response::internal_error()
                }),
                None => {
                    debug!(request_id = %req.request_id, path = %req.path, "No route matched");
                    Response::not_found()
                }
            },
        };

        let latency = start.elapsed();
        for mw in &self.middlewares {
            mw.after(req, &mut response, latency);
        }
        response
    }
}
