use std::io::{self, Read, Write};
use std::sync::Arc;

use tracing::{debug, warn};

use super::request::{read_request, Request};
use super::response::Response;
use crate::router::Router;
use crate::state::AppState;

/// Request pipeline for one connection: raw bytes to parsed request,
/// router dispatch, framed response bytes.
#[derive(Clone, Debug)]
pub struct AppService {
    router: Arc<Router>,
    state: Arc<AppState>,
}

impl AppService {
    pub fn new(router: Router, state: AppState) -> Self {
        Self {
            router: Arc::new(router),
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Produce the response for raw request bytes.
    ///
    /// Bytes that do not parse into a request get the fixed 404 response.
    pub fn handle(&self, raw: &[u8]) -> Response {
        match Request::parse(raw) {
            Ok(req) => self.router.dispatch(&req, &self.state),
            Err(e) => {
                warn!(error = %e, bytes = raw.len(), "Unparseable request");
                Response::not_found()
            }
        }
    }

    /// Read one request from `stream`, answer it and flush.
    ///
    /// The caller closes the connection afterwards.
    pub fn serve_connection<S: Read + Write>(&self, stream: &mut S) -> io::Result<()> {
        let raw = read_request(stream)?;
        if raw.is_empty() {
            debug!("Connection closed before sending a request");
            return Ok(());
        }
        let response = self.handle(&raw);
        stream.write_all(&response.to_bytes())?;
        stream.flush()
    }
}
