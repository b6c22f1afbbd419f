use std::time::Duration;

use tracing::info;

use super::Middleware;
use crate::server::{Request, Response};

/// Emits one structured access-log event per dispatched request.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn after(&self, req: &Request, res: &mut Response, latency: Duration) {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            status = res.status,
            latency_us = latency.as_micros() as u64,
            "Request handled"
        );
    }
}
