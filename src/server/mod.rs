//! HTTP plumbing: request parsing, response framing and the TCP server.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query, read_request, ParseError, Request};
pub use response::{status_reason, Body, Response};
pub use service::AppService;
