use std::io;

use super::current_username;
use crate::error::Error;
use crate::router::{handler, HandlerResult, Router};
use crate::server::{Request, Response};
use crate::state::AppState;
use crate::templates::fill;

const DEFAULT_IMAGE: &str = "doge.gif";

pub(super) fn routes() -> Router {
    Router::new()
        .route("/", handler(index))
        .route("/img", handler(img))
        .route("/favicon.ico", handler(favicon))
}

fn index(req: &Request, state: &AppState) -> HandlerResult {
    let body = state.templates.template("index.html")?;
    let username = current_username(req, state)?;
    Ok(Response::html(fill(&body, "username", &username)))
}

fn img(req: &Request, state: &AppState) -> HandlerResult {
    let file = req.query_param("file").unwrap_or(DEFAULT_IMAGE);
    asset(state, &format!("img/{file}"))
}

fn favicon(_req: &Request, state: &AppState) -> HandlerResult {
    asset(state, "img/favicon.ico")
}

/// Serve a binary asset; a missing file is a 404, not a handler failure.
fn asset(state: &AppState, name: &str) -> HandlerResult {
    match state.assets.load(name) {
        Ok((bytes, content_type)) => Ok(Response::bytes(content_type, bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Response::not_found()),
        Err(e) => Err(Error::asset(name, e)),
    }
}
