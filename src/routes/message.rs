use crate::model::Message;
use crate::router::{handler, HandlerResult, Router};
use crate::server::{Request, Response};
use crate::state::AppState;
use crate::store::{fields_from_pairs, Entity};
use crate::templates::fill;

pub(super) fn routes() -> Router {
    Router::new().route("/message", handler(message))
}

/// Guestbook: POST appends a message, every method renders the list.
fn message(req: &Request, state: &AppState) -> HandlerResult {
    if req.method == http::Method::POST {
        let mut message = Message::create(fields_from_pairs(req.form()))?;
        state.store.save(&mut message)?;
    }

    let messages: String = state
        .store
        .all::<Message>()?
        .iter()
        .map(|m| format!("<div>{}: {}</div>", m.author, m.content))
        .collect();
    let body = state.templates.template("message.html")?;
    Ok(Response::html(fill(&body, "messages", &messages)))
}
