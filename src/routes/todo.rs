use serde_json::Value;
use tracing::debug;

use super::current_user;
use crate::error::Error;
use crate::middleware::{login_required, LOGIN_PATH};
use crate::model::Todo;
use crate::router::{handler, HandlerResult, Router};
use crate::server::{Request, Response};
use crate::state::AppState;
use crate::store::{coerce_id, Record};
use crate::templates::fill;

const TODO_HOME: &str = "/todo";

pub(super) fn routes() -> Router {
    Router::new()
        .route("/todo", login_required(handler(index)))
        .route("/todo/add", login_required(handler(add)))
        .route("/todo/edit", login_required(handler(edit)))
        .route("/todo/update", login_required(handler(update)))
        .route("/todo/delete", login_required(handler(delete)))
}

/// Resolve the session user's id and hand it to `f`; anonymous requests
/// (which the login gate normally stops earlier) go to the login page.
fn with_user<F>(req: &Request, state: &AppState, f: F) -> HandlerResult
where
    F: FnOnce(u64) -> HandlerResult,
{
    match current_user(req, state)? {
        Some(user) => f(user.id.unwrap_or_default()),
        None => Ok(Response::redirect(LOGIN_PATH)),
    }
}

/// The todo with `id` if it exists and belongs to `uid`.
fn owned_todo(state: &AppState, id: Option<u64>, uid: u64) -> Result<Option<Todo>, Error> {
    let Some(id) = id else {
        return Ok(None);
    };
    let todo = state.store.get::<Todo>(id)?;
    Ok(todo.filter(|t| t.user_id == uid))
}

fn index(req: &Request, state: &AppState) -> HandlerResult {
    with_user(req, state, |uid| {
        let todos: String = Todo::for_user(&state.store, uid)?
            .iter()
            .map(|t| {
                let id = t.id.unwrap_or_default();
                format!(
                    "<div>{} <a href=\"/todo/edit?id={id}\">edit</a> <a href=\"/todo/delete?id={id}\">delete</a></div>",
                    t.title
                )
            })
            .collect();
        let body = state.templates.template("todo_index.html")?;
        Ok(Response::html(fill(&body, "todos", &todos)))
    })
}

fn add(req: &Request, state: &AppState) -> HandlerResult {
    with_user(req, state, |uid| {
        if req.method == http::Method::POST {
            let mut todo = Todo::new(uid, req.form_value("title"));
            state.store.save(&mut todo)?;
        }
        Ok(Response::redirect(TODO_HOME))
    })
}

fn edit(req: &Request, state: &AppState) -> HandlerResult {
    with_user(req, state, |uid| {
        let id = req.query_param("id").and_then(coerce_id);
        let Some(todo) = owned_todo(state, id, uid)? else {
            debug!(request_id = %req.request_id, id = ?id, "Todo to edit not found");
            return Ok(Response::redirect(TODO_HOME));
        };
        let body = state.templates.template("todo_edit.html")?;
        let body = fill(&body, "todo_id", &todo.id.unwrap_or_default().to_string());
        let body = fill(&body, "todo_title", &todo.title);
        Ok(Response::html(body))
    })
}

fn update(req: &Request, state: &AppState) -> HandlerResult {
    with_user(req, state, |uid| {
        if req.method == http::Method::POST {
            let id = coerce_id(req.form_value("id"));
            if let Some(todo) = owned_todo(state, id, uid)? {
                let mut fields = Record::new();
                fields.insert(
                    "title".to_string(),
                    Value::String(req.form_value("title").to_string()),
                );
                state
                    .store
                    .update::<Todo>(todo.id.unwrap_or_default(), fields)?;
            }
        }
        Ok(Response::redirect(TODO_HOME))
    })
}

fn delete(req: &Request, state: &AppState) -> HandlerResult {
    with_user(req, state, |uid| {
        let id = req.query_param("id").and_then(coerce_id);
        if let Some(todo) = owned_todo(state, id, uid)? {
            state.store.remove::<Todo>(todo.id.unwrap_or_default())?;
        }
        Ok(Response::redirect(TODO_HOME))
    })
}
