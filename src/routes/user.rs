use tracing::info;

use super::{current_user, current_username};
use crate::middleware::{login_required, LOGIN_PATH};
use crate::model::User;
use crate::router::{handler, HandlerResult, Router};
use crate::server::{Request, Response};
use crate::session::SESSION_COOKIE;
use crate::state::AppState;
use crate::store::{fields_from_pairs, to_pretty, Entity};
use crate::templates::fill;

pub const LOGIN_SUCCEEDED: &str = "login succeeded";
pub const LOGIN_FAILED: &str = "wrong username or password";
pub const REGISTER_SUCCEEDED: &str = "register succeeded";
pub const REGISTER_FAILED: &str =
    "username and password must be longer than 2 characters, or the username is taken";

pub(super) fn routes() -> Router {
    Router::new()
        .route("/login", handler(login))
        .route("/register", handler(register))
        .route("/profile", login_required(handler(profile)))
}

fn login(req: &Request, state: &AppState) -> HandlerResult {
    let mut username = current_username(req, state)?;
    let mut result = "";
    let mut token = None;

    if req.method == http::Method::POST {
        let candidate = User::create(fields_from_pairs(req.form()))?;
        token = state
            .sessions
            .login(&state.store, &candidate.username, &candidate.password)?;
        if token.is_some() {
            username = candidate.username;
            result = LOGIN_SUCCEEDED;
        } else {
            result = LOGIN_FAILED;
        }
    }

    let body = state.templates.template("login.html")?;
    let body = fill(&body, "username", &username);
    let mut response = Response::html(fill(&body, "result", result));
    if let Some(token) = token {
        response.set_header("Set-Cookie", &format!("{SESSION_COOKIE}={token}"));
    }
    Ok(response)
}

fn register(req: &Request, state: &AppState) -> HandlerResult {
    let mut result = String::new();

    if req.method == http::Method::POST {
        let mut user = User::create(fields_from_pairs(req.form()))?;
        if user.validate_register(&state.store)? {
            let outcome = state.store.save(&mut user)?;
            info!(username = %user.username, id = outcome.id(), "User registered");
            let users = state.store.load(User::KIND)?;
            let listing = to_pretty(&users);
            result = format!("{REGISTER_SUCCEEDED}<br><pre>{listing}</pre>");
        } else {
            result = REGISTER_FAILED.to_string();
        }
    }

    let body = state.templates.template("register.html")?;
    Ok(Response::html(fill(&body, "result", &result)))
}

fn profile(req: &Request, state: &AppState) -> HandlerResult {
    let Some(user) = current_user(req, state)? else {
        return Ok(Response::redirect(LOGIN_PATH));
    };
    let body = state.templates.template("profile.html")?;
    let body = fill(&body, "username", &user.username);
    let body = fill(&body, "password", &user.password);
    let body = fill(&body, "note", &user.note);
    Ok(Response::html(body))
}
