//! # kuweb
//!
//! **kuweb** is a small server-rendered web application (login, registration,
//! a guestbook and a per-user todo list) served by a hand-written HTTP/1.1
//! stack on the `may` coroutine runtime, with every record kept in a JSON
//! file per kind.
//!
//! ## Architecture
//!
//! - **[`store`]** - JSON-file record store with per-kind locking
//! - **[`model`]** - `User`, `Message` and `Todo` entities
//! - **[`session`]** - in-memory token to username sessions
//! - **[`server`]** - request parsing, response framing and the TCP accept loop
//! - **[`router`]** - exact-path routing with a not-found fallback
//! - **[`middleware`]** - login enforcement and access logging
//! - **[`routes`]** - the application's pages
//! - **[`templates`]** / **[`static_files`]** - HTML templates and binary assets
//! - **[`config`]**, **[`runtime_config`]**, **[`logging`]** - ambient setup
//!
//! ## Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer
//!     participant Router
//!     participant MW as Middleware
//!     participant Handler
//!     participant Store
//!
//!     Client->>Server: HTTP request bytes
//!     Server->>Server: read_request + Request::parse
//!     Server->>Router: dispatch(&Request, &AppState)
//!     Router->>MW: before()
//!     Router->>Handler: handler(&Request, &AppState)
//!     Handler->>Store: load / save / remove
//!     Store-->>Handler: records
//!     Handler-->>Router: Response
//!     Router->>MW: after()
//!     Router-->>Server: Response
//!     Server-->>Client: status line, headers, body
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kuweb::routes::app_router;
//! use kuweb::server::{AppService, HttpServer};
//! use kuweb::state::AppState;
//! use kuweb::static_files::StaticFiles;
//! use kuweb::store::Store;
//! use kuweb::templates::Templates;
//!
//! let store = Store::open("db").unwrap();
//! let state = AppState::new(store, Templates::new("templates"), StaticFiles::new("static"));
//! let handle = HttpServer(AppService::new(app_router(), state))
//!     .start("127.0.0.1:5000")
//!     .unwrap();
//! handle.join().unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod router;
pub mod routes;
pub mod runtime_config;
pub mod server;
pub mod session;
pub mod state;
pub mod static_files;
pub mod store;
pub mod templates;

pub use error::Error;
