//! # CLI Module
//!
//! Command-line entry points for the `kuweb` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Start the web application:
//!
//! ```bash
//! kuweb serve --config kuweb.toml --port 8080
//! ```
//!
//! Options:
//! - `--config <FILE>` - TOML configuration file (optional, defaults apply)
//! - `--host <HOST>` / `--port <PORT>` - override the bind address
//! - `--data-dir <DIR>` - override the directory of JSON collection files
//!
//! ### `dump`
//!
//! Print every stored record of one kind as indented JSON:
//!
//! ```bash
//! kuweb dump user --data-dir db
//! ```

mod commands;


pub use commands::{run_cli, run_command, Cli, Commands};
