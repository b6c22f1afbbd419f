//! # Runtime Configuration Module
//!
//! Coroutine runtime tuning read from the environment.
//!
//! ## Environment Variables
//!
//! ### `KUWEB_STACK_SIZE`
//!
//! Stack size of every connection coroutine. Accepts decimal (`32768`) or
//! hexadecimal (`0x8000`). Default: `0x8000` (32 KB). Handlers read and
//! rewrite whole collection files, so they need more stack than a bare
//! echo handler; invalid values fall back to the default.
//!
//! ```rust
//! use kuweb::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! ```

use std::env;

use tracing::debug;

pub const STACK_SIZE_ENV: &str = "KUWEB_STACK_SIZE";
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let stack_size = env::var(STACK_SIZE_ENV)
            .ok()
            .and_then(|val| parse_size(&val))
            .unwrap_or(DEFAULT_STACK_SIZE);
        RuntimeConfig { stack_size }
    }

    /// Configure the `may` scheduler. Call once before starting the server.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
        debug!(stack_size = self.stack_size, "Coroutine runtime configured");
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    let parsed = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    };
    parsed.filter(|&size| size > 0)
}
