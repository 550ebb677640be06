//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for routers built with
//! [`Router::from_env`](crate::Router::from_env).
//!
//! ## Environment Variables
//!
//! ### `ROUTECAST_SLASH_MODE`
//!
//! Selects how the lexer treats leading and trailing slashes:
//! - `loose`: `/news` and `news/` both match the template `news`
//! - `strict`: slashes must match exactly
//! - `legacy`: only a trailing slash is stripped from templates
//!
//! Default: `loose`
//!
//! ## Usage
//!
//! ```rust
//! use routecast::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Slash mode: {}", config.slash_mode);
//! ```
//!
//! ```bash
//! export ROUTECAST_SLASH_MODE=strict
//! ```

use std::env;

use tracing::warn;

use crate::lexer::SlashMode;

/// Name of the variable read by [`RuntimeConfig::from_env`]
pub const SLASH_MODE_VAR: &str = "ROUTECAST_SLASH_MODE";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Slash handling for newly created routers (default: loose)
    pub slash_mode: SlashMode,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unknown values fall back to the default and are logged at `warn`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(env::var(SLASH_MODE_VAR).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        let slash_mode = match value {
            Some(val) => val.parse().unwrap_or_else(|e: String| {
                warn!(
                    variable = SLASH_MODE_VAR,
                    value = %val,
                    error = %e,
                    "Invalid slash mode, using default"
                );
                SlashMode::default()
            }),
            None => SlashMode::default(),
        };
        RuntimeConfig { slash_mode }
    }
}
