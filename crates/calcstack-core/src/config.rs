//! Configuration management for CalcStack.
//!
//! Every setting has a default and can be overridden by an environment
//! variable. Binaries load it with [`CalcStackConfig::collect_from_env`] and
//! report rejected values after tracing is initialized; tests use the builder.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{CalcStackError, CalcStackResult};

/// Default bind address.
const DEFAULT_GATEWAY_LISTEN: &str = "127.0.0.1:8080";

/// Default expression nesting limit.
const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest nesting limit that still evaluates within a 2 MiB thread stack.
const MAX_DEPTH_CEILING: usize = 256;

/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Global configuration for CalcStack.
///
/// # Examples
///
/// ```
/// use calcstack_core::CalcStackConfig;
///
/// let config = CalcStackConfig::builder().max_depth(32).build();
/// assert_eq!(config.max_depth, 32);
/// assert_eq!(config.gateway_listen, "127.0.0.1:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct CalcStackConfig {
    /// Bind address for the HTTP server (`GATEWAY_LISTEN`).
    #[builder(default = String::from(DEFAULT_GATEWAY_LISTEN))]
    pub gateway_listen: String,

    /// Log level filter used when `RUST_LOG` is unset (`LOG_LEVEL`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Maximum expression nesting depth accepted by the engine (`CALC_MAX_DEPTH`).
    #[builder(default = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum accepted request body size in bytes (`CALC_MAX_BODY_BYTES`).
    #[builder(default = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Value of the `Access-Control-Allow-Origin` header (`CORS_ALLOW_ORIGIN`).
    #[builder(default = String::from("*"))]
    pub cors_allow_origin: String,
}

impl Default for CalcStackConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CalcStackConfig {
    /// Load configuration from environment variables.
    ///
    /// Values that fail to parse are ignored with a warning and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup, logging rejected values.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let (config, rejected) = Self::collect_from_lookup(lookup);
        for err in &rejected {
            tracing::warn!(error = %err, "ignoring invalid configuration value");
        }
        config
    }

    /// Load configuration from environment variables, returning rejected
    /// values instead of logging them.
    ///
    /// Binaries that install their subscriber from [`Self::log_level`] use
    /// this and report the rejected values once tracing is up.
    #[must_use]
    pub fn collect_from_env() -> (Self, Vec<CalcStackError>) {
        Self::collect_from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a key lookup. Malformed numeric values keep
    /// their default and are returned alongside the config.
    #[must_use]
    pub fn collect_from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (Self, Vec<CalcStackError>) {
        let mut config = Self::default();
        let mut rejected = Vec::new();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = parse_setting(&lookup, "CALC_MAX_DEPTH", &mut rejected) {
            config.max_depth = v;
        }
        if let Some(v) = parse_setting(&lookup, "CALC_MAX_BODY_BYTES", &mut rejected) {
            config.max_body_bytes = v;
        }
        if let Some(v) = lookup("CORS_ALLOW_ORIGIN") {
            config.cors_allow_origin = v;
        }

        (config, rejected)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> CalcStackResult<()> {
        if self.gateway_listen.trim().is_empty() {
            return Err(CalcStackError::Config(
                "gateway_listen must not be empty".to_owned(),
            ));
        }
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_CEILING {
            return Err(CalcStackError::Config(format!(
                "max_depth must be between 1 and {MAX_DEPTH_CEILING}"
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(CalcStackError::Config(
                "max_body_bytes must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Parse a numeric setting. A malformed value is pushed onto `rejected`.
fn parse_setting<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    rejected: &mut Vec<CalcStackError>,
) -> Option<T> {
    let raw = lookup(key)?;
    match parse_value(key, &raw) {
        Ok(v) => Some(v),
        Err(e) => {
            rejected.push(e);
            None
        }
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> CalcStackResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| CalcStackError::InvalidEnvValue {
            key: key.to_owned(),
            value: raw.to_owned(),
        })
}
