//! # Environment Option Loader
//!
//! Loads envguard's own options from environment variables following 12-factor
//! app principles. Only variables that are set produce a value; everything
//! else defers to lower-precedence layers.
//!
//! # Variables
//! - `ENVGUARD_SAMPLE`: contract file path
//! - `ENVGUARD_PATH`: override file path
//! - `ENVGUARD_ALLOW_EMPTY_VALUES`: `true`/`false`
//! - `ENVGUARD_PRECEDENCE`: `override`/`base`
//! - `ENVGUARD_WRITE_BACK`: `true`/`false`
//! - `ENVGUARD_REQUIRE_SAMPLE`: `true`/`false`

use crate::config::PartialOptions;
use crate::env::ProcessEnv;
use errors::ContractError;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_SAMPLE: &str = "ENVGUARD_SAMPLE";
pub const ENV_PATH: &str = "ENVGUARD_PATH";
pub const ENV_ALLOW_EMPTY_VALUES: &str = "ENVGUARD_ALLOW_EMPTY_VALUES";
pub const ENV_PRECEDENCE: &str = "ENVGUARD_PRECEDENCE";
pub const ENV_WRITE_BACK: &str = "ENVGUARD_WRITE_BACK";
pub const ENV_REQUIRE_SAMPLE: &str = "ENVGUARD_REQUIRE_SAMPLE";

/// Load the environment layer of [`PartialOptions`].
///
/// Empty variables are treated as unset. A value that does not parse is an
/// [`ContractError::InvalidOptions`] naming the offending variable.
pub fn options_from_env(env: &impl ProcessEnv) -> Result<PartialOptions, ContractError> {
    Ok(PartialOptions {
        sample: non_empty(env, ENV_SAMPLE).map(PathBuf::from),
        path: non_empty(env, ENV_PATH).map(PathBuf::from),
        allow_empty_values: parse_env(env, ENV_ALLOW_EMPTY_VALUES)?,
        precedence: parse_env(env, ENV_PRECEDENCE)?,
        write_back: parse_env(env, ENV_WRITE_BACK)?,
        require_sample: parse_env(env, ENV_REQUIRE_SAMPLE)?,
    })
}

fn non_empty(env: &impl ProcessEnv, key: &str) -> Option<String> {
    env.var(key).filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(env: &impl ProcessEnv, key: &str) -> Result<Option<T>, ContractError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(env, key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ContractError::InvalidOptions {
                message: format!("{key}={raw}: {e}"),
            }),
        None => Ok(None),
    }
}
