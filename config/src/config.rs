//! # Load Options
//!
//! Invocation configuration for an environment contract check.
//!
//! All option structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for input validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Conventional name of the contract file.
pub const DEFAULT_SAMPLE_PATH: &str = ".env.example";

/// Conventional name of the local override file.
pub const DEFAULT_OVERRIDE_PATH: &str = ".env";

/// Which layer decides a key's value when both the override file and the base
/// environment define it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MergePrecedence {
    /// The local override file beats the ambient environment.
    #[default]
    #[serde(rename = "override")]
    OverrideWins,

    /// The ambient environment is authoritative; the override file only
    /// fills keys that are unset or empty.
    #[serde(rename = "base")]
    BaseWins,
}

impl MergePrecedence {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePrecedence::OverrideWins => "override",
            MergePrecedence::BaseWins => "base",
        }
    }
}

impl fmt::Display for MergePrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "override" => Ok(MergePrecedence::OverrideWins),
            "base" => Ok(MergePrecedence::BaseWins),
            other => Err(format!(
                "unknown precedence '{other}' (expected 'override' or 'base')"
            )),
        }
    }
}

/// Options controlling a single contract load.
///
/// ## Usage
/// ```rust,no_run
/// use config::{LoadOptions, load};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let options = LoadOptions {
///         allow_empty_values: true,
///         ..LoadOptions::default()
///     };
///     let env = load(&options)?;
///     println!("{} variables resolved", env.len());
///     Ok(())
/// }
/// ```
///
/// ## Fields
/// - `sample`: contract file listing required keys (default `.env.example`)
/// - `path`: local override file (default `.env`)
/// - `allow_empty_values`: whether `KEY=` satisfies a declared key
/// - `precedence`: which layer wins when both define a key
/// - `write_back`: copy resolved values into the live environment on success
/// - `require_sample`: treat a missing contract file as an error
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(default)]
pub struct LoadOptions {
    #[validate(custom(function = "non_empty_path"))]
    pub sample: PathBuf,

    #[validate(custom(function = "non_empty_path"))]
    pub path: PathBuf,

    pub allow_empty_values: bool,

    pub precedence: MergePrecedence,

    pub write_back: bool,

    pub require_sample: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sample: PathBuf::from(DEFAULT_SAMPLE_PATH),
            path: PathBuf::from(DEFAULT_OVERRIDE_PATH),
            allow_empty_values: false,
            precedence: MergePrecedence::default(),
            write_back: true,
            require_sample: false,
        }
    }
}

#[allow(clippy::ptr_arg)]
fn non_empty_path(path: &PathBuf) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_path"));
    }
    Ok(())
}

/// One configuration layer: every field is optional and unset fields defer
/// to the layer below.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PartialOptions {
    pub sample: Option<PathBuf>,
    pub path: Option<PathBuf>,
    pub allow_empty_values: Option<bool>,
    pub precedence: Option<MergePrecedence>,
    pub write_back: Option<bool>,
    pub require_sample: Option<bool>,
}

impl PartialOptions {
    pub fn is_empty(&self) -> bool {
        *self == PartialOptions::default()
    }
}
