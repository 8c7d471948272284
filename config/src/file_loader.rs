//! # File Loading
//!
//! Reads the three files an envguard run may touch:
//! - the override file (`KEY=VALUE`, values matter)
//! - the sample contract file (only keys matter)
//! - an optional TOML/YAML options file
//!
//! Override lines are parsed by `dotenvy`. Sample lines only contribute their
//! key, so their right-hand side is never parsed.

use crate::config::PartialOptions;
use crate::env::EnvMap;
use errors::ContractError;
use std::io::ErrorKind;
use std::path::Path;

/// Options file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),
}

/// Read the local override file.
///
/// Returns `Ok(None)` when the file does not exist. Any other read failure is
/// logged and also treated as absence. A line `dotenvy` cannot parse is logged
/// and skipped; the remaining lines still load. When a key repeats, the last
/// occurrence wins.
///
/// `${VAR}` references in values are expanded by `dotenvy` against earlier
/// lines of the same file and the real process environment, never against an
/// injected [`ProcessEnv`](crate::env::ProcessEnv).
pub fn read_override(path: &Path) -> Result<Option<EnvMap>, ContractError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            tracing::debug!("Override file {} not present", path.display());
            return Ok(None);
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable override file {}: {}", path.display(), e);
            return Ok(None);
        }
    };

    let mut values = EnvMap::new();
    let mut skipped = 0usize;
    for (entry, item) in iter.enumerate() {
        match item {
            Ok((key, value)) => {
                values.insert(key, value);
            }
            Err(dotenvy::Error::Io(e)) => {
                tracing::warn!("Ignoring unreadable override file {}: {}", path.display(), e);
                return Ok(None);
            }
            // The parser's message quotes the offending line, value included.
            Err(_) => {
                skipped += 1;
                tracing::warn!(
                    "Skipping unparseable entry {} in override file {}",
                    entry + 1,
                    path.display()
                );
            }
        }
    }

    tracing::debug!(
        "Read {} override values from {} ({} skipped)",
        values.len(),
        path.display(),
        skipped
    );
    Ok(Some(values))
}

/// Read the declared key set from a sample contract file.
///
/// Keys come back in file order. Values in the sample are ignored, and bare
/// `KEY` lines are accepted alongside `KEY=anything`. A missing or unreadable
/// file declares nothing unless `required` is set, in which case it is a
/// [`ContractError::SampleNotFound`].
pub fn read_sample(path: &Path, required: bool) -> Result<Vec<String>, ContractError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if required {
                return Err(ContractError::SampleNotFound {
                    path: path.to_path_buf(),
                });
            }
            if e.kind() == ErrorKind::NotFound {
                tracing::debug!("Sample file {} not present, no keys declared", path.display());
            } else {
                tracing::warn!("Ignoring unreadable sample file {}: {}", path.display(), e);
            }
            return Ok(Vec::new());
        }
    };

    parse_sample(&contents).map_err(|reason| ContractError::MalformedFile {
        path: path.to_path_buf(),
        reason,
    })
}

/// Extract declared keys from sample file text.
///
/// Each non-blank, non-comment line declares the key before its first `=`
/// (or the whole line when there is none), after an optional `export `
/// prefix. Whatever follows `=` is never looked at. A key containing
/// characters other than ASCII alphanumerics, `_` and `.` is an error naming
/// the 1-based line number.
pub fn parse_sample(contents: &str) -> Result<Vec<String>, String> {
    let mut keys = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let key = line.split_once('=').map_or(line, |(key, _)| key).trim();
        if !is_valid_key(key) {
            return Err(format!("invalid variable name on line {}", index + 1));
        }
        keys.push(key.to_string());
    }
    Ok(keys)
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Load options from TOML file.
///
/// ## Error Handling
/// Returns `ConfigFileError` for:
/// - File not found
/// - Invalid TOML syntax
/// - Unknown option names
pub fn load_from_toml(path: &Path) -> Result<PartialOptions, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    toml::from_str(&contents).map_err(|e| ConfigFileError::TomlParse(e.to_string()))
}

/// Load options from YAML file.
pub fn load_from_yaml(path: &Path) -> Result<PartialOptions, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    if contents.trim().is_empty() {
        return Ok(PartialOptions::default());
    }

    serde_yaml::from_str(&contents).map_err(|e| ConfigFileError::YamlParse(e.to_string()))
}

/// Load options from file with auto-detection.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`: YAML format
/// - `.yml`: YAML format
pub fn load_options_from_file(path: &Path) -> Result<PartialOptions, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string())),
    }
}
