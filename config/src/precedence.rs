//! # Precedence
//!
//! Two merges live here:
//! - variable values: base environment and override file, see
//!   [`merge_environment`], plus the optional [`write_back`] step
//! - envguard options: CLI > environment > options file > defaults, see
//!   [`merge_options`]

use crate::config::{LoadOptions, MergePrecedence, PartialOptions};
use crate::env::{EnvMap, ProcessEnv};

/// Merge the override layer onto the base environment.
///
/// ## Rules
/// - No override file: the base environment is returned unchanged.
/// - [`MergePrecedence::OverrideWins`]: every override key replaces the base
///   value.
/// - [`MergePrecedence::BaseWins`]: an override key is only used when the base
///   lacks the key or holds an empty value.
///
/// Keys present in only one layer always survive. Only key names are logged;
/// values may be secrets.
pub fn merge_environment(
    base: EnvMap,
    overrides: Option<EnvMap>,
    precedence: MergePrecedence,
) -> EnvMap {
    let Some(overrides) = overrides else {
        return base;
    };

    let mut merged = base;
    let mut changes = Vec::new();

    for (key, value) in overrides {
        let take = match precedence {
            MergePrecedence::OverrideWins => true,
            MergePrecedence::BaseWins => merged.get(&key).is_none_or(|v| v.is_empty()),
        };
        if !take {
            tracing::debug!("Keeping ambient value for {}", key);
            continue;
        }
        if merged.get(&key) != Some(&value) {
            changes.push(key.clone());
        }
        merged.insert(key, value);
    }

    if !changes.is_empty() {
        tracing::info!(
            "Override file set {} variables ({} precedence): {:?}",
            changes.len(),
            precedence,
            changes
        );
    }

    merged
}

/// Copy resolved values into a live environment.
///
/// A key whose live value is already non-empty is never overwritten, even
/// when the merged mapping holds a different value. Unset and empty keys are
/// filled. Returns the keys written, in key order.
pub fn write_back(env: &mut impl ProcessEnv, merged: &EnvMap) -> Vec<String> {
    let mut written = Vec::new();

    for (key, value) in merged {
        match env.var(key) {
            Some(existing) if !existing.is_empty() => {
                tracing::debug!("Not overwriting {} already set in environment", key);
            }
            Some(existing) if existing == *value => {}
            _ => {
                env.set_var(key, value);
                written.push(key.clone());
            }
        }
    }

    if !written.is_empty() {
        tracing::debug!("Wrote {} variables to environment: {:?}", written.len(), written);
    }

    written
}

/// Merge option layers with precedence.
///
/// ## Purpose
/// Resolves [`LoadOptions`] from every source following precedence rules:
/// CLI arguments > environment variables > options file > defaults.
///
/// ## Usage
/// ```rust,no_run
/// use config::{LoadOptions, PartialOptions, SystemEnv, merge_options, options_from_env};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let from_env = options_from_env(&SystemEnv)?;
///     let options = merge_options(
///         LoadOptions::default(),
///         PartialOptions::default(),
///         from_env,
///         PartialOptions::default(),
///     );
///     println!("sample: {}", options.sample.display());
///     Ok(())
/// }
/// ```
pub fn merge_options(
    defaults: LoadOptions,
    file: PartialOptions,
    env: PartialOptions,
    cli: PartialOptions,
) -> LoadOptions {
    let mut options = defaults;

    options = apply_layer(options, file, "file");
    options = apply_layer(options, env, "env");
    options = apply_layer(options, cli, "cli");

    options
}

fn apply_layer(mut base: LoadOptions, layer: PartialOptions, source_name: &str) -> LoadOptions {
    let mut changes = Vec::new();

    if let Some(sample) = layer.sample {
        changes.push(format!("sample = {}", sample.display()));
        base.sample = sample;
    }
    if let Some(path) = layer.path {
        changes.push(format!("path = {}", path.display()));
        base.path = path;
    }
    if let Some(allow) = layer.allow_empty_values {
        changes.push(format!("allow_empty_values = {allow}"));
        base.allow_empty_values = allow;
    }
    if let Some(precedence) = layer.precedence {
        changes.push(format!("precedence = {precedence}"));
        base.precedence = precedence;
    }
    if let Some(write_back) = layer.write_back {
        changes.push(format!("write_back = {write_back}"));
        base.write_back = write_back;
    }
    if let Some(require_sample) = layer.require_sample {
        changes.push(format!("require_sample = {require_sample}"));
        base.require_sample = require_sample;
    }

    if !changes.is_empty() {
        tracing::debug!("Options from {}: {:?}", source_name, changes);
    }

    base
}
