//! # Contract Validation
//!
//! Compares the declared key set against a resolved environment, and checks
//! [`LoadOptions`] with the `validator` crate.

use crate::config::LoadOptions;
use crate::env::EnvMap;
use errors::ContractError;
use std::collections::HashSet;
use validator::Validate;

/// Every declared key the environment fails to satisfy, in declaration order.
///
/// A key is unsatisfied when it is absent, or present with an empty value while
/// `allow_empty_values` is false. A key declared more than once is reported
/// once, at its first position.
pub fn find_violations(
    declared: &[String],
    env: &EnvMap,
    allow_empty_values: bool,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut violations = Vec::new();

    for key in declared {
        let unsatisfied = match env.get(key) {
            None => true,
            Some(value) => value.is_empty() && !allow_empty_values,
        };
        if unsatisfied && seen.insert(key.as_str()) {
            violations.push(key.clone());
        }
    }

    violations
}

/// Check a resolved environment against the declared key set.
///
/// ## Purpose
/// Returns the full mapping untouched when every declared key is satisfied,
/// including keys that were never declared. Otherwise fails with
/// [`ContractError::MissingVariables`] listing every violator, so the caller
/// sees all of them at once.
///
/// ## Usage
/// ```rust
/// use config::{EnvMap, validate};
///
/// let mut env = EnvMap::new();
/// env.insert("HELLO".to_string(), "world".to_string());
///
/// let declared = vec!["HELLO".to_string(), "NOPE".to_string()];
/// let err = validate(&declared, env, false).unwrap_err();
/// assert_eq!(err.to_string(), "Missing environment variables: NOPE");
/// ```
pub fn validate(
    declared: &[String],
    env: EnvMap,
    allow_empty_values: bool,
) -> Result<EnvMap, ContractError> {
    let keys = find_violations(declared, &env, allow_empty_values);
    if keys.is_empty() {
        Ok(env)
    } else {
        Err(ContractError::MissingVariables { keys })
    }
}

/// Validate resolved load options.
pub fn validate_options(options: &LoadOptions) -> Result<(), ContractError> {
    options
        .validate()
        .map_err(|errors| ContractError::InvalidOptions {
            message: errors.to_string(),
        })
}
