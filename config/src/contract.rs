//! # Contract Loading
//!
//! Runs a full check: snapshot the base environment, merge the override file,
//! read the declared keys, validate, and optionally write the result back.
//!
//! [`evaluate`] stops before the pass/fail decision and returns a
//! [`ContractReport`]; [`load_with`] is built on it.

use crate::config::LoadOptions;
use crate::env::{EnvMap, ProcessEnv, SystemEnv};
use crate::file_loader::{read_override, read_sample};
use crate::precedence::{merge_environment, write_back};
use crate::validator::{find_violations, validate, validate_options};
use errors::ContractError;

/// Snapshot of a contract evaluation, taken before deciding pass or fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractReport {
    /// Declared keys in sample order, duplicates included.
    pub declared: Vec<String>,
    /// Merged environment, undeclared keys included.
    pub resolved: EnvMap,
    /// Whether the override file existed and was readable.
    pub override_present: bool,
    /// Unsatisfied declared keys, in declaration order.
    pub missing: Vec<String>,
    allow_empty_values: bool,
}

impl ContractReport {
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }

    /// Why `key` is unsatisfied: `"empty"` when it resolved to an empty
    /// value, `"absent"` otherwise.
    pub fn reason(&self, key: &str) -> &'static str {
        if self.resolved.contains_key(key) {
            "empty"
        } else {
            "absent"
        }
    }

    /// Decide the evaluation: the resolved mapping, or
    /// [`ContractError::MissingVariables`].
    pub fn into_result(self) -> Result<EnvMap, ContractError> {
        validate(&self.declared, self.resolved, self.allow_empty_values)
    }
}

/// Load and check the environment contract against the live process
/// environment.
///
/// ## Usage
/// ```rust,no_run
/// use config::{LoadOptions, load};
///
/// fn main() {
///     match load(&LoadOptions::default()) {
///         Ok(env) => println!("{} variables resolved", env.len()),
///         Err(e) => {
///             eprintln!("{e}");
///             std::process::exit(1);
///         }
///     }
/// }
/// ```
pub fn load(options: &LoadOptions) -> Result<EnvMap, ContractError> {
    load_with(options, &mut SystemEnv)
}

/// Evaluate the contract against `env` without mutating anything.
///
/// Fails only on invalid options, a required sample that cannot be read, or
/// an invalid key in the sample. Unsatisfied keys are reported in
/// [`ContractReport::missing`] instead.
pub fn evaluate(
    options: &LoadOptions,
    env: &impl ProcessEnv,
) -> Result<ContractReport, ContractError> {
    validate_options(options)?;

    let overrides = read_override(&options.path)?;
    let override_present = overrides.is_some();
    let resolved = merge_environment(env.vars(), overrides, options.precedence);

    let declared = read_sample(&options.sample, options.require_sample)?;
    let missing = find_violations(&declared, &resolved, options.allow_empty_values);

    Ok(ContractReport {
        declared,
        resolved,
        override_present,
        missing,
        allow_empty_values: options.allow_empty_values,
    })
}

/// Load and check the environment contract against `env`.
///
/// Files are read fresh on every call. When `options.write_back` is set, the
/// resolved values are written into `env` after validation succeeds, without
/// overwriting values `env` already holds. A failed check leaves `env`
/// untouched.
///
/// Only the base layer comes from `env`. `${VAR}` references inside the
/// override file are expanded by `dotenvy` against the real process
/// environment and earlier lines of that file, even when `env` is a
/// [`MemoryEnv`](crate::env::MemoryEnv).
pub fn load_with(
    options: &LoadOptions,
    env: &mut impl ProcessEnv,
) -> Result<EnvMap, ContractError> {
    let report = evaluate(options, &*env)?;
    let declared = report.declared.len();
    let resolved = report.into_result()?;

    tracing::info!(
        "Environment contract satisfied: {} declared, {} resolved",
        declared,
        resolved.len()
    );

    if options.write_back {
        write_back(env, &resolved);
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergePrecedence;
    use crate::env::MemoryEnv;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn write(&self, name: &str, contents: &str) -> &Self {
            fs::write(self.dir.path().join(name), contents).unwrap();
            self
        }

        fn path(&self, name: &str) -> std::path::PathBuf {
            self.dir.path().join(name)
        }

        fn options(&self, sample: &str) -> LoadOptions {
            LoadOptions {
                sample: self.path(sample),
                path: self.path(".env"),
                ..LoadOptions::default()
            }
        }
    }

    fn standard_fixture() -> Fixture {
        let fixture = Fixture::new();
        fixture
            .write(".env", "HELLO=world\nEMPTY=\n")
            .write(".env.success", "HELLO=\n")
            .write(".env.allowEmpty", "HELLO=\nEMPTY=\n")
            .write(".env.fail", "HELLO=\nNOPE=\n")
            .write(".env.noDotEnv", "HELLO=\n");
        fixture
    }

    fn map(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_succeeds_when_all_is_well() {
        let fixture = standard_fixture();
        let mut env = MemoryEnv::new();

        let result = load_with(&fixture.options(".env.success"), &mut env);
        assert!(result.is_ok());
    }

    #[test]
    fn test_returns_parsed_values_when_empty_allowed() {
        let fixture = standard_fixture();
        let mut env = MemoryEnv::new();
        let options = LoadOptions {
            allow_empty_values: true,
            ..fixture.options(".env.allowEmpty")
        };

        let result = load_with(&options, &mut env).unwrap();
        assert_eq!(result, map(&[("HELLO", "world"), ("EMPTY", "")]));
    }

    #[test]
    fn test_empty_value_fails_by_default() {
        let fixture = standard_fixture();
        let mut env = MemoryEnv::new();

        let err = load_with(&fixture.options(".env.allowEmpty"), &mut env).unwrap_err();
        assert!(err.to_string().contains("Missing environment variables"));
        assert!(err.to_string().contains("EMPTY"));
    }

    #[test]
    fn test_missing_variable_fails() {
        let fixture = standard_fixture();
        let mut env = MemoryEnv::new();

        let err = load_with(&fixture.options(".env.fail"), &mut env).unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variables: NOPE");
    }

    #[test]
    fn test_missing_variable_fails_when_empty_allowed() {
        let fixture = standard_fixture();
        let mut env = MemoryEnv::new();
        let options = LoadOptions {
            allow_empty_values: true,
            ..fixture.options(".env.fail")
        };

        let err = load_with(&options, &mut env).unwrap_err();
        assert_eq!(err.missing_keys(), Some(&["NOPE".to_string()][..]));
    }

    #[test]
    fn test_no_override_file_uses_base_environment() {
        let fixture = Fixture::new();
        fixture.write(".env.noDotEnv", "HELLO=\n");
        let mut env: MemoryEnv = [("HELLO", "WORLD")].into_iter().collect();

        let options = fixture.options(".env.noDotEnv");
        let first = load_with(&options, &mut env).unwrap();
        assert_eq!(first, map(&[("HELLO", "WORLD")]));

        let second = load_with(&options, &mut env).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_undeclared_base_keys_pass_through() {
        let fixture = standard_fixture();
        let mut env: MemoryEnv = [("HOME", "/home/app")].into_iter().collect();

        let result = load_with(&fixture.options(".env.success"), &mut env).unwrap();
        assert_eq!(result.get("HOME").map(String::as_str), Some("/home/app"));
        assert_eq!(result.get("HELLO").map(String::as_str), Some("world"));
    }

    #[test]
    fn test_missing_sample_declares_nothing() {
        let fixture = Fixture::new();
        let mut env = MemoryEnv::new();

        let result = load_with(&fixture.options(".env.example"), &mut env).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_sample_required() {
        let fixture = Fixture::new();
        let mut env = MemoryEnv::new();
        let options = LoadOptions {
            require_sample: true,
            ..fixture.options(".env.example")
        };

        let err = load_with(&options, &mut env).unwrap_err();
        assert!(matches!(err, ContractError::SampleNotFound { .. }));
    }

    #[test]
    fn test_override_wins_in_result_but_write_back_keeps_ambient() {
        let fixture = standard_fixture();
        let mut env: MemoryEnv = [("HELLO", "ambient")].into_iter().collect();

        let result = load_with(&fixture.options(".env.success"), &mut env).unwrap();

        assert_eq!(result.get("HELLO").map(String::as_str), Some("world"));
        assert_eq!(env.var("HELLO").as_deref(), Some("ambient"));
        assert_eq!(env.var("EMPTY").as_deref(), Some(""));
    }

    #[test]
    fn test_base_precedence_keeps_ambient_in_result() {
        let fixture = standard_fixture();
        let mut env: MemoryEnv = [("HELLO", "ambient")].into_iter().collect();
        let options = LoadOptions {
            precedence: MergePrecedence::BaseWins,
            ..fixture.options(".env.success")
        };

        let result = load_with(&options, &mut env).unwrap();
        assert_eq!(result.get("HELLO").map(String::as_str), Some("ambient"));
    }

    #[test]
    fn test_write_back_disabled_leaves_env_untouched() {
        let fixture = standard_fixture();
        let mut env = MemoryEnv::new();
        let options = LoadOptions {
            write_back: false,
            ..fixture.options(".env.success")
        };

        load_with(&options, &mut env).unwrap();
        assert_eq!(env, MemoryEnv::new());
    }

    #[test]
    fn test_failed_contract_does_not_write_back() {
        let fixture = standard_fixture();
        let mut env = MemoryEnv::new();

        load_with(&fixture.options(".env.fail"), &mut env).unwrap_err();
        assert_eq!(env.var("HELLO"), None);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let mut env = MemoryEnv::new();
        let options = LoadOptions {
            path: Path::new("").to_path_buf(),
            ..LoadOptions::default()
        };

        let err = load_with(&options, &mut env).unwrap_err();
        assert!(matches!(err, ContractError::InvalidOptions { .. }));
    }

    #[test]
    #[serial]
    fn test_load_uses_process_environment() {
        let fixture = Fixture::new();
        fixture
            .write(".env", "ENVGUARD_TEST_FROM_FILE=file\n")
            .write(
                ".env.example",
                "ENVGUARD_TEST_AMBIENT=\nENVGUARD_TEST_FROM_FILE=\n",
            );
        unsafe {
            std::env::set_var("ENVGUARD_TEST_AMBIENT", "ambient");
            std::env::remove_var("ENVGUARD_TEST_FROM_FILE");
        }

        let result = load(&fixture.options(".env.example")).unwrap();
        assert_eq!(
            result.get("ENVGUARD_TEST_AMBIENT").map(String::as_str),
            Some("ambient")
        );
        assert_eq!(
            std::env::var("ENVGUARD_TEST_FROM_FILE").as_deref(),
            Ok("file")
        );

        unsafe {
            std::env::remove_var("ENVGUARD_TEST_AMBIENT");
            std::env::remove_var("ENVGUARD_TEST_FROM_FILE");
        }
    }

    #[test]
    fn test_evaluate_reports_absent_and_empty() {
        let fixture = standard_fixture();
        fixture.write(".env.mixed", "HELLO=\nEMPTY=\nNOPE=\n");

        let report = evaluate(&fixture.options(".env.mixed"), &MemoryEnv::new()).unwrap();

        assert!(!report.is_satisfied());
        assert!(report.override_present);
        assert_eq!(report.missing, vec!["EMPTY", "NOPE"]);
        assert_eq!(report.reason("EMPTY"), "empty");
        assert_eq!(report.reason("NOPE"), "absent");

        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variables: EMPTY, NOPE");
    }

    #[test]
    fn test_evaluate_matches_load_with() {
        let fixture = standard_fixture();
        let options = fixture.options(".env.success");
        let mut env: MemoryEnv = [("HOME", "/home/app")].into_iter().collect();

        let report = evaluate(&options, &env).unwrap();
        assert!(report.is_satisfied());
        assert_eq!(report.declared, vec!["HELLO"]);

        let evaluated = report.into_result().unwrap();
        assert_eq!(evaluated, load_with(&options, &mut env).unwrap());
    }

    #[test]
    fn test_evaluate_does_not_write_back() {
        let fixture = standard_fixture();
        let env = MemoryEnv::new();

        let report = evaluate(&fixture.options(".env.success"), &env).unwrap();
        assert!(report.is_satisfied());
        assert_eq!(env, MemoryEnv::new());
    }

    #[test]
    fn test_evaluate_without_override_file() {
        let fixture = Fixture::new();
        fixture.write(".env.example", "HELLO\n");
        let env: MemoryEnv = [("HELLO", "WORLD")].into_iter().collect();

        let report = evaluate(&fixture.options(".env.example"), &env).unwrap();
        assert!(report.is_satisfied());
        assert!(!report.override_present);
    }

    #[test]
    fn test_unparseable_override_line_does_not_block_contract() {
        let fixture = Fixture::new();
        fixture
            .write(".env", "GREETING=hello world\n")
            .write(".env.example", "HELLO=\n");
        let mut env: MemoryEnv = [("HELLO", "WORLD")].into_iter().collect();

        let result = load_with(&fixture.options(".env.example"), &mut env).unwrap();
        assert_eq!(result.get("HELLO").map(String::as_str), Some("WORLD"));
        assert!(!result.contains_key("GREETING"));
    }

    #[test]
    fn test_placeholder_sample_values_are_ignored() {
        let fixture = Fixture::new();
        fixture.write(".env.example", "API_KEY=your key here\nNAME=it's set\n");
        let mut env: MemoryEnv = [("API_KEY", "k"), ("NAME", "n")].into_iter().collect();

        assert!(load_with(&fixture.options(".env.example"), &mut env).is_ok());
    }

    #[test]
    #[serial]
    fn test_override_substitution_uses_process_environment() {
        unsafe {
            std::env::remove_var("ENVGUARD_TEST_SUBST_HOST");
            std::env::remove_var("ENVGUARD_TEST_SUBST_LOCAL");
        }
        let fixture = Fixture::new();
        fixture
            .write(
                ".env",
                "URL=${ENVGUARD_TEST_SUBST_HOST}/x\n\
                 ENVGUARD_TEST_SUBST_LOCAL=here\n\
                 DERIVED=${ENVGUARD_TEST_SUBST_LOCAL}/y\n",
            )
            .write(".env.example", "URL\nDERIVED\n");
        let options = LoadOptions {
            write_back: false,
            ..fixture.options(".env.example")
        };

        // Injected values are not visible to substitution.
        let mut env: MemoryEnv = [("ENVGUARD_TEST_SUBST_HOST", "injected")]
            .into_iter()
            .collect();
        let result = load_with(&options, &mut env).unwrap();
        assert_eq!(result.get("URL").map(String::as_str), Some("/x"));
        assert_eq!(result.get("DERIVED").map(String::as_str), Some("here/y"));

        unsafe {
            std::env::set_var("ENVGUARD_TEST_SUBST_HOST", "process");
        }
        let result = load_with(&options, &mut MemoryEnv::new()).unwrap();
        assert_eq!(result.get("URL").map(String::as_str), Some("process/x"));

        unsafe {
            std::env::remove_var("ENVGUARD_TEST_SUBST_HOST");
        }
    }
}
