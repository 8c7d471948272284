//! # envguard Configuration Contract
//!
//! Verifies that an application's environment satisfies a declared contract
//! before it starts.
//!
//! This crate provides:
//! - Environment sources, live or in-memory
//! - Override file loading (`KEY=VALUE` via `dotenvy`) and sample key extraction
//! - A non-deciding evaluation report alongside the pass/fail load
//! - Merge precedence between the override file and the ambient environment
//! - Contract validation with an exhaustive, ordered violation report
//! - Option loading from files and environment variables (CLI > env > file >
//!   defaults)

pub mod config;
pub mod contract;
pub mod env;
pub mod file_loader;
pub mod loader;
pub mod precedence;
pub mod validator;

pub use crate::config::{
    DEFAULT_OVERRIDE_PATH, DEFAULT_SAMPLE_PATH, LoadOptions, MergePrecedence, PartialOptions,
};
pub use crate::contract::{ContractReport, evaluate, load, load_with};
pub use crate::env::{EnvMap, MemoryEnv, ProcessEnv, SystemEnv};
pub use crate::file_loader::{
    ConfigFileError, load_options_from_file, parse_sample, read_override, read_sample,
};
pub use crate::loader::options_from_env;
pub use crate::precedence::{merge_environment, merge_options, write_back};
pub use crate::validator::{find_violations, validate, validate_options};
pub use errors::ContractError;
