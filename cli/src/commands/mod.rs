pub mod check;
pub mod completion;
pub mod exec;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::{
    LoadOptions, MergePrecedence, PartialOptions, SystemEnv, load_options_from_file,
    merge_options, options_from_env, validate_options,
};

#[derive(Parser)]
#[command(
    name = "envguard",
    author,
    version,
    about = "envguard - fail fast when the environment does not satisfy its contract",
    long_about = "Reads the required variable names from a sample file (.env.example), merges \
                  values from a local .env file with the process environment, and refuses to \
                  continue if any required variable is missing or empty.\n\n\
                  envguard never modifies its own environment: the write_back option \
                  (ENVGUARD_WRITE_BACK or the options file) only applies to library callers \
                  and is ignored here."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check the environment against the contract")]
    Check(check::CheckArgs),

    #[command(about = "Check the contract, then run a command with the resolved environment")]
    Exec(exec::ExecArgs),

    #[command(about = "Generate shell completions")]
    Completion(completion::CompletionArgs),
}

// Options shared by every command that evaluates the contract. Flags left
// unset defer to `ENVGUARD_*` variables, then the options file, then defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ContractArgs {
    /// Contract file listing required variables [default: .env.example]
    #[arg(long, value_name = "FILE")]
    pub sample: Option<PathBuf>,

    /// Local override file [default: .env]
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Accept empty values for declared variables (`=false` turns it off)
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub allow_empty_values: Option<bool>,

    /// Which layer wins when both define a variable: override or base
    #[arg(long, value_name = "LAYER")]
    pub precedence: Option<MergePrecedence>,

    /// Fail if the contract file does not exist (`=false` turns it off)
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub require_sample: Option<bool>,

    /// Options file (TOML or YAML)
    #[arg(long, env = "ENVGUARD_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ContractArgs {
    fn to_partial(&self) -> PartialOptions {
        PartialOptions {
            sample: self.sample.clone(),
            path: self.path.clone(),
            allow_empty_values: self.allow_empty_values,
            precedence: self.precedence,
            write_back: None,
            require_sample: self.require_sample,
        }
    }

    /// Resolve options: CLI > environment > options file > defaults.
    pub fn resolve(&self) -> Result<LoadOptions> {
        let file = match &self.config {
            Some(path) => load_options_from_file(path)?,
            None => PartialOptions::default(),
        };
        let env = options_from_env(&SystemEnv)?;

        self.resolve_layers(file, env)
    }

    fn resolve_layers(&self, file: PartialOptions, env: PartialOptions) -> Result<LoadOptions> {
        if file.write_back.is_some() || env.write_back.is_some() {
            tracing::warn!("write_back only applies to library callers; the CLI ignores it");
        }

        let mut options = merge_options(LoadOptions::default(), file, env, self.to_partial());
        options.write_back = false;
        validate_options(&options)?;
        Ok(options)
    }
}
