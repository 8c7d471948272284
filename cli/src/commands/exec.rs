//! Exec command - run a program only when its environment contract holds
//!
//! The child process receives the resolved mapping, so values from the
//! override file reach it even though envguard never mutates its own
//! environment.

use std::process::Command;

use anyhow::{Context, Result};
use clap::Args;
use config::{SystemEnv, load_with};

use super::ContractArgs;
use crate::ux_error;

#[derive(Args)]
pub struct ExecArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Command and arguments to run, after `--`
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

pub fn run(args: ExecArgs) -> Result<()> {
    let options = args.contract.resolve()?;

    let resolved = match load_with(&options, &mut SystemEnv) {
        Ok(resolved) => resolved,
        Err(err) => {
            ux_error::from_contract_error(&err, &options).display();
            std::process::exit(1);
        }
    };

    let (program, rest) = args
        .command
        .split_first()
        .context("No command given")?;

    tracing::debug!("Running {} with {} variables", program, resolved.len());

    let status = Command::new(program)
        .args(rest)
        .envs(&resolved)
        .status()
        .with_context(|| format!("Failed to run '{program}'"))?;

    std::process::exit(status.code().unwrap_or(1));
}
