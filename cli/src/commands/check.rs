//! Check command - Environment contract validation
//!
//! Evaluates the contract without touching the process environment and
//! reports every declared variable that is absent or empty.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use config::{ContractReport, SystemEnv, evaluate};

use super::ContractArgs;
use crate::{output, ux_error};

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let options = args.contract.resolve()?;

    let report = match evaluate(&options, &SystemEnv) {
        Ok(report) => report,
        Err(err) => {
            if args.json {
                let output = serde_json::json!({ "ok": false, "error": err.to_string() });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                ux_error::from_contract_error(&err, &options).display();
            }
            std::process::exit(1);
        }
    };

    if args.json {
        return run_json(&report);
    }

    output::header("Environment Contract");
    println!();
    println!(
        "  {} {}",
        "Sample:".dimmed(),
        options.sample.display().to_string().cyan()
    );
    println!(
        "  {} {} {}",
        "Override:".dimmed(),
        options.path.display().to_string().cyan(),
        if report.override_present {
            "".normal()
        } else {
            "(not found)".dimmed()
        }
    );
    println!(
        "  {} {}",
        "Precedence:".dimmed(),
        options.precedence.as_str().cyan()
    );
    println!("  {} {}", "Declared:".dimmed(), report.declared.len());
    println!();

    if !report.override_present {
        output::hint("No override file found; values come from the environment only");
    }

    for key in &report.missing {
        println!("  {} {} {}", "✗".red(), key, report.reason(key).dimmed());
    }

    let declared = report.declared.len();
    match report.into_result() {
        Ok(_) => {
            output::success(&format!("All {declared} declared variables are set"));
            Ok(())
        }
        Err(err) => {
            ux_error::from_contract_error(&err, &options).display();
            std::process::exit(1);
        }
    }
}

fn run_json(report: &ContractReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&json_report(report))?);

    if !report.is_satisfied() {
        std::process::exit(1);
    }

    Ok(())
}

fn json_report(report: &ContractReport) -> serde_json::Value {
    serde_json::json!({
        "ok": report.is_satisfied(),
        "declared": report.declared.len(),
        "resolved": report.resolved.len(),
        "missing": report.missing.iter().map(|key| serde_json::json!({
            "key": key,
            "reason": report.reason(key),
        })).collect::<Vec<_>>(),
    })
}
