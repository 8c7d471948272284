use colored::Colorize;
use config::LoadOptions;
use errors::ContractError;

#[derive(Debug)]
pub struct UxError {
    pub what: String,
    pub why: Option<String>,
    pub how_to_fix: Vec<String>,
    pub suggested_command: Option<String>,
}

impl UxError {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            why: None,
            how_to_fix: Vec::new(),
            suggested_command: None,
        }
    }

    pub fn why(mut self, reason: impl Into<String>) -> Self {
        self.why = Some(reason.into());
        self
    }

    pub fn fix(mut self, suggestion: impl Into<String>) -> Self {
        self.how_to_fix.push(suggestion.into());
        self
    }

    pub fn suggest(mut self, cmd: impl Into<String>) -> Self {
        self.suggested_command = Some(cmd.into());
        self
    }

    pub fn display(&self) {
        eprintln!();
        eprintln!("{} {}", "error:".red().bold(), self.what.white().bold());

        if let Some(why) = &self.why {
            eprintln!("       {}", why.dimmed());
        }

        if !self.how_to_fix.is_empty() {
            eprintln!();
            eprintln!("{}", "How to fix:".yellow().bold());
            for (i, fix) in self.how_to_fix.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, fix);
            }
        }

        if let Some(cmd) = &self.suggested_command {
            eprintln!();
            eprintln!("{}", "Try this:".green().bold());
            eprintln!("  $ {}", cmd.cyan());
        }
        eprintln!();
    }
}

/// Map a contract failure onto a what/why/how-to-fix report.
///
/// `what` is always the error's own message, so the stable
/// `Missing environment variables: ...` line survives on stderr.
pub fn from_contract_error(err: &ContractError, options: &LoadOptions) -> UxError {
    match err {
        ContractError::MissingVariables { keys } => missing_variables(err, keys, options),
        ContractError::SampleNotFound { path } => UxError::new(err.to_string())
            .why("The contract file is required but could not be read")
            .fix(format!("Create {} listing the required variables", path.display()))
            .fix("Or drop --require-sample to treat a missing contract as empty"),
        ContractError::MalformedFile { path, .. } => UxError::new(err.to_string())
            .why("Each contract line must be a variable name, KEY=anything, a comment or blank")
            .fix(format!("Fix the offending line in {}", path.display())),
        ContractError::InvalidOptions { .. } => UxError::new(err.to_string())
            .why("envguard options come from CLI flags, ENVGUARD_* variables and --config")
            .fix("Check the values passed for each option")
            .suggest("envguard check --help"),
    }
}

fn missing_variables(err: &ContractError, keys: &[String], options: &LoadOptions) -> UxError {
    let mut ux = UxError::new(err.to_string())
        .why(format!(
            "Declared in {} but not set in {} or the environment",
            options.sample.display(),
            options.path.display()
        ))
        .fix(format!(
            "Add {} to {}",
            keys.join(", "),
            options.path.display()
        ))
        .fix("Or export them before starting the application");

    if !options.allow_empty_values {
        ux = ux.fix("Empty values count as missing; pass --allow-empty-values to accept them");
    }

    ux.suggest("envguard check --json")
}
