//! Policy Pricing CLI
//!
//! Loads a policy scenario, applies rule toggles from the command line and
//! prints the resulting statement.

use std::{io, process::ExitCode};

use thiserror::Error;
use tracing::{error, info};

use policy_pricing::{
    fixtures::{Fixture, FixtureError},
    policy::ValidationError,
    statement::{Statement, StatementError},
};

use crate::cli::CliConfig;

mod cli;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
enum AppError {
    /// The fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// `--validate` found invalid rule settings.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The statement could not be written.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// `--deactivate` named a SKU the fixture does not contain.
    #[error("no line item with SKU {0}")]
    UnknownSku(String),
}

/// Policy pricing CLI entry point
pub fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(err) => {
            _ = err.print();

            return ExitCode::from(usage_exit_status(&err));
        }
    };

    if let Err(err) = cli::logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Failed to initialise logging: {err}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "policy evaluation failed");

            if let AppError::Validation(validation) = &err {
                for issue in &validation.issues {
                    error!(%issue, "invalid rule setting");
                }
            }

            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<(), AppError> {
    let mut fixture = Fixture::from_path(&config.fixture)?;

    info!(
        path = %config.fixture.display(),
        items = fixture.items().len(),
        currency = fixture.currency().iso_alpha_code,
        "loaded policy fixture"
    );

    apply_overrides(&mut fixture, config)?;

    let statement = Statement::new(fixture.items(), fixture.policy(), fixture.currency());

    info!(
        net = %statement.evaluation().net(),
        active_rules = statement.evaluation().active_rule_count(),
        "evaluated policy"
    );

    let stdout = io::stdout();
    let handle = stdout.lock();

    statement.write_to(handle)?;

    Ok(())
}

/// Exit status for a command line parsing failure.
///
/// Help and version requests also arrive as errors and exit cleanly.
fn usage_exit_status(err: &clap::Error) -> u8 {
    if err.use_stderr() { 2 } else { 0 }
}

/// Applies command line toggles to a loaded fixture: `--enable`, then
/// `--disable`, then `--deactivate`, then `--validate` if requested.
fn apply_overrides(fixture: &mut Fixture, config: &CliConfig) -> Result<(), AppError> {
    for kind in &config.enable {
        fixture.policy_mut().set_enabled(*kind, true);
    }

    for kind in &config.disable {
        fixture.policy_mut().set_enabled(*kind, false);
    }

    for sku in &config.deactivate {
        if !fixture.deactivate(sku) {
            return Err(AppError::UnknownSku(sku.clone()));
        }
    }

    if config.validate {
        fixture.policy().validate()?;
    }

    Ok(())
}
