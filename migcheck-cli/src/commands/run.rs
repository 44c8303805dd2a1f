//! `migcheck run` command handler

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use migcheck_core::config::MigcheckConfig;
use migcheck_fixture::FixtureSet;
use migcheck_hub::HttpHubClient;
use migcheck_scenario::{ScenarioStatus, SuiteContext, SuiteReport, suites};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::logging;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
///
/// Loads config and fixtures, builds the HTTP hub client, runs the named
/// suite to completion, renders the report, and maps the suite outcome to
/// the process exit code (`CliError::SuiteFailed` on any failure).
pub async fn execute(
    args: RunArgs,
    config_path: &Path,
    log_level_override: Option<&str>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut config = MigcheckConfig::load(config_path)
        .await
        .map_err(|e| CliError::Config(e.to_string()))?;
    if let Some(level) = log_level_override {
        config.general.log_level = level.to_owned();
    }
    logging::init_tracing(&config.general)?;

    if let Some(dir) = args.fixtures {
        config.fixtures.dir = dir;
    }

    info!(suite = %args.suite, hub = %config.hub.base_url, "starting suite run");

    let fixtures = FixtureSet::load(&config.fixtures.dir)
        .await
        .map_err(migcheck_core::error::MigcheckError::from)?;

    let suite = suites::by_name(&args.suite).ok_or_else(|| {
        CliError::Command(format!(
            "unknown suite '{}', available: {}",
            args.suite,
            suites::names().join(", ")
        ))
    })?;

    let hub = HttpHubClient::new(&config.hub)
        .map_err(|e| CliError::HubUnavailable(e.to_string()))?;
    let mut ctx = SuiteContext::new(Arc::new(hub), config, fixtures);

    let report = suite.run(&mut ctx).await;
    let payload = RunReport(report);
    writer.render(&payload)?;

    if !payload.0.success() {
        return Err(CliError::SuiteFailed(format!(
            "{} failed, {} skipped",
            payload.0.failed_count(),
            payload.0.skipped_count()
        )));
    }
    Ok(())
}

/// Render wrapper around [`SuiteReport`].
#[derive(Serialize)]
#[serde(transparent)]
struct RunReport(SuiteReport);

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let report = &self.0;
        writeln!(
            w,
            "suite '{}': {} passed, {} failed, {} skipped",
            report.suite.bold(),
            report.passed_count(),
            report.failed_count(),
            report.skipped_count(),
        )?;

        if let Some(reason) = &report.setup_error {
            writeln!(w, "  {} setup: {reason}", "ABRT".red().bold())?;
        }
        for outcome in &report.outcomes {
            match &outcome.status {
                ScenarioStatus::Passed => {
                    writeln!(w, "  {} {}", "PASS".green().bold(), outcome.name)?;
                }
                ScenarioStatus::Failed(reason) => {
                    writeln!(w, "  {} {}: {reason}", "FAIL".red().bold(), outcome.name)?;
                }
                ScenarioStatus::Skipped => {
                    writeln!(w, "  {} {}", "SKIP".yellow().bold(), outcome.name)?;
                }
            }
        }
        if let Some(reason) = &report.teardown_error {
            writeln!(w, "  {} teardown: {reason}", "FAIL".red().bold())?;
        }
        if let Some(reason) = &report.contract_error {
            writeln!(w, "  {} contract: {reason}", "FAIL".red().bold())?;
        }
        Ok(())
    }
}
