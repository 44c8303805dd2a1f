//! `migcheck fixtures` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use migcheck_core::config::MigcheckConfig;
use migcheck_fixture::FixtureSet;

use crate::cli::FixturesArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `fixtures` command.
///
/// Loads the fixture set from the configured (or overridden) directory and
/// lists the available application and analysis preset keys.
pub async fn execute(
    args: FixturesArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = MigcheckConfig::load(config_path)
        .await
        .map_err(|e| CliError::Config(e.to_string()))?;
    let dir = args.dir.unwrap_or(config.fixtures.dir);

    info!(dir = %dir, "listing fixtures");

    let fixtures = FixtureSet::load(&dir)
        .await
        .map_err(migcheck_core::error::MigcheckError::from)?;

    let report = FixtureListReport {
        dir,
        applications: fixtures
            .application_keys()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        analyses: fixtures
            .analysis_keys()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    };
    writer.render(&report)?;
    Ok(())
}

/// Result payload for `fixtures`.
#[derive(Debug, Serialize)]
struct FixtureListReport {
    dir: String,
    applications: Vec<String>,
    analyses: Vec<String>,
}

impl Render for FixtureListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "fixtures in {}", self.dir)?;
        writeln!(w, "applications ({}):", self.applications.len())?;
        for key in &self.applications {
            writeln!(w, "  {key}")?;
        }
        writeln!(w, "analysis presets ({}):", self.analyses.len())?;
        for key in &self.analyses {
            writeln!(w, "  {key}")?;
        }
        Ok(())
    }
}
