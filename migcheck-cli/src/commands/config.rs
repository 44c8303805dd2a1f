//! `migcheck config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use migcheck_core::config::MigcheckConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// Attempts to load and validate the configuration file, reporting any errors.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let result = MigcheckConfig::load(config_path).await;

    let report = match result {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Loads and displays the effective configuration (file + env overrides +
/// defaults). The hub password is redacted before rendering.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let mut config = MigcheckConfig::load(config_path)
        .await
        .map_err(|e| CliError::Config(e.to_string()))?;

    // Never print the hub password
    if !config.hub.password.is_empty() {
        config.hub.password = "<redacted>".to_owned();
    }

    let config_toml = match section.as_deref() {
        None => serialize_section(&config),
        Some("general") => serialize_section(&config.general),
        Some("hub") => serialize_section(&config.hub),
        Some("polling") => serialize_section(&config.polling),
        Some("fixtures") => serialize_section(&config.fixtures),
        Some("artifacts") => serialize_section(&config.artifacts),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown config section '{other}', expected one of: general, hub, polling, fixtures, artifacts"
            )));
        }
    };

    let report = ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    };
    writer.render(&report)?;
    Ok(())
}

fn serialize_section<T: Serialize>(section: &T) -> String {
    toml::to_string_pretty(section).unwrap_or_else(|e| format!("(serialization error: {e})"))
}

/// Result payload for `config validate`.
#[derive(Debug, Serialize)]
struct ConfigValidationReport {
    source: String,
    valid: bool,
    errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.valid {
            writeln!(w, "{}: configuration is valid", self.source)?;
        } else {
            writeln!(w, "{}: configuration is INVALID", self.source)?;
            for error in &self.errors {
                writeln!(w, "  - {error}")?;
            }
        }
        Ok(())
    }
}

/// Result payload for `config show`.
#[derive(Debug, Serialize)]
struct ConfigReport {
    source: String,
    section: Option<String>,
    config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match &self.section {
            Some(section) => writeln!(w, "# {} [{section}]", self.source)?,
            None => writeln!(w, "# {}", self.source)?,
        }
        writeln!(w, "{}", self.config_toml)?;
        Ok(())
    }
}
