use crate::cli::{OutputFormat, ProfilePreset};
use crate::config::AuditProfile;
use crate::engine::run_audit;
use crate::io::{render_report, write_report_to};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub profile: ProfilePreset,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let profile = resolve_profile(&config)?;
    let report = run_audit(&config.path, &profile)?;

    match &config.output {
        Some(path) => {
            let document = render_report(config.format.into(), &report)?;
            std::fs::write(path, document)
                .with_context(|| format!("cannot write output file {}", path.display()))?;
        }
        None => {
            write_report_to(config.format.into(), &report, std::io::stdout().lock())?;
        }
    }
    Ok(())
}

fn resolve_profile(config: &AnalyzeConfig) -> Result<AuditProfile> {
    match &config.config {
        Some(path) => Ok(AuditProfile::from_toml_file(path)?),
        None => Ok(match config.profile {
            ProfilePreset::Baseline => AuditProfile::baseline(),
            ProfilePreset::Strict => AuditProfile::strict(),
        }),
    }
}
