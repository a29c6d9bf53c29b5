//! The audit pipeline: walk, parse, analyze, justify, aggregate.
//!
//! The pipeline is embarrassingly parallel at file granularity: every
//! per-file stage shares only the read-only profile, and the final
//! single-threaded sort makes the output independent of scheduling.

use crate::aggregate::build_report;
use crate::analyzers::{analyzer_set, Analyzer};
use crate::config::AuditProfile;
use crate::core::parsing::SourceFile;
use crate::core::{AuditReport, Finding};
use crate::io::walker::{relative_path, SourceWalker};
use anyhow::Result;
use rayon::prelude::*;
use std::path::Path;

/// Run the full audit over `root` and produce the report atomically.
pub fn run_audit(root: &Path, profile: &AuditProfile) -> Result<AuditReport> {
    profile.validate()?;

    let walker = SourceWalker::new(root.to_path_buf(), profile.excluded_dirs.clone());
    let paths = walker.walk()?;
    let analyzers = analyzer_set(profile);

    let findings: Vec<Finding> = paths
        .par_iter()
        .flat_map(|path| {
            let rel_path = relative_path(root, path);
            match std::fs::read_to_string(path) {
                Ok(text) => analyze_source(SourceFile::from_text(rel_path, text), &analyzers),
                Err(e) => {
                    // Unreadable files drop out of the run; the audit
                    // continues over the remaining files.
                    log::error!("{rel_path}: cannot read file, skipped: {e}");
                    Vec::new()
                }
            }
        })
        .collect();

    log::debug!(
        "analyzed {} files, {} raw findings",
        paths.len(),
        findings.len()
    );

    Ok(build_report(
        findings,
        &profile.justifications,
        profile.justification_aware,
        &profile.risk_weights,
    ))
}

fn analyze_source(file: SourceFile, analyzers: &[Box<dyn Analyzer>]) -> Vec<Finding> {
    analyzers
        .iter()
        .flat_map(|analyzer| {
            let findings = analyzer.analyze(&file);
            if !findings.is_empty() {
                log::debug!(
                    "{}: {} findings from {}",
                    file.rel_path,
                    findings.len(),
                    analyzer.name()
                );
            }
            findings
        })
        .collect()
}
