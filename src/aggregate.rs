//! Finding classification tail: justification, ordering, deduplication
//! and the aggregate risk score.

use crate::config::{JustificationTable, RiskWeights};
use crate::core::{AuditReport, Finding, Severity, Summary};

/// Replace findings whose `(rule, file, line)` key is in the table with
/// their justified counterpart. Justified findings stay visible in the
/// report; consumers exclude them from gating.
pub fn apply_justifications(findings: Vec<Finding>, table: &JustificationTable) -> Vec<Finding> {
    if table.is_empty() {
        return findings;
    }
    let index = table.index();
    findings
        .into_iter()
        .map(|finding| match index.get(&finding.key()) {
            Some(reason) => finding.with_justification(reason),
            None => finding,
        })
        .collect()
}

/// Sort by (severity rank, file, line), ALTO first, and collapse
/// duplicates of the suppression key `(rule, file, line)`, keeping the
/// first occurrence. The sort is stable, so equal keys keep their
/// analyzer order.
pub fn sort_and_dedup(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by(|a, b| {
        (&a.file, a.line, &a.rule, a.severity).cmp(&(&b.file, b.line, &b.rule, b.severity))
    });
    findings.dedup_by(|b, a| a.key() == b.key());
    findings.sort_by(|a, b| {
        (a.severity, &a.file, a.line).cmp(&(b.severity, &b.file, b.line))
    });
    findings
}

/// Severity counts plus the bounded risk score.
pub fn summarize(findings: &[Finding], weights: &RiskWeights) -> Summary {
    let alto = count(findings, Severity::Alto);
    let medio = count(findings, Severity::Medio);
    let bajo = count(findings, Severity::Bajo);
    let alto_unjustified = findings
        .iter()
        .filter(|f| f.severity == Severity::Alto && !f.justified)
        .count();

    Summary {
        total: findings.len(),
        alto,
        medio,
        bajo,
        alto_unjustified,
        risk: risk_score(alto_unjustified, medio, bajo, weights),
    }
}

/// Assemble the final report from raw analyzer output.
pub fn build_report(
    findings: Vec<Finding>,
    table: &JustificationTable,
    justification_aware: bool,
    weights: &RiskWeights,
) -> AuditReport {
    let findings = if justification_aware {
        apply_justifications(findings, table)
    } else {
        findings
    };
    let findings = sort_and_dedup(findings);
    let summary = summarize(&findings, weights);
    AuditReport { findings, summary }
}

fn count(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

/// `clamp(0, 10, round(10 - alto*|ALTO sin justificar| - medio*|MEDIO|
/// - bajo*|BAJO|, 2))`. A coarse regression-gate signal, not a calibrated
/// quality metric: ALTO findings dominate, MEDIO/BAJO contribute a mild
/// decay.
pub fn risk_score(
    alto_unjustified: usize,
    medio: usize,
    bajo: usize,
    weights: &RiskWeights,
) -> f64 {
    let raw = 10.0
        - weights.alto * alto_unjustified as f64
        - weights.medio * medio as f64
        - weights.bajo * bajo as f64;
    let rounded = (raw * 100.0).round() / 100.0;
    rounded.clamp(0.0, 10.0)
}
