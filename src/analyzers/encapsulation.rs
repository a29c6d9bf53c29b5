use crate::analyzers::Analyzer;
use crate::core::parsing::SourceFile;
use crate::core::{Category, Finding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

/// Two privately-named member accesses chained in one expression, e.g.
/// `pedido._repo._conn`. Line-pattern matching keeps this check alive on
/// files whose tree failed to build.
static CHAINED_PRIVATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\._\w+\._\w+").expect("invalid chained-access regex"));

const RULE: &str = "Acceso encadenado a miembros privados";

pub struct EncapsulationAnalyzer;

impl EncapsulationAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EncapsulationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for EncapsulationAnalyzer {
    fn name(&self) -> &'static str {
        "encapsulation"
    }

    fn analyze(&self, file: &SourceFile) -> Vec<Finding> {
        file.text
            .lines()
            .enumerate()
            .filter(|(_, line)| CHAINED_PRIVATE_RE.is_match(line))
            .map(|(idx, line)| {
                Finding::new(
                    Severity::Alto,
                    Category::Coupling,
                    RULE,
                    file.rel_path.clone(),
                    idx + 1,
                    line.trim(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> Vec<Finding> {
        let file = SourceFile::from_text("aplicacion/s.py".to_string(), source.to_string());
        EncapsulationAnalyzer::new().analyze(&file)
    }

    #[test]
    fn chained_private_access_is_flagged() {
        let findings = analyze("total = pedido._repo._conn.cursor()\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Alto);
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn single_private_access_passes() {
        assert!(analyze("total = pedido._total\n").is_empty());
    }

    #[test]
    fn interrupted_chain_passes() {
        assert!(analyze("total = pedido._repo().conn._abrir()\n").is_empty());
    }

    #[test]
    fn same_line_duplicates_collapse_to_one_finding() {
        let findings = analyze("x = a._b._c + d._e._f\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn each_line_reports_independently() {
        let findings = analyze("x = a._b._c\ny = d._e._f\n");
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[1].line, 2);
    }
}
