use crate::analyzers::Analyzer;
use crate::config::LayerRule;
use crate::core::parsing::SourceFile;
use crate::core::{Category, Finding, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*import\s+(.+)$").expect("invalid import regex"));
static FROM_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*from\s+([A-Za-z_][A-Za-z0-9_.]*)\s+import\b").expect("invalid from regex")
});

/// Detects import statements that cross the directed layer-dependency
/// graph. Line-pattern based: it sees both `import modulo` and
/// `from modulo import nombre` forms, and keeps working on files whose
/// tree failed to build.
pub struct LayeringAnalyzer {
    rules: Vec<LayerRule>,
}

impl LayeringAnalyzer {
    pub fn new(rules: Vec<LayerRule>) -> Self {
        Self { rules }
    }

    fn violated_rules(&self, file: &SourceFile, modules: &[String]) -> Vec<&LayerRule> {
        let Some(layer) = file.layer else {
            return Vec::new();
        };
        self.rules
            .iter()
            .filter(|rule| rule.source == layer)
            .filter(|rule| {
                !rule
                    .exempt_source_prefixes
                    .iter()
                    .any(|prefix| file.rel_path.starts_with(&format!("{prefix}/")))
            })
            .filter(|rule| {
                modules
                    .iter()
                    .any(|module| leading_segment(module) == rule.forbidden.segment())
            })
            .collect()
    }
}

impl Analyzer for LayeringAnalyzer {
    fn name(&self) -> &'static str {
        "layering"
    }

    fn analyze(&self, file: &SourceFile) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (idx, line) in file.text.lines().enumerate() {
            let modules = imported_modules(line);
            if modules.is_empty() {
                continue;
            }
            for rule in self.violated_rules(file, &modules) {
                findings.push(Finding::new(
                    Severity::Alto,
                    Category::Coupling,
                    rule.rule_id(),
                    file.rel_path.clone(),
                    idx + 1,
                    line.trim(),
                ));
            }
        }

        findings
    }
}

/// Module paths named by an import line, empty when the line is not an
/// import. Aliases are dropped; relative imports (`from . import x`) have
/// no leading package and are ignored.
fn imported_modules(line: &str) -> Vec<String> {
    if let Some(caps) = FROM_IMPORT_RE.captures(line) {
        return vec![caps[1].to_string()];
    }
    if let Some(caps) = IMPORT_RE.captures(line) {
        return caps[1]
            .split(',')
            .map(|part| part.trim())
            .map(|part| part.split_whitespace().next().unwrap_or(""))
            .filter(|module| !module.is_empty())
            .map(|module| module.to_string())
            .collect();
    }
    Vec::new()
}

fn leading_segment(module: &str) -> &str {
    module.split('.').next().unwrap_or(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditProfile;

    fn analyze(rel_path: &str, source: &str) -> Vec<Finding> {
        let analyzer = LayeringAnalyzer::new(AuditProfile::strict().layer_rules);
        let file = SourceFile::from_text(rel_path.to_string(), source.to_string());
        analyzer.analyze(&file)
    }

    #[test]
    fn application_importing_infrastructure_is_alto() {
        let findings = analyze(
            "aplicacion/servicio.py",
            "import os\n\nfrom infraestructura.db import Conn\n",
        );
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.severity, Severity::Alto);
        assert_eq!(finding.rule, "Import prohibido aplicacion->infraestructura");
        assert_eq!(finding.line, 3);
        assert_eq!(finding.detail, "from infraestructura.db import Conn");
    }

    #[test]
    fn plain_import_form_is_detected() {
        let findings = analyze("presentacion/vista.py", "import dominio.pedidos as pedidos\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "Import prohibido presentacion->dominio");
    }

    #[test]
    fn domain_must_not_import_outward() {
        let findings = analyze(
            "dominio/pedido.py",
            "from aplicacion.casos import Caso\nimport infraestructura.db\n",
        );
        let rules: Vec<&str> = findings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec![
                "Import prohibido dominio->aplicacion",
                "Import prohibido dominio->infraestructura"
            ]
        );
    }

    #[test]
    fn bootstrap_namespace_may_wire_infrastructure() {
        let findings = analyze(
            "presentacion/arranque/wiring.py",
            "from infraestructura.db import Conn\n",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn same_layer_and_stdlib_imports_pass() {
        let findings = analyze(
            "aplicacion/casos.py",
            "import json\nfrom aplicacion.dto import Dto\nfrom dominio.pedido import Pedido\n",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn unparseable_file_still_reports_imports() {
        let source = "from infraestructura.db import Conn\ndef broken(:\n";
        let file = SourceFile::from_text("aplicacion/s.py".to_string(), source.to_string());
        assert!(file.parse.is_none());
        let analyzer = LayeringAnalyzer::new(AuditProfile::strict().layer_rules);
        assert_eq!(analyzer.analyze(&file).len(), 1);
    }
}
