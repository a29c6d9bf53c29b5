use crate::analyzers::Analyzer;
use crate::config::CohesionThresholds;
use crate::core::parsing::SourceFile;
use crate::core::{Category, Finding, Layer, Severity};
use rustpython_parser::ast::Stmt;

/// Audited layers for the monolith file-size check.
const SIZE_AUDITED_LAYERS: [Layer; 2] = [Layer::Application, Layer::Presentation];

/// Cohesion checks: public type concentration per file, public surface per
/// type, and monolithic file size. The file-size check is text-based so it
/// survives a failed parse.
pub struct CohesionAnalyzer {
    thresholds: CohesionThresholds,
}

impl CohesionAnalyzer {
    pub fn new(thresholds: CohesionThresholds) -> Self {
        Self { thresholds }
    }

    fn class_concentration(&self, file: &SourceFile) -> Option<Finding> {
        let parsed = file.parse.as_ref()?;
        let count = parsed
            .body
            .iter()
            .filter(|stmt| matches!(stmt, Stmt::ClassDef(def) if !def.name.as_str().starts_with("_")))
            .count();

        let t = &self.thresholds;
        let severity = if t.blocking_classes.is_some_and(|b| count > b) {
            Severity::Alto
        } else if count > t.max_classes {
            Severity::Medio
        } else if count >= t.suspicious_classes {
            Severity::Bajo
        } else {
            return None;
        };

        Some(Finding::new(
            severity,
            Category::Cohesion,
            "Archivo con demasiadas clases publicas",
            file.rel_path.clone(),
            1,
            format!(
                "{} clases publicas a nivel de modulo (limite {})",
                count, t.max_classes
            ),
        ))
    }

    fn public_surface(&self, file: &SourceFile) -> Vec<Finding> {
        let Some(parsed) = &file.parse else {
            return Vec::new();
        };

        parsed
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::ClassDef(def) => Some(def),
                _ => None,
            })
            .filter_map(|class| {
                let count = count_public_methods(&class.body);
                if count <= self.thresholds.max_public_methods {
                    return None;
                }
                Some(Finding::new(
                    Severity::Medio,
                    Category::Cohesion,
                    "Clase con demasiados metodos publicos",
                    file.rel_path.clone(),
                    parsed.line_at(class.range.start().into()),
                    format!(
                        "clase '{}': {} metodos publicos (limite {})",
                        class.name, count, self.thresholds.max_public_methods
                    ),
                ))
            })
            .collect()
    }

    fn file_size(&self, file: &SourceFile) -> Option<Finding> {
        let layer = file.layer?;
        if !SIZE_AUDITED_LAYERS.contains(&layer) {
            return None;
        }

        let t = &self.thresholds;
        let count = file.line_count();
        if count >= t.monolith_hard_lines && t.monolith_hard_layers.contains(&layer) {
            return Some(Finding::new(
                Severity::Alto,
                Category::Monolith,
                "Archivo monolitico",
                file.rel_path.clone(),
                1,
                format!("{} lineas (limite bloqueante {})", count, t.monolith_hard_lines),
            ));
        }
        if count >= t.monolith_soft_lines {
            return Some(Finding::new(
                Severity::Medio,
                Category::Monolith,
                "Archivo monolitico",
                file.rel_path.clone(),
                1,
                format!("{} lineas (limite {})", count, t.monolith_soft_lines),
            ));
        }
        None
    }
}

impl Analyzer for CohesionAnalyzer {
    fn name(&self) -> &'static str {
        "cohesion"
    }

    fn analyze(&self, file: &SourceFile) -> Vec<Finding> {
        let mut findings = Vec::new();
        findings.extend(self.class_concentration(file));
        findings.extend(self.public_surface(file));
        findings.extend(self.file_size(file));
        findings
    }
}

fn count_public_methods(body: &[Stmt]) -> usize {
    body.iter()
        .filter(|stmt| match stmt {
            Stmt::FunctionDef(def) => !def.name.as_str().starts_with("_"),
            Stmt::AsyncFunctionDef(def) => !def.name.as_str().starts_with("_"),
            _ => false,
        })
        .count()
}
