pub mod parsing;

use serde::{Deserialize, Serialize};

/// Severity of a finding. The derived order (`Alto < Medio < Bajo`) is the
/// report order: ALTO findings sort first.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Alto,
    Medio,
    Bajo,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Severity, &str)] = &[
            (Severity::Alto, "ALTO"),
            (Severity::Medio, "MEDIO"),
            (Severity::Bajo, "BAJO"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(s, _)| s == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Coupling,
    Cohesion,
    Complexity,
    #[serde(rename = "Error-Handling")]
    ErrorHandling,
    Monolith,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Category, &str)] = &[
            (Category::Coupling, "Coupling"),
            (Category::Cohesion, "Cohesion"),
            (Category::Complexity, "Complexity"),
            (Category::ErrorHandling, "Error-Handling"),
            (Category::Monolith, "Monolith"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Architectural layer, inferred from a file's first path segment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Layer {
    #[serde(rename = "dominio")]
    Domain,
    #[serde(rename = "aplicacion")]
    Application,
    #[serde(rename = "infraestructura")]
    Infrastructure,
    #[serde(rename = "presentacion")]
    Presentation,
}

impl Layer {
    pub fn from_segment(segment: &str) -> Option<Self> {
        static SEGMENTS: &[(&str, Layer)] = &[
            ("dominio", Layer::Domain),
            ("aplicacion", Layer::Application),
            ("infraestructura", Layer::Infrastructure),
            ("presentacion", Layer::Presentation),
        ];

        SEGMENTS
            .iter()
            .find(|(name, _)| *name == segment)
            .map(|(_, layer)| *layer)
    }

    /// Classify a forward-slash relative path by its leading segment.
    pub fn from_rel_path(rel_path: &str) -> Option<Self> {
        rel_path.split('/').next().and_then(Self::from_segment)
    }

    /// The directory segment that names this layer in the audited tree.
    pub fn segment(&self) -> &'static str {
        match self {
            Layer::Domain => "dominio",
            Layer::Application => "aplicacion",
            Layer::Infrastructure => "infraestructura",
            Layer::Presentation => "presentacion",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segment())
    }
}

/// One reported structural issue. Immutable once classified: justification
/// replaces the finding rather than mutating it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Finding {
    #[serde(rename = "severidad")]
    pub severity: Severity,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "regla")]
    pub rule: String,
    #[serde(rename = "archivo")]
    pub file: String,
    #[serde(rename = "linea")]
    pub line: usize,
    #[serde(rename = "detalle")]
    pub detail: String,
    #[serde(rename = "justificado", default)]
    pub justified: bool,
}

impl Finding {
    pub fn new(
        severity: Severity,
        category: Category,
        rule: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            rule: rule.into(),
            file: file.into(),
            line,
            detail: detail.into(),
            justified: false,
        }
    }

    /// `(regla, archivo, linea)`: the deduplication and justification key.
    pub fn key(&self) -> (&str, &str, usize) {
        (&self.rule, &self.file, self.line)
    }

    /// Produce the justified replacement of this finding.
    pub fn with_justification(&self, reason: &str) -> Self {
        Self {
            justified: true,
            detail: format!("{} [Justificado: {}]", self.detail, reason),
            ..self.clone()
        }
    }
}

/// Severity counts and the bounded risk score.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub alto: usize,
    pub medio: usize,
    pub bajo: usize,
    #[serde(rename = "alto_sin_justificar")]
    pub alto_unjustified: usize,
    #[serde(rename = "riesgo_global")]
    pub risk: f64,
}

/// The single externally visible artifact of a run, published atomically
/// once every analyzer has completed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditReport {
    #[serde(rename = "hallazgos")]
    pub findings: Vec<Finding>,
    #[serde(rename = "resumen")]
    pub summary: Summary,
}
