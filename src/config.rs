use crate::core::Layer;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Which complexity rule set is active. The two engine generations are one
/// analyzer parameterized by this mode.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityMode {
    /// Composite score with escape hatches for size, branching and exits.
    Composite,
    /// Independent size and branch findings, no composite score.
    Simple,
}

/// Function/method complexity ceilings. The composite score is
/// `lines / 6 + branches * 2 + returns`; the divisor and weights are policy
/// constants, not measured values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplexityThresholds {
    #[serde(default = "default_complexity_mode")]
    pub mode: ComplexityMode,
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default = "default_max_branches")]
    pub max_branches: usize,
    #[serde(default = "default_max_returns")]
    pub max_returns: usize,
    #[serde(default = "default_max_score")]
    pub max_score: usize,
    /// Margin over `max_score` at which a composite finding escalates to ALTO.
    #[serde(default = "default_alto_margin")]
    pub alto_margin: usize,
    #[serde(default = "default_simple_max_lines")]
    pub simple_max_lines: usize,
    #[serde(default = "default_simple_max_branches")]
    pub simple_max_branches: usize,
    #[serde(default = "default_simple_alto_branches")]
    pub simple_alto_branches: usize,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            mode: default_complexity_mode(),
            max_lines: default_max_lines(),
            max_branches: default_max_branches(),
            max_returns: default_max_returns(),
            max_score: default_max_score(),
            alto_margin: default_alto_margin(),
            simple_max_lines: default_simple_max_lines(),
            simple_max_branches: default_simple_max_branches(),
            simple_alto_branches: default_simple_alto_branches(),
        }
    }
}

fn default_complexity_mode() -> ComplexityMode {
    ComplexityMode::Composite
}
fn default_max_lines() -> usize {
    45
}
fn default_max_branches() -> usize {
    10
}
fn default_max_returns() -> usize {
    4
}
fn default_max_score() -> usize {
    24
}
fn default_alto_margin() -> usize {
    6
}
fn default_simple_max_lines() -> usize {
    60
}
fn default_simple_max_branches() -> usize {
    5
}
fn default_simple_alto_branches() -> usize {
    8
}

/// Cohesion ceilings: class concentration per file, public surface per
/// class, and monolith line counts for the audited layers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CohesionThresholds {
    #[serde(default = "default_suspicious_classes")]
    pub suspicious_classes: usize,
    #[serde(default = "default_max_classes")]
    pub max_classes: usize,
    /// Class count above which the finding escalates to ALTO. Absent in the
    /// baseline profile.
    #[serde(
        default = "default_blocking_classes",
        skip_serializing_if = "Option::is_none"
    )]
    pub blocking_classes: Option<usize>,
    #[serde(default = "default_max_public_methods")]
    pub max_public_methods: usize,
    #[serde(default = "default_monolith_soft_lines")]
    pub monolith_soft_lines: usize,
    #[serde(default = "default_monolith_hard_lines")]
    pub monolith_hard_lines: usize,
    /// Layers where the hard monolith ceiling blocks at ALTO.
    #[serde(default = "default_monolith_hard_layers")]
    pub monolith_hard_layers: Vec<Layer>,
}

impl Default for CohesionThresholds {
    fn default() -> Self {
        Self {
            suspicious_classes: default_suspicious_classes(),
            max_classes: default_max_classes(),
            blocking_classes: default_blocking_classes(),
            max_public_methods: default_max_public_methods(),
            monolith_soft_lines: default_monolith_soft_lines(),
            monolith_hard_lines: default_monolith_hard_lines(),
            monolith_hard_layers: default_monolith_hard_layers(),
        }
    }
}

fn default_suspicious_classes() -> usize {
    3
}
fn default_max_classes() -> usize {
    5
}
fn default_blocking_classes() -> Option<usize> {
    Some(8)
}
fn default_max_public_methods() -> usize {
    10
}
fn default_monolith_soft_lines() -> usize {
    250
}
fn default_monolith_hard_lines() -> usize {
    400
}
fn default_monolith_hard_layers() -> Vec<Layer> {
    vec![Layer::Presentation]
}

/// One directed import prohibition: `source` files must not import the
/// `forbidden` layer's top-level package. Files under an exempt prefix are
/// allowed through (composition roots).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerRule {
    pub source: Layer,
    pub forbidden: Layer,
    #[serde(default)]
    pub exempt_source_prefixes: Vec<String>,
}

impl LayerRule {
    pub fn new(source: Layer, forbidden: Layer) -> Self {
        Self {
            source,
            forbidden,
            exempt_source_prefixes: Vec::new(),
        }
    }

    pub fn with_exempt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exempt_source_prefixes.push(prefix.into());
        self
    }

    /// Stable rule identifier, e.g. `Import prohibido aplicacion->infraestructura`.
    pub fn rule_id(&self) -> String {
        format!(
            "Import prohibido {}->{}",
            self.source.segment(),
            self.forbidden.segment()
        )
    }
}

/// Decay weights of the risk formula
/// `10 - alto*|ALTO sin justificar| - medio*|MEDIO| - bajo*|BAJO|`.
/// Heuristic constants; changing them is a policy decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskWeights {
    #[serde(default = "default_risk_alto")]
    pub alto: f64,
    #[serde(default = "default_risk_medio")]
    pub medio: f64,
    #[serde(default = "default_risk_bajo")]
    pub bajo: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            alto: default_risk_alto(),
            medio: default_risk_medio(),
            bajo: default_risk_bajo(),
        }
    }
}

fn default_risk_alto() -> f64 {
    1.5
}
fn default_risk_medio() -> f64 {
    0.2
}
fn default_risk_bajo() -> f64 {
    0.05
}

/// One accepted finding, keyed by `(rule, file, line)`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JustificationEntry {
    pub rule: String,
    pub file: String,
    pub line: usize,
    pub reason: String,
}

/// Keyed allow-list of accepted findings, read-only for the run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JustificationTable {
    pub entries: Vec<JustificationEntry>,
}

impl JustificationTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the lookup map once; the resolver queries it per finding.
    pub fn index(&self) -> HashMap<(&str, &str, usize), &str> {
        self.entries
            .iter()
            .map(|e| ((e.rule.as_str(), e.file.as_str(), e.line), e.reason.as_str()))
            .collect()
    }
}

/// The whole read-only configuration of a run, fixed at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditProfile {
    /// Directory names excluded anywhere in the relative path.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
    /// File names treated as process entrypoints.
    #[serde(default = "default_entrypoint_names")]
    pub entrypoint_names: Vec<String>,
    /// Sub-namespace housing composition roots, exempt from the catch-all
    /// rule and from presentation->infrastructure wiring prohibitions.
    #[serde(default = "default_bootstrap_prefix")]
    pub bootstrap_prefix: String,
    /// When false the justification table is ignored (baseline generation).
    #[serde(default = "default_justification_aware")]
    pub justification_aware: bool,
    #[serde(default = "default_layer_rules")]
    pub layer_rules: Vec<LayerRule>,
    #[serde(default)]
    pub complexity: ComplexityThresholds,
    #[serde(default)]
    pub cohesion: CohesionThresholds,
    #[serde(default)]
    pub risk_weights: RiskWeights,
    #[serde(default)]
    pub justifications: JustificationTable,
}

impl Default for AuditProfile {
    fn default() -> Self {
        Self::strict()
    }
}

fn default_excluded_dirs() -> Vec<String> {
    [
        ".git", ".hg", ".svn", ".venv", "venv", "env", "__pycache__", ".mypy_cache",
        ".pytest_cache", ".ruff_cache", "tests", "test", "tools", "scripts", "herramientas",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_entrypoint_names() -> Vec<String> {
    vec!["main.py".to_string(), "__main__.py".to_string()]
}

fn default_bootstrap_prefix() -> String {
    "presentacion/arranque".to_string()
}

fn default_layer_rules() -> Vec<LayerRule> {
    vec![
        LayerRule::new(Layer::Presentation, Layer::Domain),
        LayerRule::new(Layer::Application, Layer::Infrastructure),
        LayerRule::new(Layer::Application, Layer::Presentation),
        LayerRule::new(Layer::Domain, Layer::Application),
        LayerRule::new(Layer::Domain, Layer::Infrastructure),
        LayerRule::new(Layer::Domain, Layer::Presentation),
        LayerRule::new(Layer::Presentation, Layer::Infrastructure)
            .with_exempt_prefix(default_bootstrap_prefix()),
    ]
}

fn default_justification_aware() -> bool {
    true
}

impl AuditProfile {
    /// The self-auditing generation: composite complexity, blocking
    /// ceilings, tooling directories excluded, justification-aware.
    pub fn strict() -> Self {
        Self {
            excluded_dirs: default_excluded_dirs(),
            entrypoint_names: default_entrypoint_names(),
            bootstrap_prefix: default_bootstrap_prefix(),
            justification_aware: default_justification_aware(),
            layer_rules: default_layer_rules(),
            complexity: ComplexityThresholds::default(),
            cohesion: CohesionThresholds::default(),
            risk_weights: RiskWeights::default(),
            justifications: JustificationTable::default(),
        }
    }

    /// The original generation: independent size/branch findings, no
    /// blocking ceilings, no justification mechanism, tooling included.
    pub fn baseline() -> Self {
        let mut profile = Self::strict();
        profile.complexity.mode = ComplexityMode::Simple;
        profile.cohesion.blocking_classes = None;
        profile.cohesion.monolith_hard_layers = Vec::new();
        profile.justification_aware = false;
        profile
            .excluded_dirs
            .retain(|d| !matches!(d.as_str(), "tools" | "scripts" | "herramientas"));
        profile
    }

    /// Load a full profile from a TOML file. Malformed input is fatal
    /// before any file is analyzed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Sanity-check ceilings and weights. Called before any analysis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.complexity;
        if c.max_lines == 0 || c.max_branches == 0 || c.max_returns == 0 || c.max_score == 0 {
            return Err(ConfigError::invalid("complexity ceilings must be positive"));
        }
        let h = &self.cohesion;
        if h.suspicious_classes > h.max_classes {
            return Err(ConfigError::invalid(
                "suspicious_classes must not exceed max_classes",
            ));
        }
        if let Some(blocking) = h.blocking_classes {
            if blocking < h.max_classes {
                return Err(ConfigError::invalid(
                    "blocking_classes must not be below max_classes",
                ));
            }
        }
        if h.monolith_soft_lines > h.monolith_hard_lines {
            return Err(ConfigError::invalid(
                "monolith_soft_lines must not exceed monolith_hard_lines",
            ));
        }
        let w = &self.risk_weights;
        if w.alto < 0.0 || w.medio < 0.0 || w.bajo < 0.0 {
            return Err(ConfigError::invalid("risk weights must be non-negative"));
        }
        Ok(())
    }

    pub fn entrypoint_predicate(&self) -> EntrypointPredicate {
        EntrypointPredicate {
            names: self.entrypoint_names.clone(),
            bootstrap_prefix: self.bootstrap_prefix.clone(),
        }
    }

    /// Entrypoint predicate: designated file names, or anything under the
    /// bootstrap sub-namespace. Path-convention based and configurable.
    pub fn is_entrypoint(&self, rel_path: &str) -> bool {
        self.entrypoint_predicate().matches(rel_path)
    }
}

/// Path-convention test for process entrypoints, which legitimately carry
/// a last-resort catch-all handler.
#[derive(Clone, Debug)]
pub struct EntrypointPredicate {
    names: Vec<String>,
    bootstrap_prefix: String,
}

impl EntrypointPredicate {
    pub fn matches(&self, rel_path: &str) -> bool {
        let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
        if self.names.iter().any(|n| n == name) {
            return true;
        }
        !self.bootstrap_prefix.is_empty()
            && rel_path.starts_with(&format!("{}/", self.bootstrap_prefix))
    }
}
