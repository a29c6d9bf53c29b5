pub mod cohesion;
pub mod complexity;
pub mod encapsulation;
pub mod exceptions;
pub mod layering;

use crate::config::AuditProfile;
use crate::core::parsing::SourceFile;
use crate::core::Finding;

pub use cohesion::CohesionAnalyzer;
pub use complexity::ComplexityAnalyzer;
pub use encapsulation::EncapsulationAnalyzer;
pub use exceptions::ExceptionBreadthAnalyzer;
pub use layering::LayeringAnalyzer;

/// One independent structural pass over a file.
///
/// Analyzers consume either the raw text or the parsed tree of a
/// `SourceFile` and emit findings already classified with severity,
/// category and rule. They hold only read-only configuration, so the
/// engine may run them across files in parallel.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;
    fn analyze(&self, file: &SourceFile) -> Vec<Finding>;
}

/// The full battery for a profile.
pub fn analyzer_set(profile: &AuditProfile) -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(LayeringAnalyzer::new(profile.layer_rules.clone())),
        Box::new(EncapsulationAnalyzer::new()),
        Box::new(ComplexityAnalyzer::new(profile.complexity.clone())),
        Box::new(CohesionAnalyzer::new(profile.cohesion.clone())),
        Box::new(ExceptionBreadthAnalyzer::new(profile.entrypoint_predicate())),
    ]
}
