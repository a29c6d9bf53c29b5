use crate::analyzers::Analyzer;
use crate::config::{ComplexityMode, ComplexityThresholds};
use crate::core::parsing::{ParsedModule, SourceFile};
use crate::core::{Category, Finding, Severity};
use rustpython_parser::ast::{self, Stmt};

/// Per-function size, branching and exit metrics with a composite score.
///
/// Every function or method found anywhere in the tree is scored by a
/// fresh counting pass rooted at that function: branch and return nodes
/// inside nested function bodies count toward the inner function only.
/// No single metric reliably identifies an overloaded function, so the
/// composite score keeps three escape hatches (long-but-simple,
/// short-but-tangled, too many exits).
pub struct ComplexityAnalyzer {
    thresholds: ComplexityThresholds,
}

struct FunctionMeasure {
    name: String,
    line: usize,
    lines: usize,
    branches: usize,
    returns: usize,
}

impl FunctionMeasure {
    fn score(&self) -> usize {
        self.lines / 6 + self.branches * 2 + self.returns
    }
}

impl ComplexityAnalyzer {
    pub fn new(thresholds: ComplexityThresholds) -> Self {
        Self { thresholds }
    }

    fn judge_composite(&self, m: &FunctionMeasure, file: &SourceFile) -> Option<Finding> {
        let t = &self.thresholds;
        let score = m.score();
        let over = m.lines >= t.max_lines
            || m.branches >= t.max_branches
            || m.returns >= t.max_returns
            || score >= t.max_score;
        if !over {
            return None;
        }
        let severity = if score >= t.max_score + t.alto_margin {
            Severity::Alto
        } else {
            Severity::Medio
        };
        Some(Finding::new(
            severity,
            Category::Complexity,
            "Funcion sobrecargada",
            file.rel_path.clone(),
            m.line,
            format!(
                "funcion '{}': {} lineas, {} ramas, {} retornos (puntaje {}, limite {})",
                m.name, m.lines, m.branches, m.returns, score, t.max_score
            ),
        ))
    }

    fn judge_simple(&self, m: &FunctionMeasure, file: &SourceFile) -> Vec<Finding> {
        let t = &self.thresholds;
        let mut findings = Vec::new();
        if m.lines > t.simple_max_lines {
            findings.push(Finding::new(
                Severity::Medio,
                Category::Complexity,
                "Funcion larga",
                file.rel_path.clone(),
                m.line,
                format!(
                    "funcion '{}': {} lineas (limite {})",
                    m.name, m.lines, t.simple_max_lines
                ),
            ));
        }
        if m.branches > t.simple_max_branches {
            let severity = if m.branches > t.simple_alto_branches {
                Severity::Alto
            } else {
                Severity::Medio
            };
            findings.push(Finding::new(
                severity,
                Category::Complexity,
                "Funcion ramificada",
                file.rel_path.clone(),
                m.line,
                format!(
                    "funcion '{}': {} ramas (limite {})",
                    m.name, m.branches, t.simple_max_branches
                ),
            ));
        }
        findings
    }
}

impl Analyzer for ComplexityAnalyzer {
    fn name(&self) -> &'static str {
        "complexity"
    }

    fn analyze(&self, file: &SourceFile) -> Vec<Finding> {
        let Some(parsed) = &file.parse else {
            return Vec::new();
        };

        let mut functions = Vec::new();
        collect_functions(parsed, &parsed.body, &mut functions);

        functions
            .iter()
            .flat_map(|m| match self.thresholds.mode {
                ComplexityMode::Composite => {
                    self.judge_composite(m, file).into_iter().collect::<Vec<_>>()
                }
                ComplexityMode::Simple => self.judge_simple(m, file),
            })
            .collect()
    }
}

fn measure_function(name: &str, body: &[Stmt], start_line: usize, end_line: usize) -> FunctionMeasure {
    let mut branches = 0;
    let mut returns = 0;
    count_in_body(body, &mut branches, &mut returns);
    FunctionMeasure {
        name: name.to_string(),
        line: start_line,
        lines: end_line - start_line + 1,
        branches,
        returns,
    }
}

fn collect_functions(parsed: &ParsedModule, stmts: &[Stmt], out: &mut Vec<FunctionMeasure>) {
    for stmt in stmts {
        match stmt {
            Stmt::FunctionDef(def) => {
                let start = parsed.line_at(def.range.start().into());
                let end = parsed.last_line_at(def.range.end().into());
                out.push(measure_function(def.name.as_str(), &def.body, start, end));
                collect_functions(parsed, &def.body, out);
            }
            Stmt::AsyncFunctionDef(def) => {
                let start = parsed.line_at(def.range.start().into());
                let end = parsed.last_line_at(def.range.end().into());
                out.push(measure_function(def.name.as_str(), &def.body, start, end));
                collect_functions(parsed, &def.body, out);
            }
            Stmt::ClassDef(def) => collect_functions(parsed, &def.body, out),
            other => {
                for body in same_function_bodies(other) {
                    collect_functions(parsed, body, out);
                }
            }
        }
    }
}

/// Branch and return counters for one function body. Nested function
/// bodies are not entered: each function is scored independently.
fn count_in_body(body: &[Stmt], branches: &mut usize, returns: &mut usize) {
    for stmt in body {
        match stmt {
            Stmt::If(_)
            | Stmt::While(_)
            | Stmt::For(_)
            | Stmt::AsyncFor(_)
            | Stmt::Match(_)
            | Stmt::Try(_)
            | Stmt::TryStar(_) => *branches += 1,
            Stmt::Return(_) => *returns += 1,
            _ => {}
        }
        for child in same_function_bodies(stmt) {
            count_in_body(child, branches, returns);
        }
    }
}

/// Child statement lists that still belong to the enclosing function.
/// Nested function and class bodies are excluded.
fn same_function_bodies(stmt: &Stmt) -> Vec<&[Stmt]> {
    match stmt {
        Stmt::If(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::While(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::For(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::AsyncFor(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::With(s) => vec![&s.body[..]],
        Stmt::AsyncWith(s) => vec![&s.body[..]],
        Stmt::Try(s) => try_bodies(&s.body, &s.handlers, &s.orelse, &s.finalbody),
        Stmt::TryStar(s) => try_bodies(&s.body, &s.handlers, &s.orelse, &s.finalbody),
        Stmt::Match(s) => s.cases.iter().map(|case| &case.body[..]).collect(),
        _ => Vec::new(),
    }
}

fn try_bodies<'a>(
    body: &'a [Stmt],
    handlers: &'a [ast::ExceptHandler],
    orelse: &'a [Stmt],
    finalbody: &'a [Stmt],
) -> Vec<&'a [Stmt]> {
    let mut bodies = vec![body, orelse, finalbody];
    for handler in handlers {
        let ast::ExceptHandler::ExceptHandler(h) = handler;
        bodies.push(&h.body[..]);
    }
    bodies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditProfile;
    use indoc::indoc;

    fn analyze_with(thresholds: ComplexityThresholds, source: &str) -> Vec<Finding> {
        let file = SourceFile::from_text("aplicacion/s.py".to_string(), source.to_string());
        ComplexityAnalyzer::new(thresholds).analyze(&file)
    }

    fn tight() -> ComplexityThresholds {
        ComplexityThresholds {
            max_lines: 4,
            max_branches: 2,
            max_returns: 2,
            max_score: 100,
            ..AuditProfile::strict().complexity
        }
    }

    #[test]
    fn function_at_the_line_ceiling_is_flagged() {
        let source = indoc! {"
            def f():
                a = 1
                b = 2
                return a + b
        "};
        let findings = analyze_with(tight(), source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "Funcion sobrecargada");
        assert_eq!(findings[0].line, 1);
    }

    #[test]
    fn function_one_line_below_the_ceiling_passes() {
        let source = indoc! {"
            def f():
                a = 1
                return a
        "};
        assert!(analyze_with(tight(), source).is_empty());
    }

    #[test]
    fn branches_count_conditionals_loops_and_try() {
        let source = indoc! {"
            def f(x):
                if x:
                    pass
                for i in x:
                    pass
                try:
                    pass
                except ValueError:
                    pass
        "};
        let thresholds = ComplexityThresholds {
            max_lines: 100,
            max_branches: 3,
            max_returns: 100,
            max_score: 100,
            ..AuditProfile::strict().complexity
        };
        let findings = analyze_with(thresholds, source);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].detail.contains("3 ramas"));
    }

    #[test]
    fn nested_function_bodies_score_independently() {
        let source = indoc! {"
            def outer(x):
                def inner(y):
                    if y:
                        return 1
                    if not y:
                        return 2
                    return 3
                return inner(x)
        "};
        let thresholds = ComplexityThresholds {
            max_lines: 100,
            max_branches: 2,
            max_returns: 100,
            max_score: 100,
            ..AuditProfile::strict().complexity
        };
        let findings = analyze_with(thresholds, source);
        // Only `inner` reaches the branch ceiling; `outer` itself has none.
        assert_eq!(findings.len(), 1);
        assert!(findings[0].detail.contains("'inner'"));
    }

    #[test]
    fn seventy_line_nine_branch_function_scores_31_and_alto() {
        // 70 lines, 9 branch nodes, 2 returns: 70/6 + 9*2 + 2 = 31.
        let mut source = String::from("def f(x):\n");
        for _ in 0..8 {
            source.push_str("    if x:\n        x = x + 1\n");
        }
        source.push_str("    if x:\n        return 0\n");
        while source.lines().count() < 69 {
            source.push_str("    x = x + 1\n");
        }
        source.push_str("    return x\n");
        assert_eq!(source.lines().count(), 70);

        let findings = analyze_with(AuditProfile::strict().complexity, &source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Alto);
        assert!(findings[0].detail.contains("puntaje 31"));
    }

    #[test]
    fn simple_mode_raises_independent_size_and_branch_findings() {
        let mut source = String::from("def f(x):\n");
        for _ in 0..6 {
            source.push_str("    if x:\n        x = x + 1\n");
        }
        while source.lines().count() < 62 {
            source.push_str("    x = x + 1\n");
        }
        let mut thresholds = AuditProfile::baseline().complexity;
        thresholds.mode = ComplexityMode::Simple;
        let findings = analyze_with(thresholds, &source);
        let rules: Vec<&str> = findings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(rules, vec!["Funcion larga", "Funcion ramificada"]);
        assert!(findings.iter().all(|f| f.severity == Severity::Medio));
    }

    #[test]
    fn simple_mode_branch_finding_escalates_past_eight() {
        let mut source = String::from("def f(x):\n");
        for _ in 0..9 {
            source.push_str("    if x:\n        x = x + 1\n");
        }
        let mut thresholds = AuditProfile::baseline().complexity;
        thresholds.mode = ComplexityMode::Simple;
        let findings = analyze_with(thresholds, &source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Alto);
    }

    #[test]
    fn methods_inside_classes_are_measured() {
        let source = indoc! {"
            class Servicio:
                def ejecutar(self, x):
                    if x:
                        return 1
                    if not x:
                        return 2
                    return 3
        "};
        let thresholds = ComplexityThresholds {
            max_lines: 100,
            max_branches: 2,
            max_returns: 100,
            max_score: 100,
            ..AuditProfile::strict().complexity
        };
        let findings = analyze_with(thresholds, source);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].detail.contains("'ejecutar'"));
    }
}
