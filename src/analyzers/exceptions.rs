use crate::analyzers::Analyzer;
use crate::config::EntrypointPredicate;
use crate::core::parsing::SourceFile;
use crate::core::{Category, Finding, Layer, Severity};
use rustpython_parser::ast::{self, Expr, Stmt};

const RULE: &str = "Except demasiado generico";

/// Detects `except` handlers that catch the broadest exception category:
/// bare clauses, `Exception`, or `BaseException`, directly or in a tuple.
///
/// Entrypoint files are skipped entirely: a top-level bootstrap
/// legitimately needs a last-resort catch-all. Broad catches in the
/// application layer mask domain failures, so they escalate to ALTO.
pub struct ExceptionBreadthAnalyzer {
    entrypoints: EntrypointPredicate,
}

impl ExceptionBreadthAnalyzer {
    pub fn new(entrypoints: EntrypointPredicate) -> Self {
        Self { entrypoints }
    }
}

impl Analyzer for ExceptionBreadthAnalyzer {
    fn name(&self) -> &'static str {
        "exception-breadth"
    }

    fn analyze(&self, file: &SourceFile) -> Vec<Finding> {
        if self.entrypoints.matches(&file.rel_path) {
            return Vec::new();
        }
        let Some(parsed) = &file.parse else {
            return Vec::new();
        };

        let severity = if file.layer == Some(Layer::Application) {
            Severity::Alto
        } else {
            Severity::Medio
        };

        let mut findings = Vec::new();
        walk_statements(&parsed.body, &mut |stmt| {
            let handlers = match stmt {
                Stmt::Try(s) => &s.handlers,
                Stmt::TryStar(s) => &s.handlers,
                _ => return,
            };
            for handler in handlers {
                let ast::ExceptHandler::ExceptHandler(h) = handler;
                if !is_broad_clause(h.type_.as_deref()) {
                    continue;
                }
                findings.push(Finding::new(
                    severity,
                    Category::ErrorHandling,
                    RULE,
                    file.rel_path.clone(),
                    parsed.line_at(h.range.start().into()),
                    describe_clause(h.type_.as_deref()),
                ));
            }
        });
        findings
    }
}

/// Depth-first walk over every statement in the module, nested bodies
/// included.
fn walk_statements(stmts: &[Stmt], visit: &mut impl FnMut(&Stmt)) {
    for stmt in stmts {
        visit(stmt);
        for body in child_bodies(stmt) {
            walk_statements(body, visit);
        }
    }
}

fn child_bodies(stmt: &Stmt) -> Vec<&[Stmt]> {
    match stmt {
        Stmt::FunctionDef(s) => vec![&s.body[..]],
        Stmt::AsyncFunctionDef(s) => vec![&s.body[..]],
        Stmt::ClassDef(s) => vec![&s.body[..]],
        Stmt::If(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::While(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::For(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::AsyncFor(s) => vec![&s.body[..], &s.orelse[..]],
        Stmt::With(s) => vec![&s.body[..]],
        Stmt::AsyncWith(s) => vec![&s.body[..]],
        Stmt::Try(s) => try_child_bodies(&s.body, &s.handlers, &s.orelse, &s.finalbody),
        Stmt::TryStar(s) => try_child_bodies(&s.body, &s.handlers, &s.orelse, &s.finalbody),
        Stmt::Match(s) => s.cases.iter().map(|case| &case.body[..]).collect(),
        _ => Vec::new(),
    }
}

fn try_child_bodies<'a>(
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

fn is_broad_clause(clause: Option<&Expr>) -> bool {
    match clause {
        None => true,
        Some(Expr::Name(name)) => is_broad_name(name.id.as_str()),
        Some(Expr::Tuple(tuple)) => tuple.elts.iter().any(|elt| match elt {
            Expr::Name(name) => is_broad_name(name.id.as_str()),
            _ => false,
        }),
        Some(_) => false,
    }
}

fn is_broad_name(name: &str) -> bool {
    name == "Exception" || name == "BaseException"
}

fn describe_clause(clause: Option<&Expr>) -> String {
    match clause {
        None => "except sin tipo".to_string(),
        Some(Expr::Name(name)) => format!("except {}", name.id.as_str()),
        _ => "except con categoria mas amplia".to_string(),
    }
}
