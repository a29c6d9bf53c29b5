//! Python source parsing with partial degradation.
//!
//! A file that fails to parse is not an error for the run: the failure is
//! logged and the file is carried without a tree, so line-pattern analyzers
//! still see its text.

use crate::core::Layer;
use line_numbers::LinePositions;
use rustpython_parser::{ast, parse, Mode};

/// A parsed module body plus the offset-to-line index for its source text.
pub struct ParsedModule {
    pub body: ast::Suite,
    lines: LinePositions,
}

impl ParsedModule {
    /// 1-based line holding the byte at `offset`, for a node's range start.
    pub fn line_at(&self, offset: usize) -> usize {
        self.lines.from_offset(offset).as_usize() + 1
    }

    /// 1-based line holding the byte just before the exclusive `end` offset
    /// of a node's range.
    pub fn last_line_at(&self, end: usize) -> usize {
        self.lines.from_offset(end.saturating_sub(1)).as_usize() + 1
    }
}

/// One candidate source file as seen by the analyzer set.
pub struct SourceFile {
    /// Path relative to the analyzed root, forward-slash normalized.
    pub rel_path: String,
    pub layer: Option<Layer>,
    pub text: String,
    /// `None` when the file did not parse; tree-based analyzers skip it.
    pub parse: Option<ParsedModule>,
}

impl SourceFile {
    pub fn from_text(rel_path: String, text: String) -> Self {
        let layer = Layer::from_rel_path(&rel_path);
        let parse = parse_module(&text, &rel_path);
        Self {
            rel_path,
            layer,
            text,
            parse,
        }
    }

    /// Total source lines, used by the monolith check.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

fn parse_module(text: &str, rel_path: &str) -> Option<ParsedModule> {
    match parse(text, Mode::Module, rel_path) {
        Ok(ast::Mod::Module(module)) => Some(ParsedModule {
            body: module.body,
            lines: LinePositions::from(text),
        }),
        Ok(_) => None,
        Err(e) => {
            log::warn!("{rel_path}: parse failed, tree-based checks skipped: {e}");
            None
        }
    }
}
