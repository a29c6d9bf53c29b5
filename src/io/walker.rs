use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates analyzable source files under a root.
///
/// Excluded directory names are pruned wherever they appear in the path;
/// only the audit extension is kept. The walk is sorted so the result is
/// deterministic, and an empty result is a valid outcome, not an error.
pub struct SourceWalker {
    root: PathBuf,
    excluded_dirs: Vec<String>,
}

const SOURCE_EXTENSION: &str = "py";

impl SourceWalker {
    pub fn new(root: PathBuf, excluded_dirs: Vec<String>) -> Self {
        Self {
            root,
            excluded_dirs,
        }
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            anyhow::bail!("audit root {} is not a directory", self.root.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry.path(), entry.file_type().is_dir()));

        for entry in walker {
            let entry = entry
                .with_context(|| format!("cannot enumerate {}", self.root.display()))?;
            if entry.file_type().is_file() && has_source_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn is_excluded_dir(&self, path: &Path, is_dir: bool) -> bool {
        if !is_dir || path == self.root {
            return false;
        }
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.excluded_dirs.iter().any(|d| d == name))
            .unwrap_or(false)
    }
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == SOURCE_EXTENSION)
        .unwrap_or(false)
}

/// Forward-slash path relative to the analyzed root.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
