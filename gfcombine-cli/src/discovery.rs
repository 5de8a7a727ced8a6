//! HTML file discovery for the `rewrite` command.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

/// Recursive filesystem walker that collects HTML documents.
#[derive(Debug, Clone)]
pub struct HtmlDiscovery {
    roots: Vec<PathBuf>,
    follow_symlinks: bool,
}

impl HtmlDiscovery {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots.into_iter().map(Into::into).collect();
        Self {
            roots,
            follow_symlinks: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Files named directly are always kept; directories contribute their
    /// `.html`/`.htm` files. Results are sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.exists() {
                return Err(anyhow!("root path does not exist: {}", root.display()));
            }

            if root.is_file() {
                found.push(root.clone());
                continue;
            }

            for entry in WalkDir::new(root).follow_links(self.follow_symlinks) {
                let entry = entry?;
                if entry.file_type().is_file() && is_html(entry.path()) {
                    found.push(entry.path().to_path_buf());
                }
            }
        }

        found.sort();
        found.dedup();
        Ok(found)
    }
}

fn is_html(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return false,
    };

    matches!(ext.as_str(), "html" | "htm")
}
