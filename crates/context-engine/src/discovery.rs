use crate::error::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Optional, additive file-discovery collaborator (spec §1, §6: file-system
/// discovery is explicitly out of the core engine's scope). A caller may use
/// this to walk a directory `.gitignore`-aware and then feed each discovered
/// path's content into [`crate::ContextEngine::index_file`] itself — the
/// engine's public facade never calls this on its own.
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Walk `root`, `.gitignore`-aware, returning every regular file path
    /// found. Unreadable entries are logged and skipped rather than
    /// aborting the whole scan.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for result in WalkBuilder::new(&self.root).hidden(false).build() {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file()) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => log::warn!("failed to read directory entry: {e}"),
            }
        }

        log::info!("discovered {} files under {:?}", files.len(), self.root);
        Ok(files)
    }
}
