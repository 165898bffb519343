use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::logger::{self, Logger};
use crate::FileRecord;

/// Recursive walker over one or more input directories
pub struct Scanner {
    logger: Arc<dyn Logger>,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            logger: logger::noop(),
        }
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Lazily yield every regular file under `roots`, root by root.
    ///
    /// All roots are checked before anything is yielded: a missing or
    /// unreadable root fails the call. Entries that go bad mid-walk are
    /// logged and skipped. Within a root, entries come in file-name order.
    pub fn walk<'a>(&'a self, roots: &[PathBuf]) -> Result<impl Iterator<Item = FileRecord> + 'a> {
        let roots = roots
            .iter()
            .map(|root| open_root(root))
            .collect::<Result<Vec<_>>>()?;

        Ok(roots.into_iter().flat_map(move |root| self.walk_root(root)))
    }

    fn walk_root(&self, root: PathBuf) -> impl Iterator<Item = FileRecord> + '_ {
        self.logger
            .info(&format!("Iterating over files in directory: {}", root.display()));

        WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => self.to_record(&root, entry),
                Err(e) => {
                    self.logger.warn(&format!("Skipping unreadable entry: {}", e));
                    None
                }
            })
    }

    fn to_record(&self, root: &Path, entry: DirEntry) -> Option<FileRecord> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            self.logger
                .debug(&format!("Skipped because it is a directory: {}", entry.path().display()));
            return None;
        }
        if !file_type.is_file() {
            self.logger
                .debug(&format!("Skipped because it is not a regular file: {}", entry.path().display()));
            return None;
        }

        let modified = match modified_seconds(&entry) {
            Ok(seconds) => seconds,
            Err(e) => {
                self.logger.warn(&format!(
                    "Skipping {}: cannot read metadata: {}",
                    entry.path().display(),
                    e
                ));
                return None;
            }
        };

        Some(FileRecord {
            path: entry.into_path(),
            root: root.to_path_buf(),
            modified,
        })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Last-modified time as whole UTC epoch seconds.
fn modified_seconds(entry: &DirEntry) -> std::result::Result<i64, String> {
    let metadata = entry.metadata().map_err(|e| e.to_string())?;
    let modified = metadata.modified().map_err(|e| e.to_string())?;
    Ok(DateTime::<Utc>::from(modified).timestamp())
}

/// Resolve a configured input directory to an absolute, readable directory.
fn open_root(root: &Path) -> Result<PathBuf> {
    let canonical = root.canonicalize().map_err(|source| Error::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    if !canonical.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    fs::read_dir(&canonical).map_err(|source| Error::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(canonical)
}
