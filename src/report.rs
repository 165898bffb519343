use std::path::{Path, PathBuf};

use console::style;
use humansize::{format_size, DECIMAL};
use serde::Serialize;

/// What happened to one file during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Copied,
    /// Would have been copied, but the run was a preview
    Previewed,
    /// Duplicate of a file that was (or would be) copied
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOperation {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub kind: OperationKind,
    pub bytes: u64,
    pub error: Option<String>,
}

/// Outcome of a deduplicate or organize run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub operations: Vec<FileOperation>,
    pub total_bytes_copied: u64,
    pub preview: bool,
}

impl RunReport {
    pub fn new(preview: bool) -> Self {
        Self {
            operations: Vec::new(),
            total_bytes_copied: 0,
            preview,
        }
    }

    pub fn add_operation(&mut self, operation: FileOperation) {
        if operation.kind == OperationKind::Copied {
            self.total_bytes_copied += operation.bytes;
        }
        self.operations.push(operation);
    }

    pub fn record_copy(&mut self, source: &Path, destination: &Path, bytes: u64) {
        let kind = if self.preview {
            OperationKind::Previewed
        } else {
            OperationKind::Copied
        };
        self.add_operation(FileOperation {
            source: source.to_path_buf(),
            destination: Some(destination.to_path_buf()),
            kind,
            bytes,
            error: None,
        });
    }

    pub fn record_skip(&mut self, source: &Path) {
        self.add_operation(FileOperation {
            source: source.to_path_buf(),
            destination: None,
            kind: OperationKind::Skipped,
            bytes: 0,
            error: None,
        });
    }

    pub fn record_failure(&mut self, source: &Path, destination: &Path, error: String) {
        self.add_operation(FileOperation {
            source: source.to_path_buf(),
            destination: Some(destination.to_path_buf()),
            kind: OperationKind::Failed,
            bytes: 0,
            error: Some(error),
        });
    }

    /// Fold another report (e.g. from a second input directory) into this one.
    pub fn merge(&mut self, other: RunReport) {
        for operation in other.operations {
            self.add_operation(operation);
        }
    }

    fn count(&self, kind: OperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind == kind).count()
    }

    pub fn copied_count(&self) -> usize {
        self.count(OperationKind::Copied)
    }

    pub fn previewed_count(&self) -> usize {
        self.count(OperationKind::Previewed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(OperationKind::Skipped)
    }

    pub fn failed_count(&self) -> usize {
        self.count(OperationKind::Failed)
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", style("📊 Run Summary").green().bold());
        println!("{}", style("-".repeat(20)).green());
        if self.preview {
            println!("Files that would be copied: {}", self.previewed_count());
        } else {
            println!("Files copied: {}", self.copied_count());
            println!("Bytes copied: {}", format_size(self.total_bytes_copied, DECIMAL));
        }
        println!("Duplicates skipped: {}", self.skipped_count());
        println!("Failed operations: {}", self.failed_count());

        if self.failed_count() > 0 {
            println!();
            println!("{}", style("❌ Errors:").red().bold());
            for op in self.operations.iter().filter(|op| op.kind == OperationKind::Failed) {
                if let Some(error) = &op.error {
                    println!("  {}: {}", op.source.display(), error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_bytes() {
        let mut report = RunReport::new(false);
        report.record_copy(Path::new("a"), Path::new("out/a"), 10);
        report.record_copy(Path::new("b"), Path::new("out/b"), 5);
        report.record_skip(Path::new("c"));
        report.record_failure(Path::new("d"), Path::new("out/d"), "boom".to_string());

        assert_eq!(report.copied_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.total_bytes_copied, 15);
    }

    #[test]
    fn test_preview_copies_are_not_counted_as_bytes() {
        let mut report = RunReport::new(true);
        report.record_copy(Path::new("a"), Path::new("out/a"), 10);

        assert_eq!(report.copied_count(), 0);
        assert_eq!(report.previewed_count(), 1);
        assert_eq!(report.total_bytes_copied, 0);
    }

    #[test]
    fn test_merge_and_serialize() {
        let mut first = RunReport::new(false);
        first.record_copy(Path::new("a"), Path::new("out/a"), 3);
        let mut second = RunReport::new(false);
        second.record_copy(Path::new("b"), Path::new("out/b"), 4);

        first.merge(second);
        assert_eq!(first.total_bytes_copied, 7);

        let json = serde_json::to_value(&first).unwrap();
        assert_eq!(json["operations"][1]["kind"], "copied");
        assert_eq!(json["total_bytes_copied"], 7);
    }
}
