use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::fs_ops::{self, FileOps};
use crate::index::ChecksumIndex;
use crate::logger::{self, Logger};
use crate::report::RunReport;
use crate::utils::relative_to_root;
use crate::FileRecord;

/// Copies one representative per digest bucket into an output tree,
/// keeping each file's path relative to its input directory.
pub struct Deduplicator {
    output_dir: PathBuf,
    ops: Box<dyn FileOps>,
    logger: Arc<dyn Logger>,
}

impl Deduplicator {
    pub fn new(output_dir: impl Into<PathBuf>, preview: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            ops: fs_ops::for_mode(preview),
            logger: logger::noop(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_file_ops(mut self, ops: Box<dyn FileOps>) -> Self {
        self.ops = ops;
        self
    }

    /// Copy the first file of every bucket; log and skip the rest.
    ///
    /// Copy and mkdir failures are recorded and do not stop the run. A file
    /// that does not sit under its own input root is an error.
    pub fn deduplicate(&self, index: &ChecksumIndex) -> Result<RunReport> {
        let mut report = RunReport::new(self.ops.is_dry_run());
        if self.ops.is_dry_run() {
            self.logger.info("Running in preview mode");
        }

        for (_, files) in index.iter() {
            let Some((representative, duplicates)) = files.split_first() else {
                continue;
            };

            for skipped in duplicates {
                self.logger
                    .info(&format!("Skipping file: {}", skipped.path.display()));
                report.record_skip(&skipped.path);
            }

            let destination = self.destination_for(representative)?;
            self.copy_representative(&representative.path, &destination, &mut report);
        }

        Ok(report)
    }

    /// Where `file` lands in the output tree.
    pub fn destination_for(&self, file: &FileRecord) -> Result<PathBuf> {
        Ok(self.output_dir.join(relative_to_root(&file.path, &file.root)?))
    }

    fn copy_representative(&self, source: &Path, destination: &Path, report: &mut RunReport) {
        if let Some(parent) = destination.parent() {
            if let Err(e) = self.ops.create_dir_all(parent) {
                self.logger.error(&format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ));
                report.record_failure(source, destination, e.to_string());
                return;
            }
        }

        self.logger.info(&format!(
            "Copying src:dest {} : {}",
            source.display(),
            destination.display()
        ));
        match self.ops.copy_file(source, destination) {
            Ok(bytes) => report.record_copy(source, destination, bytes),
            Err(e) => {
                self.logger.error(&format!(
                    "Failed to copy: {} to {}: {}",
                    source.display(),
                    destination.display(),
                    e
                ));
                report.record_failure(source, destination, e.to_string());
            }
        }
    }
}
