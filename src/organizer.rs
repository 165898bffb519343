use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::DateFormat;
use crate::date_path::{resolve_output_folder, DateSource};
use crate::error::{Error, Result};
use crate::fs_ops::{self, FileOps};
use crate::logger::{self, Logger};
use crate::report::RunReport;
use crate::scanner::Scanner;
use crate::utils::unique_collision_path;
use crate::FileRecord;

/// Copies the files of one input directory into dated folders.
pub struct DateOrganizer {
    input_dir: PathBuf,
    destination_dir: PathBuf,
    date_format: DateFormat,
    ops: Box<dyn FileOps>,
    logger: Arc<dyn Logger>,
}

impl DateOrganizer {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
        date_format: DateFormat,
        preview: bool,
    ) -> Result<Self> {
        let input_dir = input_dir.into();
        let destination_dir = destination_dir.into();
        if input_dir.as_os_str().is_empty() || destination_dir.as_os_str().is_empty() {
            return Err(Error::Config(
                "input and destination directories must be provided".to_string(),
            ));
        }

        Ok(Self {
            input_dir,
            destination_dir,
            date_format,
            ops: fs_ops::for_mode(preview),
            logger: logger::noop(),
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_file_ops(mut self, ops: Box<dyn FileOps>) -> Self {
        self.ops = ops;
        self
    }

    /// Organize every file under the input directory.
    ///
    /// The file list is gathered up front so a destination nested inside the
    /// input tree is never walked into.
    pub fn organize_files(&self) -> Result<RunReport> {
        if self.ops.is_dry_run() {
            self.logger.info("Running in preview mode");
        }

        let scanner = Scanner::with_logger(self.logger.clone());
        let files: Vec<FileRecord> = scanner.walk(&[self.input_dir.clone()])?.collect();

        let mut report = RunReport::new(self.ops.is_dry_run());
        for file in &files {
            self.organize_file(file, &mut report);
        }
        Ok(report)
    }

    /// Copy one file into its dated folder, renaming it if the name is taken.
    pub fn organize_file(&self, file: &FileRecord, report: &mut RunReport) {
        self.logger
            .info(&format!("Determining output path for file: {}", file.path.display()));

        let resolved = resolve_output_folder(file, &self.destination_dir, self.date_format);
        match &resolved.source {
            DateSource::DirectoryName(_) => self
                .logger
                .info("Using matching date format to make output path"),
            DateSource::ModificationTime => self
                .logger
                .info("Using modification time to make output path"),
        }

        if let Err(e) = self.ops.create_dir_all(&resolved.path) {
            self.logger.error(&format!(
                "Failed to create directory {}: {}",
                resolved.path.display(),
                e
            ));
            report.record_failure(&file.path, &resolved.path, e.to_string());
            return;
        }

        let Some(file_name) = file.path.file_name() else {
            self.logger
                .error(&format!("No file name in path: {}", file.path.display()));
            report.record_failure(&file.path, &resolved.path, "path has no file name".to_string());
            return;
        };
        if resolved.source == DateSource::ModificationTime
            && DateTime::<Utc>::from_timestamp(file.modified, 0).is_none()
        {
            self.logger.warn(&format!(
                "Modification time {} of {} is out of range, using 1970-01-01",
                file.modified,
                file.path.display()
            ));
        }

        let mut destination = resolved.path.join(file_name);
        if destination.exists() {
            self.logger
                .info(&format!("File already exists: {}", destination.display()));
            destination =
                unique_collision_path(&resolved.path, file_name, Utc::now().timestamp_millis());
        }

        self.logger.info(&format!(
            "Copying file {} to: {}",
            file_name.to_string_lossy(),
            destination.display()
        ));
        self.copy(&file.path, &destination, report);
    }

    fn copy(&self, source: &Path, destination: &Path, report: &mut RunReport) {
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
