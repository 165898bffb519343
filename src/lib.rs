pub mod config;
pub mod date_path;
pub mod dedup;
pub mod error;
pub mod fs_ops;
pub mod hasher;
pub mod index;
pub mod logger;
pub mod organizer;
pub mod report;
pub mod scanner;
pub mod utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use config::{Action, DateFormat, RunConfig};
pub use dedup::Deduplicator;
pub use error::{Error, Result};
pub use index::{build_index, ChecksumIndex, ChecksumIndexBuilder};
pub use logger::{LogFacade, Logger, NoopLogger, RecordingLogger};
pub use organizer::DateOrganizer;
pub use report::RunReport;
pub use scanner::Scanner;

/// A regular file found while walking an input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Canonical input directory the file was found under
    pub root: PathBuf,
    /// Last modification time, whole seconds since the UTC epoch
    pub modified: i64,
}

/// Index `input_dirs` by content and copy one file per distinct content into `output_dir`.
pub fn deduplicate(
    input_dirs: &[PathBuf],
    output_dir: &Path,
    preview: bool,
    logger: Arc<dyn Logger>,
) -> Result<RunReport> {
    let index = build_index(input_dirs, logger.clone())?;
    Deduplicator::new(output_dir, preview)
        .with_logger(logger)
        .deduplicate(&index)
}

/// Copy every file under `input_dir` into a dated folder below `output_dir`.
pub fn organize(
    input_dir: &Path,
    output_dir: &Path,
    date_format: DateFormat,
    preview: bool,
    logger: Arc<dyn Logger>,
) -> Result<RunReport> {
    DateOrganizer::new(input_dir, output_dir, date_format, preview)?
        .with_logger(logger)
        .organize_files()
}

/// Execute the pipeline selected by `config`.
///
/// Organize runs handle each input directory in turn and merge the reports.
pub fn run(config: &RunConfig, logger: Arc<dyn Logger>) -> Result<RunReport> {
    match config.action() {
        Action::Deduplicate => deduplicate(
            config.input_dirs(),
            config.output_dir(),
            config.preview(),
            logger,
        ),
        Action::Organize => {
            let mut report = RunReport::new(config.preview());
            for input_dir in config.input_dirs() {
                report.merge(organize(
                    input_dir,
                    config.output_dir(),
                    config.date_format(),
                    config.preview(),
                    logger.clone(),
                )?);
            }
            Ok(report)
        }
    }
}
