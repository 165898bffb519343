use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole pipeline run.
///
/// Per-file problems (unreadable files, failed copies) never show up here;
/// they are logged and recorded in the [`RunReport`](crate::report::RunReport).
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read input directory {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input path {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{} is not located under input directory {}", .file.display(), .root.display())]
    OutsideRoot { file: PathBuf, root: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
