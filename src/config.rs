use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The pipeline a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Copy one file per distinct content into the output tree
    Deduplicate,
    /// Copy files into date-named folders
    Organize,
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deduplicate" => Ok(Action::Deduplicate),
            "organize" => Ok(Action::Organize),
            other => Err(Error::Config(format!(
                "unknown action '{}' (expected 'deduplicate' or 'organize')",
                other
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Deduplicate => write!(f, "deduplicate"),
            Action::Organize => write!(f, "organize"),
        }
    }
}

/// Order of the date tokens in a folder name such as `2024-01-10 Trip`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    #[default]
    YearMonthDay,
    DayMonthYear,
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "YYYYMMDD" => Ok(DateFormat::YearMonthDay),
            "DDMMYYYY" => Ok(DateFormat::DayMonthYear),
            other => Err(Error::Config(format!(
                "unknown date format '{}' (expected YYYYMMDD or DDMMYYYY)",
                other
            ))),
        }
    }
}

/// Validated settings for one run. Only constructible through [`RunConfig::new`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    action: Action,
    input_dirs: Vec<PathBuf>,
    output_dir: PathBuf,
    date_format: DateFormat,
    preview: bool,
}

impl RunConfig {
    pub fn new(
        action: Action,
        input_dirs: Vec<PathBuf>,
        output_dir: PathBuf,
        date_format: DateFormat,
        preview: bool,
    ) -> Result<Self> {
        if input_dirs.is_empty() {
            return Err(Error::Config(
                "at least one input directory must be specified".to_string(),
            ));
        }
        if input_dirs.iter().any(|dir| dir.as_os_str().is_empty()) {
            return Err(Error::Config("input directory must not be empty".to_string()));
        }
        if output_dir.as_os_str().is_empty() {
            return Err(Error::Config("output directory must be specified".to_string()));
        }

        Ok(Self {
            action,
            input_dirs,
            output_dir,
            date_format,
            preview,
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn input_dirs(&self) -> &[PathBuf] {
        &self.input_dirs
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn date_format(&self) -> DateFormat {
        self.date_format
    }

    pub fn preview(&self) -> bool {
        self.preview
    }
}
