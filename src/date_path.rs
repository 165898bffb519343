//! Working out which dated folder a file belongs in.
//!
//! The parent directory name is tried first (`2024-01-10 Ski trip`); when it
//! carries no date the file's modification time decides.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::config::DateFormat;
use crate::FileRecord;

const DESCRIPTION: &str = r"(?P<description>[,'a-zA-Z0-9 ]*)";

fn pattern(format: DateFormat) -> Option<&'static Regex> {
    static YEAR_MONTH_DAY: OnceLock<Option<Regex>> = OnceLock::new();
    static DAY_MONTH_YEAR: OnceLock<Option<Regex>> = OnceLock::new();

    let compiled = match format {
        DateFormat::YearMonthDay => YEAR_MONTH_DAY.get_or_init(|| {
            Regex::new(&format!(
                r"(?P<year>[0-9]{{4}})-(?P<month>[0-9]{{2}})-(?P<day>[0-9]{{2}}) {}",
                DESCRIPTION
            ))
            .ok()
        }),
        DateFormat::DayMonthYear => DAY_MONTH_YEAR.get_or_init(|| {
            Regex::new(&format!(
                r"(?P<day>[0-9]{{2}})-(?P<month>[0-9]{{2}})-(?P<year>[0-9]{{4}}) {}",
                DESCRIPTION
            ))
            .ok()
        }),
    };
    compiled.as_ref()
}

/// Date and description pulled out of a directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub year: String,
    pub month: String,
    pub day: String,
    pub description: String,
    pub format: DateFormat,
}

impl DateMatch {
    /// Folder name for the match, date tokens in the order they were written.
    pub fn folder_name(&self) -> String {
        let date = match self.format {
            DateFormat::YearMonthDay => format!("{}-{}-{}", self.year, self.month, self.day),
            DateFormat::DayMonthYear => format!("{}-{}-{}", self.day, self.month, self.year),
        };
        if self.description.is_empty() {
            date
        } else {
            format!("{} {}", date, self.description)
        }
    }
}

/// Look for a date followed by a space and an optional description in `name`.
pub fn match_date(name: &str, format: DateFormat) -> Option<DateMatch> {
    let captures = pattern(format)?.captures(name)?;
    Some(DateMatch {
        year: captures["year"].to_string(),
        month: captures["month"].to_string(),
        day: captures["day"].to_string(),
        description: captures["description"].to_string(),
        format,
    })
}

/// Folder name (`YYYY-MM-DD`) for a UTC epoch timestamp in seconds.
///
/// Timestamps chrono cannot represent map to `1970-01-01`.
pub fn modification_folder_name(modified: i64) -> String {
    DateTime::<Utc>::from_timestamp(modified, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}

/// Where a resolved folder name came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    DirectoryName(DateMatch),
    ModificationTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFolder {
    pub path: PathBuf,
    pub source: DateSource,
}

/// Pick the dated folder under `destination_root` for `file`.
///
/// Only the immediate parent directory name is inspected; a date in the
/// file name itself is not picked up.
pub fn resolve_output_folder(
    file: &FileRecord,
    destination_root: &Path,
    format: DateFormat,
) -> ResolvedFolder {
    let parent_name = file
        .path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy());

    if let Some(date) = parent_name.and_then(|name| match_date(&name, format)) {
        return ResolvedFolder {
            path: destination_root.join(date.folder_name()),
            source: DateSource::DirectoryName(date),
        };
    }

    ResolvedFolder {
        path: destination_root.join(modification_folder_name(file.modified)),
        source: DateSource::ModificationTime,
    }
}
