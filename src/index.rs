use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::error::Result;
use crate::hasher::{digest_file, ContentHasher, Md5Hasher};
use crate::logger::{self, Logger};
use crate::scanner::Scanner;
use crate::FileRecord;

/// Files grouped by content digest. Immutable once built.
///
/// Within a bucket, files keep scan order; the first one is the
/// representative a deduplication run copies.
#[derive(Debug, Default)]
pub struct ChecksumIndex {
    buckets: BTreeMap<String, Vec<FileRecord>>,
    total_files: usize,
    unreadable_files: usize,
}

impl ChecksumIndex {
    /// Number of distinct digests.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, hex_digest: &str) -> Option<&[FileRecord]> {
        self.buckets.get(hex_digest).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FileRecord])> {
        self.buckets
            .iter()
            .map(|(digest, files)| (digest.as_str(), files.as_slice()))
    }

    /// Buckets holding more than one file.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = (&str, &[FileRecord])> {
        self.iter().filter(|(_, files)| files.len() > 1)
    }

    /// Files that made it into a bucket.
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Files dropped because they could not be read.
    pub fn unreadable_files(&self) -> usize {
        self.unreadable_files
    }
}

/// Owns the digest map while files are being added.
pub struct ChecksumIndexBuilder<H = Md5Hasher> {
    buckets: BTreeMap<String, Vec<FileRecord>>,
    total_files: usize,
    unreadable_files: usize,
    logger: Arc<dyn Logger>,
    progress: ProgressBar,
    _hasher: PhantomData<H>,
}

impl ChecksumIndexBuilder<Md5Hasher> {
    pub fn new() -> Self {
        Self::with_hasher()
    }
}

impl Default for ChecksumIndexBuilder<Md5Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ContentHasher + Default> ChecksumIndexBuilder<H> {
    pub fn with_hasher() -> Self {
        Self {
            buckets: BTreeMap::new(),
            total_files: 0,
            unreadable_files: 0,
            logger: logger::noop(),
            progress: ProgressBar::hidden(),
            _hasher: PhantomData,
        }
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Tick `progress` once per file added.
    pub fn progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Hash `record` and append it to its bucket. Unreadable files are logged and dropped.
    pub fn add(&mut self, record: FileRecord) {
        self.logger.info(&format!("File: {}", record.path.display()));
        self.progress.inc(1);

        match digest_file::<H>(&record.path) {
            Ok(digest) => {
                let key = digest.to_hex();
                self.logger.debug(&format!("Checksum: {}", key));
                self.total_files += 1;
                self.buckets.entry(key).or_default().push(record);
            }
            Err(e) => {
                self.unreadable_files += 1;
                self.logger.info(&format!(
                    "Caught error during checksum of {}: {}",
                    record.path.display(),
                    e
                ));
            }
        }
    }

    /// Walk `roots` and add every file found.
    pub fn scan(mut self, roots: &[PathBuf]) -> Result<Self> {
        let scanner = Scanner::with_logger(self.logger.clone());
        for record in scanner.walk(roots)? {
            self.add(record);
        }
        Ok(self)
    }

    pub fn build(self) -> ChecksumIndex {
        self.progress.finish_and_clear();
        ChecksumIndex {
            buckets: self.buckets,
            total_files: self.total_files,
            unreadable_files: self.unreadable_files,
        }
    }
}

/// Scan `roots` and index every readable file by MD5 digest.
pub fn build_index(roots: &[PathBuf], logger: Arc<dyn Logger>) -> Result<ChecksumIndex> {
    Ok(ChecksumIndexBuilder::new().logger(logger).scan(roots)?.build())
}
