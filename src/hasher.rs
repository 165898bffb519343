use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest as Md5Digest, Md5};

/// Read size used when streaming a file through a hasher.
pub const BUFFER_SIZE: usize = 1024;

/// Fixed-length content digest, keyed by its lowercase hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Streaming hash accumulator.
pub trait ContentHasher {
    fn update(&mut self, bytes: &[u8]);
    fn finish(self) -> Digest;
}

/// MD5, 16-byte output. Fast and good enough to tell media files apart.
#[derive(Default)]
pub struct Md5Hasher(Md5);

impl ContentHasher for Md5Hasher {
    fn update(&mut self, bytes: &[u8]) {
        Md5Digest::update(&mut self.0, bytes);
    }

    fn finish(self) -> Digest {
        Digest(Md5Digest::finalize(self.0).to_vec())
    }
}

/// Stream the file at `path` through a fresh `H` and return its digest.
pub fn digest_file<H: ContentHasher + Default>(path: &Path) -> io::Result<Digest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = H::default();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finish())
}
