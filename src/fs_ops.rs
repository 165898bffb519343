use std::fs;
use std::io;
use std::path::Path;

/// The two filesystem mutations a pipeline performs.
///
/// Preview runs swap in [`DryRunFs`] so every call site stays the same.
pub trait FileOps {
    /// Create `path` and any missing parents. An existing directory is not an error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy `from` to `to` without overwriting, returning the bytes written.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64>;

    fn is_dry_run(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileOps for RealFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        match fs::create_dir_all(path) {
            Ok(()) => Ok(()),
            // Lost a race with another creator, the directory is there now.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let mut source = fs::File::open(from)?;
        let mut dest = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(to)?;

        match io::copy(&mut source, &mut dest) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                drop(dest);
                let _ = fs::remove_file(to);
                Err(e)
            }
        }
    }

    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Reports success without touching the disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunFs;

impl FileOps for DryRunFs {
    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn copy_file(&self, from: &Path, _to: &Path) -> io::Result<u64> {
        Ok(fs::metadata(from).map(|m| m.len()).unwrap_or(0))
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

pub fn for_mode(preview: bool) -> Box<dyn FileOps> {
    if preview {
        Box::new(DryRunFs)
    } else {
        Box::new(RealFs)
    }
}
