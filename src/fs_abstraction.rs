//! Filesystem abstraction layer for testability
//!
//! Local rule files and whitelist files are read through the [`FileSystem`]
//! trait so that missing or unreadable files can be simulated in tests. Uses mockall for automatic mock generation in test builds.

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Trait abstracting the filesystem reads done while loading rule sources.
///
/// # Example (testing)
/// ```ignore
/// use domain_blacklist::fs_abstraction::MockFileSystem;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_is_file().returning(|_| true);
/// mock_fs.expect_read()
///     .returning(|_| Ok(b"ads.example.com\n".to_vec()));
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Read raw file contents.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Check if a path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Real filesystem implementation using std::fs.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}
