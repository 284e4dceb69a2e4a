//! Rule file output.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write one name per line to `path`, replacing it atomically.
pub fn write_rule_file<P: AsRef<Path>>(path: P, names: &[String]) -> Result<()> {
    write_atomic(path.as_ref(), |out| {
        for name in names {
            writeln!(out, "{}", name)?;
        }
        Ok(())
    })
}

/// Write `contents` to `path`, replacing it atomically.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    write_atomic(path.as_ref(), |out| out.write_all(contents))
}

/// Write to a temporary file in the same directory, flush it to disk and
/// rename it over the target, so readers never see a partial file.
fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent_dir))?;

    {
        let mut out = std::io::BufWriter::new(temp_file.as_file_mut());
        fill(&mut out).with_context(|| format!("Failed to write {:?}", path))?;
        out.flush()?;
    }
    temp_file.as_file().sync_all()?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist {:?}", path))?;

    Ok(())
}
