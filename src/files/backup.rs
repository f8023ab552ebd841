//! Pre-transform backup of the input table.

use std::fs;
use std::io;
use std::path::Path;

/// Copy `source` to `dest`, creating missing parent directories.
///
/// Returns the number of bytes copied.
pub fn create(source: &Path, dest: &Path) -> io::Result<u64> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)
}
