mod engine;
mod error;
mod remote;

pub use engine::{AppliedRelease, CONVENTION_URL, apply_release, new_changelog};
pub use error::ChangelogError;
pub use remote::RepositoryInfo;

use std::path::Path;

pub type Result<T> = std::result::Result<T, ChangelogError>;

/// # Errors
///
/// Returns [`ChangelogError::Read`] if the file cannot be read.
pub fn read_changelog(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ChangelogError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// # Errors
///
/// Returns [`ChangelogError::Write`] if the file cannot be written.
pub fn write_changelog(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| ChangelogError::Write {
        path: path.to_path_buf(),
        source,
    })
}
