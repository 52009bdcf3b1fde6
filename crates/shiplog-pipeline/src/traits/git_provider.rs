use std::path::Path;

use shiplog_git::CommitInfo;

use crate::context::Credentials;
use crate::Result;

pub trait GitProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn remote_url(&self, project_root: &Path) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the fetch fails or no `origin` remote exists.
    fn fetch_origin(&self, project_root: &Path, branch: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or HEAD is detached.
    fn current_branch(&self, project_root: &Path) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the remote-tracking branch cannot be resolved.
    fn is_clean_against(&self, project_root: &Path, branch: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if staging any of the files fails.
    fn stage_files(&self, project_root: &Path, paths: &[&Path]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo>;

    /// # Errors
    ///
    /// Returns an error if the push is rejected or authentication fails.
    fn push(&self, project_root: &Path, branch: &str, credentials: &Credentials) -> Result<()>;
}
