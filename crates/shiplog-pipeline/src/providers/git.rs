use std::path::Path;

use shiplog_git::{CommitInfo, Repository};

use crate::context::Credentials;
use crate::traits::GitProvider;
use crate::Result;

/// Real git access through libgit2, opening the repository fresh for
/// each operation.
pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for Git2Provider {
    fn remote_url(&self, project_root: &Path) -> Result<Option<String>> {
        Ok(Repository::open(project_root)?.remote_url()?)
    }

    fn fetch_origin(&self, project_root: &Path, branch: &str) -> Result<()> {
        Ok(Repository::open(project_root)?.fetch_origin(branch)?)
    }

    fn current_branch(&self, project_root: &Path) -> Result<String> {
        Ok(Repository::open(project_root)?.current_branch()?)
    }

    fn is_clean_against(&self, project_root: &Path, branch: &str) -> Result<bool> {
        Ok(Repository::open(project_root)?.is_clean_against(branch)?)
    }

    fn stage_files(&self, project_root: &Path, paths: &[&Path]) -> Result<()> {
        Ok(Repository::open(project_root)?.stage_files(paths)?)
    }

    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo> {
        Ok(Repository::open(project_root)?.commit(message)?)
    }

    fn push(&self, project_root: &Path, branch: &str, credentials: &Credentials) -> Result<()> {
        Ok(Repository::open(project_root)?.push_origin(
            branch,
            &credentials.user,
            credentials.token(),
        )?)
    }
}
