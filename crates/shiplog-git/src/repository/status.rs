use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// True when the working tree and index hold no differences against
    /// the fetched tip of `origin/<branch>`. Committed-but-unpushed
    /// changes count as differences, matching `git diff origin/<branch>`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the remote-tracking branch
    /// does not exist locally.
    pub fn is_clean_against(&self, branch: &str) -> Result<bool> {
        let refspec = format!("refs/remotes/origin/{branch}");
        let reference = self
            .inner
            .find_reference(&refspec)
            .map_err(|_| GitError::RefNotFound { refspec })?;

        let tree = reference.peel_to_tree()?;
        let diff = self
            .inner
            .diff_tree_to_workdir_with_index(Some(&tree), None)?;

        Ok(diff.deltas().len() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_repo;
    use crate::GitError;
    use std::fs;

    fn track_head_as_origin(repo: &crate::Repository, branch: &str) -> anyhow::Result<()> {
        let head = repo.inner.head()?.peel_to_commit()?;
        repo.inner.reference(
            &format!("refs/remotes/origin/{branch}"),
            head.id(),
            true,
            "test tracking ref",
        )?;
        Ok(())
    }

    #[test]
    fn current_branch_on_default() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let branch = repo.current_branch()?;
        assert!(branch == "main" || branch == "master");
        Ok(())
    }

    #[test]
    fn clean_when_matching_remote_tip() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let branch = repo.current_branch()?;
        track_head_as_origin(&repo, &branch)?;

        assert!(repo.is_clean_against(&branch)?);
        Ok(())
    }

    #[test]
    fn dirty_with_uncommitted_change() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        let branch = repo.current_branch()?;
        track_head_as_origin(&repo, &branch)?;

        fs::write(dir.path().join("new_file.txt"), "content")?;
        repo.stage_files(&[std::path::Path::new("new_file.txt")])?;

        assert!(!repo.is_clean_against(&branch)?);
        Ok(())
    }

    #[test]
    fn dirty_with_unpushed_commit() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        let branch = repo.current_branch()?;
        track_head_as_origin(&repo, &branch)?;

        fs::write(dir.path().join("file.txt"), "content")?;
        repo.stage_files(&[std::path::Path::new("file.txt")])?;
        repo.commit("local only")?;

        assert!(!repo.is_clean_against(&branch)?);
        Ok(())
    }

    #[test]
    fn missing_tracking_ref_is_an_error() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let result = repo.is_clean_against("release");
        assert!(matches!(result, Err(GitError::RefNotFound { .. })));
        Ok(())
    }
}
