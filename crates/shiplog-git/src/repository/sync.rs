use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Updates the local `origin/<branch>` tracking ref.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RemoteMissing`] if there is no `origin`
    /// remote, or an error if the fetch fails.
    pub fn fetch_origin(&self, branch: &str) -> Result<()> {
        let mut remote =
            self.inner
                .find_remote("origin")
                .map_err(|_| GitError::RemoteMissing {
                    name: "origin".to_string(),
                })?;

        remote.fetch(&[branch], None, None)?;
        Ok(())
    }

    /// Pushes `branch` to `origin`, authenticating with the given
    /// username and token.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RemoteMissing`] if there is no `origin`
    /// remote, or an error if the push is rejected.
    pub fn push_origin(&self, branch: &str, username: &str, token: &str) -> Result<()> {
        let mut remote =
            self.inner
                .find_remote("origin")
                .map_err(|_| GitError::RemoteMissing {
                    name: "origin".to_string(),
                })?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |_url, _username_from_url, _allowed| {
            git2::Cred::userpass_plaintext(username, token)
        });

        let mut options = git2::PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[refspec.as_str()], Some(&mut options))?;
        Ok(())
    }
}
