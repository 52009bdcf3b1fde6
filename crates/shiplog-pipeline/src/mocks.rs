//! In-memory provider doubles for pipeline tests. Each mock records
//! the operations invoked on it so tests can assert stage ordering.

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use shiplog_changelog::RepositoryInfo;
use shiplog_git::CommitInfo;
use shiplog_github::{CollaboratorPermission, CreatedRelease, GithubError, ReleaseRequest};

use crate::Result;
use crate::context::Credentials;
use crate::traits::{GitProvider, HookRunner, HostingProvider};

pub struct MockGitProvider {
    calls: Mutex<Vec<String>>,
    remote_url: Option<String>,
    branch: String,
    clean: bool,
}

impl MockGitProvider {
    #[must_use]
    pub fn new(remote_url: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            remote_url: Some(remote_url.to_string()),
            branch: "master".to_string(),
            clean: true,
        }
    }

    #[must_use]
    pub fn without_remote(mut self) -> Self {
        self.remote_url = None;
        self
    }

    #[must_use]
    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branch = branch.to_string();
        self
    }

    #[must_use]
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Operation names in invocation order.
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    fn record(&self, name: &str) {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(name.to_string());
    }
}

impl GitProvider for MockGitProvider {
    fn remote_url(&self, _project_root: &Path) -> Result<Option<String>> {
        self.record("remote_url");
        Ok(self.remote_url.clone())
    }

    fn fetch_origin(&self, _project_root: &Path, _branch: &str) -> Result<()> {
        self.record("fetch_origin");
        Ok(())
    }

    fn current_branch(&self, _project_root: &Path) -> Result<String> {
        self.record("current_branch");
        Ok(self.branch.clone())
    }

    fn is_clean_against(&self, _project_root: &Path, _branch: &str) -> Result<bool> {
        self.record("is_clean_against");
        Ok(self.clean)
    }

    fn stage_files(&self, _project_root: &Path, _paths: &[&Path]) -> Result<()> {
        self.record("stage_files");
        Ok(())
    }

    fn commit(&self, _project_root: &Path, message: &str) -> Result<CommitInfo> {
        self.record("commit");
        Ok(CommitInfo {
            sha: "deadbeefdeadbeefdeadbeefdeadbeefdeadbeef".to_string(),
            message: message.to_string(),
        })
    }

    fn push(&self, _project_root: &Path, _branch: &str, _credentials: &Credentials) -> Result<()> {
        self.record("push");
        Ok(())
    }
}

pub struct MockHostingProvider {
    calls: Mutex<Vec<String>>,
    permission: String,
    upload_attempts: AtomicUsize,
    failing_upload: Option<String>,
}

impl MockHostingProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            permission: "admin".to_string(),
            upload_attempts: AtomicUsize::new(0),
            failing_upload: None,
        }
    }

    #[must_use]
    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permission = permission.to_string();
        self
    }

    /// Makes the upload of the asset with this file name fail.
    #[must_use]
    pub fn failing_upload(mut self, name: &str) -> Self {
        self.failing_upload = Some(name.to_string());
        self
    }

    /// Operation names in invocation order.
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    #[must_use]
    pub fn upload_attempts(&self) -> usize {
        self.upload_attempts.load(Ordering::SeqCst)
    }

    fn record(&self, name: &str) {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(name.to_string());
    }
}

impl Default for MockHostingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HostingProvider for MockHostingProvider {
    async fn check_permission(
        &self,
        _repository: &RepositoryInfo,
    ) -> Result<CollaboratorPermission> {
        self.record("check_permission");
        Ok(CollaboratorPermission {
            permission: self.permission.clone(),
        })
    }

    async fn create_release(
        &self,
        _repository: &RepositoryInfo,
        request: &ReleaseRequest,
    ) -> Result<CreatedRelease> {
        self.record("create_release");
        Ok(CreatedRelease {
            upload_url: "https://uploads.example.test/releases/1/assets".to_string(),
            html_url: format!("https://example.test/releases/{}", request.tag_name),
        })
    }

    async fn upload_asset(
        &self,
        upload_url: &str,
        name: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<()> {
        self.record(&format!("upload_asset:{name}"));
        self.upload_attempts.fetch_add(1, Ordering::SeqCst);

        if self.failing_upload.as_deref() == Some(name) {
            return Err(GithubError::UnexpectedStatus {
                url: upload_url.to_string(),
                status: 500,
            }
            .into());
        }
        Ok(())
    }
}

pub struct MockHookRunner {
    commands: Mutex<Vec<String>>,
    exit_code: i32,
}

impl MockHookRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            exit_code: 0,
        }
    }

    #[must_use]
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    /// Expanded commands in invocation order.
    ///
    /// # Panics
    ///
    /// Panics if the command log mutex is poisoned.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().expect("command log poisoned").clone()
    }
}

impl Default for MockHookRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRunner for MockHookRunner {
    fn run(&self, command: &str, _silent: bool) -> Result<i32> {
        self.commands
            .lock()
            .expect("command log poisoned")
            .push(command.to_string());
        Ok(self.exit_code)
    }
}
