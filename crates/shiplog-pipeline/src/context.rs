use std::fmt;
use std::path::PathBuf;

use semver::Version;
use shiplog_changelog::RepositoryInfo;
use shiplog_version::{BumpType, VersionRequest};

/// Hosting credentials. The token is deliberately unreachable for
/// serialization and blanked in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    token: String,
}

impl Credentials {
    #[must_use]
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Patch,
    Minor,
    Major,
    Custom,
}

impl ReleaseKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Custom => "custom",
        }
    }
}

impl From<&VersionRequest> for ReleaseKind {
    fn from(request: &VersionRequest) -> Self {
        match request {
            VersionRequest::Bump(BumpType::Patch) => Self::Patch,
            VersionRequest::Bump(BumpType::Minor) => Self::Minor,
            VersionRequest::Bump(BumpType::Major) => Self::Major,
            VersionRequest::Literal(_) => Self::Custom,
        }
    }
}

/// One templated hook command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    pub command: String,
    /// Suppress the hook's own stdout/stderr.
    pub silent: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HookSet {
    pub pre_commit: Option<Hook>,
    pub pre_release: Option<Hook>,
    pub post_release: Option<Hook>,
}

/// Which optional stages this run performs.
#[derive(Debug, Clone, Copy)]
pub struct StageToggles {
    pub update_changelog: bool,
    pub update_version_file: bool,
    /// Create the hosted release (and upload assets) after pushing.
    pub publish_release: bool,
    /// Use the released changelog section as the release body.
    pub populate_notes: bool,
    /// Treat a branch mismatch as fatal rather than a warning.
    pub strict_branch: bool,
}

impl Default for StageToggles {
    fn default() -> Self {
        Self {
            update_changelog: true,
            update_version_file: true,
            publish_release: true,
            populate_notes: true,
            strict_branch: true,
        }
    }
}

/// Everything a release run needs, resolved once before the first
/// stage. Stages receive it by shared reference and never mutate it;
/// values produced mid-run (release notes, upload URL) travel through
/// stage results instead.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub project_name: String,
    pub old_version: Version,
    pub new_version: Version,
    pub release_kind: ReleaseKind,
    pub remote_url: String,
    pub branch: String,
    pub repository: RepositoryInfo,
    pub credentials: Credentials,
    pub changelog_path: PathBuf,
    pub version_file_path: PathBuf,
    pub asset_globs: Vec<String>,
    pub hooks: HookSet,
    pub toggles: StageToggles,
}

impl ReleaseContext {
    #[must_use]
    pub fn old_tag(&self) -> String {
        format!("v{}", self.old_version)
    }

    #[must_use]
    pub fn new_tag(&self) -> String {
        format!("v{}", self.new_version)
    }

    /// Dotted-key values available to hook command templates, e.g.
    /// `${release.new_version}`. The credential token is never
    /// exposed.
    #[must_use]
    pub fn placeholder_values(&self) -> Vec<(String, String)> {
        vec![
            ("release.name".to_string(), self.project_name.clone()),
            ("release.old_version".to_string(), self.old_version.to_string()),
            ("release.new_version".to_string(), self.new_version.to_string()),
            ("release.old_tag".to_string(), self.old_tag()),
            ("release.new_tag".to_string(), self.new_tag()),
            ("release.type".to_string(), self.release_kind.as_str().to_string()),
            ("repo.owner".to_string(), self.repository.owner.clone()),
            ("repo.name".to_string(), self.repository.repo.clone()),
            ("repo.link".to_string(), self.repository.web_link.clone()),
            ("repo.remote".to_string(), self.remote_url.clone()),
            ("repo.branch".to_string(), self.branch.clone()),
            ("github.user".to_string(), self.credentials.user.clone()),
            (
                "paths.changelog".to_string(),
                self.changelog_path.display().to_string(),
            ),
            (
                "paths.version_file".to_string(),
                self.version_file_path.display().to_string(),
            ),
        ]
    }
}
