use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Changelog(#[from] shiplog_changelog::ChangelogError),

    #[error(transparent)]
    Git(#[from] shiplog_git::GitError),

    #[error(transparent)]
    Github(#[from] shiplog_github::GithubError),

    #[error(transparent)]
    Version(#[from] shiplog_version::VersionError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("user '{user}' must have at least write privileges to '{repository}'")]
    PermissionDenied { user: String, repository: String },

    #[error("git remote origin ({actual}) must be set to {expected}")]
    RemoteMismatch { expected: String, actual: String },

    #[error("releases must be done on the '{expected}' branch (currently on '{actual}')")]
    WrongBranch { expected: String, actual: String },

    #[error("there are uncommitted and/or unpushed local changes against 'origin/{branch}'")]
    DirtyWorkingTree { branch: String },

    #[error("non-zero status ({code}) returned by {name} hook command")]
    HookFailed { name: String, code: i32 },

    #[error("no assets matched pattern '{pattern}'")]
    AssetsNotFound { pattern: String },

    #[error("invalid asset glob pattern '{pattern}'")]
    InvalidAssetPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("asset path '{path}' has no usable file name")]
    InvalidAssetPath { path: PathBuf },

    #[error("failed to read version file '{path}'")]
    VersionFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write version file '{path}'")]
    VersionFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no \"version\" field found in '{path}'")]
    VersionFieldMissing { path: PathBuf },
}
