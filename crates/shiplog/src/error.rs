use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] shiplog_pipeline::PipelineError),

    #[error(transparent)]
    Changelog(#[from] shiplog_changelog::ChangelogError),

    #[error(transparent)]
    Github(#[from] shiplog_github::GithubError),

    #[error(transparent)]
    Version(#[from] shiplog_version::VersionError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("could not determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to read config file '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file '{path}' is not valid")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render configuration")]
    ConfigRender(#[source] serde_json::Error),

    #[error("no git remote configured; set \"remote\" in the config file or pass --remote")]
    RemoteNotConfigured,

    #[error("failed to read version file '{path}'")]
    VersionFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("version file '{path}' is not valid JSON")]
    VersionFileInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no \"version\" field found in '{path}'")]
    VersionFieldMissing { path: PathBuf },

    #[error("interactive mode requires a terminal")]
    NotATty,
}

pub type Result<T> = std::result::Result<T, CliError>;
