use std::path::PathBuf;

use thiserror::Error;

use crate::engine::CONVENTION_URL;

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("failed to read changelog at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write changelog at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("changelog does not have an 'Unreleased' section! See {CONVENTION_URL}")]
    NoUnreleasedSection,

    #[error("there are no changes in the 'Unreleased' section of the changelog! See {CONVENTION_URL}")]
    EmptyUnreleasedSection,

    #[error("there is no link on the 'Unreleased' section of the changelog! See {CONVENTION_URL}")]
    MissingUnreleasedLink,

    #[error("failed to parse remote URL '{url}'")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid remote URL '{url}': expected an owner/repo path")]
    InvalidRemoteUrl { url: String },
}
