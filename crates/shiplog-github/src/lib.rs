mod client;
mod error;
mod types;

pub use client::{DEFAULT_API_BASE, GithubClient};
pub use error::GithubError;
pub use types::{CollaboratorPermission, CreatedRelease, ReleaseRequest};

pub type Result<T> = std::result::Result<T, GithubError>;
