use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to '{url}' returned an unexpected status code: {status}")]
    UnexpectedStatus { url: String, status: u16 },
}
