use std::time::Duration;

use reqwest::Client;

use crate::error::GithubError;
use crate::types::{CollaboratorPermission, CreatedRelease, ReleaseRequest};
use crate::Result;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("shiplog/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Authenticated client for the GitHub v3 REST API.
pub struct GithubClient {
    http: Client,
    api_base: String,
    user: String,
    token: String,
}

impl GithubClient {
    /// # Errors
    ///
    /// Returns [`GithubError::Client`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_api_base(DEFAULT_API_BASE, user, token)
    }

    /// # Errors
    ///
    /// Returns [`GithubError::Client`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn with_api_base(
        api_base: impl Into<String>,
        user: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(GithubError::Client)?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            user: user.into(),
            token: token.into(),
        })
    }

    /// Looks up the permission level the authenticated user holds on
    /// the repository.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Request`] on transport failure and
    /// [`GithubError::UnexpectedStatus`] on any non-2xx response.
    pub async fn permission(&self, owner: &str, repo: &str) -> Result<CollaboratorPermission> {
        let url = format!(
            "{}/repos/{owner}/{repo}/collaborators/{}/permission",
            self.api_base, self.user
        );

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|source| GithubError::Request {
                url: url.clone(),
                source,
            })?;

        let response = check_status(&url, response)?;

        response.json().await.map_err(|source| GithubError::Request { url, source })
    }

    /// Publishes a release for an existing tag target and returns the
    /// trimmed asset-upload URL.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Request`] on transport failure and
    /// [`GithubError::UnexpectedStatus`] on any non-2xx response.
    pub async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        request: &ReleaseRequest,
    ) -> Result<CreatedRelease> {
        let url = format!("{}/repos/{owner}/{repo}/releases", self.api_base);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.user, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .json(request)
            .send()
            .await
            .map_err(|source| GithubError::Request {
                url: url.clone(),
                source,
            })?;

        let response = check_status(&url, response)?;

        let mut release: CreatedRelease = response
            .json()
            .await
            .map_err(|source| GithubError::Request { url, source })?;
        release.upload_url = trim_upload_url(&release.upload_url).to_string();

        Ok(release)
    }

    /// Uploads one binary asset against a release's upload URL.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Request`] on transport failure and
    /// [`GithubError::UnexpectedStatus`] on any non-2xx response.
    pub async fn upload_asset(
        &self,
        upload_url: &str,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        let url = format!("{upload_url}?name={name}");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.user, Some(&self.token))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|source| GithubError::Request {
                url: url.clone(),
                source,
            })?;

        check_status(&url, response)?;
        Ok(())
    }
}

fn check_status(url: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(GithubError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// The create-release response carries a URI template like
/// `.../assets{?name,label}`; everything from the template brace on is
/// dropped.
fn trim_upload_url(upload_url: &str) -> &str {
    upload_url
        .find('{')
        .map_or(upload_url, |brace| &upload_url[..brace])
}
