use shiplog_changelog::RepositoryInfo;
use shiplog_github::{CollaboratorPermission, CreatedRelease, GithubClient, ReleaseRequest};

use crate::traits::HostingProvider;
use crate::Result;

/// Hosting access through the GitHub REST API.
pub struct GithubHostingProvider {
    client: GithubClient,
}

impl GithubHostingProvider {
    #[must_use]
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

impl HostingProvider for GithubHostingProvider {
    async fn check_permission(
        &self,
        repository: &RepositoryInfo,
    ) -> Result<CollaboratorPermission> {
        Ok(self
            .client
            .permission(&repository.owner, &repository.repo)
            .await?)
    }

    async fn create_release(
        &self,
        repository: &RepositoryInfo,
        request: &ReleaseRequest,
    ) -> Result<CreatedRelease> {
        Ok(self
            .client
            .create_release(&repository.owner, &repository.repo, request)
            .await?)
    }

    async fn upload_asset(
        &self,
        upload_url: &str,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        Ok(self
            .client
            .upload_asset(upload_url, name, content_type, bytes)
            .await?)
    }
}
