use shiplog_changelog::RepositoryInfo;
use shiplog_github::{CollaboratorPermission, CreatedRelease, ReleaseRequest};

use crate::Result;

/// Hosting-service operations the pipeline performs. The pipeline only
/// ever uses concrete provider types, so the async methods need no
/// object safety.
#[allow(async_fn_in_trait)]
pub trait HostingProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    async fn check_permission(&self, repository: &RepositoryInfo)
    -> Result<CollaboratorPermission>;

    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    async fn create_release(
        &self,
        repository: &RepositoryInfo,
        request: &ReleaseRequest,
    ) -> Result<CreatedRelease>;

    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    async fn upload_asset(
        &self,
        upload_url: &str,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<()>;
}
