use serde::{Deserialize, Serialize};

/// Body of the create-release call.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseRequest {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRelease {
    /// Upload URL with its `{?name,label}` template suffix already
    /// stripped, ready to take a `name` query parameter.
    pub upload_url: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorPermission {
    pub permission: String,
}

impl CollaboratorPermission {
    /// Release runs require at least write access to the repository.
    #[must_use]
    pub fn can_push(&self) -> bool {
        matches!(self.permission.as_str(), "admin" | "write")
    }
}
