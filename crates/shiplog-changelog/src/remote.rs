use url::Url;

use crate::error::ChangelogError;

/// Repository identity derived once from the configured remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
    /// Browsable repository URL, without any `.git` suffix.
    pub web_link: String,
}

impl RepositoryInfo {
    /// Parses `https://host/owner/repo[.git]` and
    /// `git@host:owner/repo[.git]` remote forms.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::UrlParse`] if the URL cannot be parsed
    /// and [`ChangelogError::InvalidRemoteUrl`] if it has no owner/repo
    /// path.
    pub fn from_url(url_str: &str) -> Result<Self, ChangelogError> {
        if let Some(rest) = url_str.strip_prefix("git@") {
            return Self::from_scp_form(url_str, rest);
        }

        let url = Url::parse(url_str).map_err(|source| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source: url::ParseError::EmptyHost,
        })?;

        let (owner, repo) = extract_owner_repo(url_str, url.path())?;
        let web_link = format!("{}://{host}/{owner}/{repo}", url.scheme());

        Ok(Self {
            owner,
            repo,
            web_link,
        })
    }

    /// `git@host:owner/repo.git` has no scheme, so the url crate cannot
    /// split it; the web link assumes the host serves HTTPS.
    fn from_scp_form(url_str: &str, rest: &str) -> Result<Self, ChangelogError> {
        let (host, path) = rest
            .split_once(':')
            .ok_or_else(|| ChangelogError::InvalidRemoteUrl {
                url: url_str.to_string(),
            })?;

        let (owner, repo) = extract_owner_repo(url_str, path)?;
        let web_link = format!("https://{host}/{owner}/{repo}");

        Ok(Self {
            owner,
            repo,
            web_link,
        })
    }

    #[must_use]
    pub fn compare_url(&self, base_tag: &str, target_tag: &str) -> String {
        format!("{}/compare/{base_tag}...{target_tag}", self.web_link)
    }
}

fn extract_owner_repo(url_str: &str, path: &str) -> Result<(String, String), ChangelogError> {
    let path = path.trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() < 2 {
        return Err(ChangelogError::InvalidRemoteUrl {
            url: url_str.to_string(),
        });
    }

    Ok((segments[0].to_string(), segments[1].to_string()))
}
