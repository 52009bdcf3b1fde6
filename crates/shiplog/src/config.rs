//! Project configuration: a JSON file at the project root, with
//! command-line flags layered on top.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shiplog_pipeline::{Hook, HookSet, StageToggles};
use shiplog_version::VersionError;

use crate::error::{CliError, Result};

pub const DEFAULT_CONFIG_FILE: &str = ".shiplog.json";
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";
pub const DEFAULT_VERSION_FILE: &str = "package.json";
pub const DEFAULT_BRANCH: &str = "master";

/// The on-disk configuration. Credentials never live here, so dumping
/// it is always safe.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub user: Option<String>,
    pub changelog: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
    pub assets: Vec<String>,
    pub hooks: HooksConfig,
    pub update_changelog: Option<bool>,
    pub update_version_file: Option<bool>,
    pub release: Option<bool>,
    pub populate_notes: Option<bool>,
    pub strict_branch: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HooksConfig {
    pub pre_commit: Option<HookConfig>,
    pub pre_release: Option<HookConfig>,
    pub post_release: Option<HookConfig>,
}

/// A hook is either a bare command string or an object with options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HookConfig {
    Command(String),
    Detailed {
        command: String,
        #[serde(default)]
        silent: bool,
    },
}

impl HookConfig {
    fn to_hook(&self) -> Hook {
        match self {
            Self::Command(command) => Hook {
                command: command.clone(),
                silent: false,
            },
            Self::Detailed { command, silent } => Hook {
                command: command.clone(),
                silent: *silent,
            },
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub user: Option<String>,
    pub changelog: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
    pub assets: Vec<String>,
    pub no_changelog: bool,
    pub no_version_file: bool,
    pub no_release: bool,
    pub any_branch: bool,
}

impl ConfigFile {
    #[must_use]
    pub fn apply_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(remote) = &overrides.remote {
            self.remote = Some(remote.clone());
        }
        if let Some(branch) = &overrides.branch {
            self.branch = Some(branch.clone());
        }
        if let Some(user) = &overrides.user {
            self.user = Some(user.clone());
        }
        if let Some(changelog) = &overrides.changelog {
            self.changelog = Some(changelog.clone());
        }
        if let Some(version_file) = &overrides.version_file {
            self.version_file = Some(version_file.clone());
        }
        self.assets.extend(overrides.assets.iter().cloned());
        if overrides.no_changelog {
            self.update_changelog = Some(false);
        }
        if overrides.no_version_file {
            self.update_version_file = Some(false);
        }
        if overrides.no_release {
            self.release = Some(false);
        }
        if overrides.any_branch {
            self.strict_branch = Some(false);
        }
        self
    }

    /// # Errors
    ///
    /// Returns [`CliError::RemoteNotConfigured`] when no remote URL is
    /// available from either the file or the command line.
    pub fn into_settings(self) -> Result<Settings> {
        let remote = self.remote.ok_or(CliError::RemoteNotConfigured)?;

        let hooks = HookSet {
            pre_commit: self.hooks.pre_commit.as_ref().map(HookConfig::to_hook),
            pre_release: self.hooks.pre_release.as_ref().map(HookConfig::to_hook),
            post_release: self.hooks.post_release.as_ref().map(HookConfig::to_hook),
        };

        let toggles = StageToggles {
            update_changelog: self.update_changelog.unwrap_or(true),
            update_version_file: self.update_version_file.unwrap_or(true),
            publish_release: self.release.unwrap_or(true),
            populate_notes: self.populate_notes.unwrap_or(true),
            strict_branch: self.strict_branch.unwrap_or(true),
        };

        Ok(Settings {
            remote,
            branch: self.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            user: self.user,
            changelog_path: self
                .changelog
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG)),
            version_file_path: self
                .version_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VERSION_FILE)),
            asset_globs: self.assets,
            hooks,
            toggles,
        })
    }
}

/// The fully resolved configuration a release run starts from.
#[derive(Debug, Clone)]
pub struct Settings {
    pub remote: String,
    pub branch: String,
    pub user: Option<String>,
    pub changelog_path: PathBuf,
    pub version_file_path: PathBuf,
    pub asset_globs: Vec<String>,
    pub hooks: HookSet,
    pub toggles: StageToggles,
}

/// Loads the config file, treating a missing file as an empty config.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| CliError::ConfigInvalid {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub name: String,
    pub version: Version,
}

/// Reads the project name and current version from the JSON version
/// file. The name falls back to the project directory's name.
///
/// # Errors
///
/// Returns an error if the file is unreadable, not JSON, or carries no
/// parseable `"version"` string.
pub fn read_project_info(path: &Path, project_root: &Path) -> Result<ProjectInfo> {
    let text = fs::read_to_string(path).map_err(|source| CliError::VersionFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|source| CliError::VersionFileInvalid {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = value
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| CliError::VersionFieldMissing {
            path: path.to_path_buf(),
        })?;

    let version = Version::parse(raw).map_err(|source| VersionError::Parse {
        version: raw.to_string(),
        source,
    })?;

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            project_root
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "project".to_string());

    Ok(ProjectInfo { name, version })
}
