use semver::Version;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VersionError>;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version '{version}': must conform to the SemVer specification (https://semver.org/)")]
    Parse {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("new version ({new_version}) is not greater than existing version ({old_version})")]
    NotGreater {
        old_version: Version,
        new_version: Version,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl BumpType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

/// How the next version should be derived from the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    Bump(BumpType),
    Literal(String),
}

/// Increments `version` per SemVer rules. Pre-release and build
/// metadata are cleared, so `1.2.3-beta.1` bumped as patch becomes
/// `1.2.4`.
#[must_use]
pub fn bump_version(version: &Version, bump_type: BumpType) -> Version {
    let mut new_version = version.clone();

    match bump_type {
        BumpType::Major => {
            new_version.major += 1;
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpType::Minor => {
            new_version.minor += 1;
            new_version.patch = 0;
        }
        BumpType::Patch => {
            new_version.patch += 1;
        }
    }

    new_version.pre = semver::Prerelease::EMPTY;
    new_version.build = semver::BuildMetadata::EMPTY;

    new_version
}

/// Computes the next version from `old` and a request.
///
/// # Errors
///
/// Returns [`VersionError::Parse`] if a literal version is not valid
/// SemVer, and [`VersionError::NotGreater`] if it does not compare
/// strictly greater than `old`.
pub fn plan_version(old: &Version, request: &VersionRequest) -> Result<Version> {
    match request {
        VersionRequest::Bump(bump_type) => Ok(bump_version(old, *bump_type)),
        VersionRequest::Literal(raw) => {
            let new_version = Version::parse(raw).map_err(|source| VersionError::Parse {
                version: raw.clone(),
                source,
            })?;

            if new_version <= *old {
                return Err(VersionError::NotGreater {
                    old_version: old.clone(),
                    new_version,
                });
            }

            Ok(new_version)
        }
    }
}
