use std::path::PathBuf;

use crate::error::PipelineError;
use crate::Result;

/// Resolves configured asset globs to concrete files. Every pattern
/// must match at least one file; directories are skipped.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidAssetPattern`] for a malformed glob
/// and [`PipelineError::AssetsNotFound`] for a pattern with no file
/// matches.
pub fn resolve_assets(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut assets = Vec::new();

    for pattern in patterns {
        let entries =
            glob::glob(pattern).map_err(|source| PipelineError::InvalidAssetPattern {
                pattern: pattern.clone(),
                source,
            })?;

        let mut matched = false;
        for entry in entries {
            let path = entry.map_err(|e| PipelineError::Io(e.into_error()))?;
            if path.is_file() {
                assets.push(path);
                matched = true;
            }
        }

        if !matched {
            return Err(PipelineError::AssetsNotFound {
                pattern: pattern.clone(),
            });
        }
    }

    Ok(assets)
}
