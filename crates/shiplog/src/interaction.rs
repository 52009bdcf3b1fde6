use std::io::IsTerminal;

use dialoguer::{Confirm, Input, Password, Select};
use semver::Version;

use shiplog_version::{BumpType, VersionRequest, bump_version};

use crate::error::{CliError, Result};

fn is_interactive() -> bool {
    std::env::var("SHIPLOG_FORCE_TTY").is_ok() || std::io::stdin().is_terminal()
}

fn map_dialoguer(e: dialoguer::Error) -> CliError {
    match e {
        dialoguer::Error::IO(io_err) => CliError::Io(io_err),
    }
}

/// Asks which kind of release to cut. Returns `None` when the user
/// backs out of the prompt.
///
/// # Errors
///
/// Returns [`CliError::NotATty`] when stdin is not a terminal.
pub fn select_version_request(old: &Version) -> Result<Option<VersionRequest>> {
    if !is_interactive() {
        return Err(CliError::NotATty);
    }

    let items = [
        format!("patch ({})", bump_version(old, BumpType::Patch)),
        format!("minor ({})", bump_version(old, BumpType::Minor)),
        format!("major ({})", bump_version(old, BumpType::Major)),
        "specific version".to_string(),
    ];

    let selection = Select::new()
        .with_prompt(format!("Select release type (current version: {old})"))
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(map_dialoguer)?;

    match selection {
        Some(0) => Ok(Some(VersionRequest::Bump(BumpType::Patch))),
        Some(1) => Ok(Some(VersionRequest::Bump(BumpType::Minor))),
        Some(2) => Ok(Some(VersionRequest::Bump(BumpType::Major))),
        Some(3) => {
            let raw: String = Input::new()
                .with_prompt("Version to release")
                .interact_text()
                .map_err(map_dialoguer)?;
            Ok(Some(VersionRequest::Literal(raw)))
        }
        _ => Ok(None),
    }
}

/// # Errors
///
/// Returns [`CliError::NotATty`] when stdin is not a terminal.
pub fn prompt_user() -> Result<String> {
    if !is_interactive() {
        return Err(CliError::NotATty);
    }

    Input::new()
        .with_prompt("GitHub user")
        .interact_text()
        .map_err(map_dialoguer)
}

/// # Errors
///
/// Returns [`CliError::NotATty`] when stdin is not a terminal.
pub fn prompt_token(user: &str) -> Result<String> {
    if !is_interactive() {
        return Err(CliError::NotATty);
    }

    Password::new()
        .with_prompt(format!("GitHub token for '{user}'"))
        .interact()
        .map_err(map_dialoguer)
}

/// A declined or dismissed prompt both count as "no".
///
/// # Errors
///
/// Returns [`CliError::NotATty`] when stdin is not a terminal.
pub fn confirm_release(summary: &str) -> Result<bool> {
    if !is_interactive() {
        return Err(CliError::NotATty);
    }

    Confirm::new()
        .with_prompt(summary)
        .default(false)
        .interact_opt()
        .map(|choice| choice.unwrap_or(false))
        .map_err(map_dialoguer)
}
