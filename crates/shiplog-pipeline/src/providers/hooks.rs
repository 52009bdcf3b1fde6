use std::process::{Command, Stdio};

use crate::traits::HookRunner;
use crate::Result;

/// Runs hook commands through the platform shell, matching what an
/// operator would type at a prompt.
pub struct ShellHookRunner;

impl ShellHookRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellHookRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRunner for ShellHookRunner {
    fn run(&self, command: &str, silent: bool) -> Result<i32> {
        let mut shell = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        if silent {
            shell.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = shell.status()?;
        Ok(status.code().unwrap_or(-1))
    }
}
