use crate::Result;

pub trait HookRunner: Send + Sync {
    /// Runs an already-expanded hook command and returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned at all; a
    /// command that runs and exits non-zero is reported through the
    /// exit code, not as an error.
    fn run(&self, command: &str, silent: bool) -> Result<i32>;
}
