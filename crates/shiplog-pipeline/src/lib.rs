mod assets;
mod context;
mod error;
mod hooks;
pub mod mocks;
mod pipeline;
mod providers;
mod traits;
mod version_file;

pub use assets::resolve_assets;
pub use context::{Credentials, Hook, HookSet, ReleaseContext, ReleaseKind, StageToggles};
pub use error::PipelineError;
pub use hooks::expand_command;
pub use pipeline::{PipelineOutcome, ReleasePipeline, ReleaseReport};
pub use providers::{Git2Provider, GithubHostingProvider, ShellHookRunner};
pub use traits::{GitProvider, HookRunner, HostingProvider};
pub use version_file::rewrite_version_field;

pub type Result<T> = std::result::Result<T, PipelineError>;
