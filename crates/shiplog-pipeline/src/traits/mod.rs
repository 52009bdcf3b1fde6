mod git_provider;
mod hook_runner;
mod hosting_provider;

pub use git_provider::GitProvider;
pub use hook_runner::HookRunner;
pub use hosting_provider::HostingProvider;
