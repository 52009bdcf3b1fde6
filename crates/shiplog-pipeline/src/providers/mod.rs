mod git;
mod hooks;
mod hosting;

pub use git::Git2Provider;
pub use hooks::ShellHookRunner;
pub use hosting::GithubHostingProvider;
