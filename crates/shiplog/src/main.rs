mod config;
mod error;
mod interaction;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shiplog_changelog::RepositoryInfo;
use shiplog_github::GithubClient;
use shiplog_pipeline::{
    Credentials, Git2Provider, GithubHostingProvider, PipelineOutcome, ReleaseContext, ReleaseKind,
    ReleasePipeline, ShellHookRunner,
};
use shiplog_version::{BumpType, VersionRequest, plan_version};

use crate::config::{DEFAULT_CONFIG_FILE, Overrides};
use crate::error::{CliError, Result};

#[derive(Parser)]
#[command(name = "shiplog")]
#[command(version)]
#[command(
    about = "Cut a release: bump the version, update the changelog, push, and publish",
    long_about = None
)]
struct Cli {
    /// Project root (default: current directory)
    #[arg(long = "path", short = 'C')]
    path: Option<PathBuf>,

    /// Config file, relative to the project root
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Release type (skips the interactive prompt)
    #[arg(long = "type", value_enum)]
    release_type: Option<ReleaseTypeArg>,

    /// Exact version to release instead of a bump
    #[arg(long, conflicts_with = "release_type")]
    set_version: Option<String>,

    /// Git remote URL (overrides the config file)
    #[arg(long)]
    remote: Option<String>,

    /// Release branch (overrides the config file)
    #[arg(long)]
    branch: Option<String>,

    /// Hosting account to authenticate as
    #[arg(long)]
    user: Option<String>,

    /// API token (falls back to $SHIPLOG_TOKEN, then a prompt)
    #[arg(long)]
    token: Option<String>,

    /// Changelog path relative to the project root (overrides the config file)
    #[arg(long)]
    changelog: Option<PathBuf>,

    /// Version file path relative to the project root (overrides the config file)
    #[arg(long)]
    version_file: Option<PathBuf>,

    /// Additional asset glob to upload (repeatable)
    #[arg(long = "asset")]
    assets: Vec<String>,

    /// Leave the changelog untouched
    #[arg(long)]
    no_changelog: bool,

    /// Leave the version file untouched
    #[arg(long)]
    no_version_file: bool,

    /// Commit and push only; skip the hosted release
    #[arg(long)]
    no_release: bool,

    /// Allow releasing from a branch other than the configured one
    #[arg(long)]
    any_branch: bool,

    /// Answer yes to the confirmation prompt
    #[arg(long, short = 'y')]
    yes: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ReleaseTypeArg {
    Patch,
    Minor,
    Major,
}

impl From<ReleaseTypeArg> for BumpType {
    fn from(arg: ReleaseTypeArg) -> Self {
        match arg {
            ReleaseTypeArg::Patch => Self::Patch,
            ReleaseTypeArg::Minor => Self::Minor,
            ReleaseTypeArg::Major => Self::Major,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let root = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().map_err(CliError::CurrentDir)?,
    };

    let overrides = Overrides {
        remote: cli.remote,
        branch: cli.branch,
        user: cli.user,
        changelog: cli.changelog,
        version_file: cli.version_file,
        assets: cli.assets,
        no_changelog: cli.no_changelog,
        no_version_file: cli.no_version_file,
        no_release: cli.no_release,
        any_branch: cli.any_branch,
    };
    let effective = config::load_config(&root.join(&cli.config))?.apply_overrides(&overrides);

    if cli.dump_config {
        let rendered = serde_json::to_string_pretty(&effective).map_err(CliError::ConfigRender)?;
        println!("{rendered}");
        return Ok(());
    }

    let settings = effective.into_settings()?;
    let project = config::read_project_info(&root.join(&settings.version_file_path), &root)?;

    let request = if let Some(raw) = cli.set_version {
        VersionRequest::Literal(raw)
    } else if let Some(release_type) = cli.release_type {
        VersionRequest::Bump(release_type.into())
    } else {
        match interaction::select_version_request(&project.version)? {
            Some(request) => request,
            None => {
                println!("Release aborted.");
                return Ok(());
            }
        }
    };
    let new_version = plan_version(&project.version, &request)?;

    let user = match settings.user.clone() {
        Some(user) => user,
        None => interaction::prompt_user()?,
    };
    let token = match cli.token {
        Some(token) => token,
        None => match std::env::var("SHIPLOG_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => interaction::prompt_token(&user)?,
        },
    };

    let repository = RepositoryInfo::from_url(&settings.remote)?;

    let ctx = ReleaseContext {
        project_name: project.name,
        old_version: project.version,
        new_version,
        release_kind: ReleaseKind::from(&request),
        remote_url: settings.remote,
        branch: settings.branch,
        repository,
        credentials: Credentials::new(&user, &token),
        changelog_path: settings.changelog_path,
        version_file_path: settings.version_file_path,
        asset_globs: settings.asset_globs,
        hooks: settings.hooks,
        toggles: settings.toggles,
    };

    if !cli.yes {
        let summary = format!(
            "Release {} {} (currently {}) from branch '{}'?",
            ctx.project_name,
            ctx.new_tag(),
            ctx.old_tag(),
            ctx.branch
        );
        if !interaction::confirm_release(&summary)? {
            println!("Release aborted.");
            return Ok(());
        }
    }

    let client = GithubClient::new(&user, &token)?;
    let pipeline = ReleasePipeline::new(
        Git2Provider::new(),
        GithubHostingProvider::new(client),
        ShellHookRunner::new(),
        &root,
    );

    match pipeline.run(&ctx).await? {
        PipelineOutcome::ChangelogCreated { path } => {
            println!("Created '{}'.", path.display());
            println!("Document your changes under 'Unreleased' and run shiplog again.");
        }
        PipelineOutcome::Completed(report) => {
            println!("Released {}.", report.new_tag);
            if let Some(url) = report.release_url {
                println!("Release page: {url}");
            }
            if report.uploaded_assets > 0 {
                println!("Uploaded {} asset(s).", report.uploaded_assets);
            }
        }
    }

    Ok(())
}

fn print_error(error: &CliError) {
    eprintln!("ERROR: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
