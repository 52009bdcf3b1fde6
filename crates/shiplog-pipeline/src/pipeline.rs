use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};

use shiplog_changelog::{AppliedRelease, apply_release, new_changelog, read_changelog, write_changelog};
use shiplog_github::{CreatedRelease, ReleaseRequest};

use crate::Result;
use crate::assets::resolve_assets;
use crate::context::{Hook, ReleaseContext};
use crate::error::PipelineError;
use crate::hooks::expand_command;
use crate::traits::{GitProvider, HookRunner, HostingProvider};
use crate::version_file::rewrite_version_field;

/// How a release run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// No changelog existed. A template was written and staged, and
    /// the run stopped so the operator can document changes first.
    /// Deliberately not an error.
    ChangelogCreated { path: PathBuf },
    Completed(ReleaseReport),
}

#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub new_tag: String,
    pub first_release: bool,
    pub release_notes: Option<String>,
    pub release_url: Option<String>,
    pub uploaded_assets: usize,
}

enum ChangelogStage {
    Created(PathBuf),
    Applied(AppliedRelease),
    Skipped,
}

/// Drives the release stages in a fixed order against an immutable
/// [`ReleaseContext`]. Every precondition check runs before the first
/// local mutation; the first failure aborts the run and completed
/// stages are never rolled back.
pub struct ReleasePipeline<G, H, R> {
    git: G,
    hosting: H,
    hooks: R,
    project_root: PathBuf,
}

impl<G: GitProvider, H: HostingProvider, R: HookRunner> ReleasePipeline<G, H, R> {
    pub fn new(git: G, hosting: H, hooks: R, project_root: impl Into<PathBuf>) -> Self {
        Self {
            git,
            hosting,
            hooks,
            project_root: project_root.into(),
        }
    }

    /// Runs the whole pipeline:
    /// validate, precheck, changelog, version file, hooks, commit,
    /// push, publish, asset upload.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure. Local mutations performed by
    /// earlier stages stay in place for manual reconciliation.
    pub async fn run(&self, ctx: &ReleaseContext) -> Result<PipelineOutcome> {
        validate(ctx)?;
        self.precheck(ctx).await?;

        let applied = match self.mutate_changelog(ctx)? {
            ChangelogStage::Created(path) => {
                return Ok(PipelineOutcome::ChangelogCreated { path });
            }
            ChangelogStage::Applied(applied) => Some(applied),
            ChangelogStage::Skipped => None,
        };

        self.mutate_version_file(ctx)?;
        self.run_hook(ctx, "pre-commit", ctx.hooks.pre_commit.as_ref())?;
        let assets = self.pre_release(ctx)?;

        if self.commit(ctx)? {
            self.git.push(&self.project_root, &ctx.branch, &ctx.credentials)?;
            info!("pushed changes to origin/{}", ctx.branch);
        }

        let mut release_url = None;
        let mut uploaded_assets = 0;
        if ctx.toggles.publish_release {
            let created = self.publish(ctx, applied.as_ref()).await?;
            uploaded_assets = self.upload_assets(&created.upload_url, &assets).await?;
            release_url = Some(created.html_url);
        }

        self.run_hook(ctx, "post-release", ctx.hooks.post_release.as_ref())?;

        Ok(PipelineOutcome::Completed(ReleaseReport {
            new_tag: ctx.new_tag(),
            first_release: applied.as_ref().is_some_and(|a| a.first_release),
            release_notes: applied.map(|a| a.notes),
            release_url,
            uploaded_assets,
        }))
    }

    /// All destructive checks run here, before any mutation stage.
    async fn precheck(&self, ctx: &ReleaseContext) -> Result<()> {
        info!("checking release preconditions");

        let permission = self.hosting.check_permission(&ctx.repository).await?;
        if !permission.can_push() {
            return Err(PipelineError::PermissionDenied {
                user: ctx.credentials.user.clone(),
                repository: format!("{}/{}", ctx.repository.owner, ctx.repository.repo),
            });
        }

        let actual = self.git.remote_url(&self.project_root)?;
        if actual.as_deref() != Some(ctx.remote_url.as_str()) {
            return Err(PipelineError::RemoteMismatch {
                expected: ctx.remote_url.clone(),
                actual: actual.unwrap_or_else(|| "<none>".to_string()),
            });
        }

        self.git.fetch_origin(&self.project_root, &ctx.branch)?;

        let branch = self.git.current_branch(&self.project_root)?;
        if branch != ctx.branch {
            if ctx.toggles.strict_branch {
                return Err(PipelineError::WrongBranch {
                    expected: ctx.branch.clone(),
                    actual: branch,
                });
            }
            warn!(
                expected = %ctx.branch,
                actual = %branch,
                "releasing from a non-release branch"
            );
        }

        if !self.git.is_clean_against(&self.project_root, &ctx.branch)? {
            return Err(PipelineError::DirtyWorkingTree {
                branch: ctx.branch.clone(),
            });
        }

        info!("git status OK");
        Ok(())
    }

    fn mutate_changelog(&self, ctx: &ReleaseContext) -> Result<ChangelogStage> {
        if !ctx.toggles.update_changelog {
            return Ok(ChangelogStage::Skipped);
        }

        let path = self.project_root.join(&ctx.changelog_path);
        if !path.exists() {
            write_changelog(&path, new_changelog())?;
            self.git.stage_files(&self.project_root, &[&path])?;
            return Ok(ChangelogStage::Created(path));
        }

        let text = read_changelog(&path)?;
        let applied = apply_release(
            &text,
            &ctx.new_tag(),
            &ctx.old_tag(),
            &ctx.repository.web_link,
            Utc::now().date_naive(),
        )?;
        write_changelog(&path, &applied.text)?;
        info!(path = %path.display(), "updated changelog");

        Ok(ChangelogStage::Applied(applied))
    }

    fn mutate_version_file(&self, ctx: &ReleaseContext) -> Result<()> {
        if !ctx.toggles.update_version_file {
            return Ok(());
        }

        let path = self.project_root.join(&ctx.version_file_path);
        let text =
            std::fs::read_to_string(&path).map_err(|source| PipelineError::VersionFileRead {
                path: path.clone(),
                source,
            })?;

        let rewritten = rewrite_version_field(&text, &ctx.new_version)
            .ok_or_else(|| PipelineError::VersionFieldMissing { path: path.clone() })?;

        std::fs::write(&path, rewritten).map_err(|source| PipelineError::VersionFileWrite {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "updated version file");

        Ok(())
    }

    fn run_hook(&self, ctx: &ReleaseContext, name: &str, hook: Option<&Hook>) -> Result<()> {
        let Some(hook) = hook else {
            return Ok(());
        };

        let command = expand_command(&hook.command, &ctx.placeholder_values());
        info!(name, "executing hook");

        let code = self.hooks.run(&command, hook.silent)?;
        if code != 0 {
            return Err(PipelineError::HookFailed {
                name: name.to_string(),
                code,
            });
        }
        Ok(())
    }

    /// Pre-release hook plus asset resolution; both only matter when a
    /// hosted release will be published.
    fn pre_release(&self, ctx: &ReleaseContext) -> Result<Vec<PathBuf>> {
        if !ctx.toggles.publish_release {
            return Ok(Vec::new());
        }

        self.run_hook(ctx, "pre-release", ctx.hooks.pre_release.as_ref())?;

        let assets = resolve_assets(&ctx.asset_globs)?;
        if !assets.is_empty() {
            debug!(count = assets.len(), "resolved release assets");
        }
        Ok(assets)
    }

    fn commit(&self, ctx: &ReleaseContext) -> Result<bool> {
        let mut files = Vec::new();
        if ctx.toggles.update_changelog {
            files.push(self.project_root.join(&ctx.changelog_path));
        }
        if ctx.toggles.update_version_file {
            files.push(self.project_root.join(&ctx.version_file_path));
        }

        if files.is_empty() {
            debug!("no local mutations; skipping commit and push");
            return Ok(false);
        }

        let paths: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
        self.git.stage_files(&self.project_root, &paths)?;

        let commit = self.git.commit(&self.project_root, &ctx.new_tag())?;
        info!(sha = %commit.sha, "committed release changes");
        Ok(true)
    }

    async fn publish(
        &self,
        ctx: &ReleaseContext,
        applied: Option<&AppliedRelease>,
    ) -> Result<CreatedRelease> {
        let body = if ctx.toggles.populate_notes {
            applied.map(|a| a.notes.clone()).unwrap_or_default()
        } else {
            String::new()
        };

        let request = ReleaseRequest {
            tag_name: ctx.new_tag(),
            target_commitish: ctx.branch.clone(),
            name: format!("Release {}", ctx.new_tag()),
            body,
        };

        let created = self.hosting.create_release(&ctx.repository, &request).await?;
        info!(tag = %request.tag_name, "created release");
        Ok(created)
    }

    /// Uploads are independent, so they all go out at once. The stage
    /// waits for every upload to settle and fails if any one failed;
    /// assets already transferred are not retracted.
    async fn upload_assets(&self, upload_url: &str, assets: &[PathBuf]) -> Result<usize> {
        if assets.is_empty() {
            return Ok(0);
        }

        info!(count = assets.len(), "uploading assets");

        let uploads = assets.iter().map(|asset| self.upload_one(upload_url, asset));
        let results = join_all(uploads).await;

        let count = results.len();
        for result in results {
            result?;
        }

        info!("finished uploading assets");
        Ok(count)
    }

    async fn upload_one(&self, upload_url: &str, asset: &Path) -> Result<()> {
        let name = asset
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PipelineError::InvalidAssetPath {
                path: asset.to_path_buf(),
            })?;

        let bytes = tokio::fs::read(asset).await?;
        let content_type = mime_guess::from_path(asset).first_or_octet_stream();

        self.hosting
            .upload_asset(upload_url, name, content_type.essence_str(), bytes)
            .await
    }
}

fn validate(ctx: &ReleaseContext) -> Result<()> {
    if ctx.new_version <= ctx.old_version {
        return Err(shiplog_version::VersionError::NotGreater {
            old_version: ctx.old_version.clone(),
            new_version: ctx.new_version.clone(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use semver::Version;
    use tempfile::TempDir;

    use shiplog_changelog::RepositoryInfo;

    use super::*;
    use crate::context::{Credentials, Hook, HookSet, ReleaseKind, StageToggles};
    use crate::mocks::{MockGitProvider, MockHookRunner, MockHostingProvider};

    const REMOTE: &str = "https://github.com/owner/widget.git";

    fn context(_root: &Path) -> ReleaseContext {
        ReleaseContext {
            project_name: "widget".to_string(),
            old_version: Version::new(1, 0, 0),
            new_version: Version::new(1, 1, 0),
            release_kind: ReleaseKind::Minor,
            remote_url: REMOTE.to_string(),
            branch: "master".to_string(),
            repository: RepositoryInfo::from_url("https://github.com/owner/widget")
                .expect("valid url"),
            credentials: Credentials::new("owner", "token"),
            changelog_path: "CHANGELOG.md".into(),
            version_file_path: "package.json".into(),
            asset_globs: Vec::new(),
            hooks: HookSet::default(),
            toggles: StageToggles::default(),
        }
    }

    fn write_project_files(root: &Path) {
        fs::write(
            root.join("CHANGELOG.md"),
            "# Changelog\n\n## Unreleased\n\n### Added\n- shiny thing\n",
        )
        .expect("write changelog");
        fs::write(
            root.join("package.json"),
            "{\n  \"name\": \"widget\",\n  \"version\": \"1.0.0\"\n}\n",
        )
        .expect("write package.json");
    }

    fn pipeline(
        root: &Path,
        git: MockGitProvider,
        hosting: MockHostingProvider,
        hooks: MockHookRunner,
    ) -> ReleasePipeline<MockGitProvider, MockHostingProvider, MockHookRunner> {
        ReleasePipeline::new(git, hosting, hooks, root)
    }

    #[tokio::test]
    async fn happy_path_runs_stages_in_order() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let ctx = context(dir.path());

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let outcome = pipeline.run(&ctx).await.expect("pipeline succeeds");
        let PipelineOutcome::Completed(report) = outcome else {
            panic!("expected completed outcome");
        };

        assert_eq!(report.new_tag, "v1.1.0");
        assert!(report.first_release);
        assert_eq!(report.release_notes.as_deref(), Some("### Added\n- shiny thing"));
        assert_eq!(report.uploaded_assets, 0);

        assert_eq!(
            pipeline.git.calls(),
            vec![
                "remote_url",
                "fetch_origin",
                "current_branch",
                "is_clean_against",
                "stage_files",
                "commit",
                "push",
            ]
        );
        assert_eq!(
            pipeline.hosting.calls(),
            vec!["check_permission", "create_release"]
        );

        let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).expect("read");
        assert!(changelog.contains("## [Unreleased]"));
        assert!(changelog.contains("## v1.1.0 - "));

        let package = fs::read_to_string(dir.path().join("package.json")).expect("read");
        assert!(package.contains("\"version\": \"1.1.0\""));
    }

    #[tokio::test]
    async fn permission_failure_wins_over_dirty_tree() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let original = fs::read_to_string(dir.path().join("CHANGELOG.md")).expect("read");
        let ctx = context(dir.path());

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE).with_clean(false),
            MockHostingProvider::new().with_permission("read"),
            MockHookRunner::new(),
        );

        let result = pipeline.run(&ctx).await;
        assert!(matches!(result, Err(PipelineError::PermissionDenied { .. })));

        // Prechecks abort before any mutation.
        let after = fs::read_to_string(dir.path().join("CHANGELOG.md")).expect("read");
        assert_eq!(after, original);
        assert!(pipeline.git.calls().is_empty());
    }

    #[tokio::test]
    async fn remote_mismatch_aborts_before_mutations() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let ctx = context(dir.path());

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new("https://github.com/other/fork.git"),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let result = pipeline.run(&ctx).await;
        assert!(matches!(result, Err(PipelineError::RemoteMismatch { .. })));
        assert_eq!(pipeline.git.calls(), vec!["remote_url"]);
    }

    #[tokio::test]
    async fn dirty_tree_aborts_before_mutations() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let ctx = context(dir.path());

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE).with_clean(false),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let result = pipeline.run(&ctx).await;
        assert!(matches!(result, Err(PipelineError::DirtyWorkingTree { .. })));
        assert!(!pipeline.git.calls().contains(&"stage_files".to_string()));
    }

    #[tokio::test]
    async fn wrong_branch_is_fatal_when_strict() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let ctx = context(dir.path());

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE).with_branch("feature/foo"),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let result = pipeline.run(&ctx).await;
        assert!(matches!(result, Err(PipelineError::WrongBranch { .. })));
    }

    #[tokio::test]
    async fn wrong_branch_is_a_warning_when_lenient() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let mut ctx = context(dir.path());
        ctx.toggles.strict_branch = false;

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE).with_branch("feature/foo"),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let outcome = pipeline.run(&ctx).await.expect("pipeline succeeds");
        assert!(matches!(outcome, PipelineOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn missing_changelog_creates_template_and_stops() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("package.json"),
            "{\"version\": \"1.0.0\"}\n",
        )
        .expect("write package.json");
        let ctx = context(dir.path());

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let outcome = pipeline.run(&ctx).await.expect("pipeline succeeds");
        let PipelineOutcome::ChangelogCreated { path } = outcome else {
            panic!("expected changelog-created outcome");
        };

        let template = fs::read_to_string(&path).expect("read template");
        assert!(template.contains("## Unreleased"));

        // The template is staged but nothing is committed.
        let calls = pipeline.git.calls();
        assert!(calls.contains(&"stage_files".to_string()));
        assert!(!calls.contains(&"commit".to_string()));
    }

    #[tokio::test]
    async fn failing_pre_commit_hook_halts_before_commit() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let mut ctx = context(dir.path());
        ctx.hooks.pre_commit = Some(Hook {
            command: "run-checks".to_string(),
            silent: false,
        });

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new().with_exit_code(2),
        );

        let result = pipeline.run(&ctx).await;
        assert!(matches!(
            result,
            Err(PipelineError::HookFailed { code: 2, .. })
        ));
        assert!(!pipeline.git.calls().contains(&"commit".to_string()));
    }

    #[tokio::test]
    async fn hook_commands_are_expanded_before_running() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let mut ctx = context(dir.path());
        ctx.hooks.post_release = Some(Hook {
            command: "notify ${repo.name} ${release.new_tag}".to_string(),
            silent: true,
        });

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        pipeline.run(&ctx).await.expect("pipeline succeeds");
        assert_eq!(pipeline.hooks.commands(), vec!["notify widget v1.1.0"]);
    }

    #[tokio::test]
    async fn uploads_every_asset_and_reports_the_count() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        fs::write(dir.path().join("app-linux.tar.gz"), b"linux").expect("write asset");
        fs::write(dir.path().join("app-macos.tar.gz"), b"macos").expect("write asset");

        let mut ctx = context(dir.path());
        ctx.asset_globs = vec![dir
            .path()
            .join("*.tar.gz")
            .to_string_lossy()
            .into_owned()];

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let outcome = pipeline.run(&ctx).await.expect("pipeline succeeds");
        let PipelineOutcome::Completed(report) = outcome else {
            panic!("expected completed outcome");
        };

        assert_eq!(report.uploaded_assets, 2);
        assert_eq!(pipeline.hosting.upload_attempts(), 2);
    }

    #[tokio::test]
    async fn one_failed_upload_fails_the_stage_after_all_settle() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        for name in ["a.bin", "b.bin", "c.bin"] {
            fs::write(dir.path().join(name), b"bytes").expect("write asset");
        }

        let mut ctx = context(dir.path());
        ctx.asset_globs = vec![dir.path().join("*.bin").to_string_lossy().into_owned()];

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new().failing_upload("b.bin"),
            MockHookRunner::new(),
        );

        let result = pipeline.run(&ctx).await;
        assert!(result.is_err());
        // Every upload was issued even though one of them failed.
        assert_eq!(pipeline.hosting.upload_attempts(), 3);
    }

    #[tokio::test]
    async fn missing_assets_abort_before_commit() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let mut ctx = context(dir.path());
        ctx.asset_globs = vec![dir.path().join("*.zip").to_string_lossy().into_owned()];

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let result = pipeline.run(&ctx).await;
        assert!(matches!(result, Err(PipelineError::AssetsNotFound { .. })));
        assert!(!pipeline.git.calls().contains(&"commit".to_string()));
    }

    #[tokio::test]
    async fn publish_toggle_skips_hosting_mutations() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let mut ctx = context(dir.path());
        ctx.toggles.publish_release = false;

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let outcome = pipeline.run(&ctx).await.expect("pipeline succeeds");
        let PipelineOutcome::Completed(report) = outcome else {
            panic!("expected completed outcome");
        };

        assert!(report.release_url.is_none());
        assert_eq!(pipeline.hosting.calls(), vec!["check_permission"]);
    }

    #[tokio::test]
    async fn non_increasing_version_fails_validation() {
        let dir = TempDir::new().expect("temp dir");
        write_project_files(dir.path());
        let mut ctx = context(dir.path());
        ctx.new_version = Version::new(1, 0, 0);

        let pipeline = pipeline(
            dir.path(),
            MockGitProvider::new(REMOTE),
            MockHostingProvider::new(),
            MockHookRunner::new(),
        );

        let result = pipeline.run(&ctx).await;
        assert!(matches!(result, Err(PipelineError::Version(_))));
        assert!(pipeline.hosting.calls().is_empty());
    }
}
