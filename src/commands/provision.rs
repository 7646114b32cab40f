//! Provision command implementation
//!
//! Runs the full sequential flow: resolve settings, verify the environment,
//! ensure the local clone and remotes, ensure the hosted fork, patch the
//! template files (committing only real changes), and push.

use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::time::Instant;

use course_repo::git::GitClient;
use course_repo::output::{emoji, OutputConfig};
use course_repo::settings::{Settings, SettingsOverlay, PROPERTIES_FILE};
use course_repo::{template, verify};

/// Arguments for the provision command
///
/// Every flag is optional here; unset values fall through to environment
/// variables and `settings.properties`.
#[derive(Args, Debug, Default)]
pub struct ProvisionArgs {
    /// Student ID
    #[arg(long, value_name = "ID")]
    pub student_id: Option<String>,

    /// First name
    #[arg(long, value_name = "NAME")]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long, value_name = "NAME")]
    pub last_name: Option<String>,

    /// GitHub username owning the student fork
    #[arg(long, value_name = "USER")]
    pub github_username: Option<String>,

    /// GitHub organization owning the course templates
    #[arg(long, value_name = "ORG")]
    pub provider_github: Option<String>,

    /// Prefix for the fork's repository name
    #[arg(long, value_name = "PREFIX")]
    pub repo_prefix: Option<String>,

    /// Prefix for the local clone directory
    #[arg(long, value_name = "PREFIX")]
    pub repo_dir_prefix: Option<String>,

    /// Task number (H00, H01, ...)
    #[arg(short = 't', long, value_name = "TASK")]
    pub task: Option<String>,

    /// Base name of the template repositories
    #[arg(long, value_name = "NAME")]
    pub base_name: Option<String>,

    /// Suffix of the template repositories
    #[arg(long, value_name = "SUFFIX")]
    pub base_suffix: Option<String>,

    /// Base URL of the exercise sheet PDFs
    #[arg(long, value_name = "URL")]
    pub pdf_base: Option<String>,
}

impl ProvisionArgs {
    fn into_overlay(self, debug: bool) -> SettingsOverlay {
        SettingsOverlay {
            debug,
            student_id: self.student_id,
            first_name: self.first_name,
            last_name: self.last_name,
            github_username: self.github_username,
            provider_github: self.provider_github,
            repo_prefix: self.repo_prefix,
            repo_dir_prefix: self.repo_dir_prefix,
            task: self.task,
            base_name: self.base_name,
            base_suffix: self.base_suffix,
            pdf_base: self.pdf_base,
        }
    }
}

/// Execute the provision command
pub fn execute(args: ProvisionArgs, debug: bool, out: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let settings = Settings::resolve([
        args.into_overlay(debug),
        SettingsOverlay::from_env(),
        SettingsOverlay::from_properties_file(Path::new(PROPERTIES_FILE))?,
    ])?;

    println!(
        "{} Provisioning {} from {}",
        emoji(out, "🚀", "[RUN]"),
        settings.my_repo,
        settings.original_repo
    );
    println!();

    verify::verify_setup()?;

    let git = GitClient::new(settings.my_repo_url.clone(), &settings.local_repo_dir)?;

    println!(
        "{} Ensuring local clone at {}",
        emoji(out, "📥", "[CLONE]"),
        settings.local_repo_dir.display()
    );
    git.ensure_clone(&settings.original_repo_url)?;

    git.set_remote("origin", &settings.my_repo_url)?;
    git.set_remote("upstream", &settings.original_repo_url)?;

    println!(
        "{} Ensuring private repository {}",
        emoji(out, "🌐", "[REMOTE]"),
        settings.my_repo
    );
    if git.ensure_origin_repository(true)? {
        log::info!("created private repository {}", settings.my_repo);
    }

    println!("{} Patching template files", emoji(out, "📝", "[PATCH]"));
    template::write_build_workflow(&git)?;
    git.commit_paths("Add build workflow", &[template::WORKFLOW_PATH])?;

    template::patch_build_gradle(&git, &settings)?;
    git.commit_paths("Update build.gradle.kts", &[template::BUILD_FILE_PATH])?;

    template::append_readme_links(&git, &settings)?;
    git.commit_paths("Update README.md", &[template::README_PATH])?;

    println!("{} Pushing to {}", emoji(out, "📤", "[PUSH]"), settings.my_repo);
    git.push()?;

    let duration = start_time.elapsed();
    println!();
    println!(
        "{} Provisioned {} in {:.2}s",
        emoji(out, "✅", "[DONE]"),
        settings.my_repo,
        duration.as_secs_f64()
    );

    Ok(())
}
