//! # Layered Settings
//!
//! This module assembles the configuration record a provisioning run works
//! from. Values come from three sources, merged per field with
//! first-non-null-wins precedence:
//!
//! 1. Command-line flags
//! 2. Environment variables
//! 3. The `settings.properties` file in the working directory
//!
//! Each source produces a [`SettingsOverlay`] (every field optional);
//! [`Settings::resolve`] merges them, fails fast on any missing required
//! field, and computes the derived repository names and URLs used by the
//! provisioning flow.
//!
//! The `debug` flag is the only non-string setting; it is OR-ed across
//! sources rather than overridden.

use std::env;
use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{Error, Result};

/// Default location of the properties source, relative to the working
/// directory.
pub const PROPERTIES_FILE: &str = "settings.properties";

/// A partial settings record produced by one source.
///
/// Fields that the source does not provide stay `None` and fall through to
/// the next source during merging.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverlay {
    pub debug: bool,
    pub student_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub github_username: Option<String>,
    pub provider_github: Option<String>,
    pub repo_prefix: Option<String>,
    pub repo_dir_prefix: Option<String>,
    pub task: Option<String>,
    pub base_name: Option<String>,
    pub base_suffix: Option<String>,
    pub pdf_base: Option<String>,
}

impl SettingsOverlay {
    /// Read an overlay from the process environment.
    pub fn from_env() -> Self {
        Self {
            debug: env::var("DEBUG").is_ok_and(|v| v.eq_ignore_ascii_case("true")),
            student_id: env::var("STUDENT_ID").ok(),
            first_name: env::var("FIRST_NAME").ok(),
            last_name: env::var("LAST_NAME").ok(),
            github_username: env::var("GITHUB_USERNAME").ok(),
            provider_github: env::var("PROVIDER_GITHUB").ok(),
            repo_prefix: env::var("REPO_PREFIX").ok(),
            repo_dir_prefix: env::var("REPO_DIR_PREFIX").ok(),
            task: env::var("TASK").ok(),
            base_name: env::var("BASE_NAME").ok(),
            base_suffix: env::var("BASE_SUFFIX").ok(),
            pdf_base: env::var("PDF_BASE").ok(),
        }
    }

    /// Read an overlay from a properties file.
    ///
    /// A missing file is not an error; it yields an empty overlay so the
    /// remaining sources decide every field.
    pub fn from_properties_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        Ok(Self::from_properties(&ini))
    }

    fn from_properties(ini: &Ini) -> Self {
        let section = ini.general_section();
        let get = |key: &str| section.get(key).map(str::to_string);
        Self {
            debug: false,
            student_id: get("STUDENT_ID"),
            first_name: get("FIRST_NAME"),
            last_name: get("LAST_NAME"),
            github_username: get("GITHUB_USERNAME"),
            provider_github: get("PROVIDER_GITHUB"),
            repo_prefix: get("REPO_PREFIX"),
            repo_dir_prefix: get("REPO_DIR_PREFIX"),
            task: get("TASK"),
            base_name: get("BASE_NAME"),
            base_suffix: get("BASE_SUFFIX"),
            pdf_base: get("PDF_BASE"),
        }
    }

    /// Merge a sequence of overlays, earlier sources winning per field.
    pub fn merged<I: IntoIterator<Item = Self>>(sources: I) -> Self {
        sources
            .into_iter()
            .fold(Self::default(), |acc, next| acc.or(next))
    }

    fn or(self, fallback: Self) -> Self {
        Self {
            debug: self.debug || fallback.debug,
            student_id: self.student_id.or(fallback.student_id),
            first_name: self.first_name.or(fallback.first_name),
            last_name: self.last_name.or(fallback.last_name),
            github_username: self.github_username.or(fallback.github_username),
            provider_github: self.provider_github.or(fallback.provider_github),
            repo_prefix: self.repo_prefix.or(fallback.repo_prefix),
            repo_dir_prefix: self.repo_dir_prefix.or(fallback.repo_dir_prefix),
            task: self.task.or(fallback.task),
            base_name: self.base_name.or(fallback.base_name),
            base_suffix: self.base_suffix.or(fallback.base_suffix),
            pdf_base: self.pdf_base.or(fallback.pdf_base),
        }
    }
}

/// The fully resolved configuration of a provisioning run.
///
/// Construction goes through [`Settings::resolve`], which guarantees every
/// field is non-empty and all derived names are consistent.
#[derive(Debug, Clone)]
pub struct Settings {
    pub debug: bool,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub github_username: String,
    pub provider_github: String,
    pub repo_prefix: String,
    pub repo_dir_prefix: String,
    pub task: String,
    pub base_name: String,
    pub base_suffix: String,
    pub pdf_base: String,

    /// `base_name + task + base_suffix`, the template repository name.
    pub repo_name: String,
    /// `base_name + task`, used in generated links.
    pub repo_name_no_suffix: String,
    /// The student fork's repository name (`repo_prefix + repo_name`).
    pub my_repo_name: String,
    /// `github_username/my_repo_name`
    pub my_repo: String,
    /// `provider_github/repo_name`
    pub original_repo: String,
    /// `provider_github/repo_name_no_suffix`
    pub original_repo_no_suffix: String,
    /// Push/fetch URL of the student fork. Embeds `GITHUB_TOKEN` when
    /// running under CI.
    pub my_repo_url: String,
    /// Clone URL of the course template repository.
    pub original_repo_url: String,
    /// Absolute path of the local clone directory.
    pub local_repo_dir: PathBuf,
}

impl Settings {
    /// Merge the given overlays and resolve the full settings record.
    ///
    /// Fails with [`Error::MissingSetting`] on the first required field no
    /// source provided.
    pub fn resolve<I: IntoIterator<Item = SettingsOverlay>>(sources: I) -> Result<Self> {
        Self::resolve_with_ci(
            sources,
            env::var("CI").ok(),
            env::var("GITHUB_TOKEN").ok(),
        )
    }

    pub(crate) fn resolve_with_ci<I: IntoIterator<Item = SettingsOverlay>>(
        sources: I,
        ci: Option<String>,
        github_token: Option<String>,
    ) -> Result<Self> {
        let merged = SettingsOverlay::merged(sources);

        fn required(value: Option<String>, key: &'static str) -> Result<String> {
            value.ok_or(Error::MissingSetting { key })
        }

        let student_id = required(merged.student_id, "STUDENT_ID")?;
        let first_name = required(merged.first_name, "FIRST_NAME")?;
        let last_name = required(merged.last_name, "LAST_NAME")?;
        let github_username = required(merged.github_username, "GITHUB_USERNAME")?;
        let provider_github = required(merged.provider_github, "PROVIDER_GITHUB")?;
        let repo_prefix = required(merged.repo_prefix, "REPO_PREFIX")?;
        let repo_dir_prefix = required(merged.repo_dir_prefix, "REPO_DIR_PREFIX")?;
        let task = required(merged.task, "TASK")?;
        let base_name = required(merged.base_name, "BASE_NAME")?;
        let base_suffix = required(merged.base_suffix, "BASE_SUFFIX")?;
        let pdf_base = required(merged.pdf_base, "PDF_BASE")?;

        let repo_name = format!("{}{}{}", base_name, task, base_suffix);
        let repo_name_no_suffix = format!("{}{}", base_name, task);
        let my_repo_name = format!("{}{}", repo_prefix, repo_name);
        let my_repo = format!("{}/{}", github_username, my_repo_name);
        let original_repo = format!("{}/{}", provider_github, repo_name);
        let original_repo_no_suffix = format!("{}/{}", provider_github, repo_name_no_suffix);

        let my_repo_url = fork_url(&my_repo, ci.as_deref(), github_token)?;
        let original_repo_url = format!("https://github.com/{}.git", original_repo);

        let local_repo_dir = std::path::absolute(format!("{}{}", repo_dir_prefix, repo_name))?;

        Ok(Self {
            debug: merged.debug,
            student_id,
            first_name,
            last_name,
            github_username,
            provider_github,
            repo_prefix,
            repo_dir_prefix,
            task,
            base_name,
            base_suffix,
            pdf_base,
            repo_name,
            repo_name_no_suffix,
            my_repo_name,
            my_repo,
            original_repo,
            original_repo_no_suffix,
            my_repo_url,
            original_repo_url,
            local_repo_dir,
        })
    }
}

/// Build the push URL for an `owner/name` repository using the ambient
/// environment's CI state. Used by the setup wizard, which assembles the
/// fork coordinates interactively instead of through [`Settings::resolve`].
pub fn fork_url_from_env(repo: &str) -> Result<String> {
    fork_url(
        repo,
        env::var("CI").ok().as_deref(),
        env::var("GITHUB_TOKEN").ok(),
    )
}

/// Build the push URL for a `owner/name` repository.
///
/// Interactive runs rely on the user's credential helper; CI runs must embed
/// the token because no helper is configured there.
fn fork_url(repo: &str, ci: Option<&str>, github_token: Option<String>) -> Result<String> {
    if ci.is_some() {
        let token = github_token.ok_or(Error::CiTokenMissing)?;
        Ok(format!("https://{}@github.com/{}.git", token, repo))
    } else {
        Ok(format!("https://github.com/{}.git", repo))
    }
}

#[cfg(test)]
pub(crate) fn test_overlay() -> SettingsOverlay {
    SettingsOverlay {
        debug: false,
        student_id: Some("hp42pfui".to_string()),
        first_name: Some("Harry".to_string()),
        last_name: Some("Potter".to_string()),
        github_username: Some("hpotter".to_string()),
        provider_github: Some("FOP-2324".to_string()),
        repo_prefix: Some("fork-".to_string()),
        repo_dir_prefix: Some("work-".to_string()),
        task: Some("H05".to_string()),
        base_name: Some("FOP-2324-".to_string()),
        base_suffix: Some("-Student".to_string()),
        pdf_base: Some("https://example.com/sheets/".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_merge_first_source_wins() {
        let first = SettingsOverlay {
            student_id: Some("12345".to_string()),
            task: Some("H01".to_string()),
            ..Default::default()
        };
        let second = SettingsOverlay {
            student_id: Some("54321".to_string()),
            first_name: Some("Jane".to_string()),
            ..Default::default()
        };

        let merged = SettingsOverlay::merged([first, second]);
        assert_eq!(merged.student_id.as_deref(), Some("12345"));
        assert_eq!(merged.task.as_deref(), Some("H01"));
        // Falls through to the second source when the first has no value
        assert_eq!(merged.first_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_merge_debug_is_or() {
        let first = SettingsOverlay::default();
        let second = SettingsOverlay {
            debug: true,
            ..Default::default()
        };
        assert!(SettingsOverlay::merged([first, second]).debug);
        assert!(!SettingsOverlay::merged([SettingsOverlay::default()]).debug);
    }

    #[test]
    fn test_merge_empty_sources() {
        let merged = SettingsOverlay::merged([]);
        assert!(!merged.debug);
        assert!(merged.student_id.is_none());
        assert!(merged.pdf_base.is_none());
    }

    #[test]
    fn test_resolve_derived_names() {
        let settings = Settings::resolve_with_ci([test_overlay()], None, None).unwrap();

        assert_eq!(settings.repo_name, "FOP-2324-H05-Student");
        assert_eq!(settings.repo_name_no_suffix, "FOP-2324-H05");
        assert_eq!(settings.my_repo_name, "fork-FOP-2324-H05-Student");
        assert_eq!(settings.my_repo, "hpotter/fork-FOP-2324-H05-Student");
        assert_eq!(settings.original_repo, "FOP-2324/FOP-2324-H05-Student");
        assert_eq!(settings.original_repo_no_suffix, "FOP-2324/FOP-2324-H05");
        assert_eq!(
            settings.my_repo_url,
            "https://github.com/hpotter/fork-FOP-2324-H05-Student.git"
        );
        assert_eq!(
            settings.original_repo_url,
            "https://github.com/FOP-2324/FOP-2324-H05-Student.git"
        );
        assert!(settings.local_repo_dir.is_absolute());
        assert!(settings
            .local_repo_dir
            .ends_with("work-FOP-2324-H05-Student"));
    }

    #[test]
    fn test_resolve_missing_required_field() {
        let mut overlay = test_overlay();
        overlay.first_name = None;

        let err = Settings::resolve_with_ci([overlay], None, None).unwrap_err();
        match err {
            Error::MissingSetting { key } => assert_eq!(key, "FIRST_NAME"),
            other => panic!("expected MissingSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_precedence_across_sources() {
        let cli = SettingsOverlay {
            task: Some("H07".to_string()),
            ..Default::default()
        };
        let file = test_overlay();

        let settings = Settings::resolve_with_ci([cli, file], None, None).unwrap();
        assert_eq!(settings.task, "H07");
        assert_eq!(settings.repo_name, "FOP-2324-H07-Student");
    }

    #[test]
    fn test_fork_url_without_ci() {
        let url = fork_url("user/repo", None, None).unwrap();
        assert_eq!(url, "https://github.com/user/repo.git");
    }

    #[test]
    fn test_fork_url_ci_embeds_token() {
        let url = fork_url("user/repo", Some("true"), Some("tok123".to_string())).unwrap();
        assert_eq!(url, "https://tok123@github.com/user/repo.git");
    }

    #[test]
    fn test_fork_url_ci_without_token() {
        let err = fork_url("user/repo", Some("true"), None).unwrap_err();
        assert!(matches!(err, Error::CiTokenMissing));
    }

    #[test]
    fn test_properties_file_missing_is_empty() {
        let overlay =
            SettingsOverlay::from_properties_file(Path::new("/nonexistent/settings.properties"))
                .unwrap();
        assert!(overlay.student_id.is_none());
    }

    #[test]
    fn test_properties_file_parsing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PROPERTIES_FILE);
        fs::write(
            &path,
            "STUDENT_ID=hp42pfui\nFIRST_NAME=Harry\nPDF_BASE=https://example.com/\n",
        )
        .unwrap();

        let overlay = SettingsOverlay::from_properties_file(&path).unwrap();
        assert_eq!(overlay.student_id.as_deref(), Some("hp42pfui"));
        assert_eq!(overlay.first_name.as_deref(), Some("Harry"));
        assert_eq!(overlay.pdf_base.as_deref(), Some("https://example.com/"));
        assert!(overlay.last_name.is_none());
        assert!(!overlay.debug);
    }

    #[test]
    #[serial]
    fn test_env_overlay() {
        env::set_var("STUDENT_ID", "env-id");
        env::set_var("DEBUG", "true");
        env::remove_var("TASK");

        let overlay = SettingsOverlay::from_env();
        assert_eq!(overlay.student_id.as_deref(), Some("env-id"));
        assert!(overlay.debug);
        assert!(overlay.task.is_none());

        env::remove_var("STUDENT_ID");
        env::remove_var("DEBUG");
    }

    #[test]
    #[serial]
    fn test_env_debug_requires_true() {
        env::set_var("DEBUG", "yes");
        assert!(!SettingsOverlay::from_env().debug);
        env::set_var("DEBUG", "TRUE");
        assert!(SettingsOverlay::from_env().debug);
        env::remove_var("DEBUG");
    }
}
