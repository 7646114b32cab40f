//! # Git Client
//!
//! [`GitClient`] drives a single local clone and its hosted counterpart
//! through the system `git` and `gh` binaries.
//!
//! This uses the system git command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! The two behavioral contracts callers rely on:
//!
//! - **Remote idempotency**: [`GitClient::set_remote`] only re-adds a remote
//!   when it is absent or points at a different URL.
//! - **Commit idempotency**: [`GitClient::commit_paths`] skips the commit
//!   entirely when none of the given paths changed relative to `HEAD`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::process;

/// Client for one local repository and the remote it pushes to.
pub struct GitClient {
    origin_url: String,
    repository: PathBuf,
}

impl GitClient {
    /// Create a client for `repository`, pushing to `origin_url`.
    ///
    /// The repository path is made absolute immediately; it does not need to
    /// exist yet.
    pub fn new(origin_url: impl Into<String>, repository: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            origin_url: origin_url.into(),
            repository: std::path::absolute(repository.as_ref())?,
        })
    }

    /// The URL of the remote this client pushes to.
    pub fn origin_url(&self) -> &str {
        &self.origin_url
    }

    /// Replace the push URL. Used by the setup wizard, which only learns the
    /// fork URL after cloning the template.
    pub fn set_origin_url(&mut self, url: impl Into<String>) {
        self.origin_url = url.into();
    }

    /// Absolute path of the local repository.
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    /// Whether the local repository directory exists.
    pub fn exists(&self) -> bool {
        self.repository.exists()
    }

    fn git<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        process::run("git", args, &self.repository)
    }

    fn gh<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        process::run("gh", args, &self.repository)
    }

    ////// Local repository lifecycle //////

    /// Clone `url` into the repository path.
    pub fn clone_from(&self, url: &str) -> Result<()> {
        let parent = self
            .repository
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent)?;
        let target = self.repository.to_string_lossy();
        process::run("git", ["clone", url, target.as_ref()], &parent)?;
        Ok(())
    }

    /// Clone `url` unless the repository directory already exists.
    pub fn ensure_clone(&self, url: &str) -> Result<()> {
        if !self.repository.exists() {
            self.clone_from(url)?;
        }
        Ok(())
    }

    /// Initialize a fresh repository at the repository path.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.repository)?;
        self.git(["init"])?;
        Ok(())
    }

    /// Initialize only when no `.git` directory exists yet.
    ///
    /// Returns whether an init actually happened.
    pub fn ensure_init(&self) -> Result<bool> {
        if !self.repository.join(".git").exists() {
            self.init()?;
            return Ok(true);
        }
        Ok(false)
    }

    ////// Remotes //////

    /// Whether a remote with the given name is configured.
    pub fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.git(["remote"])?.lines().any(|l| l.trim() == name))
    }

    /// The configured URL of a remote.
    pub fn remote_url(&self, name: &str) -> Result<String> {
        Ok(self.git(["remote", "get-url", name])?.trim().to_string())
    }

    /// Point the named remote at `url`.
    ///
    /// Idempotent: an existing remote with the same URL is left untouched; a
    /// mismatched one is removed and re-added.
    pub fn set_remote(&self, name: &str, url: &str) -> Result<()> {
        if self.has_remote(name)? {
            if self.remote_url(name)? != url {
                self.git(["remote", "remove", name])?;
                self.git(["remote", "add", name, url])?;
            }
        } else {
            self.git(["remote", "add", name, url])?;
        }
        Ok(())
    }

    /// Rename a remote, e.g. `origin` to `upstream` after cloning a template.
    pub fn rename_remote(&self, from: &str, to: &str) -> Result<()> {
        self.git(["remote", "rename", from, to])?;
        Ok(())
    }

    ////// Staging and commits //////

    /// Stage a single path.
    pub fn add_file(&self, path: &str) -> Result<()> {
        self.git(["add", "--", path])?;
        Ok(())
    }

    /// Stage several paths.
    pub fn add_files(&self, paths: &[&str]) -> Result<()> {
        let mut args = vec!["add", "--"];
        args.extend_from_slice(paths);
        self.git(args)?;
        Ok(())
    }

    /// Commit whatever is staged.
    pub fn commit(&self, message: &str) -> Result<()> {
        self.git(["commit", "-m", message])?;
        Ok(())
    }

    /// Commit the given paths, skipping the commit when none of them carries
    /// uncommitted changes.
    ///
    /// Returns whether a commit was created.
    pub fn commit_paths(&self, message: &str, paths: &[&str]) -> Result<bool> {
        if paths.is_empty() {
            return Ok(false);
        }

        let mut any_changed = false;
        for path in paths {
            if self.changed(path)? {
                any_changed = true;
                break;
            }
        }
        if !any_changed {
            return Ok(false);
        }

        self.add_files(paths)?;

        let mut args = vec!["commit", "-m", message];
        args.extend_from_slice(paths);
        self.git(args)?;
        Ok(true)
    }

    /// Whether a path has uncommitted changes relative to `HEAD`.
    ///
    /// An untracked path counts as changed.
    pub fn changed(&self, path: &str) -> Result<bool> {
        Ok(self.diff_changed(path)? || self.untracked(path))
    }

    fn diff_changed(&self, path: &str) -> Result<bool> {
        Ok(!self.git(["diff", "--", path])?.trim().is_empty())
    }

    fn untracked(&self, path: &str) -> bool {
        match self.git(["ls-files", "--error-unmatch", "--", path]) {
            Ok(output) => output.trim().is_empty(),
            Err(_) => true,
        }
    }

    /// Paths with uncommitted changes relative to `HEAD`.
    pub fn changed_files(&self) -> Result<Vec<String>> {
        Ok(self
            .git(["diff", "--name-only", "HEAD"])?
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    ////// Branches and pushing //////

    /// Name of the currently checked out branch.
    pub fn current_branch(&self) -> Result<String> {
        Ok(self.git(["branch", "--show-current"])?.trim().to_string())
    }

    /// Default branch of the `origin` remote, as far as the local clone
    /// knows. Falls back to `main` when git has no answer (fresh remotes
    /// report `(unknown)` until queried).
    pub fn origin_head_branch(&self) -> Result<String> {
        let output = self.git(["remote", "show", "origin", "-n"])?;
        let head = output
            .lines()
            .find(|l| l.trim_start().starts_with("HEAD branch"))
            .and_then(|l| l.split(':').nth(1))
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty() && !b.starts_with('('));
        Ok(head.unwrap_or_else(|| "main".to_string()))
    }

    /// Push the current branch to origin's default branch.
    pub fn push(&self) -> Result<()> {
        let branch = self.current_branch()?;
        let target = self.origin_head_branch()?;
        self.git(["push", "origin", &format!("{}:{}", branch, target)])?;
        Ok(())
    }

    /// Mirror-push all refs to origin.
    pub fn push_mirror(&self) -> Result<()> {
        self.git(["push", "--mirror"])?;
        Ok(())
    }

    ////// Hosted repository (gh CLI) //////

    /// Whether the hosted repository behind the origin URL exists.
    pub fn origin_repository_exists(&self) -> Result<bool> {
        match self.gh(["repo", "view", &self.origin_url]) {
            Ok(output) => Ok(!output.trim().is_empty()),
            Err(Error::CommandFailed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create the hosted repository and mirror the local clone into it.
    pub fn create_origin_repository(&self, private: bool) -> Result<()> {
        self.gh([
            "repo",
            "create",
            &self.origin_url,
            &format!("--private={}", private),
        ])?;
        self.push_mirror()
    }

    /// Create the hosted repository only when it does not exist yet.
    ///
    /// Returns whether it was created.
    pub fn ensure_origin_repository(&self, private: bool) -> Result<bool> {
        if !self.origin_repository_exists()? {
            self.create_origin_repository(private)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Delete the hosted repository without prompting.
    pub fn delete_origin_repository(&self) -> Result<()> {
        self.gh(["repo", "delete", &self.origin_url, "--yes"])?;
        Ok(())
    }

    ////// Repository files //////

    /// Resolve a repository-relative path.
    ///
    /// Absolute paths and paths containing `..` are rejected so file
    /// operations cannot escape the clone.
    pub fn path(&self, rel: &str) -> Result<PathBuf> {
        let rel_path = Path::new(rel);
        let escapes = rel_path.is_absolute()
            || rel_path
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes {
            return Err(Error::PathOutsideRepo {
                path: rel.to_string(),
            });
        }
        Ok(self.repository.join(rel_path))
    }

    /// Read a repository file into a string.
    pub fn read_to_string(&self, rel: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path(rel)?)?)
    }

    /// Write a repository file, creating parent directories as needed.
    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.path(rel)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}
