//! # Environment Verification
//!
//! Checks that the external tools a provisioning run depends on are actually
//! usable before any repository state is touched: `git` and `gh` must be on
//! the `PATH`, and `gh` must be logged in.

use std::path::Path;

use crate::error::{Error, Result};
use crate::process;

/// Verify the complete environment: installations plus `gh` login.
pub fn verify_setup() -> Result<()> {
    verify_installations()?;
    verify_gh_login()
}

/// Verify that both required tools are installed.
pub fn verify_installations() -> Result<()> {
    verify_git_installation()?;
    verify_gh_installation()
}

/// `git --version` must succeed.
pub fn verify_git_installation() -> Result<()> {
    check_tool("git", ["--version"], "make sure git is installed and on the PATH")
}

/// `gh --version` must succeed.
pub fn verify_gh_installation() -> Result<()> {
    check_tool("gh", ["--version"], "make sure the GitHub CLI is installed and on the PATH")
}

/// `gh auth status` must succeed.
pub fn verify_gh_login() -> Result<()> {
    check_tool("gh", ["auth", "status"], "log in with `gh auth login`")
}

fn check_tool<const N: usize>(tool: &str, args: [&str; N], remedy: &str) -> Result<()> {
    process::run(tool, args, Path::new("."))
        .map(|_| ())
        .map_err(|e| Error::ToolValidation {
            tool: tool.to_string(),
            message: format!("{}; {}", e, remedy),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_git_installation() {
        // git is a hard prerequisite of the test suite itself
        verify_git_installation().unwrap();
    }

    #[test]
    fn test_check_tool_missing_program() {
        let err = check_tool("course-repo-no-such-tool", ["--version"], "install it").unwrap_err();
        match err {
            Error::ToolValidation { tool, message } => {
                assert_eq!(tool, "course-repo-no-such-tool");
                assert!(message.contains("install it"));
            }
            other => panic!("expected ToolValidation, got {:?}", other),
        }
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_verify_setup_with_gh() {
        verify_setup().unwrap();
    }
}
