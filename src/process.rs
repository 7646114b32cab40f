//! # Subprocess Execution
//!
//! Thin wrapper around `std::process::Command` used for every `git` and `gh`
//! invocation. Each call is synchronous: the command is echoed to the
//! terminal, runs to completion in the given working directory, and either
//! returns its captured stdout or fails the run.
//!
//! Using the system binaries (instead of an in-process implementation) means
//! SSH keys, credential helpers, and `gh auth` state all work exactly as they
//! do in the user's shell.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Run `program` with `args` in `cwd`, returning captured stdout.
///
/// The invocation is echoed as `> <dir> $ <program> <args>` before it runs.
/// A non-zero exit status maps to [`Error::CommandFailed`] carrying the exit
/// code and stderr; a command that cannot be started at all maps to
/// [`Error::CommandStart`].
///
/// Note that stderr by itself is not an error: `git clone` and friends write
/// progress there on perfectly successful runs.
pub fn run<I, S>(program: &str, args: I, cwd: &Path) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
    let rendered = render_command_line(program, &args);

    let dir_label = cwd
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cwd.display().to_string());
    println!("> {} $ {}", dir_label, rendered);

    let output = Command::new(program)
        .args(&args)
        .current_dir(cwd)
        .output()
        .map_err(|e| Error::CommandStart {
            command: rendered.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(Error::CommandFailed {
            command: rendered,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !stdout.is_empty() {
        log::debug!("{} -> {}", rendered, stdout.trim_end());
    }

    Ok(stdout)
}

/// Render a command line for echoing and error messages, quoting arguments
/// that contain whitespace.
fn render_command_line(program: &str, args: &[String]) -> String {
    let mut parts = vec![program.to_string()];
    for arg in args {
        if arg.chars().any(char::is_whitespace) {
            parts.push(format!("\"{}\"", arg));
        } else {
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let output = run("git", ["--version"], dir.path()).unwrap();
        assert!(output.contains("git version"));
    }

    #[test]
    fn test_run_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        // Not a git repository, so `git status` fails with exit code 128
        let err = run("git", ["status"], dir.path()).unwrap_err();
        match err {
            Error::CommandFailed {
                command,
                code,
                stderr,
            } => {
                assert!(command.starts_with("git status"));
                assert_ne!(code, 0);
                assert!(!stderr.is_empty());
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_run_missing_program() {
        let dir = TempDir::new().unwrap();
        let err = run("course-repo-no-such-tool", ["--version"], dir.path()).unwrap_err();
        assert!(matches!(err, Error::CommandStart { .. }));
    }

    #[test]
    fn test_render_command_line_plain() {
        let args = vec!["remote".to_string(), "add".to_string()];
        assert_eq!(render_command_line("git", &args), "git remote add");
    }

    #[test]
    fn test_render_command_line_quotes_whitespace() {
        let args = vec![
            "commit".to_string(),
            "-m".to_string(),
            "Add build workflow".to_string(),
        ];
        assert_eq!(
            render_command_line("git", &args),
            "git commit -m \"Add build workflow\""
        );
    }
}
