//! # Course Repository Library
//!
//! Core functionality for provisioning per-student course repositories. It
//! is used by the `course-repo` command-line tool, which is a thin wrapper
//! around this crate.
//!
//! ## Core Concepts
//!
//! - **Settings (`settings`)**: The layered configuration record of a run,
//!   merged from CLI flags, environment variables, and `settings.properties`
//!   with first-non-null-wins precedence.
//! - **Git Client (`git`)**: Drives a local clone and its hosted counterpart
//!   through the system `git` and `gh` binaries, with idempotent remote and
//!   commit operations.
//! - **Templates (`template`)**: Fills student-specific values into the
//!   course template's build file and README, and provisions the CI
//!   workflow.
//! - **Verification (`verify`)**: Checks the external tools before a run
//!   touches any repository state.
//!
//! ## Execution Flow
//!
//! A provisioning run is strictly sequential: resolve settings, verify the
//! environment, ensure the local clone, configure the `origin` and
//! `upstream` remotes, ensure the hosted fork exists, patch the template
//! files (committing each change only when it actually changed something),
//! and push. Every subprocess blocks until exit and the first failure aborts
//! the run.

pub mod error;
pub mod git;
pub mod output;
pub mod process;
pub mod settings;
pub mod template;
pub mod verify;
