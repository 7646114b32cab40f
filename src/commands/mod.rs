//! # CLI Command Implementations
//!
//! One module per subcommand. Each module defines a clap `Args` struct and
//! an `execute` function; `cli.rs` dispatches into them.

pub mod check;
pub mod completions;
pub mod provision;
pub mod setup;
