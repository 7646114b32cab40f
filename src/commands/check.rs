//! Check command implementation
//!
//! Reports whether the external tools a provisioning run needs are usable,
//! without touching any repository state.

use anyhow::Result;

use course_repo::output::{emoji, OutputConfig};
use course_repo::verify;

/// Execute the check command
pub fn execute(out: &OutputConfig) -> Result<()> {
    let checks: [(&str, fn() -> course_repo::error::Result<()>); 3] = [
        ("git installation", verify::verify_git_installation),
        ("GitHub CLI installation", verify::verify_gh_installation),
        ("GitHub CLI login", verify::verify_gh_login),
    ];

    let mut failures = 0;
    for &(label, check) in &checks {
        match check() {
            Ok(()) => println!("{} {}", emoji(out, "✅", "[OK]"), label),
            Err(e) => {
                failures += 1;
                println!("{} {}: {}", emoji(out, "❌", "[FAIL]"), label, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} checks failed", failures, checks.len());
    }
    Ok(())
}
