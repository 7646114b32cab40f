//! Setup command implementation
//!
//! Interactive first-time wizard: clones a course template, turns the clone
//! into a private student fork (template reachable as `upstream`), and
//! records the student's details in `settings.properties` for later
//! provision runs.
//!
//! Every prompt can be bypassed with an environment variable of the same
//! name, which keeps the wizard scriptable.

use anyhow::{bail, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::env;
use std::fs;
use std::path::Path;

use course_repo::git::GitClient;
use course_repo::output::{emoji, OutputConfig};
use course_repo::settings::{fork_url_from_env, PROPERTIES_FILE};
use course_repo::verify;

/// Arguments for the setup command
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Clone URL of the course template repository
    #[arg(value_name = "TEMPLATE_URL")]
    pub template_url: String,
}

/// Execute the setup command
pub fn execute(args: SetupArgs, out: &OutputConfig) -> Result<()> {
    verify::verify_setup()?;

    println!(
        "{} Welcome to the course-repo setup wizard!",
        emoji(out, "🎓", "[SETUP]")
    );
    println!("This tool clones the template, creates your private fork, and");
    println!("records your details in {} for later runs.", PROPERTIES_FILE);
    println!();

    let repo_name = env_or_prompt("REPO_NAME", "How should the repository be named on GitHub?")?;
    let repo_dir = env_or_prompt("REPO_DIR", "How should the repository be named locally?")?;

    let mut git = GitClient::new(args.template_url.clone(), &repo_dir)?;
    if git.exists() {
        bail!(
            "the directory `{}` already exists; delete it and try again",
            repo_dir
        );
    }

    git.clone_from(&args.template_url)?;
    git.rename_remote("origin", "upstream")?;

    let github_username = env_or_prompt("GITHUB_USERNAME", "What is your GitHub username?")?;
    let fork_url = fork_url_from_env(&format!("{}/{}", github_username, repo_name))?;
    git.set_origin_url(fork_url.clone());
    git.set_remote("origin", &fork_url)?;
    git.ensure_origin_repository(true)?;

    let student_id = env_or_prompt("STUDENT_ID", "What is your student ID?")?;
    let first_name = env_or_prompt("FIRST_NAME", "What is your first name?")?;
    let last_name = env_or_prompt("LAST_NAME", "What is your last name?")?;

    append_properties(
        Path::new(PROPERTIES_FILE),
        &[
            ("STUDENT_ID", student_id.as_str()),
            ("FIRST_NAME", first_name.as_str()),
            ("LAST_NAME", last_name.as_str()),
            ("GITHUB_USERNAME", github_username.as_str()),
        ],
    )?;

    println!();
    println!(
        "{} Setup complete; your details were appended to {}",
        emoji(out, "✅", "[DONE]"),
        PROPERTIES_FILE
    );

    Ok(())
}

/// Take a value from the environment, or prompt for it with confirmation.
fn env_or_prompt(env_key: &str, prompt: &str) -> Result<String> {
    if let Ok(value) = env::var(env_key) {
        return Ok(value);
    }

    loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()?;

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("You entered `{}`. Is this correct?", input))
            .interact()?;

        if confirmed {
            return Ok(input);
        }
        println!("Please try again.");
    }
}

/// Append key=value entries to a properties file, creating it when absent.
fn append_properties(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let mut contents = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    for (key, value) in entries {
        contents.push_str(&format!("{}={}\n", key, value));
    }
    fs::write(path, contents)?;
    Ok(())
}
