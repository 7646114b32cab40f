//! # Template Patching
//!
//! Rewrites the two student-facing files of a freshly cloned course template
//! and provisions the CI workflow:
//!
//! - `build.gradle.kts`: fills the student identity into the placeholder
//!   assignments the course templates ship with.
//! - `README.md`: appends a generated links section once, guarded by a
//!   start marker so re-runs leave the file alone.
//! - `.github/workflows/build.yml`: written verbatim from an embedded
//!   workflow definition.

use crate::error::Result;
use crate::git::GitClient;
use crate::settings::Settings;

/// Repository-relative path of the provisioned CI workflow.
pub const WORKFLOW_PATH: &str = ".github/workflows/build.yml";

/// Repository-relative path of the patched build file.
pub const BUILD_FILE_PATH: &str = "build.gradle.kts";

/// Repository-relative path of the patched README.
pub const README_PATH: &str = "README.md";

/// Marker that makes the README append idempotent.
const README_MARKER: &str = "<!-- Course-Repo-Readme-Links Start -->";

const BUILD_WORKFLOW: &str = r#"name: Build

on:
  push:
    branches: [main]
  pull_request:

jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-java@v4
        with:
          distribution: temurin
          java-version: 17
      - name: Build with Gradle
        run: ./gradlew build
"#;

const README_LINKS_TEMPLATE: &str = r#"<!-- Course-Repo-Readme-Links Start -->

## Submission {{TASK}}

| | |
|---|---|
| Student | {{FIRST_NAME}} {{LAST_NAME}} ({{STUDENT_ID}}) |
| Your repository | [{{MY_REPO}}](https://github.com/{{MY_REPO}}) |
| Template repository | [{{ORIGINAL_REPO}}](https://github.com/{{ORIGINAL_REPO}}) |
| Exercise sheet | [{{REPO_NAME}}.pdf]({{PDF_BASE}}{{exc}}/{{REPO_NAME}}.pdf) |

<!-- Course-Repo-Readme-Links End -->
"#;

/// Write the embedded CI workflow into the clone.
pub fn write_build_workflow(git: &GitClient) -> Result<()> {
    git.write(WORKFLOW_PATH, BUILD_WORKFLOW)
}

/// Fill the student identity into the clone's `build.gradle.kts`.
pub fn patch_build_gradle(git: &GitClient, settings: &Settings) -> Result<()> {
    let contents = git.read_to_string(BUILD_FILE_PATH)?;
    let patched = fill_build_gradle(
        &contents,
        &settings.student_id,
        &settings.first_name,
        &settings.last_name,
    );
    git.write(BUILD_FILE_PATH, &patched)
}

/// Substitute the placeholder assignments of both template generations.
///
/// Order matters: the commented `.set("")` form must be rewritten before the
/// bare one, otherwise the bare replacement would leave commented lines with
/// a filled value behind the `//`.
fn fill_build_gradle(contents: &str, student_id: &str, first_name: &str, last_name: &str) -> String {
    contents
        .replace("studentId = null", &format!("studentId = \"{}\"", student_id))
        .replace("firstName = null", &format!("firstName = \"{}\"", first_name))
        .replace("lastName = null", &format!("lastName = \"{}\"", last_name))
        .replace(
            "// studentId.set(\"\")",
            &format!("studentId.set(\"{}\")", student_id),
        )
        .replace(
            "// firstName.set(\"\")",
            &format!("firstName.set(\"{}\")", first_name),
        )
        .replace(
            "// lastName.set(\"\")",
            &format!("lastName.set(\"{}\")", last_name),
        )
        .replace(
            "studentId.set(\"\")",
            &format!("studentId.set(\"{}\")", student_id),
        )
        .replace(
            "firstName.set(\"\")",
            &format!("firstName.set(\"{}\")", first_name),
        )
        .replace(
            "lastName.set(\"\")",
            &format!("lastName.set(\"{}\")", last_name),
        )
}

/// Append the generated links section to the clone's README.
///
/// Idempotent: returns `false` without touching the file when the section
/// marker is already present.
pub fn append_readme_links(git: &GitClient, settings: &Settings) -> Result<bool> {
    let readme = git.read_to_string(README_PATH)?;
    if readme.contains(README_MARKER) {
        return Ok(false);
    }

    let section = render_readme_links(settings);
    git.write(README_PATH, &format!("{}\n\n{}", readme, section))?;
    Ok(true)
}

fn render_readme_links(settings: &Settings) -> String {
    README_LINKS_TEMPLATE
        .replace("{{MY_REPO}}", &settings.my_repo)
        .replace("{{exc}}", &settings.task.to_lowercase())
        .replace("{{FIRST_NAME}}", &settings.first_name)
        .replace("{{LAST_NAME}}", &settings.last_name)
        .replace("{{STUDENT_ID}}", &settings.student_id)
        .replace("{{PDF_BASE}}", &settings.pdf_base)
        .replace("{{TASK}}", &settings.task)
        .replace("{{REPO_NAME}}", &settings.repo_name_no_suffix)
        .replace("{{ORIGINAL_REPO}}", &settings.original_repo_no_suffix)
}
