use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::io::ProjectPaths;
use crate::plan::PlannedFile;
use crate::prompt::Prompt;
use crate::Result;

/// Paths every Playwright project should keep out of git
pub const GITIGNORE_ENTRIES: &[&str] = &[
    "node_modules/",
    "/test-results/",
    "/playwright-report/",
    "/blob-report/",
    "/playwright/.cache/",
];

/// Write the planned files under `root`.
///
/// Existing files are only replaced when `prompt` is given and the user agrees;
/// without a prompt they are left alone. Returns the paths actually written.
pub fn write_files(
    root: &Path,
    files: &[PlannedFile],
    mut prompt: Option<&mut dyn Prompt>,
) -> Result<Vec<PathBuf>> {
    let paths = ProjectPaths::new(root);
    let mut written = Vec::new();

    for file in files {
        let target = paths.resolve(&file.path)?;
        let shown = file.path.display().to_string();

        if target.exists() {
            let overwrite = match prompt.as_mut() {
                Some(prompt) => {
                    prompt.confirm(&format!("{shown} already exists. Override it?"), false)?
                }
                None => false,
            };
            if !overwrite {
                warn!("Skipping {} (already exists)", shown);
                println!("Skipping {shown}, it already exists.");
                continue;
            }
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        println!("Writing {shown}.");
        fs::write(&target, &file.contents)?;
        debug!(path = %target.display(), bytes = file.contents.len(), "Wrote file");
        written.push(file.path.clone());
    }

    Ok(written)
}

/// `node_modules` matches with or without slashes; other entries must match exactly
fn normalize_entry(line: &str) -> &str {
    let trimmed = line.trim();
    if trimmed.trim_matches('/') == "node_modules" {
        "node_modules"
    } else {
        trimmed
    }
}

/// Make sure `.gitignore` lists [`GITIGNORE_ENTRIES`], appending only the
/// missing ones. Returns whether the file changed.
pub fn update_gitignore(root: &Path) -> Result<bool> {
    let path = ProjectPaths::new(root).gitignore();
    let existing = if path.exists() {
        fs::read_to_string(&path)?
    } else {
        String::new()
    };

    let present: HashSet<&str> = existing.lines().map(normalize_entry).collect();
    let missing: Vec<&str> = GITIGNORE_ENTRIES
        .iter()
        .copied()
        .filter(|entry| !present.contains(normalize_entry(entry)))
        .collect();

    if missing.is_empty() {
        debug!(".gitignore already lists all Playwright entries");
        return Ok(false);
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for entry in &missing {
        content.push_str(entry);
        content.push('\n');
    }
    fs::write(&path, content)?;
    info!(added = missing.len(), "Updated .gitignore");
    Ok(true)
}
