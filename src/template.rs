//! Template rendering for the generated project files
//!
//! Templates are plain files under `assets/` with two kinds of markup:
//! `{{name}}` placeholders and line-level sections
//!
//! ```text
//!     //--begin-firefox
//!     { name: 'firefox', use: { ...devices['Desktop Firefox'] } },
//!     //--end-firefox
//! ```
//!
//! YAML templates use `#--begin-` / `#--end-` instead.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::{Result, ScaffoldError};

pub const PLAYWRIGHT_CONFIG_TS: &str = include_str!("../assets/playwright.config.ts");
pub const PLAYWRIGHT_CONFIG_JS: &str = include_str!("../assets/playwright.config.js");
pub const PLAYWRIGHT_CT_CONFIG_TS: &str = include_str!("../assets/playwright-ct.config.ts");
pub const PLAYWRIGHT_CT_CONFIG_JS: &str = include_str!("../assets/playwright-ct.config.js");
pub const EXAMPLE_SPEC_TS: &str = include_str!("../assets/example.spec.ts");
pub const EXAMPLE_SPEC_JS: &str = include_str!("../assets/example.spec.js");
pub const DEMO_TODO_APP_SPEC_TS: &str = include_str!("../assets/demo-todo-app.spec.ts");
pub const DEMO_TODO_APP_SPEC_JS: &str = include_str!("../assets/demo-todo-app.spec.js");
pub const GITHUB_ACTIONS_WORKFLOW: &str = include_str!("../assets/github-actions.yml");
pub const CT_INDEX_HTML: &str = include_str!("../assets/playwright/index.html");
pub const CT_INDEX_TS: &str = include_str!("../assets/playwright/index.ts");
pub const CT_INDEX_JS: &str = include_str!("../assets/playwright/index.js");

static BEGIN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(//|#)--begin-(\S+)\s*$").expect("begin marker regex"));
static END_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(//|#)--end-(\S+)\s*$").expect("end marker regex"));

/// What happens to the lines of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMode {
    Show,
    Hide,
    Comment,
}

struct OpenSection {
    name: String,
    mode: SectionMode,
    indent: String,
    comment: &'static str,
}

/// Render `input`, substituting `vars` and resolving sections.
/// Sections without an entry in `sections` are commented out.
pub fn execute_template(
    input: &str,
    vars: &BTreeMap<&str, String>,
    sections: &HashMap<&str, SectionMode>,
) -> Result<String> {
    let mut text = input.to_string();
    for (key, value) in vars {
        let placeholder = format!("{{{{{}}}}}", key);
        text = text.replace(&placeholder, value);
    }

    let mut lines: Vec<String> = Vec::new();
    let mut open: Option<OpenSection> = None;

    for line in text.split('\n') {
        if let Some(caps) = BEGIN_MARKER.captures(line) {
            let name = caps[3].to_string();
            if let Some(current) = &open {
                return Err(ScaffoldError::Template(format!(
                    "section '{}' opened inside section '{}'",
                    name, current.name
                )));
            }
            let mode = sections
                .get(name.as_str())
                .copied()
                .unwrap_or(SectionMode::Comment);
            open = Some(OpenSection {
                name,
                mode,
                indent: caps[1].to_string(),
                comment: if &caps[2] == "#" { "# " } else { "// " },
            });
            continue;
        }

        if let Some(caps) = END_MARKER.captures(line) {
            match open.take() {
                Some(section) if section.name == caps[2] => continue,
                Some(section) => {
                    return Err(ScaffoldError::Template(format!(
                        "section '{}' closed by end marker for '{}'",
                        section.name, &caps[2]
                    )))
                }
                None => {
                    return Err(ScaffoldError::Template(format!(
                        "end marker for '{}' without a matching begin",
                        &caps[2]
                    )))
                }
            }
        }

        match &open {
            None => lines.push(line.to_string()),
            Some(section) => match section.mode {
                SectionMode::Show => lines.push(line.to_string()),
                SectionMode::Hide => {}
                SectionMode::Comment => lines.push(comment_out(line, section)),
            },
        }
    }

    if let Some(section) = open {
        return Err(ScaffoldError::Template(format!(
            "section '{}' is never closed",
            section.name
        )));
    }

    Ok(lines.join("\n"))
}

fn comment_out(line: &str, section: &OpenSection) -> String {
    match line.strip_prefix(section.indent.as_str()) {
        Some(rest) => format!("{}{}{}", section.indent, section.comment, rest),
        None => format!("{}{}", section.comment, line.trim_start()),
    }
}
