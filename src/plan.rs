//! Turns answers into the files to write and the commands to run

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::io::{PathUtils, ProjectPaths};
use crate::options::{Browser, Framework, Language, PromptOptions};
use crate::package_manager::PackageManager;
use crate::template::{self, execute_template, SectionMode};
use crate::{Result, ScaffoldError};

/// Which npm dist-tag of Playwright to install
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReleaseChannel {
    #[default]
    Latest,
    Next,
    Beta,
}

impl ReleaseChannel {
    pub fn tag(self) -> &'static str {
        match self {
            ReleaseChannel::Latest => "latest",
            ReleaseChannel::Next => "next",
            ReleaseChannel::Beta => "beta",
        }
    }
}

/// Everything about the run that does not come from the answers
#[derive(Debug, Clone)]
pub struct ScaffoldContext {
    pub root: PathBuf,
    /// Browsers to enable; empty means all of them
    pub browsers: Vec<Browser>,
    pub examples: bool,
    pub component_testing: bool,
    pub channel: ReleaseChannel,
    pub has_package_json: bool,
    /// package.json declares `"type": "module"`
    pub is_esm: bool,
}

impl ScaffoldContext {
    pub fn new(root: &Path, cli: &Cli) -> Result<Self> {
        let package_json = ProjectPaths::new(root).package_json();
        let has_package_json = package_json.exists();
        let is_esm = if has_package_json {
            let manifest: Value = serde_json::from_str(&fs::read_to_string(&package_json)?)?;
            manifest.get("type").and_then(Value::as_str) == Some("module")
        } else {
            false
        };

        let channel = if cli.next {
            ReleaseChannel::Next
        } else if cli.beta {
            ReleaseChannel::Beta
        } else {
            ReleaseChannel::Latest
        };

        Ok(Self {
            root: root.to_path_buf(),
            browsers: cli.browsers.clone(),
            examples: !cli.no_examples,
            component_testing: cli.ct,
            channel,
            has_package_json,
            is_esm,
        })
    }

    /// Browsers in canonical order, defaulting to all
    pub fn selected_browsers(&self) -> Vec<Browser> {
        Browser::ALL
            .into_iter()
            .filter(|b| self.browsers.is_empty() || self.browsers.contains(b))
            .collect()
    }
}

/// A file the scaffold writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Relative to the project root
    pub path: PathBuf,
    pub contents: String,
    /// Shown in the closing guidance
    pub description: Option<&'static str>,
}

/// A labelled command the scaffold runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub name: String,
    pub argv: Vec<String>,
}

impl CommandStep {
    pub fn new(name: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            name: name.into(),
            argv,
        }
    }

    pub fn display(&self) -> String {
        shell_words::join(&self.argv)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldPlan {
    pub files: Vec<PlannedFile>,
    pub commands: Vec<CommandStep>,
}

impl ScaffoldPlan {
    fn add_file(
        &mut self,
        path: impl Into<PathBuf>,
        contents: String,
        description: Option<&'static str>,
    ) -> Result<()> {
        let path = path.into();
        if !PathUtils::is_safe_path(&path) {
            return Err(ScaffoldError::UnsafePath(path));
        }
        self.files.push(PlannedFile {
            path,
            contents,
            description,
        });
        Ok(())
    }
}

/// File name of the config the scaffold writes, e.g. `playwright.config.ts`
pub fn config_file_name(ctx: &ScaffoldContext, language: Language) -> String {
    let stem = if ctx.component_testing {
        "playwright-ct.config"
    } else {
        "playwright.config"
    };
    format!("{}.{}", stem, language.extension())
}

/// Compute what to write and what to run. Does not touch the disk.
pub fn build_plan(
    ctx: &ScaffoldContext,
    options: &PromptOptions,
    pm: &dyn PackageManager,
) -> Result<ScaffoldPlan> {
    let framework: Option<Framework> = match (ctx.component_testing, options.framework) {
        (false, Some(_)) => {
            warn!("Ignoring framework answer without --ct");
            None
        }
        (false, None) => None,
        (true, Some(framework)) => Some(framework),
        (true, None) => {
            return Err(ScaffoldError::InvalidOptions(
                "component testing needs a framework".to_string(),
            ))
        }
    };

    let language = options.language;
    let ext = language.extension();
    let test_dir = options.normalized_test_dir();
    let sections = sections_for(ctx);

    let mut vars: BTreeMap<&str, String> = BTreeMap::new();
    vars.insert("testDir", test_dir.clone());
    vars.insert("extension", ext.to_string());
    if let Some(framework) = framework {
        vars.insert("ctPackageName", framework.ct_package());
    }

    let mut plan = ScaffoldPlan::default();

    let config_template = match (framework.is_some(), language) {
        (false, Language::TypeScript) => template::PLAYWRIGHT_CONFIG_TS,
        (false, Language::JavaScript) => template::PLAYWRIGHT_CONFIG_JS,
        (true, Language::TypeScript) => template::PLAYWRIGHT_CT_CONFIG_TS,
        (true, Language::JavaScript) => template::PLAYWRIGHT_CT_CONFIG_JS,
    };
    plan.add_file(
        config_file_name(ctx, language),
        execute_template(config_template, &vars, &sections)?,
        Some("Playwright Test configuration"),
    )?;

    if framework.is_some() {
        plan.add_file(
            "playwright/index.html",
            execute_template(template::CT_INDEX_HTML, &vars, &sections)?,
            Some("Component testing page"),
        )?;
        let index = match language {
            Language::TypeScript => template::CT_INDEX_TS,
            Language::JavaScript => template::CT_INDEX_JS,
        };
        plan.add_file(
            format!("playwright/index.{ext}"),
            execute_template(index, &vars, &sections)?,
            Some("Component testing setup (styles, themes)"),
        )?;
    } else if ctx.examples {
        let (example, demo) = match language {
            Language::TypeScript => (template::EXAMPLE_SPEC_TS, template::DEMO_TODO_APP_SPEC_TS),
            Language::JavaScript => (template::EXAMPLE_SPEC_JS, template::DEMO_TODO_APP_SPEC_JS),
        };
        plan.add_file(
            format!("{test_dir}/example.spec.{ext}"),
            execute_template(example, &vars, &sections)?,
            Some("Example end-to-end test"),
        )?;
        plan.add_file(
            format!("tests-examples/demo-todo-app.spec.{ext}"),
            execute_template(demo, &vars, &sections)?,
            Some("Demo Todo App end-to-end tests"),
        )?;
    }

    if options.install_github_actions {
        let mut gha_vars = vars.clone();
        gha_vars.insert("ciCommand", pm.ci());
        gha_vars.insert(
            "installBrowsersCommand",
            shell_words::join(pm.npx("playwright", &["install", "--with-deps"])),
        );
        gha_vars.insert("runTestsCommand", shell_words::join(pm.run_playwright_test(&[])));
        plan.add_file(
            ".github/workflows/playwright.yml",
            execute_template(template::GITHUB_ACTIONS_WORKFLOW, &gha_vars, &sections)?,
            Some("GitHub Actions workflow"),
        )?;
    }

    if !ctx.has_package_json {
        plan.commands
            .push(CommandStep::new(format!("Initializing {} project", pm.name()), pm.init()));
    }

    let tag = ctx.channel.tag();
    plan.commands.push(CommandStep::new(
        "Installing Playwright Test",
        pm.install_dev_dependency(&format!("@playwright/test@{tag}")),
    ));

    if let Some(framework) = framework {
        plan.commands.push(CommandStep::new(
            "Installing Playwright Component Testing",
            pm.install_dev_dependency(&format!("{}@{tag}", framework.ct_package())),
        ));
    }

    if language == Language::TypeScript {
        plan.commands.push(CommandStep::new(
            "Installing Types",
            pm.install_dev_dependency("@types/node"),
        ));
    }

    if options.install_playwright_browsers {
        let mut args = vec!["install"];
        if options.install_playwright_dependencies {
            args.push("--with-deps");
        }
        let selected = ctx.selected_browsers();
        if selected.len() < Browser::ALL.len() {
            args.extend(selected.iter().map(|b| b.name()));
        }
        plan.commands
            .push(CommandStep::new("Downloading browsers", pm.npx("playwright", &args)));
    } else if options.install_playwright_dependencies {
        plan.commands.push(CommandStep::new(
            "Installing system dependencies",
            pm.npx("playwright", &["install-deps"]),
        ));
    }

    debug!(
        files = plan.files.len(),
        commands = plan.commands.len(),
        "Built scaffold plan"
    );
    Ok(plan)
}

fn sections_for(ctx: &ScaffoldContext) -> HashMap<&'static str, SectionMode> {
    let selected = ctx.selected_browsers();
    let mut sections = HashMap::new();
    for browser in Browser::ALL {
        let mode = if selected.contains(&browser) {
            SectionMode::Show
        } else {
            SectionMode::Comment
        };
        sections.insert(browser.name(), mode);
    }
    let (esm, commonjs) = if ctx.is_esm {
        (SectionMode::Show, SectionMode::Hide)
    } else {
        (SectionMode::Hide, SectionMode::Show)
    };
    sections.insert("esm", esm);
    sections.insert("commonjs", commonjs);
    sections
}
