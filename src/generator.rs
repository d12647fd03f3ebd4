//! The scaffold flow: answers, plan, files, .gitignore, commands, package.json, guidance

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::io::{update_gitignore, write_files, ProjectPaths};
use crate::options::PromptOptions;
use crate::package_json::patch_package_json;
use crate::package_manager::{determine_package_manager, PackageManager};
use crate::plan::{build_plan, config_file_name, PlannedFile, ScaffoldContext};
use crate::prompt::Prompt;
use crate::runner::CommandRunner;
use crate::Result;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub options: PromptOptions,
    pub written: Vec<PathBuf>,
    pub commands: Vec<String>,
    pub guidance: String,
}

pub struct Generator {
    root: PathBuf,
    cwd: PathBuf,
    cli: Cli,
}

impl Generator {
    /// `cwd` is only used to phrase the `cd` hint
    pub fn new(cli: Cli, cwd: PathBuf) -> Self {
        let root = match &cli.root_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.clone(),
        };
        Self { root, cwd, cli }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn run(
        &self,
        prompt: &mut dyn Prompt,
        runner: &dyn CommandRunner,
    ) -> Result<RunSummary> {
        fs::create_dir_all(&self.root)?;
        info!("Scaffolding Playwright project in {}", self.root.display());

        let (options, interactive) = match PromptOptions::from_env()? {
            Some(options) => (options, false),
            None if self.cli.quiet => (PromptOptions::defaults(&self.root, &self.cli), false),
            None => (PromptOptions::ask(prompt, &self.root, &self.cli)?, true),
        };
        debug!(?options, interactive, "Collected answers");

        let ctx = ScaffoldContext::new(&self.root, &self.cli)?;
        let pm = determine_package_manager(&self.root);
        let plan = build_plan(&ctx, &options, pm.as_ref())?;

        println!();
        let written = write_files(
            &self.root,
            &plan.files,
            if interactive { Some(prompt) } else { None },
        )?;

        if update_gitignore(&self.root)? {
            println!("Updating .gitignore.");
        }

        let mut commands = Vec::with_capacity(plan.commands.len());
        for step in &plan.commands {
            let rendered = step.display();
            println!("{} ({rendered})…", step.name);
            runner.run(step, &self.root).await?;
            commands.push(rendered);
        }

        let ct_config = ctx
            .component_testing
            .then(|| config_file_name(&ctx, options.language));
        patch_package_json(&self.root, ct_config.as_deref())?;
        println!("Updating package.json scripts.");

        let written_files: Vec<&PlannedFile> = plan
            .files
            .iter()
            .filter(|f| written.contains(&f.path))
            .collect();
        let guidance = self.guidance(&ctx, pm.as_ref(), &written_files);
        print!("{guidance}");

        Ok(RunSummary {
            options,
            written,
            commands,
            guidance,
        })
    }

    fn guidance(
        &self,
        ctx: &ScaffoldContext,
        pm: &dyn PackageManager,
        files: &[&PlannedFile],
    ) -> String {
        // Script runs need `--` so the package manager passes flags through
        let (test, pass) = if ctx.component_testing {
            (shell_words::join(pm.run("test-ct")), " --")
        } else {
            (shell_words::join(pm.run_playwright_test(&[])), "")
        };

        let mut lines = vec![
            String::new(),
            format!(
                "✔ Success! Created a Playwright Test project at {}",
                self.root.display()
            ),
            String::new(),
            "Inside that directory, you can run several commands:".to_string(),
            String::new(),
        ];

        let mut entries = Vec::new();
        if ctx.component_testing {
            entries.push((test.clone(), "Runs the component tests."));
        } else {
            entries.push((test.clone(), "Runs the end-to-end tests."));
            entries.push((format!("{test} --ui"), "Starts the interactive UI mode."));
        }
        entries.push((
            format!("{test}{pass} --project=chromium"),
            "Runs the tests only on Desktop Chrome.",
        ));
        entries.push((format!("{test}{pass} example"), "Runs the tests in a specific file."));
        entries.push((format!("{test}{pass} --debug"), "Runs the tests in debug mode."));
        if !ctx.component_testing {
            entries.push((
                shell_words::join(pm.npx("playwright", &["codegen"])),
                "Auto generate tests with Codegen.",
            ));
        }
        for (command, help) in entries {
            lines.push(format!("  {command}"));
            lines.push(format!("    {help}"));
            lines.push(String::new());
        }

        lines.push("We suggest that you begin by typing:".to_string());
        lines.push(String::new());
        if let Some(dir) = ProjectPaths::new(&self.root).relative_to(&self.cwd) {
            lines.push(format!("    cd {dir}"));
        }
        lines.push(format!("    {test}"));
        lines.push(String::new());

        let described: Vec<(&PlannedFile, &str)> = files
            .iter()
            .filter_map(|f| f.description.map(|d| (*f, d)))
            .collect();
        if !described.is_empty() {
            lines.push("And check out the following files:".to_string());
            for (file, description) in described {
                lines.push(format!("  - ./{} - {description}", file.path.display()));
            }
            lines.push(String::new());
        }

        lines.push("Visit https://playwright.dev/docs/intro for more information. ✨".to_string());
        lines.push(String::new());
        lines.push("Happy hacking! 🎭".to_string());

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
