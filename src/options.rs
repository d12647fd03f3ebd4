//! The answer record and the three ways of obtaining it: `TEST_OPTIONS`,
//! `--quiet` defaults, or interactive questions.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::cli::Cli;
use crate::io::PathUtils;
use crate::prompt::Prompt;
use crate::{Result, ScaffoldError};

/// Environment variable carrying a JSON answer record
pub const TEST_OPTIONS_ENV: &str = "TEST_OPTIONS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    #[default]
    #[value(name = "ts", alias = "typescript")]
    TypeScript,
    #[value(name = "js", alias = "javascript")]
    JavaScript,
}

impl Language {
    pub fn extension(self) -> &'static str {
        match self {
            Language::TypeScript => "ts",
            Language::JavaScript => "js",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub const ALL: [Browser; 3] = [Browser::Chromium, Browser::Firefox, Browser::Webkit];

    pub fn name(self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// UI frameworks supported by experimental component testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    React,
    React17,
    Vue,
    Vue2,
    Svelte,
    Solid,
}

impl Framework {
    pub const ALL: [Framework; 6] = [
        Framework::React,
        Framework::React17,
        Framework::Vue,
        Framework::Vue2,
        Framework::Svelte,
        Framework::Solid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::React17 => "react17",
            Framework::Vue => "vue",
            Framework::Vue2 => "vue2",
            Framework::Svelte => "svelte",
            Framework::Solid => "solid",
        }
    }

    pub fn ct_package(self) -> String {
        format!("@playwright/experimental-ct-{}", self.name())
    }
}

fn default_true() -> bool {
    true
}

/// Answers that drive the scaffold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOptions {
    pub test_dir: String,
    #[serde(rename = "installGitHubActions")]
    pub install_github_actions: bool,
    pub language: Language,
    #[serde(default = "default_true")]
    pub install_playwright_browsers: bool,
    #[serde(default)]
    pub install_playwright_dependencies: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<Framework>,
}

impl PromptOptions {
    /// Read answers from `TEST_OPTIONS`, if set
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var(TEST_OPTIONS_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                debug!("Reading answers from {}", TEST_OPTIONS_ENV);
                Self::from_json(&raw).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let options: PromptOptions = serde_json::from_str(raw).map_err(|e| {
            ScaffoldError::InvalidOptions(format!("{} is not a valid answer record: {}", TEST_OPTIONS_ENV, e))
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Answers used by `--quiet`
    pub fn defaults(root: &Path, cli: &Cli) -> Self {
        Self {
            test_dir: default_test_dir(root).to_string(),
            install_github_actions: cli.gha,
            language: cli.lang.unwrap_or_default(),
            install_playwright_browsers: !cli.no_browsers,
            install_playwright_dependencies: cli.install_deps,
            framework: cli.ct.then_some(Framework::React),
        }
    }

    /// Ask the questions one by one
    pub fn ask(prompt: &mut dyn Prompt, root: &Path, cli: &Cli) -> Result<Self> {
        let languages = [Language::TypeScript, Language::JavaScript];
        let labels: Vec<&str> = languages.iter().map(|l| l.label()).collect();
        let default_language = match cli.lang.unwrap_or_default() {
            Language::TypeScript => 0,
            Language::JavaScript => 1,
        };
        let language = languages[prompt.select(
            "Do you want to use TypeScript or JavaScript?",
            &labels,
            default_language,
        )?];

        let framework = if cli.ct {
            let names: Vec<&str> = Framework::ALL.iter().map(|f| f.name()).collect();
            let picked = prompt.select("Which framework do you use? (experimental)", &names, 0)?;
            Some(Framework::ALL[picked])
        } else {
            None
        };

        let test_dir = prompt.input("Where to put your end-to-end tests?", default_test_dir(root))?;

        let install_github_actions = if cli.ct {
            false
        } else {
            prompt.confirm("Add a GitHub Actions workflow?", cli.gha)?
        };

        let install_playwright_browsers = prompt.confirm(
            "Install Playwright browsers (can be done manually via 'npx playwright install')?",
            !cli.no_browsers,
        )?;

        let install_playwright_dependencies = if cfg!(target_os = "linux") {
            prompt.confirm(
                "Install Playwright operating system dependencies (requires sudo / root - can be done manually via 'sudo npx playwright install-deps')?",
                cli.install_deps,
            )?
        } else {
            false
        };

        let options = Self {
            test_dir,
            install_github_actions,
            language,
            install_playwright_browsers,
            install_playwright_dependencies,
            framework,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let trimmed = self.test_dir.trim_end_matches(['/', '\\']);
        if !PathUtils::is_safe_path(Path::new(trimmed)) {
            return Err(ScaffoldError::UnsafePath(self.test_dir.clone().into()));
        }
        Ok(())
    }

    /// Test directory as written into generated files
    pub fn normalized_test_dir(&self) -> String {
        let posix = PathUtils::to_posix(&self.test_dir);
        posix
            .trim_start_matches("./")
            .trim_end_matches('/')
            .to_string()
    }
}

/// `tests`, unless the project already has one, then `e2e`
pub fn default_test_dir(root: &Path) -> &'static str {
    if root.join("tests").exists() {
        "e2e"
    } else {
        "tests"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::TerminalPrompt;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_from_json_applies_defaults() {
        let options = PromptOptions::from_json(
            r#"{"testDir":"e2e","installGitHubActions":true,"language":"JavaScript"}"#,
        )
        .unwrap();

        assert_eq!(
            options,
            PromptOptions {
                test_dir: "e2e".to_string(),
                install_github_actions: true,
                language: Language::JavaScript,
                install_playwright_browsers: true,
                install_playwright_dependencies: false,
                framework: None,
            }
        );
    }

    #[test]
    fn test_from_json_reads_framework() {
        let options = PromptOptions::from_json(
            r#"{"testDir":"src","installGitHubActions":false,"language":"TypeScript","framework":"vue2","installPlaywrightBrowsers":false}"#,
        )
        .unwrap();

        assert_eq!(options.framework, Some(Framework::Vue2));
        assert!(!options.install_playwright_browsers);
    }

    #[test]
    fn test_from_json_rejects_missing_core_field() {
        let err = PromptOptions::from_json(r#"{"testDir":"tests","language":"TypeScript"}"#)
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidOptions(_)));
        assert!(err.to_string().contains("installGitHubActions"));
    }

    #[test]
    fn test_from_json_rejects_escaping_test_dir() {
        let err = PromptOptions::from_json(
            r#"{"testDir":"../outside","installGitHubActions":false,"language":"TypeScript"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::UnsafePath(_)));
    }

    #[test]
    #[serial]
    fn test_from_env_unset_and_set() {
        std::env::remove_var(TEST_OPTIONS_ENV);
        assert!(PromptOptions::from_env().unwrap().is_none());

        std::env::set_var(
            TEST_OPTIONS_ENV,
            r#"{"testDir":"tests","installGitHubActions":false,"language":"TypeScript"}"#,
        );
        let options = PromptOptions::from_env().unwrap().unwrap();
        assert_eq!(options.test_dir, "tests");

        std::env::set_var(TEST_OPTIONS_ENV, "not json");
        assert!(PromptOptions::from_env().is_err());

        std::env::remove_var(TEST_OPTIONS_ENV);
    }

    #[test]
    fn test_defaults_follow_flags() {
        let temp_dir = TempDir::new().unwrap();
        let cli = Cli {
            lang: Some(Language::JavaScript),
            gha: true,
            no_browsers: true,
            ..Default::default()
        };

        let options = PromptOptions::defaults(temp_dir.path(), &cli);
        assert_eq!(options.test_dir, "tests");
        assert_eq!(options.language, Language::JavaScript);
        assert!(options.install_github_actions);
        assert!(!options.install_playwright_browsers);
        assert!(!options.install_playwright_dependencies);
        assert_eq!(options.framework, None);
    }

    #[test]
    fn test_default_test_dir_avoids_existing_tests() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(default_test_dir(temp_dir.path()), "tests");

        std::fs::create_dir(temp_dir.path().join("tests")).unwrap();
        assert_eq!(default_test_dir(temp_dir.path()), "e2e");
    }

    #[test]
    fn test_ask_uses_answers() {
        let temp_dir = TempDir::new().unwrap();
        // language, test dir, GitHub Actions, browsers, (linux) OS deps
        let answers = if cfg!(target_os = "linux") {
            "2\ne2e\ny\nn\nn\n"
        } else {
            "2\ne2e\ny\nn\n"
        };
        let mut output = Vec::new();
        let mut prompt = TerminalPrompt::new(Cursor::new(answers), &mut output);

        let options = PromptOptions::ask(&mut prompt, temp_dir.path(), &Cli::default()).unwrap();

        assert_eq!(options.language, Language::JavaScript);
        assert_eq!(options.test_dir, "e2e");
        assert!(options.install_github_actions);
        assert!(!options.install_playwright_browsers);
        assert!(!options.install_playwright_dependencies);
    }

    #[test]
    fn test_ask_accepts_all_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut output = Vec::new();
        let mut prompt = TerminalPrompt::new(Cursor::new("\n\n\n\n\n"), &mut output);

        let options = PromptOptions::ask(&mut prompt, temp_dir.path(), &Cli::default()).unwrap();

        assert_eq!(options.language, Language::TypeScript);
        assert_eq!(options.test_dir, "tests");
        assert!(!options.install_github_actions);
        assert!(options.install_playwright_browsers);
    }

    #[test]
    fn test_ask_component_testing_picks_framework() {
        let temp_dir = TempDir::new().unwrap();
        let cli = Cli {
            ct: true,
            ..Default::default()
        };
        // language, framework, test dir, browsers, (linux) OS deps
        let mut output = Vec::new();
        let mut prompt = TerminalPrompt::new(Cursor::new("\nsvelte\n\n\n\n"), &mut output);

        let options = PromptOptions::ask(&mut prompt, temp_dir.path(), &cli).unwrap();

        assert_eq!(options.framework, Some(Framework::Svelte));
        assert!(!options.install_github_actions);
    }

    #[test]
    fn test_normalized_test_dir() {
        let mut options = PromptOptions::from_json(
            r#"{"testDir":"./e2e/","installGitHubActions":false,"language":"TypeScript"}"#,
        )
        .unwrap();
        assert_eq!(options.normalized_test_dir(), "e2e");

        options.test_dir = "tests\\ui".to_string();
        assert_eq!(options.normalized_test_dir(), "tests/ui");
    }
}
