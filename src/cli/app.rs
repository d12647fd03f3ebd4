use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::options::{Browser, Language};

/// Log levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// create-playwright: set up a Playwright end-to-end testing project
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "create-playwright", version)]
#[command(about = "Scaffold a Playwright end-to-end testing project")]
#[command(
    long_about = "Asks a few questions, writes a Playwright config and example tests, installs @playwright/test through your package manager and wires up the test script in package.json.\n\nSet TEST_OPTIONS to a JSON answer record to skip the questions."
)]
pub struct Cli {
    /// Directory to create the project in (defaults to the current directory)
    pub root_dir: Option<PathBuf>,

    /// Do not ask questions, use defaults and flags
    #[arg(long)]
    pub quiet: bool,

    /// Language for the config and example tests
    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    /// Add a GitHub Actions workflow (with --quiet)
    #[arg(long)]
    pub gha: bool,

    /// Browsers to enable in the config and download (repeatable, defaults to all)
    #[arg(long = "browser", value_enum)]
    pub browsers: Vec<Browser>,

    /// Do not download browsers
    #[arg(long)]
    pub no_browsers: bool,

    /// Do not write example tests
    #[arg(long)]
    pub no_examples: bool,

    /// Install operating system dependencies for the browsers (with --quiet)
    #[arg(long)]
    pub install_deps: bool,

    /// Set up experimental component testing
    #[arg(long)]
    pub ct: bool,

    /// Install the @next release of Playwright
    #[arg(long, conflicts_with = "beta")]
    pub next: bool,

    /// Install the @beta release of Playwright
    #[arg(long)]
    pub beta: bool,

    /// Set log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags() {
        let cli = Cli::parse_from([
            "create-playwright",
            "my-app",
            "--quiet",
            "--lang",
            "js",
            "--browser",
            "firefox",
            "--browser",
            "webkit",
            "--gha",
        ]);

        assert_eq!(cli.root_dir, Some(PathBuf::from("my-app")));
        assert!(cli.quiet);
        assert!(cli.gha);
        assert_eq!(cli.lang, Some(Language::JavaScript));
        assert_eq!(cli.browsers, vec![Browser::Firefox, Browser::Webkit]);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_next_conflicts_with_beta() {
        let result = Cli::try_parse_from(["create-playwright", "--next", "--beta"]);
        assert!(result.is_err());
    }
}
