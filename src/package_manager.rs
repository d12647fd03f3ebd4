//! Package manager detection and the command lines each one uses
//!
//! The manager is picked from `npm_config_user_agent`, which npm, yarn, pnpm
//! and bun all set for the processes they spawn (`npm init playwright`,
//! `yarn create playwright`, ...).

use std::path::Path;
use tracing::debug;

use crate::io::ProjectPaths;

pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Commands a package manager contributes to the scaffold
pub trait PackageManager {
    /// Display name
    fn name(&self) -> &'static str;

    /// Executable name
    fn cli(&self) -> &'static str;

    /// Create a package.json
    fn init(&self) -> Vec<String>;

    /// Run a binary from node_modules
    fn npx(&self, command: &str, args: &[&str]) -> Vec<String>;

    /// Shell line installing dependencies on CI; rendered into the workflow, never executed
    fn ci(&self) -> String;

    fn install_dev_dependency(&self, name: &str) -> Vec<String>;

    fn run_playwright_test(&self, args: &[&str]) -> Vec<String> {
        let mut full = vec!["test"];
        full.extend_from_slice(args);
        self.npx("playwright", &full)
    }

    /// Run a package.json script
    fn run(&self, script: &str) -> Vec<String>;
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

fn with_args(mut head: Vec<String>, args: &[&str]) -> Vec<String> {
    head.extend(args.iter().map(|a| a.to_string()));
    head
}

pub struct Npm;

pub struct Yarn {
    /// Yarn 2+ ("berry")
    pub berry: bool,
}

pub struct Pnpm {
    /// The root holds pnpm-workspace.yaml, so root installs need --workspace-root
    pub workspace_root: bool,
}

pub struct Bun;

impl PackageManager for Npm {
    fn name(&self) -> &'static str {
        "NPM"
    }

    fn cli(&self) -> &'static str {
        "npm"
    }

    fn init(&self) -> Vec<String> {
        argv(&["npm", "init", "-y"])
    }

    fn npx(&self, command: &str, args: &[&str]) -> Vec<String> {
        with_args(argv(&["npx", command]), args)
    }

    fn ci(&self) -> String {
        "npm ci".to_string()
    }

    fn install_dev_dependency(&self, name: &str) -> Vec<String> {
        argv(&["npm", "install", "--save-dev", name])
    }

    fn run(&self, script: &str) -> Vec<String> {
        argv(&["npm", "run", script])
    }
}

impl PackageManager for Yarn {
    fn name(&self) -> &'static str {
        if self.berry {
            "Yarn Berry"
        } else {
            "Yarn Classic"
        }
    }

    fn cli(&self) -> &'static str {
        "yarn"
    }

    fn init(&self) -> Vec<String> {
        argv(&["yarn", "init", "-y"])
    }

    fn npx(&self, command: &str, args: &[&str]) -> Vec<String> {
        with_args(argv(&["yarn", command]), args)
    }

    fn ci(&self) -> String {
        if self.berry {
            "corepack enable && yarn install --immutable".to_string()
        } else {
            "npm install -g yarn && yarn".to_string()
        }
    }

    fn install_dev_dependency(&self, name: &str) -> Vec<String> {
        argv(&["yarn", "add", "--dev", name])
    }

    fn run(&self, script: &str) -> Vec<String> {
        argv(&["yarn", script])
    }
}

impl PackageManager for Pnpm {
    fn name(&self) -> &'static str {
        "pnpm"
    }

    fn cli(&self) -> &'static str {
        "pnpm"
    }

    fn init(&self) -> Vec<String> {
        argv(&["pnpm", "init"])
    }

    fn npx(&self, command: &str, args: &[&str]) -> Vec<String> {
        with_args(argv(&["pnpm", "exec", command]), args)
    }

    fn ci(&self) -> String {
        "npm install -g pnpm && pnpm install".to_string()
    }

    fn install_dev_dependency(&self, name: &str) -> Vec<String> {
        let mut command = argv(&["pnpm", "add", "--save-dev"]);
        if self.workspace_root {
            command.push("--workspace-root".to_string());
        }
        command.push(name.to_string());
        command
    }

    fn run(&self, script: &str) -> Vec<String> {
        argv(&["pnpm", "run", script])
    }
}

impl PackageManager for Bun {
    fn name(&self) -> &'static str {
        "Bun"
    }

    fn cli(&self) -> &'static str {
        "bun"
    }

    fn init(&self) -> Vec<String> {
        argv(&["bun", "init", "-y"])
    }

    fn npx(&self, command: &str, args: &[&str]) -> Vec<String> {
        with_args(argv(&["bunx", command]), args)
    }

    fn ci(&self) -> String {
        "npm install -g bun && bun install".to_string()
    }

    fn install_dev_dependency(&self, name: &str) -> Vec<String> {
        argv(&["bun", "add", "-D", name])
    }

    fn run(&self, script: &str) -> Vec<String> {
        argv(&["bun", "run", script])
    }
}

/// Pick the package manager that launched us
pub fn determine_package_manager(root: &Path) -> Box<dyn PackageManager> {
    let agent = std::env::var(USER_AGENT_ENV).ok();
    from_user_agent(agent.as_deref(), root)
}

/// Agent strings look like `pnpm/8.6.0 npm/? node/v18.16.0 linux x64`
pub fn from_user_agent(agent: Option<&str>, root: &Path) -> Box<dyn PackageManager> {
    let agent = agent.unwrap_or_default();
    let manager: Box<dyn PackageManager> = if let Some(rest) = agent.strip_prefix("yarn") {
        Box::new(Yarn {
            berry: major_version(rest).is_some_and(|major| major >= 2),
        })
    } else if agent.starts_with("pnpm") {
        Box::new(Pnpm {
            workspace_root: ProjectPaths::new(root).pnpm_workspace().exists(),
        })
    } else if agent.starts_with("bun") {
        Box::new(Bun)
    } else {
        Box::new(Npm)
    };
    debug!(agent, package_manager = manager.name(), "Detected package manager");
    manager
}

fn major_version(after_name: &str) -> Option<u32> {
    after_name
        .strip_prefix('/')?
        .split(['.', ' '])
        .next()?
        .parse()
        .ok()
}
