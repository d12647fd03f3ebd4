use crate::{Result, ScaffoldError};
use std::path::{Component, Path, PathBuf};

/// Well-known files inside the project being scaffolded
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    /// Project root (where package.json lives)
    pub root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn package_json(&self) -> PathBuf {
        self.root.join("package.json")
    }

    pub fn gitignore(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    pub fn pnpm_workspace(&self) -> PathBuf {
        self.root.join("pnpm-workspace.yaml")
    }

    /// Join a planned relative path onto the root, rejecting anything that
    /// would land outside of it
    pub fn resolve(&self, relative: &Path) -> Result<PathBuf> {
        if !PathUtils::is_safe_path(relative) {
            return Err(ScaffoldError::UnsafePath(relative.to_path_buf()));
        }
        Ok(self.root.join(relative))
    }

    /// How to reach the root from `cwd`, for the `cd` hint. `None` when they
    /// are the same directory.
    pub fn relative_to(&self, cwd: &Path) -> Option<String> {
        if self.root == cwd {
            return None;
        }
        let shown = match self.root.strip_prefix(cwd) {
            Ok(rel) if rel.as_os_str().is_empty() => return None,
            Ok(rel) => rel.to_path_buf(),
            Err(_) => self.root.clone(),
        };
        Some(PathUtils::to_posix(&shown.display().to_string()))
    }
}

/// Utilities for working with paths
pub struct PathUtils;

impl PathUtils {
    /// Relative, non-empty and free of `..` components
    pub fn is_safe_path(path: &Path) -> bool {
        if path.as_os_str().is_empty() || path.is_absolute() || path.has_root() {
            return false;
        }
        path.components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    }

    /// Forward slashes, for paths that end up in generated files and output
    pub fn to_posix(path: &str) -> String {
        path.replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_paths() {
        let paths = ProjectPaths::new("/tmp/test-project");

        assert_eq!(
            paths.package_json(),
            PathBuf::from("/tmp/test-project/package.json")
        );
        assert_eq!(
            paths.gitignore(),
            PathBuf::from("/tmp/test-project/.gitignore")
        );
    }

    #[test]
    fn test_path_utils_safety() {
        assert!(PathUtils::is_safe_path(Path::new("safe/path/file.txt")));
        assert!(PathUtils::is_safe_path(Path::new("./tests")));
        assert!(!PathUtils::is_safe_path(Path::new("../../../etc/passwd")));
        assert!(!PathUtils::is_safe_path(Path::new("safe/../unsafe/file.txt")));
        assert!(!PathUtils::is_safe_path(Path::new("")));
        assert!(!PathUtils::is_safe_path(Path::new("/etc/passwd")));
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let paths = ProjectPaths::new("/tmp/project");
        assert!(paths.resolve(Path::new("tests/example.spec.ts")).is_ok());
        assert!(matches!(
            paths.resolve(Path::new("../outside.ts")),
            Err(ScaffoldError::UnsafePath(_))
        ));
    }

    #[test]
    fn test_relative_to_cwd() {
        let paths = ProjectPaths::new("/work/my-app");
        assert_eq!(paths.relative_to(Path::new("/work/my-app")), None);
        assert_eq!(
            paths.relative_to(Path::new("/work")),
            Some("my-app".to_string())
        );
        assert_eq!(
            paths.relative_to(Path::new("/elsewhere")),
            Some("/work/my-app".to_string())
        );
    }

    #[test]
    fn test_to_posix() {
        assert_eq!(PathUtils::to_posix("tests\\e2e"), "tests/e2e");
    }
}
