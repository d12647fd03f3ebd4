use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::io::ProjectPaths;
use crate::{Result, ScaffoldError};

/// Script npm writes into a fresh package.json
const NPM_PLACEHOLDER: &str = "no test specified";

pub const TEST_SCRIPT: &str = "playwright test";

/// Point the `test` script at Playwright.
///
/// npm's placeholder script is replaced; a real `test` script is left as is.
/// With `ct_config`, a `test-ct` script running that config is added too.
/// Returns the patched document.
pub fn patch_package_json(root: &Path, ct_config: Option<&str>) -> Result<Value> {
    let path = ProjectPaths::new(root).package_json();
    if !path.exists() {
        return Err(ScaffoldError::MissingPackageJson(root.to_path_buf()));
    }

    let content = fs::read_to_string(&path)?;
    let mut manifest: Value = serde_json::from_str(&content)
        .map_err(|e| ScaffoldError::InvalidPackageJson(e.to_string()))?;

    patch_scripts(&mut manifest, ct_config)?;

    // npm writes package.json with two-space indentation and a trailing newline
    let mut json_str = serde_json::to_string_pretty(&manifest)?;
    json_str.push('\n');
    fs::write(&path, json_str)?;
    info!("Patched scripts in {}", path.display());

    Ok(manifest)
}

fn patch_scripts(manifest: &mut Value, ct_config: Option<&str>) -> Result<()> {
    let object = manifest
        .as_object_mut()
        .ok_or_else(|| ScaffoldError::InvalidPackageJson("top level must be an object".to_string()))?;

    let scripts = object
        .entry("scripts")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| ScaffoldError::InvalidPackageJson("\"scripts\" must be an object".to_string()))?;

    let is_placeholder = scripts
        .get("test")
        .and_then(Value::as_str)
        .is_some_and(|script| script.contains(NPM_PLACEHOLDER));
    if is_placeholder {
        debug!("Removing npm placeholder test script");
        scripts.shift_remove("test");
    }

    if !scripts.contains_key("test") {
        scripts.insert("test".to_string(), Value::String(TEST_SCRIPT.to_string()));
    }

    if let Some(config) = ct_config {
        scripts.insert(
            "test-ct".to_string(),
            Value::String(format!("{TEST_SCRIPT} -c {config}")),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, content: &str) {
        fs::write(dir.join("package.json"), content).unwrap();
    }

    #[test]
    fn test_replaces_npm_placeholder() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            r#"{
  "name": "demo",
  "version": "1.0.0",
  "scripts": {
    "test": "echo \"Error: no test specified\" && exit 1"
  },
  "license": "ISC"
}"#,
        );

        patch_package_json(temp_dir.path(), None).unwrap();

        let written = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        assert_eq!(
            written,
            r#"{
  "name": "demo",
  "version": "1.0.0",
  "scripts": {
    "test": "playwright test"
  },
  "license": "ISC"
}
"#
        );
    }

    #[test]
    fn test_keeps_existing_test_script_and_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            r#"{"name":"demo","scripts":{"build":"tsc","test":"vitest"},"devDependencies":{"typescript":"^5.0.0"}}"#,
        );

        let manifest = patch_package_json(temp_dir.path(), None).unwrap();

        assert_eq!(manifest["scripts"], json!({"build": "tsc", "test": "vitest"}));
        assert_eq!(manifest["devDependencies"]["typescript"], "^5.0.0");
    }

    #[test]
    fn test_adds_scripts_object_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), r#"{"name":"demo"}"#);

        let manifest = patch_package_json(temp_dir.path(), None).unwrap();
        assert_eq!(manifest["scripts"]["test"], "playwright test");
    }

    #[test]
    fn test_component_testing_script() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), r#"{"name":"demo","scripts":{}}"#);

        let manifest =
            patch_package_json(temp_dir.path(), Some("playwright-ct.config.ts")).unwrap();

        assert_eq!(
            manifest["scripts"]["test-ct"],
            "playwright test -c playwright-ct.config.ts"
        );
    }

    #[test]
    fn test_deterministic_output() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), r#"{"name":"demo"}"#);

        patch_package_json(temp_dir.path(), None).unwrap();
        let first = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        patch_package_json(temp_dir.path(), None).unwrap();
        let second = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_errors() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            patch_package_json(temp_dir.path(), None),
            Err(ScaffoldError::MissingPackageJson(_))
        ));

        write_manifest(temp_dir.path(), r#"{"scripts":"nope"}"#);
        assert!(matches!(
            patch_package_json(temp_dir.path(), None),
            Err(ScaffoldError::InvalidPackageJson(_))
        ));

        write_manifest(temp_dir.path(), "{ not json");
        assert!(matches!(
            patch_package_json(temp_dir.path(), None),
            Err(ScaffoldError::InvalidPackageJson(_))
        ));
    }
}
