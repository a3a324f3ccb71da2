//! Package manifest reading.
//!
//! `read_manifest(dir)` inspects the manifest files at a working-copy root and
//! returns the declared name, description and keywords. Files are checked in
//! priority order and the first one present wins:
//!
//! 1. `package.json`
//! 2. `Cargo.toml` (`[package]`)
//! 3. `pyproject.toml` (`[project]`)

use std::fs;
use std::path::Path;

use serde::Deserialize;

use tandem_core::{InventoryError, RepoMeta};
use tandem_core::error::io_err;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// What a package manifest declares about its repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub name: Option<String>,
    pub meta: RepoMeta,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read the highest-priority manifest under `dir`, if any.
pub fn read_manifest(dir: &Path) -> Result<Option<Manifest>, InventoryError> {
    if let Some(m) = read_package_json(dir)? { return Ok(Some(m)); }
    if let Some(m) = read_cargo_toml(dir)? { return Ok(Some(m)); }
    if let Some(m) = read_pyproject(dir)? { return Ok(Some(m)); }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PackageJson {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

fn read_package_json(dir: &Path) -> Result<Option<Manifest>, InventoryError> {
    let file = dir.join("package.json");
    if !file.exists() { return Ok(None); }
    let content = fs::read_to_string(&file).map_err(|e| io_err(&file, e))?;
    let pkg: PackageJson = serde_json::from_str(&content).map_err(|e| InventoryError::Manifest {
        path: file.clone(),
        message: e.to_string(),
    })?;
    Ok(Some(manifest(pkg.name, pkg.description, pkg.keywords)))
}

// Cargo allows `description.workspace = true`, so the optional fields stay untyped.
#[derive(Deserialize)]
struct TomlTable {
    name: Option<String>,
    description: Option<toml::Value>,
    keywords: Option<toml::Value>,
}

#[derive(Deserialize)]
struct CargoToml {
    package: Option<TomlTable>,
}

#[derive(Deserialize)]
struct PyProject {
    project: Option<TomlTable>,
}

fn read_cargo_toml(dir: &Path) -> Result<Option<Manifest>, InventoryError> {
    let file = dir.join("Cargo.toml");
    if !file.exists() { return Ok(None); }
    let parsed: CargoToml = parse_toml(&file)?;
    Ok(Some(parsed.package.map(from_table).unwrap_or_default()))
}

fn read_pyproject(dir: &Path) -> Result<Option<Manifest>, InventoryError> {
    let file = dir.join("pyproject.toml");
    if !file.exists() { return Ok(None); }
    let parsed: PyProject = parse_toml(&file)?;
    Ok(Some(parsed.project.map(from_table).unwrap_or_default()))
}

fn parse_toml<T: for<'de> Deserialize<'de>>(file: &Path) -> Result<T, InventoryError> {
    let content = fs::read_to_string(file).map_err(|e| io_err(file, e))?;
    toml::from_str(&content).map_err(|e| InventoryError::Manifest {
        path: file.to_path_buf(),
        message: e.to_string(),
    })
}

fn from_table(table: TomlTable) -> Manifest {
    let description = table
        .description
        .as_ref()
        .and_then(toml::Value::as_str)
        .map(str::to_owned);
    let keywords = match table.keywords {
        Some(toml::Value::Array(items)) => items
            .iter()
            .filter_map(toml::Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    };
    manifest(table.name, description, keywords)
}

fn manifest(name: Option<String>, description: Option<String>, keywords: Vec<String>) -> Manifest {
    Manifest {
        name: name.filter(|n| !n.trim().is_empty()),
        meta: RepoMeta {
            description: description.filter(|d| !d.trim().is_empty()),
            topics: keywords,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, file: &str, content: &str) {
        fs::write(dir.path().join(file), content).unwrap();
    }

    #[test]
    fn no_manifest_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_manifest(dir.path()).unwrap(), None);
    }

    #[test]
    fn package_json_fields() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "package.json",
            r#"{"name":"foo-pkg","description":"A foo","keywords":["cli","git"]}"#,
        );
        let m = read_manifest(dir.path()).unwrap().unwrap();
        assert_eq!(m.name.as_deref(), Some("foo-pkg"));
        assert_eq!(m.meta.description.as_deref(), Some("A foo"));
        assert_eq!(m.meta.topics, vec!["cli".to_string(), "git".to_string()]);
    }

    #[test]
    fn package_json_beats_cargo_toml() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", r#"{"name":"from-npm"}"#);
        write(&dir, "Cargo.toml", "[package]\nname = \"from-cargo\"\n");
        let m = read_manifest(dir.path()).unwrap().unwrap();
        assert_eq!(m.name.as_deref(), Some("from-npm"));
    }

    #[test]
    fn cargo_toml_with_inherited_description() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "Cargo.toml",
            "[package]\nname = \"crate-a\"\ndescription.workspace = true\nkeywords = [\"sync\"]\n",
        );
        let m = read_manifest(dir.path()).unwrap().unwrap();
        assert_eq!(m.name.as_deref(), Some("crate-a"));
        assert_eq!(m.meta.description, None);
        assert_eq!(m.meta.topics, vec!["sync".to_string()]);
    }

    #[test]
    fn workspace_cargo_toml_has_no_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "Cargo.toml", "[workspace]\nmembers = [\"a\"]\n");
        assert_eq!(read_manifest(dir.path()).unwrap(), Some(Manifest::default()));
    }

    #[test]
    fn pyproject_fields() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "pyproject.toml",
            "[project]\nname = \"pytool\"\ndescription = \"Py tool\"\n",
        );
        let m = read_manifest(dir.path()).unwrap().unwrap();
        assert_eq!(m.name.as_deref(), Some("pytool"));
        assert_eq!(m.meta.description.as_deref(), Some("Py tool"));
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "package.json", "{ not json");
        let err = read_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, InventoryError::Manifest { .. }));
    }
}
