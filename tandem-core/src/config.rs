//! Persistent settings.
//!
//! # Storage layout
//!
//! ```text
//! ~/.tandem/
//!   config.yaml     (mode 0600, written atomically)
//! ```
//!
//! Every filesystem function takes the home directory explicitly; the binary
//! resolves it once, tests pass a `TempDir`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Owner;

/// Bucket for remotes no rule matches.
pub const OTHER_BUCKET: &str = "other";

/// One categorisation rule for auxiliary git remotes: a URL containing any
/// keyword is relabelled `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl RemoteRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        self.keywords.iter().any(|k| url.contains(k.as_str()))
    }
}

/// Default rules, highest priority first.
pub fn default_remote_rules() -> Vec<RemoteRule> {
    vec![
        RemoteRule::new("github", &["github.com"]),
        RemoteRule::new("gitlab", &["gitlab"]),
        RemoteRule::new("bitbucket", &["bitbucket", "atlassian"]),
        RemoteRule::new("pantheon", &["pantheon", "drush.in", "codeserver"]),
    ]
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_true() -> bool {
    true
}

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory scanned for git working copies.
    #[serde(default)]
    pub src_dir: PathBuf,
    /// GitHub login that owns the managed repositories.
    #[serde(default)]
    pub owner: Owner,
    /// Branch every working copy and hosted repository is expected to sit on.
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Push manifest description/topics to GitHub after convergence.
    #[serde(default = "default_true")]
    pub sync_metadata: bool,
    /// Visibility of repositories created on upload.
    #[serde(default = "default_true")]
    pub private: bool,
    #[serde(default = "default_remote_rules")]
    pub remote_rules: Vec<RemoteRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::new(),
            owner: Owner::default(),
            default_branch: default_branch(),
            api_base: default_api_base(),
            sync_metadata: true,
            private: true,
            remote_rules: default_remote_rules(),
        }
    }
}

impl Settings {
    pub fn new(owner: Owner, src_dir: PathBuf) -> Self {
        Self {
            owner,
            src_dir,
            ..Self::default()
        }
    }

    /// Reject settings the engine cannot act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.0.trim().is_empty() {
            return Err(ConfigError::Invalid("owner must not be empty".to_string()));
        }
        if self.src_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("src_dir must not be empty".to_string()));
        }
        if self.default_branch.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_branch must not be empty".to_string(),
            ));
        }
        for rule in &self.remote_rules {
            if rule.name == "origin" {
                return Err(ConfigError::Invalid(
                    "remote rule may not be named 'origin'".to_string(),
                ));
            }
            if rule.keywords.iter().all(|k| k.is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "remote rule '{}' has no keywords",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.tandem/`
///
/// Creates the directory (mode `0700`) if it does not yet exist.
pub fn config_dir_at(home: &Path) -> Result<PathBuf, ConfigError> {
    let dir = home.join(".tandem");
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

/// `<home>/.tandem/config.yaml`. Pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".tandem").join("config.yaml")
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load `<home>/.tandem/config.yaml`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(home: &Path) -> Result<Settings, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save settings to `<home>/.tandem/config.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, settings: &Settings) -> Result<(), ConfigError> {
    config_dir_at(home)?;
    let path = config_path_at(home);
    let tmp_path = path.with_file_name("config.yaml.tmp");

    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Write `settings` unless a config already exists.
///
/// Idempotent: if the file already exists, loads and returns it unchanged.
pub fn init_at(home: &Path, settings: Settings) -> Result<Settings, ConfigError> {
    if config_path_at(home).exists() {
        return load_at(home);
    }
    settings.validate()?;
    save_at(home, &settings)?;
    Ok(settings)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
