use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InstallerError, Result};
use crate::repo_config::{url_key, RequiredRepos};

const SETTINGS_DIR: &str = "dalamud-installer";
const SETTINGS_FILE: &str = "config.toml";

pub const OFFICIAL_REPO_URL: &str = "https://kamori.goats.dev/Plugin/PluginMaster";
pub const SEA_OF_STARS_REPO_URL: &str =
    "https://raw.githubusercontent.com/Ottermandias/SeaOfStars/main/repo.json";
pub const DEFAULT_REPO_TYPE_TAG: &str = "Dalamud.Configuration.ThirdPartyRepoSettings, Dalamud";
pub const BUG_REPORT_URL: &str = "https://github.com/PrincessRTFM/MareInstaller/issues/new/choose";
pub const LAUNCHER_DOWNLOAD_URL: &str =
    "https://github.com/goatcorp/FFXIVQuickLauncher/releases/latest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default settings template with rich comments
const DEFAULT_SETTINGS_TEMPLATE: &str = r#"# dalamud-installer settings
# Every key is optional; missing keys fall back to the built-in defaults.

# Repository that Dalamud always knows about; never injected into the config
official_repo = "https://kamori.goats.dev/Plugin/PluginMaster"

# `$type` written on new repository entries when the config has none to copy
repo_type_tag = "Dalamud.Configuration.ThirdPartyRepoSettings, Dalamud"

bug_report_url = "https://github.com/PrincessRTFM/MareInstaller/issues/new/choose"
launcher_download_url = "https://github.com/goatcorp/FFXIVQuickLauncher/releases/latest"

[http]
timeout_secs = 30

# Plugins to install, in order. `repo` is the manifest that lists the plugin.
[[plugins]]
name = "MareSynchronos"
repo = "https://raw.githubusercontent.com/Ottermandias/SeaOfStars/main/repo.json"

[[plugins]]
name = "Penumbra"
repo = "https://raw.githubusercontent.com/Ottermandias/SeaOfStars/main/repo.json"

[[plugins]]
name = "Glamourer"
repo = "https://raw.githubusercontent.com/Ottermandias/SeaOfStars/main/repo.json"

[[plugins]]
name = "SimpleHeels"
repo = "https://raw.githubusercontent.com/Ottermandias/SeaOfStars/main/repo.json"

[[plugins]]
name = "CustomizePlus"
repo = "https://raw.githubusercontent.com/Ottermandias/SeaOfStars/main/repo.json"

[[plugins]]
name = "PalettePlus"
repo = "https://raw.githubusercontent.com/Ottermandias/SeaOfStars/main/repo.json"

[[plugins]]
name = "Honorific"
repo = "https://kamori.goats.dev/Plugin/PluginMaster"
"#;

/// Installer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_official_repo")]
    pub official_repo: String,

    /// Type discriminator for synthesized repository entries
    #[serde(default = "default_repo_type_tag")]
    pub repo_type_tag: String,

    #[serde(default = "default_bug_report_url")]
    pub bug_report_url: String,

    #[serde(default = "default_launcher_download_url")]
    pub launcher_download_url: String,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginSpec>,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// A plugin to install and the repository manifest that lists it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    pub repo: String,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repo: repo.into(),
        }
    }
}

fn default_official_repo() -> String {
    OFFICIAL_REPO_URL.to_string()
}

fn default_repo_type_tag() -> String {
    DEFAULT_REPO_TYPE_TAG.to_string()
}

fn default_bug_report_url() -> String {
    BUG_REPORT_URL.to_string()
}

fn default_launcher_download_url() -> String {
    LAUNCHER_DOWNLOAD_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("dalamud-installer/{}", env!("CARGO_PKG_VERSION"))
}

fn default_plugins() -> Vec<PluginSpec> {
    [
        ("MareSynchronos", SEA_OF_STARS_REPO_URL),
        ("Penumbra", SEA_OF_STARS_REPO_URL),
        ("Glamourer", SEA_OF_STARS_REPO_URL),
        ("SimpleHeels", SEA_OF_STARS_REPO_URL),
        ("CustomizePlus", SEA_OF_STARS_REPO_URL),
        ("PalettePlus", SEA_OF_STARS_REPO_URL),
        ("Honorific", OFFICIAL_REPO_URL),
    ]
    .into_iter()
    .map(|(name, repo)| PluginSpec::new(name, repo))
    .collect()
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            official_repo: default_official_repo(),
            repo_type_tag: default_repo_type_tag(),
            bug_report_url: default_bug_report_url(),
            launcher_download_url: default_launcher_download_url(),
            http: HttpSettings::default(),
            plugins: default_plugins(),
        }
    }
}

impl Settings {
    /// Default settings path (`<config dir>/dalamud-installer/config.toml`)
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .ok_or(InstallerError::HomeNotFound)?;
        Ok(base.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from a file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings =
            toml::from_str(&content).map_err(|e| InstallerError::SettingsParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| InstallerError::SettingsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Write the commented default template unless a file already exists
    pub fn init(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS_TEMPLATE)?;
        Ok(true)
    }

    /// Add a plugin, or point an existing one (matched ignoring case) at `repo`
    pub fn upsert_plugin(&mut self, name: &str, repo: &str) {
        match self
            .plugins
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.repo = repo.to_string(),
            None => self.plugins.push(PluginSpec::new(name, repo)),
        }
    }

    /// Remove a plugin by name, ignoring case. Returns whether it was present.
    pub fn remove_plugin(&mut self, name: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|p| !p.name.eq_ignore_ascii_case(name));
        self.plugins.len() != before
    }

    /// Repositories that must be registered in the Dalamud config.
    ///
    /// Every plugin repository except the official one, which Dalamud
    /// always knows about.
    pub fn required_repos(&self) -> RequiredRepos {
        let official = url_key(&self.official_repo);
        let mut repos = RequiredRepos::default();
        for plugin in &self.plugins {
            if url_key(&plugin.repo) != official {
                repos.insert(&plugin.repo);
            }
        }
        repos
    }

    /// Every repository manifest to load: the official one first, then each
    /// plugin repository, without duplicates.
    pub fn all_repos(&self) -> Vec<String> {
        let mut repos = RequiredRepos::default();
        repos.insert(&self.official_repo);
        for plugin in &self.plugins {
            repos.insert(&plugin.repo);
        }
        repos.into_vec()
    }
}
