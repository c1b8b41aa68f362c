//! One installer run: patch the config, load every repository, install every
//! plugin. Only the config patch is fatal; repository and plugin failures are
//! recorded and the run carries on.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::{InstallerError, Result};
use crate::fetch::{Fetch, HttpFetcher};
use crate::installer::{InstallOutcome, PluginInstaller};
use crate::repo_config::{ConfigPatcher, MergeReport};
use crate::settings::{PluginSpec, Settings};

const DALAMUD_CONFIG_FILE: &str = "dalamudConfig.json";
const INSTALLED_PLUGINS_DIR: &str = "installedPlugins";

/// Resolved locations the run operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    pub config_file: PathBuf,
    pub plugin_root: PathBuf,
}

impl InstallPaths {
    /// Standard layout inside a XIVLauncher data directory
    pub fn from_launcher_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config_file: dir.join(DALAMUD_CONFIG_FILE),
            plugin_root: dir.join(INSTALLED_PLUGINS_DIR),
        }
    }
}

/// Outcome of loading one repository manifest
#[derive(Debug)]
pub struct RepoLoad {
    pub url: String,
    pub result: Result<()>,
}

/// Outcome of installing one plugin
#[derive(Debug)]
pub struct PluginReport {
    pub name: String,
    pub repo: String,
    pub result: Result<InstallOutcome>,
}

/// Everything a run did
#[derive(Debug, Default)]
pub struct RunSummary {
    pub merge: MergeReport,
    pub repositories: Vec<RepoLoad>,
    pub plugins: Vec<PluginReport>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.plugins.iter().filter(|p| p.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.plugins.len() - self.succeeded()
    }

    /// True when every plugin is installed or was already present
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub struct Session {
    settings: Settings,
    paths: InstallPaths,
    fetcher: Arc<dyn Fetch>,
    catalog: Arc<Catalog>,
}

impl Session {
    /// Session using the real HTTP client
    pub fn new(settings: Settings, paths: InstallPaths) -> Result<Self> {
        let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&settings.http)?);
        Ok(Self::with_fetcher(settings, paths, fetcher))
    }

    pub fn with_fetcher(settings: Settings, paths: InstallPaths, fetcher: Arc<dyn Fetch>) -> Self {
        let catalog = Arc::new(Catalog::new(fetcher.clone()));
        Self {
            settings,
            paths,
            fetcher,
            catalog,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn paths(&self) -> &InstallPaths {
        &self.paths
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn patcher(&self) -> ConfigPatcher {
        ConfigPatcher::new(&self.paths.config_file, self.settings.required_repos())
            .with_type_tag(&self.settings.repo_type_tag)
    }

    /// Run everything. `Err` only when the config could not be patched.
    pub fn run(&self) -> Result<RunSummary> {
        let patcher = self.patcher();
        let merge = if patcher.can_run() {
            patcher.apply()?
        } else if patcher.config_file().is_file() {
            tracing::info!("No third-party repositories required, config left untouched");
            MergeReport::default()
        } else {
            return Err(InstallerError::ConfigNotFound {
                path: patcher.config_file().to_path_buf(),
            });
        };

        fs::create_dir_all(&self.paths.plugin_root)?;

        let repositories = self.load_repositories();
        let plugins = self.install_plugins();

        let summary = RunSummary {
            merge,
            repositories,
            plugins,
        };
        tracing::info!(
            completed = summary.succeeded(),
            failed = summary.failed(),
            "Installation finished"
        );
        Ok(summary)
    }

    fn load_repositories(&self) -> Vec<RepoLoad> {
        let loads = self
            .settings
            .all_repos()
            .into_iter()
            .map(|url| {
                let result = self.catalog.load_repo(&url);
                if let Err(err) = &result {
                    tracing::warn!(url = %url, error = %err.chain().join(": "), "Failed to load repository");
                }
                RepoLoad { url, result }
            })
            .collect::<Vec<_>>();

        tracing::info!(plugins = self.catalog.len(), "Plugin repositories loaded");
        loads
    }

    fn install_plugins(&self) -> Vec<PluginReport> {
        let installer = PluginInstaller::new(
            self.catalog.clone(),
            self.fetcher.clone(),
            self.paths.plugin_root.clone(),
        );

        self.settings
            .plugins
            .iter()
            .map(|PluginSpec { name, repo }| {
                let result = installer.run(name, repo);
                if let Err(err) = &result {
                    tracing::warn!(plugin = %name, error = %err.chain().join(": "), "Plugin installation failed");
                }
                PluginReport {
                    name: name.clone(),
                    repo: repo.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// The launcher has never been run, so there is no config to patch
pub fn is_missing_config(err: &InstallerError) -> bool {
    matches!(err, InstallerError::ConfigNotFound { .. })
}
