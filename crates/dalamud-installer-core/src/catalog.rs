//! Plugin catalog
//!
//! Downloads Dalamud repository manifests (`pluginmaster.json`-style arrays)
//! and keeps the first metadata seen for every plugin name.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{InstallerError, Result};
use crate::fetch::Fetch;
use crate::repo_config::{parse_lenient, url_key};

/// Resolved plugin record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: String,
    /// Used verbatim as a directory name, never compared
    pub version: String,
    /// Repository the record was loaded from
    pub repo_url: String,
    pub download_url: String,
}

/// The manifest fields we rely on; everything else is ignored
#[derive(Debug, Deserialize)]
struct ManifestRecord {
    #[serde(rename = "InternalName", default)]
    internal_name: Option<Value>,
    #[serde(rename = "DownloadLinkInstall", default)]
    download_link_install: Option<Value>,
    #[serde(rename = "AssemblyVersion", default)]
    assembly_version: Option<Value>,
}

fn required_field(
    value: Option<Value>,
    field: &'static str,
    url: &str,
    index: usize,
) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s),
        _ => Err(InstallerError::MalformedManifestEntry {
            url: url.to_string(),
            index,
            field,
        }),
    }
}

/// Parse a manifest body into plugin metadata.
///
/// Non-object elements are skipped; an object missing any required field
/// fails the whole manifest.
pub fn parse_manifest(body: &[u8], url: &str) -> Result<Vec<PluginMetadata>> {
    let text = String::from_utf8_lossy(body);
    let document = parse_lenient(&text).map_err(|message| InstallerError::ManifestParse {
        url: url.to_string(),
        message,
    })?;

    let Value::Array(items) = document else {
        return Err(InstallerError::ManifestParse {
            url: url.to_string(),
            message: "manifest is not an array".to_string(),
        });
    };

    let mut plugins = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            continue;
        }
        let record: ManifestRecord =
            serde_json::from_value(item).map_err(|e| InstallerError::ManifestParse {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        plugins.push(PluginMetadata {
            name: required_field(record.internal_name, "InternalName", url, index)?,
            download_url: required_field(
                record.download_link_install,
                "DownloadLinkInstall",
                url,
                index,
            )?,
            version: required_field(record.assembly_version, "AssemblyVersion", url, index)?,
            repo_url: url.to_string(),
        });
    }

    Ok(plugins)
}

#[derive(Debug, Default)]
struct CatalogState {
    /// Repository URLs already requested, lowercased
    fetched: HashSet<String>,
    /// Why a requested repository could not be loaded, keyed like `fetched`
    failures: HashMap<String, Arc<InstallerError>>,
    /// Plugin metadata keyed by lowercased name
    plugins: HashMap<String, PluginMetadata>,
}

/// Cache of repository manifests shared by every plugin download of a run
pub struct Catalog {
    fetcher: Arc<dyn Fetch>,
    state: Mutex<CatalogState>,
}

impl Catalog {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            state: Mutex::new(CatalogState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Download and index a repository manifest.
    ///
    /// A URL is fetched at most once per catalog. A failed load is
    /// remembered and reported again, as [`InstallerError::RepoUnavailable`],
    /// on every later call. The lock is held for the whole load so concurrent
    /// callers never observe a half-indexed repository.
    pub fn load_repo(&self, url: &str) -> Result<()> {
        let key = url_key(url);
        let mut state = self.lock();
        if !state.fetched.insert(key.clone()) {
            if let Some(cause) = state.failures.get(&key) {
                return Err(InstallerError::RepoUnavailable {
                    url: url.to_string(),
                    source: Arc::clone(cause),
                });
            }
            tracing::debug!(url = %url, "Repository already loaded");
            return Ok(());
        }

        tracing::info!(url = %url, "Downloading plugin repository");
        let loaded = self
            .fetcher
            .get(url)
            .and_then(|body| parse_manifest(&body, url));
        let plugins = match loaded {
            Ok(plugins) => plugins,
            Err(err) => {
                let cause = Arc::new(err);
                state.failures.insert(key, Arc::clone(&cause));
                return Err(InstallerError::RepoUnavailable {
                    url: url.to_string(),
                    source: cause,
                });
            }
        };

        let mut added = 0;
        for plugin in plugins {
            let key = plugin.name.to_lowercase();
            if let Some(existing) = state.plugins.get(&key) {
                tracing::debug!(
                    plugin = %plugin.name,
                    kept = %existing.repo_url,
                    "Plugin already provided by another repository"
                );
                continue;
            }
            state.plugins.insert(key, plugin);
            added += 1;
        }

        tracing::info!(url = %url, plugins = added, "Repository loaded");
        Ok(())
    }

    /// Look up a plugin by name, ignoring case
    pub fn find_plugin(&self, name: &str) -> Option<PluginMetadata> {
        self.lock().plugins.get(&name.to_lowercase()).cloned()
    }

    /// Number of known plugins
    pub fn len(&self) -> usize {
        self.lock().plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
