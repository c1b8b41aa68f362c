//! Plugin Installer
//!
//! Downloads a plugin archive and extracts it into
//! `<plugin root>/<name>/<version>`. The versioned directory doubles as the
//! "already installed" marker, so it only ever exists fully extracted.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use zip::ZipArchive;

use crate::catalog::{Catalog, PluginMetadata};
use crate::error::{InstallerError, Result};
use crate::fetch::Fetch;

/// Result of installing one plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The versioned directory was already present; nothing was downloaded
    AlreadyInstalled { version: String, path: PathBuf },
    Installed(InstallDetails),
}

/// What a fresh install wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDetails {
    pub version: String,
    pub path: PathBuf,
    /// Files written (directories not counted)
    pub files: usize,
    /// Archive size in bytes
    pub archive_size: usize,
    /// Hex SHA-256 of the archive
    pub sha256: String,
}

impl InstallOutcome {
    pub fn version(&self) -> &str {
        match self {
            Self::AlreadyInstalled { version, .. } => version,
            Self::Installed(details) => &details.version,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::AlreadyInstalled { path, .. } => path,
            Self::Installed(details) => &details.path,
        }
    }
}

/// Resolve an archive entry name against `target` without touching the
/// filesystem. Returns `None` if the entry would land outside `target`.
pub fn resolve_entry_path(target: &Path, name: &str) -> Option<PathBuf> {
    let name = name.replace('\\', "/");
    let mut resolved = target.to_path_buf();

    for component in Path::new(&name).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    resolved.starts_with(target).then_some(resolved)
}

/// Reject names and versions that are not a single plain path component
fn checked_component<'a>(value: &'a str) -> Result<&'a str> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !value.contains(['/', '\\']) => Ok(value),
        _ => Err(InstallerError::PathTraversal {
            entry: value.to_string(),
        }),
    }
}

struct PlannedEntry {
    index: usize,
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Extract a zip archive into `target`, returning the number of files written.
///
/// Every entry is checked before anything is written. If writing any entry
/// fails, `target` is removed again.
pub fn extract_archive(archive: &[u8], target: &Path, plugin: &PluginMetadata) -> Result<usize> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;
    if zip.len() == 0 {
        return Err(InstallerError::EmptyArchive {
            name: plugin.name.clone(),
            version: plugin.version.clone(),
        });
    }

    let mut plan = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let entry = zip.by_index(index)?;
        let name = entry.name().to_string();
        let path = resolve_entry_path(target, &name)
            .ok_or_else(|| InstallerError::PathTraversal { entry: name.clone() })?;
        plan.push(PlannedEntry {
            index,
            is_dir: entry.is_dir(),
            name,
            path,
        });
    }

    tracing::info!(
        plugin = %plugin.name,
        version = %plugin.version,
        entries = plan.len(),
        "Extracting plugin files"
    );

    match write_entries(&mut zip, &plan, target) {
        Ok(files) => Ok(files),
        Err(err) => {
            tracing::warn!(path = %target.display(), error = %err, "Extraction failed, removing partial install");
            if let Err(cleanup) = fs::remove_dir_all(target) {
                tracing::warn!(path = %target.display(), error = %cleanup, "Could not remove partial install");
            }
            Err(err)
        }
    }
}

fn write_entries(
    zip: &mut ZipArchive<Cursor<&[u8]>>,
    plan: &[PlannedEntry],
    target: &Path,
) -> Result<usize> {
    let extract_err = |name: &str| {
        let entry = name.to_string();
        move |source: io::Error| InstallerError::Extract { entry, source }
    };

    fs::create_dir_all(target).map_err(extract_err(&target.display().to_string()))?;

    let mut files = 0;
    for item in plan {
        if item.is_dir {
            fs::create_dir_all(&item.path).map_err(extract_err(&item.name))?;
            continue;
        }

        if let Some(parent) = item.path.parent() {
            fs::create_dir_all(parent).map_err(extract_err(&item.name))?;
        }
        let mut entry = zip.by_index(item.index)?;
        let mut out = File::create(&item.path).map_err(extract_err(&item.name))?;
        io::copy(&mut entry, &mut out).map_err(extract_err(&item.name))?;
        files += 1;
    }

    Ok(files)
}

/// Installs plugins from a shared [`Catalog`]
pub struct PluginInstaller {
    catalog: Arc<Catalog>,
    fetcher: Arc<dyn Fetch>,
    plugin_root: PathBuf,
}

impl PluginInstaller {
    pub fn new(catalog: Arc<Catalog>, fetcher: Arc<dyn Fetch>, plugin_root: PathBuf) -> Self {
        Self {
            catalog,
            fetcher,
            plugin_root,
        }
    }

    pub fn plugin_root(&self) -> &Path {
        &self.plugin_root
    }

    /// Versioned install directory for a plugin
    pub fn install_dir(&self, plugin: &PluginMetadata) -> Result<PathBuf> {
        Ok(self
            .plugin_root
            .join(checked_component(&plugin.name)?)
            .join(checked_component(&plugin.version)?))
    }

    /// Install `plugin_name` as listed by the repository at `repo_url`
    pub fn run(&self, plugin_name: &str, repo_url: &str) -> Result<InstallOutcome> {
        self.catalog.load_repo(repo_url)?;
        let plugin =
            self.catalog
                .find_plugin(plugin_name)
                .ok_or_else(|| InstallerError::PluginNotFound {
                    name: plugin_name.to_string(),
                    repo: repo_url.to_string(),
                })?;

        let target = self.install_dir(&plugin)?;
        if target.is_dir() {
            tracing::info!(plugin = %plugin.name, version = %plugin.version, "Already installed");
            return Ok(InstallOutcome::AlreadyInstalled {
                version: plugin.version,
                path: target,
            });
        }

        tracing::info!(
            plugin = %plugin.name,
            url = %plugin.download_url,
            "Downloading plugin"
        );
        let archive = self.fetcher.get(&plugin.download_url)?;
        let files = extract_archive(&archive, &target, &plugin)?;

        Ok(InstallOutcome::Installed(InstallDetails {
            version: plugin.version,
            path: target,
            files,
            archive_size: archive.len(),
            sha256: hex::encode(Sha256::digest(&archive)),
        }))
    }
}
