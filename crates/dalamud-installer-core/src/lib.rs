pub mod catalog;
pub mod error;
pub mod fetch;
pub mod installer;
pub mod repo_config;
pub mod session;
pub mod settings;

pub use catalog::{parse_manifest, Catalog, PluginMetadata};
pub use error::{ErrorKind, InstallerError, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use installer::{
    extract_archive, resolve_entry_path, InstallDetails, InstallOutcome, PluginInstaller,
};
pub use repo_config::{
    build_entry, merge_repositories, normalize_repo_url, parse_document, ConfigPatcher,
    MergeReport, RequiredRepos,
};
pub use session::{is_missing_config, InstallPaths, PluginReport, RepoLoad, RunSummary, Session};
pub use settings::{
    HttpSettings, PluginSpec, Settings, BUG_REPORT_URL, LAUNCHER_DOWNLOAD_URL, OFFICIAL_REPO_URL,
};
