use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("Dalamud config not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse Dalamud config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Cannot find the third-party repository list ({node}) in the Dalamud config")]
    RepoListMissing { node: String },

    #[error("Repository entry #{index} is malformed: {message}")]
    MalformedRepoEntry { index: usize, message: String },

    #[error("Failed to parse repository manifest from {url}: {message}")]
    ManifestParse { url: String, message: String },

    #[error("Plugin entry #{index} in {url} doesn't have a string {field}")]
    MalformedManifestEntry {
        url: String,
        index: usize,
        field: &'static str,
    },

    #[error("Failed to parse settings {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    #[error("Cannot find plugin {name} in {repo}")]
    PluginNotFound { name: String, repo: String },

    #[error("Home directory not found")]
    HomeNotFound,

    #[error("Failed to download {url}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("HTTP request to {url} timed out (>{secs}s)")]
    Timeout {
        url: String,
        secs: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Repository whose load already failed earlier in the run
    #[error("Plugin repository {url} is unavailable")]
    RepoUnavailable {
        url: String,
        #[source]
        source: Arc<InstallerError>,
    },

    #[error("Plugin archive for {name} v{version} contains no files")]
    EmptyArchive { name: String, version: String },

    #[error("Archive entry escapes the install directory: {entry}")]
    PathTraversal { entry: String },

    #[error("Invalid plugin archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Cannot extract {entry} to disk, installation aborted")]
    Extract {
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InstallerError>;

/// Coarse classification used by callers to decide continue-vs-abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Malformed,
    NotFound,
    Network,
    Integrity,
    Io,
}

impl InstallerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigParse { .. }
            | Self::RepoListMissing { .. }
            | Self::MalformedRepoEntry { .. }
            | Self::ManifestParse { .. }
            | Self::MalformedManifestEntry { .. }
            | Self::SettingsParse { .. } => ErrorKind::Malformed,
            Self::ConfigNotFound { .. } | Self::PluginNotFound { .. } | Self::HomeNotFound => {
                ErrorKind::NotFound
            }
            Self::Network { .. } | Self::HttpClient(_) | Self::Timeout { .. } => {
                ErrorKind::Network
            }
            Self::EmptyArchive { .. }
            | Self::PathTraversal { .. }
            | Self::Archive(_)
            | Self::Extract { .. } => ErrorKind::Integrity,
            Self::Io(_) => ErrorKind::Io,
            Self::RepoUnavailable { source, .. } => source.kind(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } => 2,
            _ => match self.kind() {
                ErrorKind::Malformed => 3,
                ErrorKind::Network => 4,
                ErrorKind::Integrity => 5,
                _ => 1,
            },
        }
    }

    /// Messages of this error and every nested source, outermost first.
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            messages.push(err.to_string());
            source = err.source();
        }
        messages
    }
}
