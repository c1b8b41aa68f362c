//! Third-party repository registration for Dalamud
//!
//! Patches `dalamudConfig.json` so that every required plugin repository is
//! listed exactly once and enabled.
//!
//! # Dalamud Config Structure
//!
//! ```json
//! {
//!   "ThirdRepoList": {
//!     "$type": "System.Collections.Generic.List`1[[...]], System.Private.CoreLib",
//!     "$values": [
//!       {
//!         "$type": "Dalamud.Configuration.ThirdPartyRepoSettings, Dalamud",
//!         "Url": "https://raw.githubusercontent.com/user/repo/main/repo.json",
//!         "IsEnabled": true,
//!         "Name": null
//!       }
//!     ]
//!   }
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{InstallerError, Result};
use crate::settings::DEFAULT_REPO_TYPE_TAG;

const REPO_LIST_NODE: &str = "ThirdRepoList";
const ARRAY_NODE: &str = "$values";
const URL_NODE: &str = "Url";
const ENABLED_NODE: &str = "IsEnabled";
const TYPE_NODE: &str = "$type";
const NAME_NODE: &str = "Name";

/// GitHub answers `/<user>/<repo>/raw/<path>` with a redirect to
/// raw.githubusercontent.com, so the target can be computed up front.
static GITHUB_RAW_REDIRECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:www\.)?github\.com/(?P<user>[^/]+)/(?P<repo>[^/]+)/raw/(?P<path>.*)$",
    )
    .expect("GitHub redirect pattern is valid")
});

/// Case-insensitive identity of a repository URL
pub(crate) fn url_key(url: &str) -> String {
    url.to_lowercase()
}

/// Parse JSON, falling back to JSON5 when the text has comments or trailing
/// commas. Strict JSON goes through serde_json so integers above `i64::MAX`
/// survive.
pub(crate) fn parse_lenient(text: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(text).or_else(|_| json5::from_str(text).map_err(|e| e.to_string()))
}

/// Rewrite a redirecting GitHub raw link into its raw.githubusercontent.com
/// form. Returns `None` when the URL is not a redirecting link.
pub fn normalize_repo_url(url: &str) -> Option<String> {
    let caps = GITHUB_RAW_REDIRECT.captures(url)?;
    Some(format!(
        "https://raw.githubusercontent.com/{}/{}/{}",
        &caps["user"], &caps["repo"], &caps["path"]
    ))
}

/// Ordered set of repository URLs, unique ignoring case
#[derive(Debug, Clone, Default)]
pub struct RequiredRepos {
    urls: Vec<String>,
    keys: HashSet<String>,
}

impl RequiredRepos {
    /// Add a URL; returns false if an equal URL (ignoring case) is present
    pub fn insert(&mut self, url: &str) -> bool {
        if !self.keys.insert(url_key(url)) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.keys.contains(&url_key(url))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

impl<S: AsRef<str>> FromIterator<S> for RequiredRepos {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut repos = Self::default();
        for url in iter {
            repos.insert(url.as_ref());
        }
        repos
    }
}

/// What a merge changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Entries defined before the merge
    pub original_count: usize,
    /// Rewritten URLs (new form)
    pub normalized: Vec<String>,
    /// Required URLs whose entry was switched on
    pub force_enabled: Vec<String>,
    /// URLs of removed duplicate entries
    pub duplicates_removed: Vec<String>,
    /// Required URLs that were appended
    pub added: Vec<String>,
    /// Entries defined after the merge
    pub final_count: usize,
}

impl MergeReport {
    /// Whether the merge altered the repository list
    pub fn changed(&self) -> bool {
        !(self.normalized.is_empty()
            && self.force_enabled.is_empty()
            && self.duplicates_removed.is_empty()
            && self.added.is_empty())
    }
}

/// Build a new repository entry for `url`.
///
/// A prototype entry is copied so that fields unknown to us survive;
/// without one, a minimal entry carrying `type_tag` is produced.
pub fn build_entry(
    prototype: Option<&Map<String, Value>>,
    url: &str,
    type_tag: &str,
) -> Map<String, Value> {
    let mut entry = match prototype {
        Some(proto) => proto.clone(),
        None => {
            let mut fields = Map::new();
            fields.insert(TYPE_NODE.to_string(), Value::String(type_tag.to_string()));
            fields.insert(URL_NODE.to_string(), Value::String(String::new()));
            fields.insert(ENABLED_NODE.to_string(), Value::Bool(true));
            fields.insert(NAME_NODE.to_string(), Value::Null);
            fields
        }
    };
    entry.insert(URL_NODE.to_string(), Value::String(url.to_string()));
    entry.insert(ENABLED_NODE.to_string(), Value::Bool(true));
    entry
}

fn entry_url(entry: &Map<String, Value>) -> &str {
    // presence checked by `extract_entries`
    entry.get(URL_NODE).and_then(Value::as_str).unwrap_or_default()
}

/// Copy the repository list out of the document, validating every entry
fn extract_entries(document: &Value) -> Result<Vec<Map<String, Value>>> {
    let list = document
        .get(REPO_LIST_NODE)
        .and_then(|node| node.get(ARRAY_NODE))
        .and_then(Value::as_array)
        .ok_or_else(|| InstallerError::RepoListMissing {
            node: format!("{}.{}", REPO_LIST_NODE, ARRAY_NODE),
        })?;

    list.iter()
        .enumerate()
        .map(|(index, value)| {
            let entry = value
                .as_object()
                .ok_or_else(|| InstallerError::MalformedRepoEntry {
                    index,
                    message: "entry is not an object".to_string(),
                })?;
            if !entry.get(URL_NODE).is_some_and(Value::is_string) {
                return Err(InstallerError::MalformedRepoEntry {
                    index,
                    message: format!("missing string {} field", URL_NODE),
                });
            }
            Ok(entry.clone())
        })
        .collect()
}

fn normalize_entries(
    entries: &mut [Map<String, Value>],
    required: &RequiredRepos,
    report: &mut MergeReport,
) {
    for entry in entries.iter_mut() {
        let mut url = entry_url(entry).to_string();
        if let Some(rewritten) = normalize_repo_url(&url) {
            tracing::info!(url = %rewritten, "Normalised repository URL");
            entry.insert(URL_NODE.to_string(), Value::String(rewritten.clone()));
            report.normalized.push(rewritten.clone());
            url = rewritten;
        }

        if required.contains(&url) {
            let enabled = entry.get(ENABLED_NODE).and_then(Value::as_bool) == Some(true);
            if !enabled {
                tracing::info!(url = %url, "Forcibly enabled repository");
                entry.insert(ENABLED_NODE.to_string(), Value::Bool(true));
                report.force_enabled.push(url);
            }
        }
    }
}

fn dedupe_entries(entries: &mut Vec<Map<String, Value>>, report: &mut MergeReport) {
    let mut seen = HashSet::new();
    entries.retain(|entry| {
        let url = entry_url(entry);
        if seen.insert(url_key(url)) {
            return true;
        }
        tracing::info!(url = %url, "Removing duplicate repository");
        report.duplicates_removed.push(url.to_string());
        false
    });
}

fn add_missing_entries(
    entries: &mut Vec<Map<String, Value>>,
    required: &RequiredRepos,
    type_tag: &str,
    report: &mut MergeReport,
) {
    let known: HashSet<String> = entries.iter().map(|e| url_key(entry_url(e))).collect();
    let template = entries.first().cloned();

    for url in required.iter() {
        if known.contains(&url_key(url)) {
            continue;
        }
        entries.push(build_entry(template.as_ref(), url, type_tag));
        tracing::info!(url = %url, "Added repository to list");
        report.added.push(url.to_string());
    }
}

/// Normalize, deduplicate and complete the repository list of a Dalamud
/// config document.
///
/// The list is only replaced once every step has succeeded; on error the
/// document is left untouched.
pub fn merge_repositories(
    document: &mut Value,
    required: &RequiredRepos,
    type_tag: &str,
) -> Result<MergeReport> {
    let mut entries = extract_entries(document)?;
    let mut report = MergeReport {
        original_count: entries.len(),
        ..Default::default()
    };

    normalize_entries(&mut entries, required, &mut report);
    dedupe_entries(&mut entries, &mut report);
    add_missing_entries(&mut entries, required, type_tag, &mut report);

    report.final_count = entries.len();

    let slot = document
        .get_mut(REPO_LIST_NODE)
        .and_then(|node| node.get_mut(ARRAY_NODE))
        .ok_or_else(|| InstallerError::RepoListMissing {
            node: format!("{}.{}", REPO_LIST_NODE, ARRAY_NODE),
        })?;
    *slot = Value::Array(entries.into_iter().map(Value::Object).collect());

    Ok(report)
}

/// Parse a config document, tolerating comments and trailing commas
pub fn parse_document(content: &str, path: &Path) -> Result<Value> {
    let document = parse_lenient(content).map_err(|message| InstallerError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })?;

    if !document.is_object() {
        return Err(InstallerError::ConfigParse {
            path: path.to_path_buf(),
            message: "top-level value is not an object".to_string(),
        });
    }

    Ok(document)
}

/// Applies [`merge_repositories`] to the Dalamud config file on disk
pub struct ConfigPatcher {
    config_file: PathBuf,
    required: RequiredRepos,
    type_tag: String,
}

impl ConfigPatcher {
    pub fn new(config_file: impl Into<PathBuf>, required: RequiredRepos) -> Self {
        Self {
            config_file: config_file.into(),
            required,
            type_tag: DEFAULT_REPO_TYPE_TAG.to_string(),
        }
    }

    /// Override the `$type` used when no entry can serve as a template
    pub fn with_type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = type_tag.into();
        self
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn required(&self) -> &RequiredRepos {
        &self.required
    }

    /// Whether there is anything to do and a config to do it to
    pub fn can_run(&self) -> bool {
        !self.required.is_empty() && self.config_file.is_file()
    }

    /// Read, merge and write back the config file
    pub fn apply(&self) -> Result<MergeReport> {
        if !self.config_file.is_file() {
            return Err(InstallerError::ConfigNotFound {
                path: self.config_file.clone(),
            });
        }

        tracing::info!(
            count = self.required.len(),
            "Checking third-party plugin repository URLs"
        );

        let content = fs::read_to_string(&self.config_file)?;
        let mut document = parse_document(&content, &self.config_file)?;
        let report = merge_repositories(&mut document, &self.required, &self.type_tag)?;

        let content =
            serde_json::to_string_pretty(&document).map_err(|e| InstallerError::ConfigParse {
                path: self.config_file.clone(),
                message: e.to_string(),
            })?;
        fs::write(&self.config_file, content)?;

        tracing::info!(
            removed = report.duplicates_removed.len(),
            added = report.added.len(),
            total = report.final_count,
            "Repository list updated"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const REPO_A: &str = "https://raw.githubusercontent.com/Alice/Repo/master/pluginmaster.json";
    const REPO_B: &str = "https://example.com/repo.json";
    const TYPE_TAG: &str = "Dalamud.Configuration.ThirdPartyRepoSettings, Dalamud";

    fn entry(url: &str, enabled: bool) -> Value {
        json!({
            "$type": TYPE_TAG,
            "Url": url,
            "IsEnabled": enabled,
            "Name": null
        })
    }

    fn document(entries: Vec<Value>) -> Value {
        json!({
            "DoPluginTest": false,
            "ThirdRepoList": {
                "$type": "System.Collections.Generic.List`1[[Dalamud.Configuration.ThirdPartyRepoSettings, Dalamud]], System.Private.CoreLib",
                "$values": entries
            },
            "LogLevel": 2
        })
    }

    fn repo_list(document: &Value) -> &Vec<Value> {
        document["ThirdRepoList"]["$values"].as_array().unwrap()
    }

    fn required(urls: &[&str]) -> RequiredRepos {
        urls.iter().collect()
    }

    #[test]
    fn normalize_github_raw_link() {
        assert_eq!(
            normalize_repo_url("https://github.com/Alice/Repo/raw/master/pluginmaster.json")
                .as_deref(),
            Some("https://raw.githubusercontent.com/Alice/Repo/master/pluginmaster.json")
        );
        assert_eq!(
            normalize_repo_url("http://WWW.GitHub.com/bob/plugins/raw/main/a/b.json").as_deref(),
            Some("https://raw.githubusercontent.com/bob/plugins/main/a/b.json")
        );
    }

    #[test]
    fn normalize_ignores_other_urls() {
        assert_eq!(normalize_repo_url(REPO_A), None);
        assert_eq!(normalize_repo_url(REPO_B), None);
        assert_eq!(
            normalize_repo_url("https://github.com/Alice/Repo/blob/master/pluginmaster.json"),
            None
        );
    }

    #[test]
    fn required_repos_ignore_case() {
        let mut repos = RequiredRepos::default();
        assert!(repos.insert(REPO_B));
        assert!(!repos.insert(&REPO_B.to_uppercase()));
        assert_eq!(repos.len(), 1);
        assert!(repos.contains("HTTPS://EXAMPLE.COM/REPO.JSON"));
    }

    #[test]
    fn duplicate_required_repo_is_enabled_once() {
        let mut doc = document(vec![
            entry(REPO_A, false),
            entry(REPO_A, true),
            entry(REPO_B, false),
        ]);

        let report = merge_repositories(&mut doc, &required(&[REPO_A]), TYPE_TAG).unwrap();

        let list = repo_list(&doc);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], entry(REPO_A, true));
        assert_eq!(list[1], entry(REPO_B, false));
        assert_eq!(report.duplicates_removed, vec![REPO_A.to_string()]);
        assert_eq!(report.force_enabled, vec![REPO_A.to_string()]);
        assert!(report.added.is_empty());
    }

    #[test]
    fn dedupe_ignores_case_and_keeps_first() {
        let mut doc = document(vec![
            entry(REPO_B, false),
            entry(&REPO_B.to_uppercase(), true),
        ]);

        let report = merge_repositories(&mut doc, &RequiredRepos::default(), TYPE_TAG).unwrap();

        let list = repo_list(&doc);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["Url"], REPO_B);
        assert_eq!(list[0]["IsEnabled"], false);
        assert_eq!(report.original_count, 2);
        assert_eq!(report.final_count, 1);
    }

    #[test]
    fn normalized_url_collapses_into_existing_entry() {
        let mut doc = document(vec![
            entry(REPO_A, true),
            entry("https://github.com/Alice/Repo/raw/master/pluginmaster.json", false),
        ]);

        let report = merge_repositories(&mut doc, &required(&[REPO_A]), TYPE_TAG).unwrap();

        let list = repo_list(&doc);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["Url"], REPO_A);
        assert_eq!(report.normalized, vec![REPO_A.to_string()]);
    }

    #[test]
    fn missing_repo_copies_first_entry() {
        let mut doc = document(vec![json!({
            "$type": TYPE_TAG,
            "Url": REPO_B,
            "IsEnabled": false,
            "Name": "Example",
            "FutureField": [1, 2]
        })]);

        let report = merge_repositories(&mut doc, &required(&[REPO_A]), "Unused").unwrap();

        let list = repo_list(&doc);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[1],
            json!({
                "$type": TYPE_TAG,
                "Url": REPO_A,
                "IsEnabled": true,
                "Name": "Example",
                "FutureField": [1, 2]
            })
        );
        // template is copied, not moved
        assert_eq!(list[0]["Url"], REPO_B);
        assert_eq!(list[0]["IsEnabled"], false);
        assert_eq!(report.added, vec![REPO_A.to_string()]);
    }

    #[test]
    fn missing_repo_in_empty_list_uses_type_tag() {
        let mut doc = document(vec![]);

        merge_repositories(&mut doc, &required(&[REPO_A, REPO_B]), "Custom.Tag, Dalamud").unwrap();

        let list = repo_list(&doc);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[0],
            json!({
                "$type": "Custom.Tag, Dalamud",
                "Url": REPO_A,
                "IsEnabled": true,
                "Name": null
            })
        );
        assert_eq!(list[1]["Url"], REPO_B);
    }

    #[test]
    fn build_entry_without_prototype() {
        let built = build_entry(None, REPO_B, TYPE_TAG);
        assert_eq!(Value::Object(built), entry(REPO_B, true));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut doc = document(vec![
            entry("https://github.com/Alice/Repo/raw/master/pluginmaster.json", false),
            entry(REPO_B, true),
            entry(&REPO_B.to_uppercase(), false),
        ]);
        let repos = required(&[REPO_A, "https://example.org/other.json"]);

        let first = merge_repositories(&mut doc, &repos, TYPE_TAG).unwrap();
        let once = doc.clone();
        let second = merge_repositories(&mut doc, &repos, TYPE_TAG).unwrap();

        assert!(first.changed());
        assert!(!second.changed());
        assert_eq!(doc, once);
    }

    #[test]
    fn every_required_repo_is_enabled_and_unique() {
        let mut doc = document(vec![
            entry(REPO_B, false),
            entry(REPO_A, false),
            entry(&REPO_A.to_lowercase(), false),
        ]);
        let repos = required(&[REPO_A, REPO_B, "https://example.org/third.json"]);

        merge_repositories(&mut doc, &repos, TYPE_TAG).unwrap();

        let list = repo_list(&doc);
        let mut seen = HashSet::new();
        for item in list {
            assert!(seen.insert(url_key(item["Url"].as_str().unwrap())));
        }
        for url in repos.iter() {
            let found = list
                .iter()
                .find(|item| item["Url"].as_str().unwrap().eq_ignore_ascii_case(url))
                .unwrap();
            assert_eq!(found["IsEnabled"], true);
        }
    }

    #[test]
    fn other_document_fields_untouched() {
        let mut doc = document(vec![entry(REPO_B, true)]);

        merge_repositories(&mut doc, &required(&[REPO_A]), TYPE_TAG).unwrap();

        assert_eq!(doc["DoPluginTest"], false);
        assert_eq!(doc["LogLevel"], 2);
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["DoPluginTest", "ThirdRepoList", "LogLevel"]);
    }

    #[test]
    fn entry_without_url_aborts_merge() {
        let mut doc = document(vec![entry(REPO_B, false), json!({ "IsEnabled": true })]);
        let before = doc.clone();

        let err = merge_repositories(&mut doc, &required(&[REPO_A]), TYPE_TAG).unwrap_err();

        assert!(matches!(
            err,
            InstallerError::MalformedRepoEntry { index: 1, .. }
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn non_object_entry_aborts_merge() {
        let mut doc = document(vec![json!("https://example.com")]);

        let err = merge_repositories(&mut doc, &required(&[REPO_A]), TYPE_TAG).unwrap_err();
        assert!(matches!(
            err,
            InstallerError::MalformedRepoEntry { index: 0, .. }
        ));
    }

    #[test]
    fn missing_repo_list() {
        let mut doc = json!({ "ThirdRepoList": [] });

        let err = merge_repositories(&mut doc, &required(&[REPO_A]), TYPE_TAG).unwrap_err();
        assert!(matches!(err, InstallerError::RepoListMissing { .. }));
    }

    #[test]
    fn parse_document_allows_comments_and_trailing_commas() {
        let content = r#"{
            // written by hand
            "ThirdRepoList": {
                "$values": [
                    { "Url": "https://example.com/repo.json", "IsEnabled": true, },
                ],
            },
        }"#;

        let doc = parse_document(content, Path::new("dalamudConfig.json")).unwrap();
        assert_eq!(repo_list(&doc).len(), 1);
    }

    #[test]
    fn parse_document_keeps_large_integers() {
        let content = r#"{ "Big": 18446744073709551615, "ThirdRepoList": { "$values": [] } }"#;

        let doc = parse_document(content, Path::new("dalamudConfig.json")).unwrap();
        assert_eq!(doc["Big"].as_u64(), Some(u64::MAX));
    }

    #[test]
    fn parse_document_rejects_non_object() {
        let err = parse_document("[1, 2]", Path::new("dalamudConfig.json")).unwrap_err();
        assert!(matches!(err, InstallerError::ConfigParse { .. }));
    }

    #[test]
    fn patcher_rewrites_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dalamudConfig.json");
        fs::write(
            &path,
            r#"{
  "LogLevel": 2,
  /* user comment */
  "ThirdRepoList": {
    "$values": [
      { "$type": "T", "Url": "https://github.com/Alice/Repo/raw/master/pluginmaster.json", "IsEnabled": false, "Name": null },
    ]
  }
}"#,
        )
        .unwrap();

        let patcher = ConfigPatcher::new(&path, required(&[REPO_A, REPO_B]));
        assert!(patcher.can_run());
        let report = patcher.apply().unwrap();
        assert_eq!(report.normalized, vec![REPO_A.to_string()]);
        assert_eq!(report.added, vec![REPO_B.to_string()]);

        let written = fs::read_to_string(&path).unwrap();
        let doc: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(doc["LogLevel"], 2);
        let list = repo_list(&doc);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["IsEnabled"], true);
        assert_eq!(list[1]["$type"], "T");
        assert!(written.contains("\n  \"ThirdRepoList\""));

        // second run leaves the file as it is
        patcher.apply().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn patcher_preserves_large_integers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dalamudConfig.json");
        fs::write(
            &path,
            r#"{ "LastSeenId": 18446744073709551615, "ThirdRepoList": { "$values": [] } }"#,
        )
        .unwrap();

        ConfigPatcher::new(&path, required(&[REPO_A])).apply().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("18446744073709551615"));
        let doc: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(doc["LastSeenId"].as_u64(), Some(u64::MAX));
        assert_eq!(repo_list(&doc).len(), 1);
    }

    #[test]
    fn patcher_leaves_file_untouched_on_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dalamudConfig.json");
        let original = r#"{ "ThirdRepoList": { "$values": [ { "IsEnabled": true } ] } }"#;
        fs::write(&path, original).unwrap();

        let patcher = ConfigPatcher::new(&path, required(&[REPO_A]));
        assert!(patcher.apply().is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn patcher_missing_config() {
        let tmp = TempDir::new().unwrap();
        let patcher = ConfigPatcher::new(tmp.path().join("missing.json"), required(&[REPO_A]));

        assert!(!patcher.can_run());
        let err = patcher.apply().unwrap_err();
        assert!(matches!(err, InstallerError::ConfigNotFound { .. }));
    }

    #[test]
    fn patcher_with_nothing_required_cannot_run() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dalamudConfig.json");
        fs::write(&path, "{}").unwrap();

        let patcher = ConfigPatcher::new(&path, RequiredRepos::default());
        assert!(!patcher.can_run());
    }
}
