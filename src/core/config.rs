use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::ApiError;

pub const DEFAULT_INDEX_NAME: &str = "aira-errors-index";
pub const DEFAULT_OPENAI_API_VERSION: &str = "2023-12-01-preview";
pub const DEFAULT_DATA_FILE: &str = "data/error_data.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub log_dir: PathBuf,
    pub data_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let project_root = discover_project_root();
        let user_data_dir = discover_user_data_dir(&project_root);
        let log_dir = user_data_dir.join("logs");
        let data_path = env::var("AIRA_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_root.join(DEFAULT_DATA_FILE));

        let _ = fs::create_dir_all(&log_dir);

        AppPaths {
            project_root,
            log_dir,
            data_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_project_root() -> PathBuf {
    if let Ok(root) = env::var("AIRA_ROOT") {
        return PathBuf::from(root);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join(DEFAULT_DATA_FILE).exists() {
        return manifest_dir;
    }

    env::current_dir().unwrap_or(manifest_dir)
}

fn discover_user_data_dir(project_root: &Path) -> PathBuf {
    if let Ok(dir) = env::var("AIRA_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if cfg!(debug_assertions) {
        return project_root.to_path_buf();
    }

    if cfg!(target_os = "windows") {
        let base = env::var("LOCALAPPDATA")
            .unwrap_or_else(|_| env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string()));
        return PathBuf::from(base).join("Aira");
    }

    if cfg!(target_os = "macos") {
        return home_dir()
            .join("Library")
            .join("Application Support")
            .join("Aira");
    }

    let xdg = env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        home_dir()
            .join(".local/share")
            .to_string_lossy()
            .to_string()
    });
    PathBuf::from(xdg).join("aira")
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Connection settings for the managed search index.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: String,
    pub index_name: String,
}

/// Connection settings for the hosted chat-completion deployment.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub search: SearchSettings,
    pub model: ModelSettings,
    /// Empty or unset disables the notification action.
    pub slack_webhook_url: Option<String>,
}

impl SearchSettings {
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let settings = Self::collect(&lookup, &mut missing);
        if missing.is_empty() {
            Ok(settings)
        } else {
            Err(missing_keys_error(&missing))
        }
    }

    fn collect<F>(lookup: &F, missing: &mut Vec<&'static str>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        SearchSettings {
            endpoint: required(lookup, "AZURE_SEARCH_SERVICE_ENDPOINT", missing),
            api_key: required(lookup, "AZURE_SEARCH_ADMIN_KEY", missing),
            index_name: lookup("AZURE_SEARCH_INDEX_NAME")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
        }
    }
}

impl ModelSettings {
    fn collect<F>(lookup: &F, missing: &mut Vec<&'static str>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ModelSettings {
            endpoint: required(lookup, "AZURE_OPENAI_ENDPOINT", missing),
            api_key: required(lookup, "AZURE_OPENAI_API_KEY", missing),
            api_version: lookup("AZURE_OPENAI_API_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OPENAI_API_VERSION.to_string()),
            deployment: required(lookup, "AZURE_OPENAI_DEPLOYMENT_NAME", missing),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let search = SearchSettings::collect(&lookup, &mut missing);
        let model = ModelSettings::collect(&lookup, &mut missing);
        let slack_webhook_url = lookup("SLACK_WEBHOOK_URL").filter(|v| !v.trim().is_empty());

        if !missing.is_empty() {
            return Err(missing_keys_error(&missing));
        }

        Ok(Settings {
            search,
            model,
            slack_webhook_url,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str, missing: &mut Vec<&'static str>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => value,
        None => {
            missing.push(key);
            String::new()
        }
    }
}

fn missing_keys_error(missing: &[&'static str]) -> ApiError {
    ApiError::BadRequest(format!(
        "missing required environment variables: {}",
        missing.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("AZURE_SEARCH_SERVICE_ENDPOINT", "https://search.example.net"),
            ("AZURE_SEARCH_ADMIN_KEY", "search-key"),
            ("AZURE_OPENAI_ENDPOINT", "https://openai.example.net"),
            ("AZURE_OPENAI_API_KEY", "openai-key"),
            ("AZURE_OPENAI_DEPLOYMENT_NAME", "gpt-4o"),
        ])
    }

    fn lookup_in(
        map: HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Option<String> {
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn settings_apply_defaults_for_optional_keys() {
        let settings = Settings::from_lookup(lookup_in(full_env())).unwrap();

        assert_eq!(settings.search.index_name, DEFAULT_INDEX_NAME);
        assert_eq!(settings.model.api_version, DEFAULT_OPENAI_API_VERSION);
        assert!(settings.slack_webhook_url.is_none());
    }

    #[test]
    fn settings_report_all_missing_keys_at_once() {
        let mut env = full_env();
        env.remove("AZURE_SEARCH_ADMIN_KEY");
        env.remove("AZURE_OPENAI_DEPLOYMENT_NAME");

        let err = Settings::from_lookup(lookup_in(env)).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("AZURE_SEARCH_ADMIN_KEY"));
        assert!(message.contains("AZURE_OPENAI_DEPLOYMENT_NAME"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut env = full_env();
        env.insert("AZURE_OPENAI_API_KEY", "   ");

        let err = Settings::from_lookup(lookup_in(env)).unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_API_KEY"));
    }

    #[test]
    fn empty_webhook_url_disables_notification() {
        let mut env = full_env();
        env.insert("SLACK_WEBHOOK_URL", "");
        let settings = Settings::from_lookup(lookup_in(env)).unwrap();
        assert!(settings.slack_webhook_url.is_none());

        let mut env = full_env();
        env.insert(
            "SLACK_WEBHOOK_URL",
            "https://hooks.slack.com/services/T0001/B0001/XXXX",
        );
        let settings = Settings::from_lookup(lookup_in(env)).unwrap();
        assert!(settings.slack_webhook_url.is_some());
    }

    #[test]
    fn search_settings_alone_ignore_model_keys() {
        let env = HashMap::from([
            ("AZURE_SEARCH_SERVICE_ENDPOINT", "https://search.example.net"),
            ("AZURE_SEARCH_ADMIN_KEY", "search-key"),
            ("AZURE_SEARCH_INDEX_NAME", "custom-index"),
        ]);

        let settings = SearchSettings::from_lookup(lookup_in(env)).unwrap();
        assert_eq!(settings.index_name, "custom-index");
    }
}
