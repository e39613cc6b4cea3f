use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GDELT_ENDPOINT: &str = "https://api.gdeltproject.org/api/v2/doc/doc";

pub const CONFIG_FILENAMES: [&str; 3] = ["world_news.yaml", "world-news.yaml", "config.yaml"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GdeltConfig {
    pub endpoint: Option<String>,
}

/// Project settings read from the optional YAML file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub gemini: GeminiConfig,
    pub gdelt: GdeltConfig,
}

impl ProjectConfig {
    /// Loads the first config file found in `.` or `./configs`, or defaults.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::discover_in(&[cwd.clone(), cwd.join("configs")])
    }

    pub fn discover_in(search_dirs: &[PathBuf]) -> Result<Self> {
        match find_config_file(search_dirs) {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Only `gemini.model` and `gdelt.endpoint` are read; anything else is ignored.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let doc: Value = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(raw)?
        };

        let section_str = |section: &str, key: &str| -> Option<String> {
            doc.get(section)
                .filter(|v| v.is_mapping())
                .and_then(|s| s.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let mut config = Self::default();
        if let Some(model) = section_str("gemini", "model") {
            config.gemini.model = model;
        }
        config.gdelt.endpoint = section_str("gdelt", "endpoint");
        Ok(config)
    }
}

fn find_config_file(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// Fully resolved runtime settings: credentials from the environment plus the
/// project config.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub gemini_api_key: String,
    pub gdelt_api_key: Option<String>,
    pub gemini_model: String,
    pub gdelt_endpoint: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &"<redacted>")
            .field("gdelt_api_key", &self.gdelt_api_key.as_deref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gdelt_endpoint", &self.gdelt_endpoint)
            .finish()
    }
}

impl Settings {
    pub fn from_env(config: ProjectConfig) -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), config)
    }

    pub fn resolve(env: impl Fn(&str) -> Option<String>, config: ProjectConfig) -> Result<Self> {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = non_empty("GEMINI_API_KEY").ok_or_else(|| {
            Error::Config("GEMINI_API_KEY is not set. Export GEMINI_API_KEY=<your_key>.".to_string())
        })?;

        Ok(Self {
            gemini_api_key,
            gdelt_api_key: non_empty("GDELT_API_KEY"),
            gemini_model: config.gemini.model,
            gdelt_endpoint: config
                .gdelt
                .endpoint
                .unwrap_or_else(|| DEFAULT_GDELT_ENDPOINT.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_yaml_reads_known_keys() {
        let config = ProjectConfig::from_yaml(
            "gemini:\n  model: gemini-2.5-pro\n  temperature: 0.3\ngdelt:\n  endpoint: http://localhost:9000/doc\nother: 1\n",
        )
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gdelt.endpoint.as_deref(), Some("http://localhost:9000/doc"));
    }

    #[test]
    fn test_yaml_falls_back_to_defaults() {
        assert_eq!(ProjectConfig::from_yaml("").unwrap(), ProjectConfig::default());
        assert_eq!(ProjectConfig::from_yaml("- a\n- b\n").unwrap(), ProjectConfig::default());
        assert_eq!(
            ProjectConfig::from_yaml("gemini: flash\ngdelt:\n  endpoint: null\n").unwrap(),
            ProjectConfig::default()
        );
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(
            ProjectConfig::from_yaml("gemini: [unterminated"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_discover_prefers_first_directory_and_name() {
        let root = tempfile::tempdir().unwrap();
        let configs = root.path().join("configs");
        std::fs::create_dir(&configs).unwrap();
        std::fs::write(configs.join("world_news.yaml"), "gemini:\n  model: from-configs\n").unwrap();
        std::fs::write(root.path().join("config.yaml"), "gemini:\n  model: from-root\n").unwrap();

        let config =
            ProjectConfig::discover_in(&[root.path().to_path_buf(), configs.clone()]).unwrap();
        assert_eq!(config.gemini.model, "from-root");

        let empty = tempfile::tempdir().unwrap();
        let config = ProjectConfig::discover_in(&[empty.path().to_path_buf()]).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_settings_require_gemini_key() {
        let err = Settings::resolve(env_of(&[]), ProjectConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Settings::resolve(env_of(&[("GEMINI_API_KEY", "  ")]), ProjectConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_settings_resolve() {
        let settings = Settings::resolve(
            env_of(&[("GEMINI_API_KEY", "secret"), ("GDELT_API_KEY", "")]),
            ProjectConfig::default(),
        )
        .unwrap();
        assert_eq!(settings.gemini_api_key, "secret");
        assert_eq!(settings.gdelt_api_key, None);
        assert_eq!(settings.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(settings.gdelt_endpoint, DEFAULT_GDELT_ENDPOINT);
        assert!(!format!("{:?}", settings).contains("secret"));
    }
}
