//! Layered configuration: defaults, TOML files, then environment.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use ts_core::Threshold;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON file listing matter candidates.
    pub matters_path: PathBuf,
    /// Minimum fuzzy score for a matter to count as matched.
    pub threshold: Threshold,
    /// Optional AI extraction that runs before local parsing.
    #[serde(default)]
    pub ai: AiConfig,
}

/// Settings for the AI extraction pass.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: ts_llm::DEFAULT_MODEL.to_string(),
        }
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("matters_path", &self.matters_path)
            .field("threshold", &self.threshold)
            .field("ai", &self.ai)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matters_path: default_matters_path(),
            threshold: Threshold::DEFAULT,
            ai: AiConfig::default(),
        }
    }
}

impl Config {
    /// Layer configuration sources, later ones winning:
    /// built-in defaults, `<config_dir>/ts/config.toml`, the `--config` file,
    /// `ANTHROPIC_API_KEY`, then `TS_*` variables (`TS_AI__ENABLED=true`).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let user_file = dirs::config_dir().map(|dir| dir.join("ts").join("config.toml"));
        let files = user_file.into_iter().chain(config_path.map(Path::to_path_buf));

        files
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, file| figment.merge(Toml::file(file)),
            )
            .merge(
                Env::raw()
                    .only(&["ANTHROPIC_API_KEY"])
                    .map(|_| "ai.api_key".into()),
            )
            .merge(Env::prefixed("TS_").split("__"))
            .extract()
    }

    /// The API key to use for AI extraction, if AI is enabled and a key is set.
    pub fn ai_api_key(&self) -> Option<&str> {
        if !self.ai.enabled {
            return None;
        }
        self.ai
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Where matters live unless configured otherwise.
///
/// On Linux: `~/.local/share/ts/matters.json`
fn default_matters_path() -> PathBuf {
    dirs::data_dir()
        .map_or_else(|| PathBuf::from("."), |dir| dir.join("ts"))
        .join("matters.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.matters_path.ends_with("ts/matters.json"));
        assert_eq!(config.threshold, Threshold::DEFAULT);
        assert!(!config.ai.enabled);
        assert_eq!(config.ai.model, ts_llm::DEFAULT_MODEL);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "matters_path = \"/srv/matters.json\"\nthreshold = 75\n\n[ai]\nenabled = true\nmodel = \"claude-test\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.matters_path, PathBuf::from("/srv/matters.json"));
        assert_eq!(config.threshold.value(), 75);
        assert!(config.ai.enabled);
        assert_eq!(config.ai.model, "claude-test");
    }

    #[test]
    fn test_load_rejects_out_of_range_threshold() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "threshold = 150\n").unwrap();

        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_ai_api_key_requires_enabled_flag() {
        let mut config = Config::default();
        config.ai.api_key = Some("sk-test".to_string());
        assert_eq!(config.ai_api_key(), None);

        config.ai.enabled = true;
        assert_eq!(config.ai_api_key(), Some("sk-test"));

        config.ai.api_key = Some("   ".to_string());
        assert_eq!(config.ai_api_key(), None);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default();
        config.ai.api_key = Some("secret-key".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
