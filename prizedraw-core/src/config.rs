use crate::error::{PrizeDrawError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_KEY_ENV_VARS: [&str; 2] = ["PRIZEDRAW_API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub default_winner_count: usize,
    pub animation: AnimationConfig,
    pub thanks: ThanksConfig,
}

/// Timing of the shuffle display that precedes every draw
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub frames: u32,
    pub frame_interval: Duration,
    pub settle_delay: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThanksConfig {
    pub api_base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_words: u32,
    pub timeout: Duration,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            default_winner_count: 1,
            animation: AnimationConfig::default(),
            thanks: ThanksConfig::default(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 30,
            frame_interval: Duration::from_millis(100),
            settle_delay: Duration::from_millis(800),
        }
    }
}

impl Default for ThanksConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            max_words: 50,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AnimationConfig {
    /// No shuffle display at all, results are drawn right away
    pub fn instant() -> Self {
        Self {
            frames: 1,
            frame_interval: Duration::from_millis(1),
            settle_delay: Duration::ZERO,
        }
    }
}

impl DrawConfig {
    /// Load the config file if present, defaults otherwise
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Fill in the API key from the environment when the file has none
    pub fn with_env_overrides(mut self) -> Self {
        if self.thanks.api_key.is_none() {
            self.thanks.api_key = API_KEY_ENV_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok())
                .filter(|key| !key.trim().is_empty());
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_winner_count == 0 {
            return Err(PrizeDrawError::config(
                "Default winner count must be greater than 0",
            ));
        }

        if self.animation.frames == 0 {
            return Err(PrizeDrawError::config(
                "Animation frames must be greater than 0",
            ));
        }

        if self.thanks.api_base_url.is_empty() {
            return Err(PrizeDrawError::config("API base URL cannot be empty"));
        }

        if self.thanks.model.is_empty() {
            return Err(PrizeDrawError::config("Model name cannot be empty"));
        }

        if self.thanks.max_words == 0 {
            return Err(PrizeDrawError::config("Max words must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = DrawConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_winner_count, 1);
        assert_eq!(config.animation.frames, 30);
        assert_eq!(config.animation.frame_interval, Duration::from_millis(100));
        assert_eq!(config.animation.settle_delay, Duration::from_millis(800));
    }

    #[test]
    fn test_validate_rejects_zero_frames() {
        let mut config = DrawConfig::default();
        config.animation.frames = 0;
        assert!(matches!(config.validate(), Err(PrizeDrawError::Config(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = DrawConfig::load(&dir.path().join("config.json"))
            .await
            .unwrap();
        assert_eq!(config.thanks.model, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = DrawConfig::default();
        config.default_winner_count = 3;
        config.thanks.max_words = 80;
        config.save(&path).await.unwrap();

        let loaded = DrawConfig::load(&path).await.unwrap();
        assert_eq!(loaded.default_winner_count, 3);
        assert_eq!(loaded.thanks.max_words, 80);
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"default_winner_count": 2}"#)
            .await
            .unwrap();

        let loaded = DrawConfig::load(&path).await.unwrap();
        assert_eq!(loaded.default_winner_count, 2);
        assert_eq!(loaded.animation.frames, 30);
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"default_winner_count": 0}"#)
            .await
            .unwrap();

        assert!(DrawConfig::load(&path).await.is_err());
    }
}
