use anyhow::Context;
use prizedraw_core::DrawConfig;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prizedraw")
}

impl CliConfig {
    pub fn new(data_dir: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            verbose,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Draw settings from `<data-dir>/config.json` plus environment overrides
    pub async fn load_draw_config(&self) -> anyhow::Result<DrawConfig> {
        let path = self.config_path();
        let config = DrawConfig::load(&path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        Ok(config.with_env_overrides())
    }

    /// Write the default draw settings to `<data-dir>/config.json`
    pub async fn init_draw_config(&self, force: bool) -> anyhow::Result<PathBuf> {
        let path = self.config_path();
        if !force && tokio::fs::try_exists(&path).await? {
            anyhow::bail!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }

        DrawConfig::default()
            .save(&path)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::info!("Wrote default config to {}", path.display());
        Ok(path)
    }
}

/// Log filter for the binary and the library crates
pub fn log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!(
        "prizedraw={},prizedraw_core={},prizedraw_engine={}",
        level, level, level
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_path_inside_data_dir() {
        let config = CliConfig::new(Some(PathBuf::from("/tmp/draws")), false);
        assert_eq!(config.config_path(), PathBuf::from("/tmp/draws/config.json"));
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(
            log_filter(true),
            "prizedraw=debug,prizedraw_core=debug,prizedraw_engine=debug"
        );
        assert!(log_filter(false).starts_with("prizedraw=info"));
    }

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let dir = tempdir().unwrap();
        let config = CliConfig::new(Some(dir.path().join("nested")), false);

        let path = config.init_draw_config(false).await.unwrap();
        assert!(path.exists());

        let loaded = DrawConfig::load(&path).await.unwrap();
        assert_eq!(loaded.default_winner_count, DrawConfig::default().default_winner_count);

        assert!(config.init_draw_config(false).await.is_err());
        assert!(config.init_draw_config(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_load_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = CliConfig::new(Some(dir.path().to_path_buf()), false);
        let draw_config = config.load_draw_config().await.unwrap();
        assert_eq!(draw_config.default_winner_count, 1);
    }
}
