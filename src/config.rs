use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::language::Direction;
use crate::session::DrillConfig;

pub const DEFAULT_LIST: &str = "french_english";
pub const DEFAULT_PROJECT_ID: &str = "bibuanglais";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub direction: Direction,
    pub builtin_list: String,
    pub word_list: Option<PathBuf>,
    pub random_words: bool,
    pub advance_delay_ms: u64,
    pub project_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: Direction::SourceToTarget,
            builtin_list: DEFAULT_LIST.to_string(),
            word_list: None,
            random_words: false,
            advance_delay_ms: 200,
            project_id: DEFAULT_PROJECT_ID.to_string(),
        }
    }
}

impl From<&Config> for DrillConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            direction: cfg.direction,
            random_words: cfg.random_words,
            advance_delay: Duration::from_millis(cfg.advance_delay_ms),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path =
            AppDirs::config_path().unwrap_or_else(|| PathBuf::from("vokab_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!(error = %e, path = %self.path.display(), "ignoring invalid config");
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            direction: Direction::TargetToSource,
            builtin_list: "french_english".into(),
            word_list: Some(PathBuf::from("/tmp/words.json")),
            random_words: true,
            advance_delay_ms: 500,
            project_id: "my-project".into(),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"direction": "target-to-source"}"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.direction, Direction::TargetToSource);
        assert_eq!(loaded.advance_delay_ms, 200);
        assert_eq!(loaded.builtin_list, DEFAULT_LIST);
    }

    #[test]
    fn invalid_file_loads_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn drill_config_from_config() {
        let cfg = Config {
            advance_delay_ms: 350,
            random_words: true,
            ..Default::default()
        };
        let drill_cfg = DrillConfig::from(&cfg);
        assert_eq!(drill_cfg.advance_delay, Duration::from_millis(350));
        assert!(drill_cfg.random_words);
        assert_eq!(drill_cfg.direction, Direction::SourceToTarget);
    }
}
