use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::policy::PinLength;
use crate::core::FlowConfig;
use crate::crypto::pin_hash::KdfParams;
use crate::error::{PinGateError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the credential, device key and operator message.
    pub data_dir: PathBuf,
    pub length_level: u8,
    pub allow_skipping: bool,
    pub kdf_memory_cost_kib: u32,
    pub kdf_time_cost: u32,
    pub kdf_parallelism: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let kdf = KdfParams::default();
        Self {
            data_dir: default_data_dir(),
            length_level: 1,
            allow_skipping: true,
            kdf_memory_cost_kib: kdf.memory_cost_kib,
            kdf_time_cost: kdf.time_cost,
            kdf_parallelism: kdf.parallelism,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            memory_cost_kib: self.kdf_memory_cost_kib,
            time_cost: self.kdf_time_cost,
            parallelism: self.kdf_parallelism,
        }
    }

    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            allow_skipping: self.allow_skipping,
            length_level: self.length_level,
        }
    }

    pub fn validate(&self) -> Result<()> {
        PinLength::from_level(self.length_level)?;
        if self.kdf_time_cost == 0 || self.kdf_parallelism == 0 {
            return Err(PinGateError::Config(
                "kdf_time_cost and kdf_parallelism must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = AppConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Err(PinGateError::Config(format!(
                "Config file not found: {}",
                path.display()
            )))
        }
    }
}

fn config_file_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", "pingate") {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("pingate.toml")
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", "pingate") {
        dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig {
            data_dir: PathBuf::from("/tmp/pingate"),
            length_level: 3,
            allow_skipping: false,
            kdf_memory_cost_kib: 4096,
            kdf_time_cost: 1,
            kdf_parallelism: 2,
            log_file: Some(PathBuf::from("/tmp/pingate.log")),
        };

        let content = toml::to_string_pretty(&config).unwrap();
        fs::write(&path, &content).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();

        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.length_level, 3);
        assert!(!loaded.allow_skipping);
        assert_eq!(loaded.log_file, config.log_file);
        assert_eq!(loaded.kdf_params(), config.kdf_params());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.length_level, 1);
        assert!(config.allow_skipping);
        assert_eq!(config.log_file, None);
        assert_eq!(config.kdf_params(), KdfParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "length_level = 2\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.length_level, 2);
        assert!(loaded.allow_skipping);
        assert_eq!(loaded.kdf_time_cost, KdfParams::default().time_cost);
    }

    #[test]
    fn test_flow_config_from_config() {
        let config = AppConfig {
            length_level: 2,
            allow_skipping: false,
            ..AppConfig::default()
        };
        assert_eq!(
            config.flow_config(),
            FlowConfig {
                allow_skipping: false,
                length_level: 2,
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let config = AppConfig {
            length_level: 7,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PinGateError::InvalidLengthLevel(7))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_cost() {
        let config = AppConfig {
            kdf_time_cost: 0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(PinGateError::Config(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::load_from(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(PinGateError::Config(_))));
    }
}
