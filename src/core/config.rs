/*
 * Manages the slide menu's persisted settings: the panel width, the flatten policy,
 * whether hide mode was left on, and the log level used at startup. Settings are a small
 * JSON document in the per-user configuration directory. A missing file yields defaults.
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) so the presenter can run
 * against a mock. The concrete `CoreConfigManager` resolves its directory through
 * `path_utils`; tests point it at a temporary directory with `with_config_dir`.
 */
use crate::core::flatten::FlattenPolicy;
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

const MENU_CONFIG_FILENAME: &str = "menu_config.json";
pub const DEFAULT_MENU_WIDTH: u32 = 250;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration format error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub menu_width: u32,
    pub flatten_policy: FlattenPolicy,
    pub hide_mode: bool,
    pub log_level: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig {
            menu_width: DEFAULT_MENU_WIDTH,
            flatten_policy: FlattenPolicy::RespectOpenState,
            hide_mode: false,
            log_level: "info".to_string(),
        }
    }
}

impl MenuConfig {
    // Unrecognized level names fall back to `Info`.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_config(&self, app_name: &str) -> Result<MenuConfig>;
    fn save_config(&self, app_name: &str, config: &MenuConfig) -> Result<()>;
}

#[derive(Default)]
pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    #[cfg(test)]
    pub fn with_config_dir(dir: PathBuf) -> Self {
        CoreConfigManager {
            config_dir_override: Some(dir),
        }
    }

    fn config_file_path(&self, app_name: &str) -> Result<PathBuf> {
        let dir = match &self.config_dir_override {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory)?,
        };
        Ok(dir.join(MENU_CONFIG_FILENAME))
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the menu settings for the given application. Missing fields in an existing
     * file take their default values.
     */
    fn load_config(&self, app_name: &str) -> Result<MenuConfig> {
        log::trace!("CoreConfigManager: Loading menu config for app '{app_name}'");
        let file_path = self.config_file_path(app_name)?;
        if !file_path.exists() {
            log::debug!("CoreConfigManager: {file_path:?} does not exist, using defaults.");
            return Ok(MenuConfig::default());
        }
        let reader = BufReader::new(File::open(&file_path)?);
        let config: MenuConfig = serde_json::from_reader(reader)?;
        log::debug!("CoreConfigManager: Loaded {config:?} from {file_path:?}.");
        Ok(config)
    }

    fn save_config(&self, app_name: &str, config: &MenuConfig) -> Result<()> {
        log::trace!("CoreConfigManager: Saving menu config for app '{app_name}'");
        let file_path = self.config_file_path(app_name)?;
        let writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(writer, config)?;
        log::debug!("CoreConfigManager: Saved menu config to {file_path:?}.");
        Ok(())
    }
}
