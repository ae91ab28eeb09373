use serde::Deserialize;
use std::fs;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_margin")]
    pub margin: f32,
}

/// Which map a session starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialMap {
    Mission,
    Random,
}

#[derive(Debug, Deserialize)]
pub struct MazeConfig {
    #[serde(default = "default_initial")]
    pub initial: InitialMap,
    /// Seed for random mazes; unset means a fresh seed every run
    #[serde(default)]
    pub seed: Option<u64>,
    /// Text map used instead of the built-in mission map
    #[serde(default)]
    pub layout_file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_history_lines")]
    pub history_lines: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_action_log")]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
    #[serde(default = "default_filter")]
    pub filter: String,
}

// Default values
fn default_cell_size() -> f32 { 80.0 }
fn default_margin() -> f32 { 30.0 }
fn default_initial() -> InitialMap { InitialMap::Mission }
fn default_window_title() -> String { "Fireman Robot - 5x5 Maze".to_string() }
fn default_bg_r() -> u8 { 211 }
fn default_bg_g() -> u8 { 211 }
fn default_bg_b() -> u8 { 211 }
fn default_history_lines() -> usize { 10 }
fn default_enable_action_log() -> bool { true }
fn default_action_log_path() -> String { "action_log.json".to_string() }
fn default_filter() -> String { "info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            margin: default_margin(),
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            initial: default_initial(),
            seed: None,
            layout_file: None,
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            history_lines: default_history_lines(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_action_log: default_enable_action_log(),
            action_log_path: default_action_log_path(),
            filter: default_filter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            maze: MazeConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!(path, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path, error = %e, "failed to parse configuration, using defaults");
                    Config::default()
                }
            },
            Err(_) => {
                info!(path, "no configuration file, using defaults");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.grid.cell_size, 80.0);
        assert_eq!(config.maze.initial, InitialMap::Mission);
        assert_eq!(config.maze.seed, None);
        assert_eq!(config.visual.history_lines, 10);
        assert!(config.logging.enable_action_log);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [maze]
            initial = "random"
            seed = 42

            [visual]
            history_lines = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.maze.initial, InitialMap::Random);
        assert_eq!(config.maze.seed, Some(42));
        assert_eq!(config.visual.history_lines, 5);
        assert_eq!(config.visual.window_title, "Fireman Robot - 5x5 Maze");
    }

    #[test]
    fn test_unknown_initial_map_is_error() {
        assert!(Config::from_toml_str("[maze]\ninitial = \"spiral\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_from("definitely/not/here.toml");
        assert_eq!(config.logging.action_log_path, "action_log.json");
    }
}
