use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::Position;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in tiles
    pub grid_width: usize,
    /// Height of the game grid in tiles
    pub grid_height: usize,
    /// Column of the starting head cell
    pub start_x: i32,
    /// Row of the starting head cell
    pub start_y: i32,
    /// Terminal columns used to draw one tile
    pub tile_size: u16,
    /// Milliseconds between two game ticks
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            start_x: 5,
            start_y: 5,
            tile_size: 2,
            tick_interval_ms: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Read a configuration from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_x, self.start_y)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Check that the configuration describes a playable game
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "Grid must be at least 1x1, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.grid_width <= i32::MAX as usize && self.grid_height <= i32::MAX as usize,
            "Grid {}x{} is too large",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.start_x >= 0
                && self.start_y >= 0
                && (self.start_x as usize) < self.grid_width
                && (self.start_y as usize) < self.grid_height,
            "Start cell ({}, {}) lies outside the {}x{} grid",
            self.start_x,
            self.start_y,
            self.grid_width,
            self.grid_height
        );
        ensure!(self.tile_size > 0, "Tile size must be positive");
        ensure!(self.tick_interval_ms > 0, "Tick interval must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.start(), Position::new(5, 5));
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.cell_count(), 180);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GameConfig::new(0, 10).validate().is_err());

        let off_grid = GameConfig {
            start_x: 10,
            ..GameConfig::small()
        };
        assert!(off_grid.validate().is_err());

        let negative = GameConfig {
            start_y: -1,
            ..GameConfig::default()
        };
        assert!(negative.validate().is_err());

        let no_tick = GameConfig {
            tick_interval_ms: 0,
            ..GameConfig::default()
        };
        assert!(no_tick.validate().is_err());

        let no_tile = GameConfig {
            tile_size: 0,
            ..GameConfig::default()
        };
        assert!(no_tile.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 32, "tick_interval_ms": 80 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_width, 32);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.tick_interval_ms, 80);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GameConfig::load(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "grid_width = 3").unwrap();
        assert!(GameConfig::load(file.path()).is_err());
    }
}
