use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake game with pause and restart buttons")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Terminal columns per grid tile
    #[arg(long)]
    tile_size: Option<u16>,

    /// Where to write the log (the terminal is taken by the game)
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,

    /// Log verbosity
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = cli.game_config()?;

    let mut human_mode = HumanMode::new(config);
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = config_file(r#"{ "grid_width": 24, "grid_height": 18, "tick_interval_ms": 80 }"#);
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["grid_snake", "--config", path, "--width", "30"]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 18);
        assert_eq!(config.tick_interval_ms, 80);
        assert_eq!(config.tile_size, 2);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let cli = Cli::parse_from(["grid_snake", "--tick-ms", "150", "--tile-size", "3"]);
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_width, 20);
        assert_eq!(config.tick_interval_ms, 150);
        assert_eq!(config.tile_size, 3);
    }

    #[test]
    fn test_overrides_are_validated() {
        // Default start cell (5, 5) no longer fits a 3-wide grid
        let cli = Cli::parse_from(["grid_snake", "--width", "3"]);
        assert!(cli.game_config().is_err());

        let file = config_file(r#"{ "grid_width": 4 }"#);
        let path = file.path().to_str().unwrap();
        let cli = Cli::parse_from(["grid_snake", "--config", path, "--width", "12"]);
        assert!(cli.game_config().is_ok());
    }

    #[test]
    fn test_log_level_maps_to_filter() {
        let cli = Cli::parse_from(["grid_snake", "--log-level", "debug"]);
        assert_eq!(LevelFilter::from(cli.log_level), LevelFilter::Debug);
        assert_eq!(cli.log_file, PathBuf::from("grid_snake.log"));
    }
}
