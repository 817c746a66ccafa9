use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the escape game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscapeConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Episodes are truncated once the timestep exceeds this
    pub max_cycles: usize,
    /// Lowest coordinate (both axes) the escape cell may spawn at
    pub escape_min: usize,
    /// Highest coordinate (both axes) the escape cell may spawn at
    pub escape_max: usize,

    // Rewards
    /// Reward for the agent that wins the episode
    pub win_reward: f32,
    /// Reward for the agent that loses the episode
    pub lose_reward: f32,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            grid_size: 7,
            max_cycles: 100,
            escape_min: 2,
            escape_max: 4,
            win_reward: 1.0,
            lose_reward: -1.0,
        }
    }
}

impl EscapeConfig {
    /// Create a configuration with a custom grid size
    ///
    /// The escape range is recentred so it stays away from both start corners.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            escape_min: (grid_size / 3).max(1),
            escape_max: (grid_size - grid_size / 3).saturating_sub(1).max(1),
            ..Default::default()
        }
    }

    /// Change the grid size, keeping the escape range if it still fits
    ///
    /// A range that would reach the origin or the guard's corner on the new
    /// grid is recentred as in [`EscapeConfig::new`].
    pub fn resize(&mut self, grid_size: usize) {
        self.grid_size = grid_size;
        let fits = self.escape_min >= 1
            && self.escape_min <= self.escape_max
            && self.escape_max + 1 < grid_size;
        if !fits {
            let recentred = Self::new(grid_size);
            self.escape_min = recentred.escape_min;
            self.escape_max = recentred.escape_max;
        }
    }

    /// Load a configuration from a TOML file; missing keys take defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: EscapeConfig =
            toml::from_str(&text).with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Number of cells on the grid
    pub fn num_cells(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Check that the configuration describes a playable game
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 3 {
            return Err(format!(
                "grid_size must be at least 3, got {}",
                self.grid_size
            ));
        }

        if self.max_cycles == 0 {
            return Err("max_cycles must be at least 1".to_string());
        }

        if self.escape_min > self.escape_max {
            return Err(format!(
                "escape_min ({}) cannot exceed escape_max ({})",
                self.escape_min, self.escape_max
            ));
        }

        // Prisoner starts at (0, 0), guard at (n-1, n-1)
        if self.escape_min == 0 {
            return Err("escape_min must be at least 1 (prisoner start cell)".to_string());
        }

        if self.escape_max + 1 >= self.grid_size {
            return Err(format!(
                "escape_max must be below {} (guard start cell), got {}",
                self.grid_size - 1,
                self.escape_max
            ));
        }

        if !self.win_reward.is_finite() || !self.lose_reward.is_finite() {
            return Err("rewards must be finite".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = EscapeConfig::default();
        assert_eq!(config.grid_size, 7);
        assert_eq!(config.max_cycles, 100);
        assert_eq!(config.escape_min, 2);
        assert_eq!(config.escape_max, 4);
        assert_eq!(config.num_cells(), 49);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_grid_is_valid() {
        for size in [3, 5, 7, 10, 15] {
            let config = EscapeConfig::new(size);
            assert_eq!(config.grid_size, size);
            assert!(config.validate().is_ok(), "size {size}: {:?}", config);
        }
    }

    #[test]
    fn test_resize_keeps_fitting_range() {
        let mut config = EscapeConfig {
            escape_min: 3,
            escape_max: 3,
            ..Default::default()
        };
        config.resize(9);
        assert_eq!(config.grid_size, 9);
        assert_eq!((config.escape_min, config.escape_max), (3, 3));

        // 2..=4 would touch the guard's corner on a 5x5 grid
        let mut config = EscapeConfig::default();
        config.resize(5);
        assert_eq!((config.escape_min, config.escape_max), (1, 3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_tiny_grid() {
        let config = EscapeConfig {
            grid_size: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_escape_range() {
        let mut config = EscapeConfig::default();
        config.escape_min = 5;
        config.escape_max = 4;
        assert!(config.validate().is_err());

        config.escape_min = 0;
        config.escape_max = 3;
        assert!(config.validate().is_err());

        config.escape_min = 2;
        config.escape_max = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_cycles() {
        let config = EscapeConfig {
            max_cycles: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_cycles = 25\nwin_reward = 5.0").unwrap();

        let config = EscapeConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.max_cycles, 25);
        assert_eq!(config.win_reward, 5.0);
        assert_eq!(config.grid_size, 7); // From default
    }

    #[test]
    fn test_load_missing_file() {
        let result = EscapeConfig::from_toml_file(Path::new("/nonexistent/escape.toml"));
        assert!(result.is_err());
    }
}
