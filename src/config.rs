use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::Span;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rules from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rules file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid rules: {0}")]
    Invalid(String),
}

/// Every tunable number the turn rules read.
///
/// Missing fields in a rules file fall back to the stock values below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub map_width: i32,
    pub map_height: i32,
    pub player_health: i32,
    pub player_damage: i32,
    pub torch_radius: i32,
    pub torch_min: i32,
    pub firefly_radius: i32,
    pub poison: Span,
    pub curse: Span,
    pub inversion: Span,
    pub cling_cooldown: Span,
    pub knockback: Span,
    pub quest_kills: Span,
    pub max_hp_boost: Span,
    pub bite_percent: i32,
    pub detach_percent: i32,
    pub trap_percent: i32,
    pub medkit_heal: i32,
    pub exit_hint_steps: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 36,
            player_health: 20,
            player_damage: 1,
            torch_radius: 3,
            torch_min: 2,
            firefly_radius: 1,
            poison: Span::new(5, 10),
            curse: Span::new(8, 12),
            inversion: Span::new(8, 15),
            cling_cooldown: Span::new(15, 35),
            knockback: Span::new(4, 7),
            quest_kills: Span::new(5, 10),
            max_hp_boost: Span::new(1, 5),
            bite_percent: 1,
            detach_percent: 3,
            trap_percent: 15,
            medkit_heal: 5,
            exit_hint_steps: 3,
        }
    }
}

impl Rules {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let rules: Rules = serde_json::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width < 8 || self.map_height < 8 {
            return Err(ConfigError::Invalid(format!(
                "map must be at least 8x8, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if self.player_health <= 0 {
            return Err(ConfigError::Invalid("player_health must be positive".into()));
        }
        if self.torch_min > self.torch_radius {
            return Err(ConfigError::Invalid(format!(
                "torch_min {} exceeds torch_radius {}",
                self.torch_min, self.torch_radius
            )));
        }
        for (name, value) in [
            ("bite_percent", self.bite_percent),
            ("detach_percent", self.detach_percent),
            ("trap_percent", self.trap_percent),
        ] {
            if value < 0 {
                return Err(ConfigError::Invalid(format!("{name} must not be negative")));
            }
        }
        Ok(())
    }

    /// Shield capacity tracks the grid width.
    pub fn shield_cap(&self) -> i32 {
        self.map_width
    }

    /// Torch radius for a floor after the next-floor delta is applied.
    pub fn torch_for(&self, delta: i32) -> i32 {
        (self.torch_radius + delta).max(self.torch_min)
    }

    /// Sight radius derived from a torch radius.
    pub fn fov_radius(torch: i32) -> i32 {
        ((torch as f32 * 0.7) as i32).max(1)
    }
}
