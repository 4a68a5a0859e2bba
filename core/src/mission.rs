//! Mission configuration: quotas, population caps and map size.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Archetype;

/// Smallest map side length a mission may request, in tiles.
pub const MIN_MAP_SIDE: u32 = 8;

/// Errors raised while loading or validating a mission.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse mission: {0}")]
    Parse(#[from] toml::de::Error),
    /// The mission parsed but describes an unplayable session.
    #[error("invalid mission: {reason}")]
    InvalidMission {
        /// Human-readable description of the problem.
        reason: String,
    },
}

/// Tunable parameters of a single play session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mission {
    /// Love the player must collect to ascend.
    pub love_quota: u32,
    /// Population cap for knights.
    pub max_knights: u32,
    /// Population cap for blarghs.
    pub max_blarghs: u32,
    /// Population cap for gopniks.
    pub max_gopniks: u32,
    /// Population cap for worms.
    pub max_worms: u32,
    /// Population cap for barrels.
    pub max_barrels: u32,
    /// Health of the cat summoned by ascension.
    pub cat_health: i32,
    /// Top speed of knights in world units per second.
    pub knight_speed: f32,
    /// Map width in tiles.
    pub map_width: u32,
    /// Map height in tiles.
    pub map_height: u32,
    /// Seconds under which the session counts as completed under par.
    pub par_time: u32,
    /// Whether the session shows onboarding messages.
    pub tutorial: bool,
}

impl Default for Mission {
    fn default() -> Self {
        Self {
            love_quota: 50,
            max_knights: 3,
            max_blarghs: 3,
            max_gopniks: 0,
            max_worms: 0,
            max_barrels: 6,
            cat_health: 3,
            knight_speed: 150.0,
            map_width: 32,
            map_height: 32,
            par_time: 120,
            tutorial: false,
        }
    }
}

impl Mission {
    /// The full campaign, starting with the tutorial.
    #[must_use]
    pub fn campaign() -> Vec<Mission> {
        let base = Mission::default();
        vec![
            Mission {
                love_quota: 25,
                max_knights: 3,
                max_blarghs: 0,
                max_barrels: 0,
                par_time: 90,
                tutorial: true,
                ..base.clone()
            },
            base.clone(),
            Mission {
                love_quota: 75,
                max_knights: 15,
                max_blarghs: 10,
                max_gopniks: 2,
                max_barrels: 7,
                cat_health: 6,
                knight_speed: 175.0,
                map_width: 64,
                map_height: 64,
                par_time: 3 * 60,
                ..base.clone()
            },
            Mission {
                love_quota: 75,
                max_knights: 15,
                max_blarghs: 15,
                max_gopniks: 7,
                max_barrels: 10,
                cat_health: 8,
                knight_speed: 175.0,
                map_width: 48,
                map_height: 48,
                par_time: 4 * 60,
                ..base.clone()
            },
            Mission {
                love_quota: 85,
                max_knights: 20,
                max_blarghs: 20,
                max_gopniks: 16,
                max_worms: 1,
                max_barrels: 15,
                cat_health: 8,
                knight_speed: 175.0,
                map_width: 64,
                map_height: 64,
                par_time: 4 * 60 + 30,
                ..base.clone()
            },
            Mission {
                love_quota: 100,
                max_knights: 25,
                max_blarghs: 25,
                max_gopniks: 20,
                max_worms: 5,
                max_barrels: 20,
                cat_health: 10,
                knight_speed: 175.0,
                map_width: 72,
                map_height: 72,
                par_time: 5 * 60,
                ..base.clone()
            },
            Mission {
                love_quota: 100,
                max_knights: 30,
                max_blarghs: 30,
                max_gopniks: 25,
                max_worms: 10,
                max_barrels: 30,
                cat_health: 10,
                knight_speed: 175.0,
                map_width: 48,
                map_height: 72,
                par_time: 5 * 60 + 30,
                ..base
            },
        ]
    }

    /// Campaign mission at `index`, clamped to the last mission.
    #[must_use]
    pub fn preset(index: usize) -> Mission {
        let mut campaign = Self::campaign();
        let last = campaign.len() - 1;
        campaign.swap_remove(index.min(last))
    }

    /// Population cap of an archetype the mission keeps stocked, `None` for the rest.
    #[must_use]
    pub const fn population_cap(&self, archetype: Archetype) -> Option<u32> {
        match archetype {
            Archetype::Knight => Some(self.max_knights),
            Archetype::Blargh => Some(self.max_blarghs),
            Archetype::Gopnik => Some(self.max_gopniks),
            Archetype::Worm => Some(self.max_worms),
            Archetype::Barrel => Some(self.max_barrels),
            _ => None,
        }
    }

    /// Parses a mission from TOML; omitted keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Mission, ConfigError> {
        let mission: Mission = toml::from_str(source)?;
        mission.validate()?;
        Ok(mission)
    }

    /// Rejects missions that cannot produce a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width < MIN_MAP_SIDE || self.map_height < MIN_MAP_SIDE {
            return Err(ConfigError::InvalidMission {
                reason: format!(
                    "map must be at least {MIN_MAP_SIDE}x{MIN_MAP_SIDE} tiles, got {}x{}",
                    self.map_width, self.map_height
                ),
            });
        }
        if self.love_quota == 0 {
            return Err(ConfigError::InvalidMission {
                reason: "love quota must be positive".to_owned(),
            });
        }
        if self.cat_health <= 0 {
            return Err(ConfigError::InvalidMission {
                reason: "cat health must be positive".to_owned(),
            });
        }
        if !(self.knight_speed.is_finite() && self.knight_speed > 0.0) {
            return Err(ConfigError::InvalidMission {
                reason: "knight speed must be a positive number".to_owned(),
            });
        }
        Ok(())
    }
}
