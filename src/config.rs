//! Match configuration
//!
//! Every field has a default, so a config file only needs to name what it
//! changes.

use crate::core::CardId;
use crate::{RealmsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_starting_authority() -> u32 {
    50
}

fn default_row_width() -> usize {
    5
}

fn default_first_player_hand() -> u32 {
    3
}

fn default_hand_size() -> u32 {
    5
}

fn default_explorer_count() -> usize {
    10
}

fn default_scouts() -> usize {
    8
}

fn default_vipers() -> usize {
    2
}

fn default_fleet_bonus_base() -> CardId {
    CardId::new(crate::loader::catalog::FLEET_HQ)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_starting_authority")]
    pub starting_authority: u32,

    /// Number of trade row slots
    #[serde(default = "default_row_width")]
    pub row_width: usize,

    /// Opening hand of the first player in turn order
    #[serde(default = "default_first_player_hand")]
    pub first_player_hand: u32,

    /// Opening hand of everyone else, and the cleanup draw
    #[serde(default = "default_hand_size")]
    pub hand_size: u32,

    #[serde(default = "default_explorer_count")]
    pub explorer_count: usize,

    #[serde(default = "default_scouts")]
    pub scouts_per_player: usize,

    #[serde(default = "default_vipers")]
    pub vipers_per_player: usize,

    /// Base whose owner gets +1 combat for every ship played
    #[serde(default = "default_fleet_bonus_base")]
    pub fleet_bonus_base: CardId,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_authority: default_starting_authority(),
            row_width: default_row_width(),
            first_player_hand: default_first_player_hand(),
            hand_size: default_hand_size(),
            explorer_count: default_explorer_count(),
            scouts_per_player: default_scouts(),
            vipers_per_player: default_vipers(),
            fleet_bonus_base: default_fleet_bonus_base(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.starting_authority == 0 {
            return Err(RealmsError::InvalidConfig(
                "starting_authority must be positive".to_string(),
            ));
        }
        if self.row_width == 0 {
            return Err(RealmsError::InvalidConfig("row_width must be positive".to_string()));
        }
        if self.first_player_hand == 0 || self.hand_size == 0 {
            return Err(RealmsError::InvalidConfig("hand sizes must be positive".to_string()));
        }
        if self.scouts_per_player + self.vipers_per_player == 0 {
            return Err(RealmsError::InvalidConfig("starting deck is empty".to_string()));
        }
        Ok(())
    }
}
