//! Configuration types for the simulation.

use serde::{Deserialize, Serialize};

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Width of the board
    pub width: i32,
    /// Height of the board
    pub height: i32,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Spawn counts used by populate
    pub spawn: SpawnConfig,
    /// Behavioral rule constants
    pub rules: RulesConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            seed: 0,
            spawn: SpawnConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

/// How many of each species populate scatters onto a fresh board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Humans placed (the player organism)
    pub humans: u32,
    /// Copies of each plant species
    pub per_plant: u32,
    /// Copies of each non-human animal species
    pub per_animal: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            humans: 1,
            per_plant: 3,
            per_animal: 3,
        }
    }
}

/// Rule constants governing organism behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Cooldown applied to both parents after breeding
    pub parent_breed_cooldown: u32,
    /// Cooldown a newborn starts with
    pub newborn_breed_cooldown: u32,
    /// Percent chance (0-100) an antelope escapes a fight
    pub antelope_escape_chance: u32,
    /// Percent chance (0-100) a turtle stays put instead of moving
    pub turtle_idle_chance: u32,
    /// Attacks below this power bounce off a turtle's shell
    pub turtle_deflect_threshold: i32,
    /// Percent chance (0-100) a plant sows a copy each attempt
    pub sow_chance: u32,
    /// Sow attempts milkweed makes per turn
    pub milkweed_sow_attempts: u32,
    /// Power gained by eating guarana
    pub guarana_boost: i32,
    /// Turns the human's immortality lasts once activated
    pub immortality_duration: u32,
    /// Turns of cooldown after immortality runs out
    pub immortality_cooldown: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            parent_breed_cooldown: 5,
            newborn_breed_cooldown: 10,
            antelope_escape_chance: 50,
            turtle_idle_chance: 75,
            turtle_deflect_threshold: 5,
            sow_chance: 10,
            milkweed_sow_attempts: 3,
            guarana_boost: 3,
            immortality_duration: 5,
            immortality_cooldown: 5,
        }
    }
}
