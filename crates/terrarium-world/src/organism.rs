//! Organism state and the human's immortality ability.

use serde::{Deserialize, Serialize};
use terrarium_core::{Direction, Kind, OrganismId, Position, RulesConfig, Species};

/// The human's special ability: a few turns of invulnerability, then a
/// cooldown before it can be armed again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Immortality {
    armed: bool,
    duration_left: u32,
    cooldown_left: u32,
}

impl Immortality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.duration_left > 0
    }

    pub fn is_ready(&self) -> bool {
        !self.is_active() && self.cooldown_left == 0
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Request activation at the start of the next turn. Ignored while the
    /// ability is active or cooling down.
    pub fn arm(&mut self) {
        if self.is_ready() {
            self.armed = true;
        }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Advance the ability by one turn: an armed ability activates, an
    /// active one burns a turn of duration (starting the cooldown when it
    /// runs out), otherwise the cooldown ticks down.
    pub fn advance(&mut self, rules: &RulesConfig) {
        if self.armed {
            self.armed = false;
            self.duration_left = rules.immortality_duration;
        } else if self.duration_left > 0 {
            self.duration_left -= 1;
            if self.duration_left == 0 {
                self.cooldown_left = rules.immortality_cooldown;
            }
        } else if self.cooldown_left > 0 {
            self.cooldown_left -= 1;
        }
    }

    /// Human-readable ability status for the UI
    pub fn status(&self) -> String {
        if self.is_active() {
            format!("Active, {} turns left", self.duration_left)
        } else if self.cooldown_left > 0 {
            format!("Cooldown, {} turns", self.cooldown_left)
        } else if self.armed {
            "Armed for next turn".to_string()
        } else {
            "Ready".to_string()
        }
    }
}

/// A single animal or plant on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub id: OrganismId,
    pub species: Species,
    /// Current power; starts at the species base and can grow (guarana)
    pub power: i32,
    pub age: u64,
    pub position: Position,
    /// Where the organism stood before its last move, for undo and for the
    /// antelope's second hop
    pub prev_position: Option<Position>,
    pub breed_cooldown: u32,
    pub skip_turn: bool,
    pub alive: bool,
    /// Present only on the human
    pub ability: Option<Immortality>,
    /// The human's pending move, set from the UI
    pub course: Option<Direction>,
}

impl Organism {
    pub fn new(species: Species, position: Position) -> Self {
        let ability = match species {
            Species::Human => Some(Immortality::new()),
            _ => None,
        };
        Self {
            id: OrganismId::new(),
            species,
            power: species.base_power(),
            age: 0,
            position,
            prev_position: None,
            breed_cooldown: 0,
            skip_turn: false,
            alive: true,
            ability,
            course: None,
        }
    }

    pub fn kind(&self) -> Kind {
        self.species.kind()
    }

    pub fn initiative(&self) -> i32 {
        self.species.initiative()
    }

    pub fn symbol(&self) -> char {
        self.species.symbol()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn die(&mut self) {
        self.alive = false;
    }

    pub fn can_breed(&self) -> bool {
        self.breed_cooldown == 0
    }

    /// End-of-turn upkeep: grow older, tick the breed cooldown, clear the
    /// skip flag
    pub fn end_turn(&mut self) {
        self.age += 1;
        self.breed_cooldown = self.breed_cooldown.saturating_sub(1);
        self.skip_turn = false;
    }

    pub fn is_immortal(&self) -> bool {
        self.ability.as_ref().is_some_and(|a| a.is_active())
    }

    pub fn boost_power(&mut self, amount: i32) {
        self.power += amount;
    }
}
