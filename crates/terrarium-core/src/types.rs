//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an organism instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Step one tile in `direction`. The board is bounded, so the result may
    /// fall outside it; callers filter with [`Position::in_bounds`].
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy)
    }

    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction of a single-tile move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// Whether a species acts as an animal (moves, fights) or a plant (sows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Animal,
    Plant,
}

/// Every species in the ecosystem, with its fixed base stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Human,
    Wolf,
    Sheep,
    Fox,
    Turtle,
    Antelope,
    Grass,
    Milkweed,
    Guarana,
    WolfBerries,
    SosnowskyHogweed,
}

impl Species {
    pub const ALL: [Species; 11] = [
        Species::Human,
        Species::Wolf,
        Species::Sheep,
        Species::Fox,
        Species::Turtle,
        Species::Antelope,
        Species::Grass,
        Species::Milkweed,
        Species::Guarana,
        Species::WolfBerries,
        Species::SosnowskyHogweed,
    ];

    pub fn kind(&self) -> Kind {
        match self {
            Species::Human
            | Species::Wolf
            | Species::Sheep
            | Species::Fox
            | Species::Turtle
            | Species::Antelope => Kind::Animal,
            _ => Kind::Plant,
        }
    }

    /// Base power at birth. Guarana consumption can raise an organism above
    /// this later.
    pub fn base_power(&self) -> i32 {
        match self {
            Species::Human => 5,
            Species::Wolf => 9,
            Species::Sheep => 4,
            Species::Fox => 3,
            Species::Turtle => 2,
            Species::Antelope => 4,
            Species::Grass => 0,
            Species::Milkweed => 0,
            Species::Guarana => 0,
            Species::WolfBerries => 99,
            Species::SosnowskyHogweed => 10,
        }
    }

    pub fn initiative(&self) -> i32 {
        match self {
            Species::Human => 4,
            Species::Wolf => 5,
            Species::Sheep => 4,
            Species::Fox => 7,
            Species::Turtle => 1,
            Species::Antelope => 4,
            // Plants never move; they act last.
            _ => 0,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Species::Human => 'H',
            Species::Wolf => 'W',
            Species::Sheep => 'S',
            Species::Fox => 'F',
            Species::Turtle => 'T',
            Species::Antelope => 'A',
            Species::Grass => '.',
            Species::Milkweed => 'm',
            Species::Guarana => 'g',
            Species::WolfBerries => 'b',
            Species::SosnowskyHogweed => '!',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Human => "Human",
            Species::Wolf => "Wolf",
            Species::Sheep => "Sheep",
            Species::Fox => "Fox",
            Species::Turtle => "Turtle",
            Species::Antelope => "Antelope",
            Species::Grass => "Grass",
            Species::Milkweed => "Milkweed",
            Species::Guarana => "Guarana",
            Species::WolfBerries => "Wolf Berries",
            Species::SosnowskyHogweed => "Sosnowsky's Hogweed",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
