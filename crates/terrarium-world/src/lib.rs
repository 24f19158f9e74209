//! World simulation engine.
//!
//! This module implements the bounded 2D board where animals and plants
//! live, fight, breed, and get eaten, one initiative-ordered turn at a time.

pub mod grid;
pub mod organism;
pub mod snapshot;
pub mod world;

pub use grid::{Grid, Tile};
pub use organism::{Immortality, Organism};
pub use snapshot::WorldSnapshot;
pub use world::World;
