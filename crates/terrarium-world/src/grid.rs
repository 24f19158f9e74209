//! Bounded 2D board of tiles.

use serde::{Deserialize, Serialize};
use terrarium_core::{Direction, OrganismId, Position};

/// A single board tile holding a stack of organism ids.
///
/// Between turns every tile holds at most one occupant; mid-turn a mover is
/// pushed on top of the occupant it collided with, and collision resolution
/// brings the stack back down to one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tile {
    occupants: Vec<OrganismId>,
}

impl Tile {
    pub fn is_free(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    /// The organism that was on this tile first (the collision defender)
    pub fn bottom(&self) -> Option<OrganismId> {
        self.occupants.first().copied()
    }

    /// The most recently placed organism
    pub fn top(&self) -> Option<OrganismId> {
        self.occupants.last().copied()
    }

    pub fn place(&mut self, id: OrganismId) {
        self.occupants.push(id);
    }

    pub fn remove(&mut self, id: OrganismId) {
        self.occupants.retain(|o| *o != id);
    }

    pub fn clear(&mut self) {
        self.occupants.clear();
    }

    pub fn occupants(&self) -> &[OrganismId] {
        &self.occupants
    }
}

/// A bounded (non-wrapping) grid of tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::default(); size],
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.in_bounds(self.width, self.height)
    }

    /// Get tile at position. Panics if out of bounds; callers filter with
    /// [`Grid::in_bounds`] first.
    pub fn get(&self, pos: Position) -> &Tile {
        &self.tiles[self.pos_to_index(pos)]
    }

    pub fn get_mut(&mut self, pos: Position) -> &mut Tile {
        let index = self.pos_to_index(pos);
        &mut self.tiles[index]
    }

    /// In-bounds neighbours in the four cardinal directions
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .map(|d| pos.step(*d))
            .filter(|p| self.in_bounds(*p))
            .collect()
    }

    /// In-bounds neighbours with no occupant
    pub fn free_neighbors(&self, pos: Position) -> Vec<Position> {
        self.neighbors(pos)
            .into_iter()
            .filter(|p| self.get(*p).is_free())
            .collect()
    }

    /// Number of tiles with at least one occupant
    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_free()).count()
    }

    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            tile.clear();
        }
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tiles.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all tiles with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (self.index_to_pos(i), tile))
    }
}
