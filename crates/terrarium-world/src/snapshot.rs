//! Saving and restoring worlds as JSON snapshots.

use crate::organism::Organism;
use crate::world::World;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use terrarium_core::{Error, Result, Species, WorldConfig};
use tracing::info;

const SNAPSHOT_VERSION: u32 = 1;

/// Cap on `width * height` accepted from a snapshot, so a corrupted file
/// cannot make [`WorldSnapshot::restore`] allocate an absurd board.
const MAX_TILES: i64 = 1 << 20;

/// Everything needed to rebuild a world: config (including the seed),
/// the turn counter, and the full organism table. Tile occupancy is not
/// stored; it is relinked from organism positions on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub version: u32,
    pub config: WorldConfig,
    pub turn: u64,
    pub organisms: Vec<Organism>,
}

impl WorldSnapshot {
    pub fn capture(world: &World) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            config: world.config().clone(),
            turn: world.turn(),
            organisms: world.organisms().cloned().collect(),
        }
    }

    /// Rebuild a world from this snapshot
    pub fn restore(self) -> Result<World> {
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::Validation(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }
        let (width, height) = (self.config.width, self.config.height);
        if width < 1 || height < 1 || (width as i64) * (height as i64) > MAX_TILES {
            return Err(Error::Validation(format!(
                "bad board dimensions {width}x{height}"
            )));
        }
        for organism in &self.organisms {
            if !organism
                .position
                .in_bounds(self.config.width, self.config.height)
            {
                return Err(Error::Validation(format!(
                    "organism {} at {} is outside the {}x{} board",
                    organism.species, organism.position, self.config.width, self.config.height
                )));
            }
        }
        let humans = self
            .organisms
            .iter()
            .filter(|o| o.species == Species::Human)
            .count();
        if humans > 1 {
            return Err(Error::Validation(format!(
                "snapshot holds {humans} humans, at most one is allowed"
            )));
        }

        let mut world = World::from_config(self.config);
        world.restore_turn(self.turn);
        for organism in self.organisms {
            world.add_organism(organism);
        }
        Ok(world)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), organisms = self.organisms.len(), "world saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "no save file at {}",
                path.display()
            )));
        }
        let json = fs::read_to_string(path)?;
        let snapshot: WorldSnapshot = serde_json::from_str(&json)?;
        info!(path = %path.display(), turn = snapshot.turn, "world loaded");
        Ok(snapshot)
    }
}

impl World {
    pub fn to_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    /// Save this world as pretty-printed JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_snapshot().save(path)
    }

    /// Load a world previously written by [`World::save_to`]
    pub fn load_from(path: impl AsRef<Path>) -> Result<World> {
        WorldSnapshot::load(path)?.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrarium_core::Position;

    fn sample_world() -> World {
        let mut world = World::from_config(WorldConfig {
            seed: 21,
            ..Default::default()
        });
        world.populate();
        world.simulate();
        world
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let world = sample_world();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        world.save_to(&path).unwrap();
        let restored = World::load_from(&path).unwrap();

        assert_eq!(restored.turn(), world.turn());
        assert_eq!(restored.organism_count(), world.organism_count());
        assert_eq!(restored.census().counts, world.census().counts);
        // Occupancy was relinked: every organism sits on its own tile.
        for organism in restored.organisms() {
            assert!(restored
                .grid()
                .get(organism.position)
                .occupants()
                .contains(&organism.id));
        }
        assert_eq!(restored.human().is_some(), world.human().is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = World::load_from(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_version_guard() {
        let world = sample_world();
        let mut snapshot = world.to_snapshot();
        snapshot.version = 99;
        assert!(matches!(
            snapshot.restore(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let world = sample_world();

        let mut snapshot = world.to_snapshot();
        snapshot.config.width = -1;
        assert!(matches!(snapshot.restore(), Err(Error::Validation(_))));

        let mut snapshot = world.to_snapshot();
        snapshot.config.width = 1_000_000;
        snapshot.config.height = 1_000_000;
        assert!(matches!(snapshot.restore(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_out_of_bounds_organism_rejected() {
        let world = sample_world();
        let mut snapshot = world.to_snapshot();
        if let Some(organism) = snapshot.organisms.first_mut() {
            organism.position = Position::new(99, 99);
        }
        assert!(matches!(
            snapshot.restore(),
            Err(Error::Validation(_))
        ));
    }
}
