//! The world: organism table, board, and the turn engine.

use crate::grid::Grid;
use crate::organism::Organism;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::fmt;
use terrarium_core::{
    Census, Direction, Kind, OrganismId, Position, Species, TurnSummary, WorldConfig, WorldStats,
};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    grid: Grid,
    organisms: HashMap<OrganismId, Organism>,
    /// Insertion order of each organism, used as the deterministic
    /// tie-breaker when sorting the turn order
    serials: HashMap<OrganismId, u64>,
    next_serial: u64,
    turn: u64,
    logs: Vec<String>,
    human: Option<OrganismId>,
    rng: ChaCha8Rng,
    stats: WorldStats,
}

impl World {
    /// A world with default rules and a random seed
    pub fn new(width: i32, height: i32) -> Self {
        let config = WorldConfig {
            width,
            height,
            seed: rand::thread_rng().gen(),
            ..Default::default()
        };
        Self::from_config(config)
    }

    /// A fully configured world; the same config replays identically
    pub fn from_config(config: WorldConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Grid::new(config.width, config.height);
        Self {
            config,
            grid,
            organisms: HashMap::new(),
            serials: HashMap::new(),
            next_serial: 0,
            turn: 0,
            logs: Vec::new(),
            human: None,
            rng,
            stats: WorldStats::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.grid.width
    }

    pub fn height(&self) -> i32 {
        self.grid.height
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(&id)
    }

    pub fn organisms(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.values()
    }

    pub fn organism_count(&self) -> usize {
        self.organisms.len()
    }

    pub fn human(&self) -> Option<&Organism> {
        self.human.and_then(|id| self.organisms.get(&id))
    }

    pub fn census(&self) -> Census {
        let mut census = Census::new();
        for organism in self.organisms.values() {
            census.record(organism.species);
        }
        census
    }

    /// Symbol shown for a tile: its occupant's, or a dot when empty
    pub fn tile_symbol(&self, pos: Position) -> char {
        self.grid
            .get(pos)
            .top()
            .and_then(|id| self.organisms.get(&id))
            .map(|o| o.symbol())
            .unwrap_or('\u{00b7}')
    }

    /// Register an organism and place it on its tile
    pub fn add_organism(&mut self, organism: Organism) -> OrganismId {
        let id = organism.id;
        if organism.species == Species::Human {
            self.human = Some(id);
        }
        self.grid.get_mut(organism.position).place(id);
        self.serials.insert(id, self.next_serial);
        self.next_serial += 1;
        self.organisms.insert(id, organism);
        id
    }

    /// Drop a species onto `count` random free tiles. Stops early if the
    /// board fills up.
    pub fn scatter(&mut self, species: Species, count: u32) {
        let total = (self.grid.width * self.grid.height) as usize;
        let mut remaining = count;
        while remaining > 0 {
            if self.grid.occupied_count() >= total {
                warn!(%species, remaining, "board full, could not place all organisms");
                break;
            }
            let index = self.rng.gen_range(0..total);
            let pos = self.grid.index_to_pos(index);
            if self.grid.get(pos).is_free() {
                self.add_organism(Organism::new(species, pos));
                remaining -= 1;
            }
        }
    }

    /// Wipe the board and scatter a fresh starting population
    pub fn populate(&mut self) {
        self.reset();

        self.scatter(Species::Human, self.config.spawn.humans);

        let per_plant = self.config.spawn.per_plant;
        self.scatter(Species::SosnowskyHogweed, per_plant);
        self.scatter(Species::Grass, per_plant);
        self.scatter(Species::Guarana, per_plant);
        self.scatter(Species::Milkweed, per_plant);
        self.scatter(Species::WolfBerries, per_plant);

        let per_animal = self.config.spawn.per_animal;
        self.scatter(Species::Wolf, per_animal);
        self.scatter(Species::Sheep, per_animal);
        self.scatter(Species::Fox, per_animal);
        self.scatter(Species::Turtle, per_animal);
        self.scatter(Species::Antelope, per_animal);

        info!(
            organisms = self.organisms.len(),
            width = self.grid.width,
            height = self.grid.height,
            "world populated"
        );
    }

    /// Used by snapshot restore to resume at a saved turn
    pub(crate) fn restore_turn(&mut self, turn: u64) {
        self.turn = turn;
    }

    /// Clear organisms, tiles, log, and the turn counter
    pub fn reset(&mut self) {
        self.organisms.clear();
        self.serials.clear();
        self.grid.clear();
        self.logs.clear();
        self.human = None;
        self.turn = 0;
        self.stats = WorldStats::new();
    }

    /// Set the direction the human will walk on the next turn
    pub fn set_human_course(&mut self, direction: Direction) {
        if let Some(id) = self.human {
            if let Some(human) = self.organisms.get_mut(&id) {
                human.course = Some(direction);
            }
        }
    }

    /// Arm the human's immortality for activation next turn
    pub fn arm_immortality(&mut self) {
        if let Some(id) = self.human {
            if let Some(ability) = self.organisms.get_mut(&id).and_then(|h| h.ability.as_mut()) {
                ability.arm();
            }
        }
    }

    /// Advance the world by one turn.
    ///
    /// Organisms act in initiative order (ties: older first), collisions are
    /// resolved as each mover lands, then the dead are swept and survivors
    /// age.
    pub fn simulate(&mut self) -> TurnSummary {
        self.turn += 1;
        self.logs.clear();
        let mut summary = TurnSummary {
            turn: self.turn,
            ..Default::default()
        };

        let mut order: Vec<OrganismId> = self.organisms.keys().copied().collect();
        order.sort_by(|a, b| {
            let (oa, ob) = (&self.organisms[a], &self.organisms[b]);
            ob.initiative()
                .cmp(&oa.initiative())
                .then(ob.age.cmp(&oa.age))
                .then(self.serials[a].cmp(&self.serials[b]))
        });

        for id in order {
            let Some(organism) = self.organisms.get(&id) else {
                continue;
            };
            if !organism.is_alive() || organism.skip_turn {
                continue;
            }

            self.act(id, &mut summary);

            // The mover may have landed on someone.
            let Some(organism) = self.organisms.get(&id) else {
                continue;
            };
            if !organism.is_alive() {
                continue;
            }
            let pos = organism.position;
            if self.grid.get(pos).occupant_count() > 1 {
                let defender = self
                    .grid
                    .get(pos)
                    .occupants()
                    .iter()
                    .copied()
                    .find(|other| {
                        *other != id
                            && self.organisms.get(other).is_some_and(|o| o.is_alive())
                    });
                if let Some(defender) = defender {
                    self.resolve_collision(id, defender, &mut summary);
                }
            }
        }

        self.sweep_dead(&mut summary);

        for organism in self.organisms.values_mut() {
            organism.end_turn();
        }

        let population = self.organisms.len() as u32;
        self.stats.update(&summary, population);
        debug!(
            turn = self.turn,
            population,
            deaths = summary.deaths,
            births = summary.births,
            "turn complete"
        );
        summary
    }

    fn act(&mut self, id: OrganismId, summary: &mut TurnSummary) {
        let Some(organism) = self.organisms.get(&id) else {
            return;
        };
        match organism.species {
            Species::Human => self.human_action(id),
            Species::Turtle => self.turtle_action(id),
            Species::Fox => self.fox_action(id),
            Species::Antelope => self.antelope_action(id),
            Species::Wolf | Species::Sheep => self.wander(id),
            Species::SosnowskyHogweed => {
                self.sow(id, summary);
                self.hogweed_sting(id);
            }
            Species::Milkweed => {
                let attempts = self.config.rules.milkweed_sow_attempts;
                for _ in 0..attempts {
                    self.sow(id, summary);
                }
            }
            Species::Grass | Species::Guarana | Species::WolfBerries => {
                self.sow(id, summary);
            }
        }
    }

    /// Default animal move: one random in-bounds step
    fn wander(&mut self, id: OrganismId) {
        let Some(pos) = self.organisms.get(&id).map(|o| o.position) else {
            return;
        };
        let neighbors = self.grid.neighbors(pos);
        if let Some(target) = neighbors.choose(&mut self.rng).copied() {
            self.move_organism(id, target);
        }
    }

    fn human_action(&mut self, id: OrganismId) {
        let rules = self.config.rules.clone();
        let Some(human) = self.organisms.get_mut(&id) else {
            return;
        };
        if let Some(ability) = human.ability.as_mut() {
            ability.advance(&rules);
        }
        let course = human.course.take();
        if let Some(direction) = course {
            let target = human.position.step(direction);
            if self.grid.in_bounds(target) {
                self.move_organism(id, target);
            }
        }
    }

    fn turtle_action(&mut self, id: OrganismId) {
        let idle = self.config.rules.turtle_idle_chance;
        if self.roll(idle) {
            return;
        }
        self.wander(id);
    }

    /// The fox never steps onto a tile whose occupant outmatches it
    fn fox_action(&mut self, id: OrganismId) {
        let Some(fox) = self.organisms.get(&id) else {
            return;
        };
        let (pos, power) = (fox.position, fox.power);
        let safe: Vec<Position> = self
            .grid
            .neighbors(pos)
            .into_iter()
            .filter(|p| {
                self.grid
                    .get(*p)
                    .top()
                    .and_then(|o| self.organisms.get(&o))
                    .map_or(true, |occupant| occupant.power <= power)
            })
            .collect();
        if let Some(target) = safe.choose(&mut self.rng).copied() {
            self.move_organism(id, target);
        }
    }

    /// Antelopes cover two tiles per turn unless the first step already
    /// started a fight
    fn antelope_action(&mut self, id: OrganismId) {
        self.wander(id);
        let Some(antelope) = self.organisms.get(&id) else {
            return;
        };
        let pos = antelope.position;
        let prev = antelope.prev_position;
        if self.grid.get(pos).occupant_count() > 1 {
            return;
        }
        let onward: Vec<Position> = self
            .grid
            .neighbors(pos)
            .into_iter()
            .filter(|p| Some(*p) != prev)
            .collect();
        if let Some(target) = onward.choose(&mut self.rng).copied() {
            self.move_organism(id, target);
        }
    }

    /// With some luck, drop a copy of this plant on a free neighbouring tile
    fn sow(&mut self, id: OrganismId, summary: &mut TurnSummary) {
        let chance = self.config.rules.sow_chance;
        if !self.roll(chance) {
            return;
        }
        let Some(plant) = self.organisms.get(&id) else {
            return;
        };
        let (species, pos) = (plant.species, plant.position);
        let free = self.grid.free_neighbors(pos);
        if let Some(target) = free.choose(&mut self.rng).copied() {
            self.add_organism(Organism::new(species, target));
            summary.births += 1;
            debug!(%species, %target, "plant sowed");
        }
    }

    /// Hogweed kills every animal on a neighbouring tile
    fn hogweed_sting(&mut self, id: OrganismId) {
        let Some(pos) = self.organisms.get(&id).map(|o| o.position) else {
            return;
        };
        for neighbor in self.grid.neighbors(pos) {
            let victims: Vec<OrganismId> = self.grid.get(neighbor).occupants().to_vec();
            for victim_id in victims {
                let Some(victim) = self.organisms.get_mut(&victim_id) else {
                    continue;
                };
                if victim.kind() != Kind::Animal || !victim.is_alive() {
                    continue;
                }
                if victim.is_immortal() {
                    continue;
                }
                victim.die();
                let name = victim.species.name();
                self.log(format!("Sosnowsky's Hogweed withered {name}!"));
            }
        }
    }

    /// Resolve a mover landing on an occupied tile: defender reactions
    /// first, then breeding for matching animals, then combat.
    fn resolve_collision(
        &mut self,
        attacker_id: OrganismId,
        defender_id: OrganismId,
        summary: &mut TurnSummary,
    ) {
        let Some(attacker) = self.organisms.get(&attacker_id) else {
            return;
        };
        let Some(defender) = self.organisms.get(&defender_id) else {
            return;
        };
        let attacker_species = attacker.species;
        let defender_species = defender.species;

        // A cornered antelope would rather run than fight.
        if attacker_species == Species::Antelope
            && defender_species != Species::Antelope
            && self.try_escape(attacker_id, defender_id, summary)
        {
            return;
        }

        if self.defender_reaction(attacker_id, defender_id, summary) {
            return;
        }

        if attacker_species == defender_species && attacker_species.kind() == Kind::Animal {
            self.breed(attacker_id, defender_id, summary);
            return;
        }

        self.fight(attacker_id, defender_id, summary);
    }

    /// 50% chance to slip away to a free neighbouring tile
    fn try_escape(
        &mut self,
        runner_id: OrganismId,
        threat_id: OrganismId,
        summary: &mut TurnSummary,
    ) -> bool {
        let chance = self.config.rules.antelope_escape_chance;
        if !self.roll(chance) {
            return false;
        }
        let Some(pos) = self.organisms.get(&runner_id).map(|o| o.position) else {
            return false;
        };
        let free = self.grid.free_neighbors(pos);
        let Some(target) = free.choose(&mut self.rng).copied() else {
            return false;
        };
        self.move_organism(runner_id, target);
        summary.escapes += 1;
        let runner = self.species_name(runner_id);
        let threat = self.species_name(threat_id);
        self.log(format!("{runner} escaped from {threat}!"));
        true
    }

    /// Returns true when the defender fully handled the collision
    fn defender_reaction(
        &mut self,
        attacker_id: OrganismId,
        defender_id: OrganismId,
        summary: &mut TurnSummary,
    ) -> bool {
        let Some(defender) = self.organisms.get(&defender_id) else {
            return true;
        };
        let defender_species = defender.species;
        let Some(attacker) = self.organisms.get(&attacker_id) else {
            return true;
        };
        let attacker_species = attacker.species;
        let attacker_power = attacker.power;
        let attacker_immortal = attacker.is_immortal();

        match defender_species {
            Species::WolfBerries => {
                // Lethal to every eater. The immortal human backs off and
                // leaves the berries where they grow.
                if attacker_immortal {
                    self.undo_move(attacker_id);
                    self.log("Immortal Human shrugged off the Wolf Berries!".to_string());
                } else {
                    self.kill(defender_id);
                    summary.plants_eaten += 1;
                    self.kill(attacker_id);
                    let name = attacker_species.name();
                    self.log(format!("Wolf Berries poisoned {name}!"));
                }
                true
            }
            Species::Guarana => {
                let boost = self.config.rules.guarana_boost;
                self.kill(defender_id);
                summary.plants_eaten += 1;
                if let Some(attacker) = self.organisms.get_mut(&attacker_id) {
                    attacker.boost_power(boost);
                    let (name, power) = (attacker.species.name(), attacker.power);
                    self.log(format!("Guarana boosted {name}'s power to {power}!"));
                }
                true
            }
            Species::SosnowskyHogweed => {
                self.kill(defender_id);
                summary.plants_eaten += 1;
                if attacker_immortal {
                    self.log("Immortal Human trampled the Hogweed!".to_string());
                } else {
                    self.kill(attacker_id);
                    let name = attacker_species.name();
                    self.log(format!("{name} died eating Sosnowsky's Hogweed!"));
                }
                true
            }
            Species::Grass | Species::Milkweed => {
                self.kill(defender_id);
                summary.plants_eaten += 1;
                let attacker = attacker_species.name();
                let plant = defender_species.name();
                self.log(format!("{attacker} ate {plant}."));
                true
            }
            Species::Turtle if attacker_species != Species::Turtle => {
                if attacker_power < self.config.rules.turtle_deflect_threshold {
                    self.undo_move(attacker_id);
                    let name = attacker_species.name();
                    self.log(format!("Turtle deflected {name}!"));
                    true
                } else {
                    false
                }
            }
            Species::Antelope if attacker_species != Species::Antelope => {
                self.try_escape(defender_id, attacker_id, summary)
            }
            Species::Human => {
                if self.organisms.get(&defender_id).is_some_and(|d| d.is_immortal()) {
                    self.undo_move(attacker_id);
                    let name = attacker_species.name();
                    self.log(format!("{name} was repelled by the immortal Human!"));
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Two matching animals met: the mover steps back and, cooldowns
    /// permitting, a newborn appears next to the defender.
    fn breed(
        &mut self,
        attacker_id: OrganismId,
        defender_id: OrganismId,
        summary: &mut TurnSummary,
    ) {
        self.undo_move(attacker_id);

        let Some(defender) = self.organisms.get(&defender_id) else {
            return;
        };
        let (species, defender_pos) = (defender.species, defender.position);
        // Only the mover's cooldown gates the encounter.
        let mover_ready = self.organisms.get(&attacker_id).is_some_and(|a| a.can_breed());

        // The defender spends its turn on the encounter either way.
        if let Some(defender) = self.organisms.get_mut(&defender_id) {
            defender.skip_turn = true;
        }
        if !mover_ready {
            return;
        }

        let free = self.grid.free_neighbors(defender_pos);
        let Some(nest) = free.choose(&mut self.rng).copied() else {
            return;
        };

        let rules = &self.config.rules;
        let (parent_cd, newborn_cd) = (rules.parent_breed_cooldown, rules.newborn_breed_cooldown);

        let mut newborn = Organism::new(species, nest);
        newborn.breed_cooldown = newborn_cd;
        newborn.skip_turn = true;
        self.add_organism(newborn);
        summary.births += 1;

        for parent in [attacker_id, defender_id] {
            if let Some(parent) = self.organisms.get_mut(&parent) {
                parent.breed_cooldown = parent_cd;
            }
        }

        let name = species.name();
        self.log(format!("{name} and {name} bred a new {name}!"));
    }

    fn fight(
        &mut self,
        attacker_id: OrganismId,
        defender_id: OrganismId,
        _summary: &mut TurnSummary,
    ) {
        let Some(attacker) = self.organisms.get(&attacker_id) else {
            return;
        };
        let Some(defender) = self.organisms.get(&defender_id) else {
            return;
        };
        let (attacker_name, attacker_power, attacker_immortal) = (
            attacker.species.name(),
            attacker.power,
            attacker.is_immortal(),
        );
        let (defender_name, defender_power) = (defender.species.name(), defender.power);

        if attacker_power > defender_power {
            self.kill(defender_id);
            self.log(format!("{attacker_name} killed {defender_name}!"));
        } else if attacker_immortal {
            self.undo_move(attacker_id);
            self.log(format!(
                "Immortality saved the Human from {defender_name}!"
            ));
        } else {
            self.kill(attacker_id);
            self.log(format!(
                "{attacker_name} was killed by {defender_name}!"
            ));
        }
    }

    /// Move an organism to `to`, remembering where it came from
    fn move_organism(&mut self, id: OrganismId, to: Position) {
        let Some(from) = self.organisms.get(&id).map(|o| o.position) else {
            return;
        };
        if from == to {
            return;
        }
        self.grid.get_mut(to).place(id);
        self.grid.get_mut(from).remove(id);
        if let Some(organism) = self.organisms.get_mut(&id) {
            organism.prev_position = Some(from);
            organism.position = to;
        }
    }

    /// Step back to the previous tile, if there is one
    fn undo_move(&mut self, id: OrganismId) {
        let Some(organism) = self.organisms.get(&id) else {
            return;
        };
        let Some(prev) = organism.prev_position else {
            return;
        };
        let current = organism.position;
        self.grid.get_mut(prev).place(id);
        self.grid.get_mut(current).remove(id);
        if let Some(organism) = self.organisms.get_mut(&id) {
            organism.position = prev;
            organism.prev_position = None;
        }
    }

    fn kill(&mut self, id: OrganismId) {
        if let Some(organism) = self.organisms.get_mut(&id) {
            organism.die();
        }
    }

    /// Remove the dead from tiles and the table
    fn sweep_dead(&mut self, summary: &mut TurnSummary) {
        let dead: Vec<(OrganismId, Position, Species)> = self
            .organisms
            .values()
            .filter(|o| !o.is_alive())
            .map(|o| (o.id, o.position, o.species))
            .collect();

        for (id, pos, species) in dead {
            self.grid.get_mut(pos).remove(id);
            self.organisms.remove(&id);
            self.serials.remove(&id);
            if self.human == Some(id) {
                self.human = None;
            }
            if species.kind() == Kind::Animal {
                summary.deaths += 1;
            }
            debug!(%species, %pos, turn = self.turn, "organism removed");
        }
    }

    fn species_name(&self, id: OrganismId) -> &'static str {
        self.organisms
            .get(&id)
            .map(|o| o.species.name())
            .unwrap_or("Unknown")
    }

    fn roll(&mut self, percent_chance: u32) -> bool {
        self.rng.gen_range(0..100) < percent_chance
    }

    fn log(&mut self, message: String) {
        debug!(turn = self.turn, "{message}");
        self.logs.push(message);
    }

    /// Textual map of the board plus a one-line status
    pub fn render(&self) -> String {
        let mut out = String::new();
        let hline = "-".repeat(self.grid.width as usize);
        out.push('+');
        out.push_str(&hline);
        out.push_str("+\n");
        for y in 0..self.grid.height {
            out.push('|');
            for x in 0..self.grid.width {
                out.push(self.tile_symbol(Position::new(x, y)));
            }
            out.push_str("|\n");
        }
        out.push('+');
        out.push_str(&hline);
        out.push_str("+\n");
        out.push_str(&format!(
            "Turn: {}  Organisms: {}\n",
            self.turn,
            self.organisms.len()
        ));
        out
    }

    /// Print the textual map to stdout
    pub fn print_world(&self) {
        print!("{self}");
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_world(seed: u64) -> World {
        World::from_config(WorldConfig {
            seed,
            ..Default::default()
        })
    }

    fn place(world: &mut World, species: Species, x: i32, y: i32) -> OrganismId {
        world.add_organism(Organism::new(species, Position::new(x, y)))
    }

    #[test]
    fn test_populate_counts() {
        let mut world = empty_world(7);
        world.populate();

        let census = world.census();
        assert_eq!(census.count(Species::Human), 1);
        for species in Species::ALL {
            if species != Species::Human {
                assert_eq!(census.count(species), 3, "{species}");
            }
        }
        assert_eq!(world.organism_count(), 31);
        assert!(world.human().is_some());
    }

    #[test]
    fn test_stronger_mover_wins() {
        let mut world = empty_world(1);
        let wolf = place(&mut world, Species::Wolf, 4, 4);
        let sheep = place(&mut world, Species::Sheep, 5, 4);

        world.simulate();

        // One of the two is gone; the wolf never loses to a sheep.
        assert!(world.organism(wolf).is_some());
        if world.organism(sheep).is_none() {
            assert!(world.logs().iter().any(|l| l.contains("killed")));
        }
    }

    #[test]
    fn test_turtle_deflects_weak_attacker() {
        // A 3x1 strip: the fox (power 3) has nowhere to go but into a shell.
        let mut world = World::from_config(WorldConfig {
            width: 3,
            height: 1,
            seed: 3,
            ..Default::default()
        });
        let fox = place(&mut world, Species::Fox, 1, 0);
        place(&mut world, Species::Turtle, 0, 0);
        place(&mut world, Species::Turtle, 2, 0);

        world.simulate();

        let fox = world.organism(fox).expect("fox must survive deflection");
        assert_eq!(fox.position, Position::new(1, 0));
        assert!(world.logs().iter().any(|l| l.contains("deflected Fox")));
    }

    #[test]
    fn test_hogweed_kills_neighbours() {
        // A 1x2 world: the turtle cannot leave the hogweed's reach.
        let mut world = World::from_config(WorldConfig {
            width: 1,
            height: 2,
            seed: 4,
            ..Default::default()
        });
        place(&mut world, Species::SosnowskyHogweed, 0, 0);
        let turtle = place(&mut world, Species::Turtle, 0, 1);

        let mut died = false;
        for _ in 0..5 {
            world.simulate();
            if world.organism(turtle).is_none() {
                died = true;
                break;
            }
        }
        assert!(died, "the turtle cannot outlive an adjacent hogweed");
    }

    #[test]
    fn test_wolfberries_poison_their_eater() {
        // A sheep boxed in by berries on all reachable sides must eat them.
        let mut world = empty_world(5);
        let sheep = place(&mut world, Species::Sheep, 0, 0);
        let b1 = place(&mut world, Species::WolfBerries, 1, 0);
        let b2 = place(&mut world, Species::WolfBerries, 0, 1);

        world.simulate();

        // Sheep moved onto one of the berries and died with it.
        assert!(world.organism(sheep).is_none());
        assert!(world.organism(b1).is_none() || world.organism(b2).is_none());
        assert!(world.logs().iter().any(|l| l.contains("poisoned")));
    }

    #[test]
    fn test_wolfberries_poison_the_wolf_too() {
        // The name is about who plants them, not who survives them.
        let mut world = empty_world(14);
        let wolf = place(&mut world, Species::Wolf, 0, 0);
        let b1 = place(&mut world, Species::WolfBerries, 1, 0);
        let b2 = place(&mut world, Species::WolfBerries, 0, 1);

        world.simulate();

        assert!(world.organism(wolf).is_none());
        assert!(world.organism(b1).is_none() || world.organism(b2).is_none());
        assert!(world.logs().iter().any(|l| l.contains("poisoned Wolf")));
    }

    #[test]
    fn test_immortal_human_repelled_by_wolfberries() {
        let mut world = empty_world(15);
        let human = place(&mut world, Species::Human, 0, 0);
        let berries = place(&mut world, Species::WolfBerries, 1, 0);

        world.arm_immortality();
        world.simulate(); // ability activates
        assert!(world.organism(human).unwrap().is_immortal());

        world.set_human_course(Direction::Right);
        world.simulate();

        // Walked into the berries and backed off; both still stand.
        let human = world.organism(human).expect("immortal human survives");
        assert_eq!(human.position, Position::new(0, 0));
        assert!(world.organism(berries).is_some());
    }

    #[test]
    fn test_guarana_boosts_eater() {
        let mut world = empty_world(6);
        let wolf = place(&mut world, Species::Wolf, 0, 0);
        place(&mut world, Species::Guarana, 1, 0);
        place(&mut world, Species::Guarana, 0, 1);

        world.simulate();

        let wolf = world.organism(wolf).expect("wolf survives eating guarana");
        assert_eq!(wolf.power, Species::Wolf.base_power() + 3);
    }

    #[test]
    fn test_breeding_spawns_newborn_with_cooldowns() {
        // A cramped board so the pair keeps bumping into each other.
        let mut world = World::from_config(WorldConfig {
            width: 3,
            height: 3,
            seed: 8,
            ..Default::default()
        });
        let a = place(&mut world, Species::Sheep, 0, 0);
        let b = place(&mut world, Species::Sheep, 1, 0);

        let mut bred = false;
        for _ in 0..50 {
            world.simulate();
            assert!(
                world.organism(a).is_some() && world.organism(b).is_some(),
                "same-species collisions must never kill"
            );
            if world.census().count(Species::Sheep) > 2 {
                bred = true;
                break;
            }
        }
        assert!(bred, "two sheep on a 3x3 board should breed within 50 turns");

        // Newborns carry a long cooldown and skipped their birth turn.
        let newborn = world
            .organisms()
            .find(|o| o.id != a && o.id != b)
            .expect("newborn present");
        assert!(newborn.breed_cooldown > 0);
        assert_eq!(newborn.age, 1);
    }

    #[test]
    fn test_ready_mover_breeds_with_cooling_partner() {
        // A 3x1 strip forces the mover onto its partner; the partner's own
        // cooldown does not block the encounter.
        let mut world = World::from_config(WorldConfig {
            width: 3,
            height: 1,
            seed: 2,
            ..Default::default()
        });
        place(&mut world, Species::Sheep, 0, 0);
        let mut partner = Organism::new(Species::Sheep, Position::new(1, 0));
        partner.breed_cooldown = 7;
        world.add_organism(partner);

        world.simulate();

        assert_eq!(world.census().count(Species::Sheep), 3);
        assert!(world.logs().iter().any(|l| l.contains("bred")));
    }

    #[test]
    fn test_human_follows_course() {
        let mut world = empty_world(9);
        let human = place(&mut world, Species::Human, 5, 5);

        world.set_human_course(Direction::Up);
        world.simulate();
        assert_eq!(
            world.organism(human).unwrap().position,
            Position::new(5, 4)
        );

        // Without a course the human stays put.
        world.simulate();
        assert_eq!(
            world.organism(human).unwrap().position,
            Position::new(5, 4)
        );
    }

    #[test]
    fn test_human_course_clipped_at_edge() {
        let mut world = empty_world(10);
        let human = place(&mut world, Species::Human, 0, 0);

        world.set_human_course(Direction::Left);
        world.simulate();
        assert_eq!(world.organism(human).unwrap().position, Position::new(0, 0));
    }

    #[test]
    fn test_immortal_human_survives_wolf() {
        let mut world = empty_world(11);
        let human = place(&mut world, Species::Human, 5, 5);
        place(&mut world, Species::Wolf, 7, 7);

        world.arm_immortality();
        world.simulate(); // ability activates
        assert!(world.organism(human).unwrap().is_immortal());

        // Walk into whatever comes; immortality must hold for its duration.
        for _ in 0..4 {
            world.set_human_course(Direction::Right);
            world.simulate();
            assert!(world.organism(human).is_some(), "immortal human died");
        }
    }

    #[test]
    fn test_same_seed_same_story() {
        let run = |seed: u64| {
            let mut world = World::from_config(WorldConfig {
                seed,
                ..Default::default()
            });
            world.populate();
            let mut log = Vec::new();
            for _ in 0..20 {
                world.simulate();
                log.extend(world.logs().to_vec());
            }
            (log, world.render())
        };

        let (log_a, map_a) = run(42);
        let (log_b, map_b) = run(42);
        assert_eq!(log_a, log_b);
        assert_eq!(map_a, map_b);
    }

    #[test]
    fn test_render_shape() {
        let mut world = empty_world(12);
        place(&mut world, Species::Wolf, 0, 0);
        let rendered = world.render();
        let lines: Vec<&str> = rendered.lines().collect();

        // border + 10 rows + border + status
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "+----------+");
        assert!(lines[1].starts_with("|W"));
        assert!(lines[12].contains("Organisms: 1"));
    }

    #[test]
    fn test_sweep_keeps_handle_in_sync() {
        let mut world = empty_world(13);
        let human = place(&mut world, Species::Human, 0, 0);
        assert!(world.human().is_some());

        // Hogweed right next door stings the stationary human.
        place(&mut world, Species::SosnowskyHogweed, 0, 1);
        world.simulate();

        assert!(world.organism(human).is_none());
        assert!(world.human().is_none());
    }
}
