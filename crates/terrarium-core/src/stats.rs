//! Population statistics gathered from the board.

use crate::{Kind, Species};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Head count per species at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Census {
    pub counts: HashMap<Species, u32>,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, species: Species) {
        *self.counts.entry(species).or_insert(0) += 1;
    }

    pub fn count(&self, species: Species) -> u32 {
        self.counts.get(&species).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn animals(&self) -> u32 {
        self.counts
            .iter()
            .filter(|(s, _)| s.kind() == Kind::Animal)
            .map(|(_, c)| c)
            .sum()
    }

    pub fn plants(&self) -> u32 {
        self.counts
            .iter()
            .filter(|(s, _)| s.kind() == Kind::Plant)
            .map(|(_, c)| c)
            .sum()
    }
}

/// What happened during one simulated turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnSummary {
    pub turn: u64,
    pub deaths: u32,
    pub births: u32,
    pub escapes: u32,
    pub plants_eaten: u32,
}

/// Running totals across the lifetime of a world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldStats {
    pub turns: u64,
    pub total_deaths: u64,
    pub total_births: u64,
    pub peak_population: u32,
}

impl WorldStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one turn's summary into the running totals
    pub fn update(&mut self, summary: &TurnSummary, population: u32) {
        self.turns = summary.turn;
        self.total_deaths += summary.deaths as u64;
        self.total_births += summary.births as u64;
        if population > self.peak_population {
            self.peak_population = population;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_counts() {
        let mut census = Census::new();
        census.record(Species::Wolf);
        census.record(Species::Wolf);
        census.record(Species::Grass);

        assert_eq!(census.count(Species::Wolf), 2);
        assert_eq!(census.count(Species::Sheep), 0);
        assert_eq!(census.total(), 3);
        assert_eq!(census.animals(), 2);
        assert_eq!(census.plants(), 1);
    }

    #[test]
    fn test_stats_update() {
        let mut stats = WorldStats::new();

        let summary = TurnSummary {
            turn: 1,
            deaths: 2,
            births: 1,
            ..Default::default()
        };
        stats.update(&summary, 30);

        let summary = TurnSummary {
            turn: 2,
            deaths: 1,
            births: 0,
            ..Default::default()
        };
        stats.update(&summary, 28);

        assert_eq!(stats.turns, 2);
        assert_eq!(stats.total_deaths, 3);
        assert_eq!(stats.total_births, 1);
        assert_eq!(stats.peak_population, 30);
    }
}
