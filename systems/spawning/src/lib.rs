#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Respawn director that keeps the mission's creature populations stocked.

use std::time::Duration;

use feles_core::{Archetype, Census, Command, Event, Mission, Placement};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Archetypes the director refills, in the order candidates are considered.
const STOCKED: [Archetype; 5] = [
    Archetype::Knight,
    Archetype::Blargh,
    Archetype::Gopnik,
    Archetype::Worm,
    Archetype::Barrel,
];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(4), 0)
    }
}

/// Pure system that periodically requests one more creature below its cap.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the live census to emit offscreen spawn commands.
    ///
    /// Every elapsed interval yields at most one command. Commands issued in
    /// the same call count against the caps, so a long delta never overfills
    /// a population.
    pub fn handle(
        &mut self,
        events: &[Event],
        census: &Census,
        mission: &Mission,
        out: &mut Vec<Command>,
    ) {
        if self.spawn_interval.is_zero() {
            return;
        }

        let accumulated = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let mut projected = *census;
        for _ in 0..self.resolve_spawn_attempts() {
            let Some(archetype) = self.pick(&projected, mission) else {
                continue;
            };
            projected.record(archetype);
            out.push(Command::Spawn {
                archetype,
                placement: Placement::Offscreen,
            });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn pick(&mut self, census: &Census, mission: &Mission) -> Option<Archetype> {
        let candidates: Vec<Archetype> = STOCKED
            .into_iter()
            .filter(|&archetype| {
                mission
                    .population_cap(archetype)
                    .is_some_and(|cap| census.count(archetype) < cap)
            })
            .collect();
        candidates.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_spawn_attempts_per_interval() {
        let mut spawning = Spawning::new(Config::new(Duration::from_secs(4), 1));
        spawning.accumulator = Duration::from_secs(9);
        assert_eq!(spawning.resolve_spawn_attempts(), 2);
        assert_eq!(spawning.accumulator, Duration::from_secs(1));
    }

    #[test]
    fn picks_nothing_when_every_cap_is_met() {
        let mission = Mission {
            max_knights: 0,
            max_blarghs: 0,
            max_gopniks: 0,
            max_worms: 0,
            max_barrels: 0,
            ..Mission::default()
        };
        let mut spawning = Spawning::new(Config::default());
        assert_eq!(spawning.pick(&Census::default(), &mission), None);
    }
}
