#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that stocks a fresh Feles session.

use feles_core::{Archetype, Command, EventSink, Mission, Placement};
use feles_world::{self as world, query, World};

const ROSTER: [Archetype; 5] = [
    Archetype::Knight,
    Archetype::Blargh,
    Archetype::Gopnik,
    Archetype::Worm,
    Archetype::Barrel,
];

/// Produces the opening roster of a session.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Commands placing the player at the centre and every capped population offscreen.
    #[must_use]
    pub fn roster(&self, mission: &Mission) -> Vec<Command> {
        let mut commands = vec![Command::Spawn {
            archetype: Archetype::Player,
            placement: Placement::Center,
        }];
        for archetype in ROSTER {
            let cap = mission.population_cap(archetype).unwrap_or(0);
            commands.extend((0..cap).map(|_| Command::Spawn {
                archetype,
                placement: Placement::Offscreen,
            }));
        }
        commands
    }

    /// Applies the roster of the world's own mission.
    pub fn populate<S: EventSink + ?Sized>(&self, world: &mut World, sink: &mut S) {
        let roster = self.roster(query::mission(world));
        for command in roster {
            world::apply(world, command, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_comes_first() {
        let commands = Bootstrap.roster(&Mission::default());
        assert_eq!(
            commands.first(),
            Some(&Command::Spawn {
                archetype: Archetype::Player,
                placement: Placement::Center,
            })
        );
        assert_eq!(commands.len(), 1 + 3 + 3 + 6);
    }
}
