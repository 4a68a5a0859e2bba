use feles_core::{Archetype, Event, Mission};
use feles_level::Level;
use feles_system_bootstrap::Bootstrap;
use feles_world::{query, World};

#[test]
fn populates_a_generated_session() {
    let mut world = World::new(Mission::preset(1), 11).expect("preset is playable");
    let mut events = Vec::new();

    Bootstrap.populate(&mut world, &mut events);

    let player = query::player(&world).expect("player spawned");
    assert_eq!(player.archetype, Archetype::Player);
    let mission = query::mission(&world).clone();
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::EntitySpawned { .. }))
        .count();
    assert!(spawned > 0);
    assert!(query::count(&world, Archetype::Knight) <= mission.max_knights);
    assert!(query::count(&world, Archetype::Barrel) <= mission.max_barrels);
}

#[test]
fn fills_every_cap_on_an_open_level() {
    let mission = Mission {
        max_knights: 2,
        max_blarghs: 1,
        max_gopniks: 1,
        max_worms: 1,
        max_barrels: 2,
        ..Mission::default()
    };
    let level = Level::new(48, 48).expect("valid level");
    let mut world = World::with_level(level, mission, 4).expect("valid mission");
    let mut events = Vec::new();

    Bootstrap.populate(&mut world, &mut events);

    assert_eq!(query::count(&world, Archetype::Player), 1);
    assert_eq!(query::count(&world, Archetype::Knight), 2);
    assert_eq!(query::count(&world, Archetype::Blargh), 1);
    assert_eq!(query::count(&world, Archetype::Gopnik), 1);
    assert_eq!(query::count(&world, Archetype::Worm), 1);
    assert_eq!(query::count(&world, Archetype::WormSegment), 6);
    assert_eq!(query::count(&world, Archetype::Barrel), 2);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::SpawnFailed { .. })));
}
