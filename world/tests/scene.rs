use std::{cell::RefCell, rc::Rc, time::Duration};

use feles_core::{
    Archetype, Command, EntityId, Event, GridCoord, MobState, Mission, Placement, Signal,
    TileType, Vec2,
};
use feles_level::Level;
use feles_world::{advance_simulation, apply, logging, query, spawn, SignalObserver, World};

const DT: Duration = Duration::from_micros(16_667);

fn open_level() -> Level {
    Level::new(32, 32).expect("valid level")
}

fn world_on(level: Level, mission: Mission) -> World {
    logging::init();
    World::with_level(level, mission, 7).expect("valid mission")
}

fn run(world: &mut World, ticks: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        advance_simulation(world, DT, &mut events);
    }
    events
}

#[test]
fn knight_in_plain_sight_starts_hunting() {
    let mut world = world_on(open_level(), Mission::default());
    let _ = spawn::player(&mut world, Vec2::new(100.0, 100.0));
    let knight = spawn::knight(&mut world, Vec2::new(180.0, 100.0));

    let _ = run(&mut world, 1);

    let status = query::mob_status(&world, knight).expect("knight is a mob");
    assert!(status.sees_target);
    assert!(status.hunting);
    assert_eq!(status.state, MobState::Alerted);
    assert_eq!(status.last_seen_target, Vec2::new(100.0, 100.0));
}

#[test]
fn hunting_never_lapses() {
    let mut world = world_on(open_level(), Mission::default());
    let _ = spawn::player(&mut world, Vec2::new(100.0, 100.0));
    let knight = spawn::knight(&mut world, Vec2::new(180.0, 100.0));

    for _ in 0..180 {
        let _ = run(&mut world, 1);
        let Some(status) = query::mob_status(&world, knight) else {
            break;
        };
        assert!(status.hunting);
    }
}

#[test]
fn walls_hide_the_player() {
    let mut level = open_level();
    for row in 0..32 {
        level.set_tile(8, row, TileType::Block, true);
    }
    let mut world = world_on(level, Mission::default());
    let _ = spawn::player(&mut world, Vec2::new(100.0, 100.0));
    let knight = spawn::knight(&mut world, Vec2::new(200.0, 100.0));

    let _ = run(&mut world, 30);

    let status = query::mob_status(&world, knight).expect("knight is a mob");
    assert!(!status.sees_target);
    assert!(!status.hunting);
    assert_eq!(status.state, MobState::Idle);
}

#[test]
fn bouncy_shot_reflects_off_block() {
    let mut level = open_level();
    level.set_tile(10, 10, TileType::Block, true);
    let mut world = world_on(level, Mission::default());
    let shot = spawn::shot(&mut world, Vec2::new(150.0, 168.0), Vec2::X, 240.0, false, 1);

    let _ = run(&mut world, 5);

    let status = query::shot_status(&world, shot).expect("shot survives the bounce");
    assert!(status.velocity.x < 0.0);
    assert_eq!(status.bounces, 0);
    assert!(!status.enemy);
}

#[test]
fn plain_shot_fizzles_on_block() {
    let mut level = open_level();
    level.set_tile(10, 10, TileType::Block, true);
    let mut world = world_on(level, Mission::default());
    let shot = spawn::shot(&mut world, Vec2::new(150.0, 168.0), Vec2::X, 240.0, false, 0);

    let events = run(&mut world, 3);

    assert!(query::entity(&world, shot).is_none());
    assert!(events.contains(&Event::EntityRemoved {
        entity: shot,
        archetype: Archetype::Shot,
    }));
    assert_eq!(query::count(&world, Archetype::Poof), 1);
}

#[test]
fn explosion_grows_into_nearby_blocks() {
    let mut level = open_level();
    level.set_tile(10, 10, TileType::Block, true);
    let mut world = world_on(level, Mission::default());
    let _ = spawn::explosion(&mut world, Vec2::new(152.0, 168.0));

    let _ = run(&mut world, 3);
    assert_eq!(query::level(&world).tile(10, 10, false).kind(), TileType::Block);

    let events = run(&mut world, 27);
    assert_eq!(query::level(&world).tile(10, 10, false).kind(), TileType::Empty);
    let changed = events.iter().any(|event| match event {
        Event::TilesChanged { tiles } => tiles.contains(&GridCoord::new(10, 10)),
        _ => false,
    });
    assert!(changed);
}

#[test]
fn explosion_detonates_barrel() {
    let mut world = world_on(open_level(), Mission::default());
    let barrel = spawn::barrel(&mut world, Vec2::new(100.0, 100.0));
    let _ = spawn::explosion(&mut world, Vec2::new(100.0, 100.0));

    let _ = run(&mut world, 1);
    assert_eq!(query::health(&world, barrel), Some(20));

    let _ = run(&mut world, 1);
    assert!(query::entity(&world, barrel).is_none());
    assert_eq!(query::count(&world, Archetype::Explosion), 2);
}

#[test]
fn player_shot_wounds_knight() {
    let mut world = world_on(open_level(), Mission::default());
    let knight = spawn::knight(&mut world, Vec2::new(100.0, 100.0));
    let _ = spawn::shot(&mut world, Vec2::new(100.0, 100.0), Vec2::X, 240.0, false, 0);

    let _ = run(&mut world, 1);

    assert_eq!(query::health(&world, knight), Some(2));
    assert_eq!(query::count(&world, Archetype::Shot), 0);
    let status = query::mob_status(&world, knight).expect("knight is a mob");
    assert_eq!(status.state, MobState::Hurt);
}

#[test]
fn collecting_quota_ascends_and_summons_cat() {
    let mission = Mission {
        love_quota: 2,
        ..Mission::default()
    };
    let mut world = world_on(open_level(), mission);
    let _ = spawn::player(&mut world, Vec2::new(100.0, 100.0));
    let _ = spawn::love(&mut world, Vec2::new(100.0, 100.0), 2);

    let events = run(&mut world, 1);

    assert_eq!(query::love(&world), 2);
    assert_eq!(query::signal_count(&world, Signal::PlayerAscended), 1);
    assert_eq!(query::count(&world, Archetype::Cat), 1);
    assert!(query::count(&world, Archetype::Star) > 0);
    assert!(events.contains(&Event::LoveChanged { love: 2, quota: 2 }));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::SignalRaised {
            signal: Signal::PlayerAscended,
            source: Some(_),
        }
    )));
}

#[test]
fn solid_level_reports_failed_spawns() {
    let mut level = Level::new(16, 16).expect("valid level");
    for row in 0..16 {
        for column in 0..16 {
            level.set_tile(column, row, TileType::Block, true);
        }
    }
    let mut world = world_on(level, Mission::default());
    let mut events = Vec::new();

    for placement in [Placement::Offscreen, Placement::Center] {
        apply(
            &mut world,
            Command::Spawn {
                archetype: Archetype::Knight,
                placement,
            },
            &mut events,
        );
        assert!(events.contains(&Event::SpawnFailed {
            archetype: Archetype::Knight,
            placement,
        }));
    }
    assert_eq!(query::count(&world, Archetype::Knight), 0);
}

#[test]
fn projectiles_cannot_be_spawned_by_command() {
    let mut world = world_on(open_level(), Mission::default());
    let mut events = Vec::new();
    let placement = Placement::At(Vec2::new(64.0, 64.0));

    apply(
        &mut world,
        Command::Spawn {
            archetype: Archetype::Shot,
            placement,
        },
        &mut events,
    );

    assert!(events.contains(&Event::SpawnFailed {
        archetype: Archetype::Shot,
        placement,
    }));
}

#[test]
fn oversized_ticks_are_skipped() {
    let mut world = world_on(open_level(), Mission::default());
    let mut events = Vec::new();
    let dt = Duration::from_millis(300);

    advance_simulation(&mut world, dt, &mut events);

    assert!(events.contains(&Event::TickSkipped { dt }));
    assert!(!events.contains(&Event::TimeAdvanced { dt }));
    assert_eq!(query::tick_count(&world), 0);
    assert_eq!(query::elapsed(&world), Duration::ZERO);
}

#[derive(Clone, Default)]
struct Recorder {
    seen: Rc<RefCell<Vec<(Signal, Option<EntityId>)>>>,
}

impl SignalObserver for Recorder {
    fn handle_signal(&mut self, signal: Signal, source: Option<EntityId>) {
        self.seen.borrow_mut().push((signal, source));
    }
}

#[test]
fn observers_hear_session_start() {
    let mut world = world_on(open_level(), Mission::default());
    let recorder = Recorder::default();
    world.listen(Signal::SessionStarted, Box::new(recorder.clone()));

    let events = run(&mut world, 2);

    assert_eq!(*recorder.seen.borrow(), vec![(Signal::SessionStarted, None)]);
    assert!(events.contains(&Event::SignalRaised {
        signal: Signal::SessionStarted,
        source: None,
    }));
}

#[test]
fn snapshots_are_listed_back_to_front() {
    let mut world = world_on(open_level(), Mission::default());
    let _ = spawn::explosion(&mut world, Vec2::new(300.0, 300.0));
    let _ = spawn::player(&mut world, Vec2::new(100.0, 100.0));
    let _ = spawn::knight(&mut world, Vec2::new(200.0, 200.0));
    let _ = spawn::barrel(&mut world, Vec2::new(50.0, 200.0));

    let priorities: Vec<_> = query::entities(&world)
        .iter()
        .map(|snapshot| snapshot.draw_priority)
        .collect();

    assert_eq!(priorities, vec![-1, 0, 10, 20]);
}

#[test]
fn camera_follows_player_inside_level() {
    let mut world = world_on(open_level(), Mission::default());
    let _ = spawn::player(&mut world, Vec2::new(40.0, 40.0));

    let _ = run(&mut world, 1);

    let camera = query::camera(&world);
    assert_eq!(camera.min(), Vec2::ZERO);
    assert_eq!(camera.max(), Vec2::new(320.0, 240.0));
}

#[test]
fn worm_segments_follow_the_head() {
    let mut world = world_on(open_level(), Mission::default());
    let head = spawn::worm(&mut world, Vec2::new(256.0, 256.0));
    assert_eq!(query::count(&world, Archetype::WormSegment), 6);

    let _ = run(&mut world, 60);

    let trail = query::worm_trail(&world, head).expect("worm has a trail");
    assert!(!trail.is_empty());
    assert!(trail.len() <= 6);
}
