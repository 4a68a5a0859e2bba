use feles_core::{CollisionMask, TileType, Vec2};
use feles_level::Level;
use feles_world::{actor::Actor, body::Body};
use proptest::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn body_at(x: f32, y: f32) -> Body {
    Body::new(Vec2::new(x, y), 6.0, CollisionMask::ENEMY)
}

#[test]
fn knight_profile_reaches_cruising_speed() {
    let level = Level::new(64, 64).expect("valid level");
    let mut actor = Actor::new(150.0, 200_000.0, 25_000.0);
    let mut body = body_at(40.0, 512.0);
    actor.set_desired_direction(Vec2::X);

    for _ in 0..60 {
        actor.update(&mut body, &level, DT);
    }

    let expected = 150.0 - 25_000.0 * DT * DT;
    assert!((actor.velocity().length() - expected).abs() < 1e-2);
    assert!(body.position.x > 40.0);
    assert_eq!(body.position.y, 512.0);
}

#[test]
fn wall_column_stops_sliding_actor() {
    let mut level = Level::new(16, 16).expect("valid level");
    for row in 0..16 {
        level.set_tile(8, row, TileType::Block, true);
    }
    let mut actor = Actor::new(120.0, 500_000.0, 50_000.0);
    let mut body = body_at(100.0, 100.0);
    actor.set_desired_direction(Vec2::new(1.0, 0.2));

    for _ in 0..240 {
        actor.update(&mut body, &level, DT);
    }

    assert!(body.position.x + body.radius <= 128.0 + 0.5);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_speed_never_exceeds_cap(
        angle in 0.0f32..std::f32::consts::TAU,
        initial in 0.0f32..400.0,
        max_speed in 1.0f32..300.0,
        ticks in 1usize..30,
    ) {
        let level = Level::new(64, 64).expect("valid level");
        let mut actor = Actor::new(max_speed, 200_000.0, 25_000.0);
        actor.set_velocity(Vec2::from_angle(angle) * initial);
        actor.set_desired_direction(Vec2::from_angle(angle + 1.0));
        let mut body = body_at(512.0, 512.0);

        for _ in 0..ticks {
            actor.update(&mut body, &level, DT);
            prop_assert!(actor.velocity().length() <= max_speed + 1e-3);
        }
    }

    #[test]
    fn prop_friction_never_reverses_motion(
        vx in -200.0f32..200.0,
        vy in -200.0f32..200.0,
        friction in 0.0f32..200_000.0,
    ) {
        let level = Level::new(64, 64).expect("valid level");
        let mut actor = Actor::new(300.0, 0.0, friction);
        let before = Vec2::new(vx, vy);
        actor.set_velocity(before);
        let mut body = body_at(512.0, 512.0);

        actor.update(&mut body, &level, DT);

        prop_assert!(actor.velocity().dot(before) >= 0.0);
        prop_assert!(actor.velocity().length() <= before.length() + 1e-3);
    }

    #[test]
    fn prop_movement_keeps_finite_positions(
        dx in -1.0e3f32..1.0e3,
        dy in -1.0e3f32..1.0e3,
    ) {
        let mut level = Level::new(16, 16).expect("valid level");
        level.set_tile(5, 5, TileType::Block, true);
        let actor = Actor::new(100.0, 0.0, 0.0);
        let mut body = body_at(88.0, 88.0);

        actor.apply_movement(&mut body, &level, Vec2::new(dx, dy));

        prop_assert!(body.position.is_finite());
    }
}
