use feles_core::{TileType, Vec2, TILE_SIZE};
use feles_level::{generate::generate, Level};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn assert_no_enclosed_blocks(level: &Level) {
    for row in 0..level.rows() as i32 {
        for column in 0..level.columns() as i32 {
            let enclosed = level.tile(column, row, false).kind() == TileType::Block
                && level.is_enclosed(column, row);
            assert!(!enclosed, "enclosed block at {column},{row}");
        }
    }
}

#[test]
fn sixty_four_square_levels_carry_runes_and_pylons() {
    for seed in 0..6 {
        let level = generate(64, 64, &mut ChaCha8Rng::seed_from_u64(seed)).expect("generated");
        let count = |kind| level.tiles().filter(|tile| tile.kind() == kind).count();
        assert!(count(TileType::Rune) > 0, "no runes for seed {seed}");
        assert!(count(TileType::Pylon) > 0, "no pylons for seed {seed}");
    }
}

#[test]
fn thirty_two_square_levels_have_no_enclosed_blocks() {
    for seed in 0..8 {
        let level = generate(32, 32, &mut ChaCha8Rng::seed_from_u64(seed)).expect("generated");
        assert_no_enclosed_blocks(&level);
    }
}

#[test]
fn generation_rejects_empty_dimensions() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert!(generate(0, 10, &mut rng).is_err());
}

#[test]
fn spawn_points_are_free_ground() {
    let level = generate(48, 48, &mut ChaCha8Rng::seed_from_u64(99)).expect("generated");
    let mut rng = ChaCha8Rng::seed_from_u64(100);

    let tile = level.find_center_spawn_point(&mut rng).expect("center is reachable");
    assert!(!tile.is_solid());
    let hit = level.sphere_intersects(tile.center(), 6.0);
    assert!(!hit.hit);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_empty_grid_never_intersects(
        x in -200.0f32..400.0,
        y in -200.0f32..400.0,
        radius in 0.0f32..64.0,
    ) {
        let level = Level::new(12, 12).expect("valid level");
        let hit = level.sphere_intersects(Vec2::new(x, y), radius);
        prop_assert!(!hit.hit);
        prop_assert_eq!(hit.normal, Vec2::ZERO);
    }

    #[test]
    fn prop_raycast_distance_bounded_by_range(
        x in 0.0f32..192.0,
        y in 0.0f32..192.0,
        angle in 0.0f32..std::f32::consts::TAU,
        range in 1.0f32..300.0,
        seed in any::<u64>(),
    ) {
        let level = generate(12, 12, &mut ChaCha8Rng::seed_from_u64(seed)).expect("generated");
        let direction = Vec2::new(angle.cos(), angle.sin());
        let hit = level.raycast(Vec2::new(x, y), direction, range);

        prop_assert!(hit.distance <= range + f32::EPSILON);
        if let Some(coord) = hit.tile {
            prop_assert!(level.tile(coord.column(), coord.row(), false).is_solid());
            let struck = Vec2::new(x, y) + direction * hit.distance;
            let tile = level.tile(coord.column(), coord.row(), false);
            prop_assert!(tile.project(struck).distance(struck) < TILE_SIZE * 0.01 + 1e-3);
        }
    }

    #[test]
    fn prop_generated_levels_settle(seed in any::<u64>()) {
        let level = generate(24, 24, &mut ChaCha8Rng::seed_from_u64(seed)).expect("generated");
        assert_no_enclosed_blocks(&level);
    }
}
