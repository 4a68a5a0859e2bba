//! Procedural cave generation.
//!
//! Generation runs in passes: rock blobs, rune veins seeded inside them, edge
//! smoothing, pylons, cave connection and a final settle. All randomness comes
//! from the injected generator, so a seeded generator always yields the same map.

use std::collections::VecDeque;

use feles_core::{GridCoord, TileMask, TileType, Vec2};
use rand::Rng;
use tracing::{debug, warn};

use crate::{Level, LevelError, Tile};

/// Amount the spread chance of a blob drops with every step away from its seed.
pub const SPREAD_DELTA: f32 = 0.25;

/// Steps a rune trail may take before it stops.
pub const RUNE_LIFE: u32 = 4;

/// Chance that a rune trail branches at a right angle on each step.
pub const RUNE_BRANCH_CHANCE: f32 = 0.2;

/// Grid directions used by rune trails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    East,
    North,
    West,
    South,
}

impl Heading {
    const ALL: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

    const fn delta(self) -> (i32, i32) {
        match self {
            Heading::East => (1, 0),
            Heading::North => (0, -1),
            Heading::West => (-1, 0),
            Heading::South => (0, 1),
        }
    }

    fn turn<R: Rng + ?Sized>(self, rng: &mut R) -> Heading {
        let left = rng.gen_bool(0.5);
        match (self, left) {
            (Heading::East | Heading::West, true) => Heading::North,
            (Heading::East | Heading::West, false) => Heading::South,
            (Heading::North | Heading::South, true) => Heading::West,
            (Heading::North | Heading::South, false) => Heading::East,
        }
    }
}

/// Generates a playable cave level.
pub fn generate<R: Rng + ?Sized>(
    columns: u32,
    rows: u32,
    rng: &mut R,
) -> Result<Level, LevelError> {
    let mut level = Level::new(columns, rows)?;
    let area = columns as usize * rows as usize;

    for _ in 0..area / 64 {
        let seed = GridCoord::new(rng.gen_range(0..level.columns), rng.gen_range(0..level.rows));
        spread_blob(&mut level, seed, 1.0, rng);
    }

    for cluster in 0..area / 1024 {
        let Some(origin) = level.find_full_space(rng).map(Tile::coord) else {
            warn!(cluster, columns, rows, "no solid pocket left for a rune cluster");
            continue;
        };
        for heading in Heading::ALL {
            grow_rune(&mut level, origin, heading, RUNE_LIFE, rng);
        }
    }

    smooth_edges(&mut level);

    for _ in 0..area / 48 {
        place_pylon(&mut level, rng);
    }

    connect_caves(&mut level, rng);
    settle(&mut level);
    let _ = level.take_dirty();

    debug!(
        columns,
        rows,
        solid = level.tiles().filter(|tile| tile.is_solid()).count(),
        runes = count_of(&level, TileType::Rune),
        pylons = count_of(&level, TileType::Pylon),
        "generated level"
    );
    Ok(level)
}

fn count_of(level: &Level, kind: TileType) -> usize {
    level.tiles().filter(|tile| tile.kind() == kind).count()
}

fn spread_blob<R: Rng + ?Sized>(level: &mut Level, coord: GridCoord, chance: f32, rng: &mut R) {
    level.set_tile(coord.column(), coord.row(), TileType::Block, true);
    if chance <= 0.0 {
        return;
    }
    for heading in [Heading::West, Heading::East, Heading::North, Heading::South] {
        if rng.gen::<f32>() < chance {
            let (dx, dy) = heading.delta();
            spread_blob(level, coord.offset(dx, dy), chance - SPREAD_DELTA, rng);
        }
    }
}

/// Carves enclosed rock, and shapes exposed rock into tentacles and slopes.
fn smooth_edges(level: &mut Level) {
    for row in 0..level.rows {
        for column in 0..level.columns {
            let kind = level.tile(column, row, false).kind();
            let left = level.tile(column - 1, row, true).kind();
            let right = level.tile(column + 1, row, true).kind();
            let up = level.tile(column, row - 1, true).kind();
            let down = level.tile(column, row + 1, true).kind();
            let (l, r, u, d) = (
                left.is(TileMask::TERRAIN),
                right.is(TileMask::TERRAIN),
                up.is(TileMask::TERRAIN),
                down.is(TileMask::TERRAIN),
            );

            if kind == TileType::Block {
                if level.is_enclosed(column, row) {
                    level.set_tile(column, row, TileType::Empty, true);
                    continue;
                }
                let shaped = if d && !u && !r && !l && down == TileType::Block {
                    Some(TileType::TentacleUp)
                } else if u && !d && !r && !l && up == TileType::Block {
                    Some(TileType::TentacleDown)
                } else if l && !r && !u && !d && left == TileType::Block {
                    Some(TileType::TentacleRight)
                } else if r && !l && !u && !d && right == TileType::Block {
                    Some(TileType::TentacleLeft)
                } else if l && d && !u && !r {
                    Some(TileType::Slope45)
                } else if r && d && !l && !u {
                    Some(TileType::Slope135)
                } else if r && u && !l && !d {
                    Some(TileType::Slope225)
                } else if l && u && !r && !d {
                    Some(TileType::Slope315)
                } else {
                    None
                };
                if let Some(shaped) = shaped {
                    level.set_tile(column, row, shaped, true);
                }
            } else if kind.is(TileMask::TENTACLE) && !(l || r || u || d) {
                level.set_tile(column, row, TileType::Empty, true);
            }
        }
    }
}

fn grow_rune<R: Rng + ?Sized>(
    level: &mut Level,
    coord: GridCoord,
    heading: Heading,
    life: u32,
    rng: &mut R,
) {
    level.set_tile(coord.column(), coord.row(), TileType::Rune, true);
    if life == 0 {
        return;
    }

    let (dx, dy) = heading.delta();
    let next = coord.offset(dx, dy);
    let rock = level.tile(next.column(), next.row(), false).kind() == TileType::Block;
    if level.contains(next) && rock {
        grow_rune(level, next, heading, life - 1, rng);
    }
    if rng.gen::<f32>() < RUNE_BRANCH_CHANCE {
        let branch = heading.turn(rng);
        grow_rune(level, coord, branch, life - 1, rng);
    }
}

fn place_pylon<R: Rng + ?Sized>(level: &mut Level, rng: &mut R) {
    let Some(coord) = level.find_empty_space(1, rng).map(Tile::coord) else {
        return;
    };
    let crowded = Heading::ALL.into_iter().any(|heading| {
        let (dx, dy) = heading.delta();
        level.tile(coord.column() + dx, coord.row() + dy, true).kind() == TileType::Pylon
    });
    if !crowded {
        level.set_tile(coord.column(), coord.row(), TileType::Pylon, true);
    }
}

/// Connected body of open tiles.
struct Space {
    tiles: usize,
    center: Vec2,
    frontier: Vec<GridCoord>,
}

fn find_spaces(level: &Level) -> Vec<Space> {
    let mut visited = vec![false; level.tiles.len()];
    let mut spaces = Vec::new();

    for start in level.tiles().map(Tile::coord) {
        let index = (start.row() * level.columns + start.column()) as usize;
        if visited[index] || level.tile(start.column(), start.row(), false).is_solid() {
            continue;
        }

        visited[index] = true;
        let mut queue = VecDeque::from([start]);
        let mut tiles = 0;
        let mut sum = Vec2::ZERO;
        let mut frontier = Vec::new();
        while let Some(coord) = queue.pop_front() {
            tiles += 1;
            sum += level.tile(coord.column(), coord.row(), false).center();
            let mut on_edge = false;
            for heading in Heading::ALL {
                let (dx, dy) = heading.delta();
                let next = coord.offset(dx, dy);
                if !level.contains(next) {
                    continue;
                }
                if level.tile(next.column(), next.row(), false).is_solid() {
                    on_edge = true;
                    continue;
                }
                let next_index = (next.row() * level.columns + next.column()) as usize;
                if !visited[next_index] {
                    visited[next_index] = true;
                    queue.push_back(next);
                }
            }
            if on_edge {
                frontier.push(coord);
            }
        }

        spaces.push(Space {
            tiles,
            center: sum / tiles as f32,
            frontier,
        });
    }
    spaces
}

/// Digs tunnels from every isolated pocket of open space to the largest one.
fn connect_caves<R: Rng + ?Sized>(level: &mut Level, rng: &mut R) {
    let spaces = find_spaces(level);
    let Some(main) = spaces
        .iter()
        .enumerate()
        .max_by_key(|(_, space)| space.tiles)
        .map(|(index, _)| index)
    else {
        return;
    };

    let center_of =
        |level: &Level, coord: GridCoord| level.tile(coord.column(), coord.row(), false).center();
    for (index, space) in spaces.iter().enumerate() {
        if index == main {
            continue;
        }
        let view: &Level = level;
        let start = space.frontier.iter().copied().max_by(|a, b| {
            center_of(view, *a)
                .distance_squared(space.center)
                .total_cmp(&center_of(view, *b).distance_squared(space.center))
        });
        let end = spaces[main].frontier.iter().copied().min_by(|a, b| {
            center_of(view, *a)
                .distance_squared(space.center)
                .total_cmp(&center_of(view, *b).distance_squared(space.center))
        });
        if let (Some(start), Some(end)) = (start, end) {
            dig_tunnel(level, start, end, rng);
        }
    }
}

fn dig_tunnel<R: Rng + ?Sized>(level: &mut Level, start: GridCoord, end: GridCoord, rng: &mut R) {
    let step_x = (end.column() - start.column()).signum();
    let step_y = (end.row() - start.row()).signum();
    let mut remaining_x = (end.column() - start.column()).abs();
    let mut remaining_y = (end.row() - start.row()).abs();
    let mut current = start;

    while current != end {
        level.set_tile(current.column(), current.row(), TileType::Empty, true);
        let vertical = if remaining_x > 0 && remaining_y > 0 {
            rng.gen_bool(0.5)
        } else {
            remaining_y > 0
        };

        if vertical {
            current = current.offset(0, step_y);
            remaining_y -= 1;
            if rng.gen::<f32>() < 0.25 {
                let jitter = rng.gen_range(-1..=1);
                level.set_tile(current.column() + jitter, current.row(), TileType::Empty, true);
            }
        } else {
            current = current.offset(step_x, 0);
            remaining_x -= 1;
            if rng.gen::<f32>() < 0.25 {
                let jitter = rng.gen_range(-1..=1);
                level.set_tile(current.column(), current.row() + jitter, TileType::Empty, true);
            }
        }
    }
}

/// Clears any rock left fully enclosed by the later passes.
fn settle(level: &mut Level) {
    for row in 0..level.rows {
        for column in 0..level.columns {
            let rock = level.tile(column, row, false).kind() == TileType::Block;
            if rock && level.is_enclosed(column, row) {
                level.set_tile(column, row, TileType::Empty, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn layout(level: &Level) -> Vec<TileType> {
        level.tiles().map(Tile::kind).collect()
    }

    #[test]
    fn same_seed_same_level() {
        let a = generate(32, 32, &mut ChaCha8Rng::seed_from_u64(42)).expect("generated");
        let b = generate(32, 32, &mut ChaCha8Rng::seed_from_u64(42)).expect("generated");
        assert_eq!(layout(&a), layout(&b));
    }

    #[test]
    fn generated_level_has_no_enclosed_blocks() {
        let level = generate(32, 32, &mut ChaCha8Rng::seed_from_u64(1)).expect("generated");
        for row in 0..32 {
            for column in 0..32 {
                let tile = level.tile(column, row, false);
                assert!(
                    !(tile.kind() == TileType::Block && level.is_enclosed(column, row)),
                    "enclosed block at {column},{row}"
                );
            }
        }
    }

    #[test]
    fn generated_level_has_rock_and_room() {
        let level = generate(48, 48, &mut ChaCha8Rng::seed_from_u64(8)).expect("generated");
        let solid = level.tiles().filter(|tile| tile.is_solid()).count();
        assert!(solid > 0);
        assert!(solid < 48 * 48);
        assert!(level.tiles().all(|tile| !tile.is_dirty()));
    }

    #[test]
    fn generated_caves_are_connected() {
        let level = generate(40, 40, &mut ChaCha8Rng::seed_from_u64(17)).expect("generated");
        let spaces = find_spaces(&level);
        let largest = spaces.iter().map(|space| space.tiles).max().unwrap_or(0);
        let open = level.tiles().filter(|tile| !tile.is_solid()).count();
        assert!(largest * 10 >= open * 9, "largest {largest} of {open}");
    }

    #[test]
    fn settle_keeps_buried_runes() {
        let mut level = Level::new(5, 5).expect("valid level");
        for row in 1..4 {
            for column in 1..4 {
                level.set_tile(column, row, TileType::Block, true);
            }
        }
        level.set_tile(2, 2, TileType::Rune, true);

        smooth_edges(&mut level);
        settle(&mut level);

        assert_eq!(level.tile(2, 2, false).kind(), TileType::Rune);
    }

    #[test]
    fn smoothing_turns_spikes_into_tentacles() {
        let mut level = Level::new(5, 5).expect("valid level");
        level.set_tile(2, 2, TileType::Block, true);
        level.set_tile(2, 3, TileType::Block, true);
        level.set_tile(2, 4, TileType::Block, true);

        smooth_edges(&mut level);

        assert_eq!(level.tile(2, 2, false).kind(), TileType::TentacleUp);
    }

    #[test]
    fn smoothing_turns_corners_into_slopes() {
        let mut level = Level::new(5, 5).expect("valid level");
        for (column, row) in [(1, 2), (2, 2), (2, 3), (1, 3)] {
            level.set_tile(column, row, TileType::Block, true);
        }

        smooth_edges(&mut level);

        assert_eq!(level.tile(2, 2, false).kind(), TileType::Slope45);
    }

    #[test]
    fn tunnels_reach_their_end() {
        let mut level = Level::new(10, 10).expect("valid level");
        for row in 0..10 {
            for column in 0..10 {
                level.set_tile(column, row, TileType::Block, true);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        dig_tunnel(&mut level, GridCoord::new(1, 1), GridCoord::new(7, 6), &mut rng);

        assert!(!level.tile(1, 1, false).is_solid());
        let open = level.tiles().filter(|tile| !tile.is_solid()).count();
        assert!(open >= 11);
    }
}
