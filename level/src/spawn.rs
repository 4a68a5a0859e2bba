//! Randomised searches for free ground.
//!
//! Every search performs a bounded number of random probes and returns `None`
//! when none succeeds, so callers always get a definite answer.

use feles_core::{GridCoord, ViewRect};
use rand::Rng;

use crate::{Level, Tile};

/// Probes attempted by each search before giving up.
pub const SPAWN_ATTEMPTS: usize = 1024;

impl Level {
    /// Random in-range tile whose surrounding `margin` cells hold nothing solid.
    pub fn find_empty_space<R: Rng + ?Sized>(&self, margin: i32, rng: &mut R) -> Option<&Tile> {
        (0..SPAWN_ATTEMPTS)
            .map(|_| self.random_coord(rng))
            .find(|&coord| self.is_clear(coord, margin))
            .map(|coord| self.tile(coord.column(), coord.row(), false))
    }

    /// Free tile whose box lies entirely outside the camera view.
    pub fn find_offscreen_spawn_point<R: Rng + ?Sized>(
        &self,
        view: &ViewRect,
        rng: &mut R,
    ) -> Option<&Tile> {
        (0..SPAWN_ATTEMPTS)
            .map(|_| self.random_coord(rng))
            .find(|&coord| {
                self.is_clear(coord, 1)
                    && !view.intersects(&self.tile(coord.column(), coord.row(), false).bounds())
            })
            .map(|coord| self.tile(coord.column(), coord.row(), false))
    }

    /// Free tile near the middle of the level.
    ///
    /// The probe window starts a couple of tiles wide and widens as attempts
    /// fail, up to the whole level.
    pub fn find_center_spawn_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Tile> {
        let center = GridCoord::new(self.columns / 2, self.rows / 2);
        (0..SPAWN_ATTEMPTS)
            .map(|attempt| {
                let widen = 2 + (attempt / 16) as i32;
                let reach_x = widen.min(self.columns / 2);
                let reach_y = widen.min(self.rows / 2);
                let column = center.column() + rng.gen_range(-reach_x..=reach_x);
                let row = center.row() + rng.gen_range(-reach_y..=reach_y);
                GridCoord::new(column.clamp(0, self.columns - 1), row.clamp(0, self.rows - 1))
            })
            .find(|&coord| self.is_clear(coord, 1))
            .map(|coord| self.tile(coord.column(), coord.row(), false))
    }

    /// Random solid tile whose four neighbours are solid as well.
    pub fn find_full_space<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Tile> {
        (0..SPAWN_ATTEMPTS)
            .map(|_| self.random_coord(rng))
            .find(|&coord| {
                [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)]
                    .into_iter()
                    .all(|(dx, dy)| {
                        self.tile(coord.column() + dx, coord.row() + dy, false)
                            .is_solid()
                    })
            })
            .map(|coord| self.tile(coord.column(), coord.row(), false))
    }

    fn random_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> GridCoord {
        GridCoord::new(rng.gen_range(0..self.columns), rng.gen_range(0..self.rows))
    }

    fn is_clear(&self, coord: GridCoord, margin: i32) -> bool {
        let margin = margin.max(0);
        (-margin..=margin).all(|dy| {
            (-margin..=margin)
                .all(|dx| !self.tile(coord.column() + dx, coord.row() + dy, false).is_solid())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feles_core::{TileType, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn solid_level(columns: u32, rows: u32) -> Level {
        let mut level = Level::new(columns, rows).expect("valid level");
        for row in 0..rows as i32 {
            for column in 0..columns as i32 {
                level.set_tile(column, row, TileType::Block, true);
            }
        }
        level
    }

    #[test]
    fn empty_space_respects_margin() {
        let mut level = solid_level(10, 10);
        for row in 3..6 {
            for column in 3..6 {
                level.set_tile(column, row, TileType::Empty, true);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let tile = level.find_empty_space(1, &mut rng).expect("pocket is free");
        assert_eq!(tile.coord(), GridCoord::new(4, 4));
    }

    #[test]
    fn full_level_has_no_space() {
        let level = solid_level(6, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        assert!(level.find_empty_space(0, &mut rng).is_none());
        assert!(level.find_center_spawn_point(&mut rng).is_none());
        assert!(level.find_full_space(&mut rng).is_some());
    }

    #[test]
    fn offscreen_points_avoid_the_view() {
        let level = Level::new(40, 40).expect("valid level");
        let view = ViewRect::from_corners(Vec2::ZERO, Vec2::new(320.0, 240.0));
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..32 {
            let tile = level
                .find_offscreen_spawn_point(&view, &mut rng)
                .expect("plenty of room");
            assert!(!view.intersects(&tile.bounds()));
        }
    }

    #[test]
    fn offscreen_search_fails_when_everything_is_visible() {
        let level = Level::new(4, 4).expect("valid level");
        let view = ViewRect::from_corners(Vec2::splat(-100.0), Vec2::splat(200.0));
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(level.find_offscreen_spawn_point(&view, &mut rng).is_none());
    }

    #[test]
    fn center_points_start_near_the_middle() {
        let level = Level::new(64, 64).expect("valid level");
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let tile = level.find_center_spawn_point(&mut rng).expect("open level");
        assert!(tile.coord().manhattan_distance(GridCoord::new(32, 32)) <= 4);
    }
}
