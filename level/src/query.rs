//! Spatial queries answered by the tile grid.
//!
//! Every query tolerates degenerate input: zero directions, non-finite
//! positions and out-of-range cells all degrade to "nothing solid here".

use feles_core::{GridCoord, Vec2, TILE_SIZE};

use crate::{Level, Tile};

/// Positions farther than this from the origin are never inside a level.
const WORLD_LIMIT: f32 = 1.0e6;

/// Outcome of [`Level::raycast`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// Whether a solid tile was struck within range.
    pub hit: bool,
    /// Distance to the struck tile's boundary, or the requested range on a miss.
    pub distance: f32,
    /// Coordinate of the struck tile.
    pub tile: Option<GridCoord>,
}

impl RaycastHit {
    fn miss(max_distance: f32) -> Self {
        Self {
            hit: false,
            distance: max_distance,
            tile: None,
        }
    }
}

/// Outcome of [`Level::sphere_intersects`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereHit {
    /// Whether any solid tile overlaps the circle.
    pub hit: bool,
    /// Unit vector pointing out of the overlapped tiles, zero without a hit.
    pub normal: Vec2,
    /// Last overlapping tile visited.
    pub tile: Option<GridCoord>,
}

impl Level {
    /// Casts a ray through the grid and reports the first solid tile it enters.
    ///
    /// The ray walks cell boundaries exactly, so thin diagonal gaps are never
    /// skipped. Cells outside the grid count as open. A ray that starts inside
    /// a solid tile hits it at distance zero.
    #[must_use]
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> RaycastHit {
        let miss = RaycastHit::miss(max_distance);
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO
            || !origin.is_finite()
            || origin.abs().max_element() > WORLD_LIMIT
            || max_distance.is_nan()
            || max_distance < 0.0
        {
            return miss;
        }

        let reach = max_distance.min(self.farthest_corner(origin) + TILE_SIZE);
        let mut cell = self.grid_coord(origin);
        let (step_x, mut boundary_x, delta_x) = axis_walk(origin.x, direction.x, cell.column());
        let (step_y, mut boundary_y, delta_y) = axis_walk(origin.y, direction.y, cell.row());
        let mut distance = 0.0;

        loop {
            if self.tile(cell.column(), cell.row(), false).is_solid() {
                return RaycastHit {
                    hit: true,
                    distance,
                    tile: Some(cell),
                };
            }
            if boundary_x < boundary_y {
                distance = boundary_x;
                boundary_x += delta_x;
                cell = cell.offset(step_x, 0);
            } else {
                distance = boundary_y;
                boundary_y += delta_y;
                cell = cell.offset(0, step_y);
            }
            if distance > reach {
                return miss;
            }
        }
    }

    /// Tests a circle against the solid tiles it overlaps.
    ///
    /// Each overlapping tile contributes its push-out direction weighted by
    /// penetration depth; slopes contribute their fixed outward normal. The
    /// reported normal is the normalised sum.
    #[must_use]
    pub fn sphere_intersects(&self, position: Vec2, radius: f32) -> SphereHit {
        let mut result = SphereHit {
            hit: false,
            normal: Vec2::ZERO,
            tile: None,
        };
        if !position.is_finite() || radius <= 0.0 {
            return result;
        }

        let mut correction = Vec2::ZERO;
        let area = self.grid_area_over_capsule(position, position, radius, true);
        for coord in area.cells() {
            let tile = self.tile(coord.column(), coord.row(), false);
            if !tile.is_solid() {
                continue;
            }
            let offset = position - tile.project(position);
            let distance = offset.length();
            let penetration = radius - distance;
            if penetration <= 0.0 {
                continue;
            }

            let away = match tile.slope_normal() {
                Some(normal) => normal,
                None if distance > f32::EPSILON => offset / distance,
                None => (position - tile.center()).normalize_or_zero(),
            };
            correction += away * penetration;
            result.hit = true;
            result.tile = Some(coord);
        }

        result.normal = correction.normalize_or_zero();
        result
    }

    /// Solid tiles whose centres lie strictly inside the circle.
    #[must_use]
    pub fn tiles_within_radius(&self, position: Vec2, radius: f32) -> Vec<&Tile> {
        if !position.is_finite() || radius <= 0.0 {
            return Vec::new();
        }
        self.grid_area_over_capsule(position, position, radius, true)
            .cells()
            .map(|coord| self.tile(coord.column(), coord.row(), false))
            .filter(|tile| tile.is_solid() && tile.center().distance(position) < radius)
            .collect()
    }

    fn farthest_corner(&self, origin: Vec2) -> f32 {
        let size = self.pixel_size();
        [
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            Vec2::new(0.0, size.y),
            size,
        ]
        .into_iter()
        .map(|corner| corner.distance(origin))
        .fold(0.0, f32::max)
    }
}

/// Step direction, distance to the first boundary and distance between
/// boundaries along one axis of a grid walk.
fn axis_walk(origin: f32, direction: f32, cell: i32) -> (i32, f32, f32) {
    if direction > 0.0 {
        let boundary = (cell + 1) as f32 * TILE_SIZE;
        (1, (boundary - origin) / direction, TILE_SIZE / direction)
    } else if direction < 0.0 {
        let boundary = cell as f32 * TILE_SIZE;
        (-1, (origin - boundary) / -direction, TILE_SIZE / -direction)
    } else {
        (0, f32::INFINITY, f32::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feles_core::TileType;

    fn level_with(blocks: &[(i32, i32, TileType)]) -> Level {
        let mut level = Level::new(8, 8).expect("valid level");
        for &(column, row, kind) in blocks {
            level.set_tile(column, row, kind, true);
        }
        level
    }

    #[test]
    fn raycast_from_beside_a_wall_hits_immediately() {
        let level = level_with(&[(4, 2, TileType::Block)]);
        let origin = Vec2::new(4.0 * TILE_SIZE - 0.001, 2.5 * TILE_SIZE);

        let hit = level.raycast(origin, Vec2::X, 100.0);

        assert!(hit.hit);
        assert!(hit.distance < 0.01, "distance {}", hit.distance);
        assert_eq!(hit.tile, Some(GridCoord::new(4, 2)));
    }

    #[test]
    fn raycast_reports_distance_to_boundary() {
        let level = level_with(&[(5, 1, TileType::Block)]);
        let hit = level.raycast(Vec2::new(8.0, 24.0), Vec2::new(3.0, 0.0), 200.0);

        assert!(hit.hit);
        assert!((hit.distance - 72.0).abs() < 1e-3);
    }

    #[test]
    fn raycast_miss_reports_range() {
        let level = level_with(&[(5, 1, TileType::Block)]);
        let hit = level.raycast(Vec2::new(8.0, 24.0), Vec2::X, 40.0);

        assert!(!hit.hit);
        assert!((hit.distance - 40.0).abs() < f32::EPSILON);
        assert!(hit.tile.is_none());
    }

    #[test]
    fn raycast_leaving_the_map_terminates() {
        let level = level_with(&[]);
        let hit = level.raycast(Vec2::new(8.0, 8.0), Vec2::new(-1.0, -0.3), f32::INFINITY);
        assert!(!hit.hit);
    }

    #[test]
    fn raycast_with_zero_direction_misses() {
        let level = level_with(&[(0, 0, TileType::Block)]);
        let hit = level.raycast(Vec2::new(24.0, 8.0), Vec2::ZERO, 50.0);
        assert!(!hit.hit);
    }

    #[test]
    fn raycast_starting_inside_solid_hits_at_zero() {
        let level = level_with(&[(1, 1, TileType::Pylon)]);
        let hit = level.raycast(Vec2::new(24.0, 24.0), Vec2::Y, 50.0);
        assert!(hit.hit);
        assert!(hit.distance.abs() < f32::EPSILON);
    }

    #[test]
    fn raycast_diagonal_does_not_slip_between_corners() {
        let level = level_with(&[(2, 1, TileType::Block), (1, 2, TileType::Block)]);
        let hit = level.raycast(Vec2::new(24.0, 24.0), Vec2::new(1.0, 1.0), 100.0);
        assert!(hit.hit);
    }

    #[test]
    fn sphere_pushes_away_from_block_face() {
        let level = level_with(&[(3, 3, TileType::Block)]);
        let hit = level.sphere_intersects(Vec2::new(44.0, 56.0), 6.0);

        assert!(hit.hit);
        assert!((hit.normal - Vec2::new(-1.0, 0.0)).length() < 1e-5);
        assert_eq!(hit.tile, Some(GridCoord::new(3, 3)));
    }

    #[test]
    fn sphere_uses_slope_normal() {
        let level = level_with(&[(3, 3, TileType::Slope45)]);
        let hit = level.sphere_intersects(Vec2::new(56.0, 46.0), 4.0);

        assert!(hit.hit);
        let expected = TileType::Slope45.slope_normal().expect("slope normal");
        assert!((hit.normal - expected).length() < 1e-5);
    }

    #[test]
    fn sphere_touching_edge_does_not_hit() {
        let level = level_with(&[(3, 3, TileType::Block)]);
        let hit = level.sphere_intersects(Vec2::new(42.0, 56.0), 6.0);
        assert!(!hit.hit);
        assert_eq!(hit.normal, Vec2::ZERO);
    }

    #[test]
    fn tiles_within_radius_filters_by_centre() {
        let level = level_with(&[
            (2, 2, TileType::Block),
            (3, 2, TileType::Rune),
            (5, 5, TileType::Block),
        ]);
        let center = level.tile(2, 2, false).center();

        let near: Vec<GridCoord> = level
            .tiles_within_radius(center, 24.0)
            .into_iter()
            .map(Tile::coord)
            .collect();

        assert_eq!(near, vec![GridCoord::new(2, 2), GridCoord::new(3, 2)]);
        assert!(level.tiles_within_radius(center, 0.0).is_empty());
    }
}
