#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tile grid that forms the physical space of a Feles session.
//!
//! The [`Level`] owns every [`Tile`] for its whole lifetime. Tiles are never
//! destroyed individually; destruction resets their type to
//! [`TileType::Empty`]. All lookups tolerate out-of-range coordinates, which
//! degrade to open space, so callers never have to bounds-check before
//! querying.

use feles_core::{GridCoord, TileMask, TileType, Vec2, ViewRect, TILE_SIZE};
use thiserror::Error;

pub mod generate;
pub mod query;
pub mod spawn;

pub use query::{RaycastHit, SphereHit};

/// Largest supported number of tiles along either axis.
pub const MAX_DIMENSION: u32 = 4096;

/// Errors raised while allocating a level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// One of the requested dimensions was zero.
    #[error("level dimensions must be at least 1x1, got {columns}x{rows}")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// One of the requested dimensions exceeded [`MAX_DIMENSION`].
    #[error("level dimensions must not exceed {MAX_DIMENSION}, got {columns}x{rows}")]
    TooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Single cell of the level.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    kind: TileType,
    coord: GridCoord,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    center: Vec2,
    dirty: bool,
}

impl Tile {
    fn new(kind: TileType, coord: GridCoord) -> Self {
        let left = coord.column() as f32 * TILE_SIZE;
        let top = coord.row() as f32 * TILE_SIZE;
        Self {
            kind,
            coord,
            left,
            right: left + TILE_SIZE,
            top,
            bottom: top + TILE_SIZE,
            center: Vec2::new(left + TILE_SIZE * 0.5, top + TILE_SIZE * 0.5),
            dirty: false,
        }
    }

    /// Current contents of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileType {
        self.kind
    }

    /// Grid coordinate of the tile.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// World-space x coordinate of the left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// World-space x coordinate of the right edge.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.right
    }

    /// World-space y coordinate of the top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    /// World-space y coordinate of the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.bottom
    }

    /// World-space centre of the tile.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// World-space bounding box of the tile.
    #[must_use]
    pub fn bounds(&self) -> ViewRect {
        ViewRect::from_corners(
            Vec2::new(self.left, self.top),
            Vec2::new(self.right, self.bottom),
        )
    }

    /// Whether the tile blocks movement and sight.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    /// Whether the tile is one of the four slopes.
    #[must_use]
    pub const fn is_slope(&self) -> bool {
        self.kind.is(TileMask::SLOPE)
    }

    /// Whether the tile is part of a cave wall.
    #[must_use]
    pub const fn is_terrain(&self) -> bool {
        self.kind.is(TileMask::TERRAIN)
    }

    /// Fixed outward normal of slope tiles.
    #[must_use]
    pub fn slope_normal(&self) -> Option<Vec2> {
        self.kind.slope_normal()
    }

    /// Closest point of the tile's box to `point`.
    #[must_use]
    pub fn project(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left, self.right),
            point.y.clamp(self.top, self.bottom),
        )
    }

    /// Replaces the tile's contents and marks it for visual regeneration.
    pub fn set_kind(&mut self, kind: TileType) {
        self.kind = kind;
        self.dirty = true;
    }

    /// Whether the tile changed since dirty flags were last drained.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Half-open window of grid cells, iterated row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridArea {
    min: GridCoord,
    max: GridCoord,
}

impl GridArea {
    /// Creates an area spanning `min` inclusive to `max` exclusive.
    #[must_use]
    pub const fn new(min: GridCoord, max: GridCoord) -> Self {
        Self { min, max }
    }

    /// First cell of the window.
    #[must_use]
    pub const fn min(&self) -> GridCoord {
        self.min
    }

    /// One past the last cell of the window on both axes.
    #[must_use]
    pub const fn max(&self) -> GridCoord {
        self.max
    }

    /// Every cell of the window in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> {
        let (min, max) = (self.min, self.max);
        (min.row()..max.row()).flat_map(move |row| {
            (min.column()..max.column()).map(move |column| GridCoord::new(column, row))
        })
    }
}

/// Fixed-size tile grid stored row-major.
#[derive(Clone, Debug)]
pub struct Level {
    columns: i32,
    rows: i32,
    tiles: Vec<Tile>,
    void: Tile,
}

impl Level {
    /// Allocates an empty level with the provided dimensions in tiles.
    pub fn new(columns: u32, rows: u32) -> Result<Self, LevelError> {
        if columns == 0 || rows == 0 {
            return Err(LevelError::EmptyGrid { columns, rows });
        }
        if columns > MAX_DIMENSION || rows > MAX_DIMENSION {
            return Err(LevelError::TooLarge { columns, rows });
        }

        let (columns, rows) = (columns as i32, rows as i32);
        let tiles = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| GridCoord::new(column, row)))
            .map(|coord| Tile::new(TileType::Empty, coord))
            .collect();

        Ok(Self {
            columns,
            rows,
            tiles,
            void: Tile::new(TileType::Empty, GridCoord::new(-1, -1)),
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns as u32
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows as u32
    }

    /// Width of the level in world units.
    #[must_use]
    pub fn pixel_width(&self) -> f32 {
        self.columns as f32 * TILE_SIZE
    }

    /// Height of the level in world units.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    /// Size of the level in world units.
    #[must_use]
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.pixel_width(), self.pixel_height())
    }

    /// Whether the coordinate addresses a cell inside the level.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.column() >= 0
            && coord.row() >= 0
            && coord.column() < self.columns
            && coord.row() < self.rows
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        self.contains(GridCoord::new(column, row))
            .then(|| (row * self.columns + column) as usize)
    }

    /// Tile at the coordinate.
    ///
    /// With `clamp` the coordinate is clamped into the grid; without it,
    /// coordinates outside the grid yield a shared empty sentinel tile.
    #[must_use]
    pub fn tile(&self, column: i32, row: i32, clamp: bool) -> &Tile {
        let (column, row) = if clamp {
            (column.clamp(0, self.columns - 1), row.clamp(0, self.rows - 1))
        } else {
            (column, row)
        };
        self.index(column, row)
            .map_or(&self.void, |index| &self.tiles[index])
    }

    /// Mutable access to an in-range tile.
    pub fn tile_mut(&mut self, coord: GridCoord) -> Option<&mut Tile> {
        let index = self.index(coord.column(), coord.row())?;
        self.tiles.get_mut(index)
    }

    /// Changes the type of an in-range tile.
    ///
    /// Without `overwrite`, non-empty tiles are left untouched. Coordinates
    /// outside the grid are ignored.
    pub fn set_tile(&mut self, column: i32, row: i32, kind: TileType, overwrite: bool) {
        if let Some(tile) = self.tile_mut(GridCoord::new(column, row)) {
            if overwrite || tile.kind() == TileType::Empty {
                tile.set_kind(kind);
            }
        }
    }

    /// Empties a solid tile, returning what it contained.
    pub fn destroy_tile(&mut self, coord: GridCoord) -> Option<TileType> {
        let tile = self.tile_mut(coord)?;
        let previous = tile.kind();
        if !previous.is_solid() {
            return None;
        }
        tile.set_kind(TileType::Empty);
        Some(previous)
    }

    /// Grid coordinate of the cell containing the world position.
    #[must_use]
    pub fn grid_coord(&self, position: Vec2) -> GridCoord {
        GridCoord::new(
            (position.x / TILE_SIZE).floor() as i32,
            (position.y / TILE_SIZE).floor() as i32,
        )
    }

    /// Tile containing the world position, or the empty sentinel outside the grid.
    #[must_use]
    pub fn tile_at(&self, position: Vec2) -> &Tile {
        let coord = self.grid_coord(position);
        self.tile(coord.column(), coord.row(), false)
    }

    /// Every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Whether an in-range tile's four clamped neighbours are all solid.
    #[must_use]
    pub fn is_enclosed(&self, column: i32, row: i32) -> bool {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .all(|(dx, dy)| self.tile(column + dx, row + dy, true).is_solid())
    }

    /// Drains the dirty flags, returning the coordinates that changed.
    pub fn take_dirty(&mut self) -> Vec<GridCoord> {
        self.tiles
            .iter_mut()
            .filter(|tile| tile.dirty)
            .map(|tile| {
                tile.dirty = false;
                tile.coord
            })
            .collect()
    }

    /// Cells touched by a circle of `radius` swept from `start` to `end`.
    ///
    /// With `clamp` the window is restricted to the grid.
    #[must_use]
    pub fn grid_area_over_capsule(
        &self,
        start: Vec2,
        end: Vec2,
        radius: f32,
        clamp: bool,
    ) -> GridArea {
        let reach = Vec2::splat(radius.max(0.0));
        let low = self.grid_coord(start.min(end) - reach);
        let high = self.grid_coord(start.max(end) + reach);
        let (mut min_column, mut min_row) = (low.column(), low.row());
        let (mut max_column, mut max_row) = (
            high.column().saturating_add(1),
            high.row().saturating_add(1),
        );
        if clamp {
            min_column = min_column.clamp(0, self.columns);
            min_row = min_row.clamp(0, self.rows);
            max_column = max_column.clamp(0, self.columns);
            max_row = max_row.clamp(0, self.rows);
        }
        GridArea::new(
            GridCoord::new(min_column, min_row),
            GridCoord::new(max_column, max_row),
        )
    }
}
