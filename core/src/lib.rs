#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Feles simulation.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values through an
//! [`EventSink`]. Systems consume event streams, read immutable snapshots, and
//! respond exclusively with new command batches.

use std::{
    ops::{BitOr, BitOrAssign},
    time::Duration,
};

use serde::{Deserialize, Serialize};

pub mod mission;
pub mod vector;

pub use glam::Vec2;
pub use mission::{ConfigError, Mission};

/// Side length of a single square tile measured in world units.
pub const TILE_SIZE: f32 = 16.0;

/// Width of the logical screen in world units.
pub const SCREEN_WIDTH: f32 = 320.0;

/// Height of the logical screen in world units.
pub const SCREEN_HEIGHT: f32 = 240.0;

/// Longest frame delta the simulation accepts; longer ticks are skipped.
pub const MAX_TICK: Duration = Duration::from_millis(250);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the input the player entity acts upon during later ticks.
    SetPlayerIntent {
        /// Desired movement direction; normalised by the actor.
        movement: Vec2,
        /// Direction to fire in, or `None` while the trigger is released.
        aim: Option<Vec2>,
    },
    /// Requests that an entity of the provided archetype join the world.
    Spawn {
        /// Kind of entity to create.
        archetype: Archetype,
        /// Strategy used to choose the spawn position.
        placement: Placement,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that a tick was discarded because its delta exceeded [`MAX_TICK`].
    TickSkipped {
        /// Delta that was rejected.
        dt: Duration,
    },
    /// Confirms that an entity joined the world.
    EntitySpawned {
        /// Identifier assigned to the entity.
        entity: EntityId,
        /// Kind of entity that was created.
        archetype: Archetype,
        /// Position the entity occupies after spawning.
        position: Vec2,
    },
    /// Confirms that an entity was purged from the world.
    EntityRemoved {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Kind of entity that was removed.
        archetype: Archetype,
    },
    /// Reports that a spawn request could not find a free position.
    SpawnFailed {
        /// Kind of entity that was requested.
        archetype: Archetype,
        /// Placement strategy that failed.
        placement: Placement,
    },
    /// Asks the audio collaborator to play a sound effect.
    SoundRequested {
        /// Effect to play.
        sound: SoundEffect,
        /// Emitter position for attenuated sounds, `None` for global cues.
        origin: Option<Vec2>,
    },
    /// Asks the presentation layer to show a transient visual effect.
    VisualEffectRequested {
        /// Effect to display.
        effect: VisualEffect,
        /// Centre of the effect in world space.
        position: Vec2,
    },
    /// Asks the presentation layer to display a text message.
    MessageRequested {
        /// Message body.
        text: &'static str,
        /// How long the message should remain visible.
        duration: Duration,
    },
    /// Announces that a gameplay signal was raised during the tick.
    SignalRaised {
        /// Signal that fired.
        signal: Signal,
        /// Entity that raised the signal, when one did.
        source: Option<EntityId>,
    },
    /// Lists tiles whose type changed since the previous report.
    TilesChanged {
        /// Coordinates of every modified tile.
        tiles: Vec<GridCoord>,
    },
    /// Reports that the player's love counter changed.
    LoveChanged {
        /// Love collected after the change.
        love: u32,
        /// Love required to ascend.
        quota: u32,
    },
    /// Announces that the session's goal was reached.
    SessionCompleted {
        /// Whether the goal was reached within the mission's par time.
        under_par: bool,
    },
}

/// Receives events produced by the world.
///
/// Sinks are invoked synchronously and must not block; the world never waits
/// on their completion.
pub trait EventSink {
    /// Accepts a single event.
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Strategy used to pick a position for a requested spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Spawn at the exact world position.
    At(Vec2),
    /// Spawn on free ground outside the current camera view.
    Offscreen,
    /// Spawn on free ground near the centre of the level.
    Center,
}

/// Gameplay signals raised by the simulation for higher layers to observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    /// The player has moved for a sustained stretch.
    PlayerMoved,
    /// The player has fired a handful of shots.
    PlayerShot,
    /// The player reached the love quota and ascended.
    PlayerAscended,
    /// The player keeps shooting the cat with shots that cannot hurt it.
    CatRule,
    /// The cat's death animation finished.
    CatDefeated,
    /// A new session was created.
    SessionStarted,
}

impl Signal {
    /// Number of distinct signals.
    pub const COUNT: usize = 6;

    /// Every signal in declaration order.
    pub const ALL: [Signal; Self::COUNT] = [
        Signal::PlayerMoved,
        Signal::PlayerShot,
        Signal::PlayerAscended,
        Signal::CatRule,
        Signal::CatDefeated,
        Signal::SessionStarted,
    ];

    /// Dense index of the signal, suitable for table lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Sound effects the simulation can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Session start jingle.
    IntroChime,
    /// Session completion jingle.
    OutroChime,
    /// An enemy took damage.
    EnemyHurt,
    /// An enemy died.
    EnemyDie,
    /// A worm spotted its target.
    Roar,
    /// An explosion went off.
    Explode,
    /// The player collected love.
    LoveGet,
    /// The player fired.
    PlayerShot,
    /// The player took damage.
    PlayerHurt,
    /// The player reached the love quota.
    Ascend,
    /// The player lost ascension.
    Descend,
    /// Idle cat noise.
    CatMeow,
    /// The cat died.
    CatDie,
}

impl SoundEffect {
    /// Asset name of the effect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SoundEffect::IntroChime => "intro_chime",
            SoundEffect::OutroChime => "outro_chime",
            SoundEffect::EnemyHurt => "enemy_hurt",
            SoundEffect::EnemyDie => "enemy_die",
            SoundEffect::Roar => "roar",
            SoundEffect::Explode => "explode",
            SoundEffect::LoveGet => "love_get",
            SoundEffect::PlayerShot => "player_shot",
            SoundEffect::PlayerHurt => "player_hurt",
            SoundEffect::Ascend => "ascend",
            SoundEffect::Descend => "descend",
            SoundEffect::CatMeow => "cat_meow",
            SoundEffect::CatDie => "cat_die",
        }
    }
}

/// Transient visual effects the presentation layer may draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualEffect {
    /// Small puff of smoke.
    Poof,
    /// Ring of stars flying outward.
    StarBurst,
    /// Expanding blast.
    Explosion,
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of entity the world knows how to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Archetype {
    /// The player character.
    Player,
    /// Charging melee mob.
    Knight,
    /// Slow mob that lobs bouncing shots.
    Blargh,
    /// Stationary turret mob.
    Gopnik,
    /// Head of a segmented worm.
    Worm,
    /// Body segment trailing a worm head.
    WormSegment,
    /// The final target, summoned by ascension.
    Cat,
    /// Projectile.
    Shot,
    /// Love pickup dropped by dead mobs.
    Love,
    /// Explosive barrel.
    Barrel,
    /// Expanding blast that destroys terrain.
    Explosion,
    /// Puff of smoke.
    Poof,
    /// Single star of a star burst.
    Star,
}

impl Archetype {
    /// Number of distinct archetypes.
    pub const COUNT: usize = 13;

    /// Every archetype in declaration order.
    pub const ALL: [Archetype; Self::COUNT] = [
        Archetype::Player,
        Archetype::Knight,
        Archetype::Blargh,
        Archetype::Gopnik,
        Archetype::Worm,
        Archetype::WormSegment,
        Archetype::Cat,
        Archetype::Shot,
        Archetype::Love,
        Archetype::Barrel,
        Archetype::Explosion,
        Archetype::Poof,
        Archetype::Star,
    ];

    /// Dense index of the archetype, suitable for table lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the archetype is a hostile mob with its own AI.
    #[must_use]
    pub const fn is_mob(self) -> bool {
        matches!(
            self,
            Archetype::Knight
                | Archetype::Blargh
                | Archetype::Gopnik
                | Archetype::Worm
                | Archetype::Cat
        )
    }
}

/// Live entity counts keyed by archetype.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    counts: [u32; Archetype::COUNT],
}

impl Census {
    /// Records one more live entity of the provided archetype.
    pub fn record(&mut self, archetype: Archetype) {
        self.counts[archetype.index()] += 1;
    }

    /// Number of live entities of the provided archetype.
    #[must_use]
    pub const fn count(&self, archetype: Archetype) -> u32 {
        self.counts[archetype.index()]
    }
}

/// Render pose hint attached to every entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Default stance.
    #[default]
    Normal,
    /// Winding up or executing a charge.
    Charging,
    /// Telegraphing or executing an attack.
    Shooting,
    /// Recently damaged.
    Hurt,
    /// Playing the death animation.
    Dying,
    /// Visibly damaged but still intact.
    Damaged,
    /// Player powered up by love.
    Ascended,
}

/// Combined life-cycle view of a mob's state machines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MobState {
    /// Healthy and has never seen its target.
    Idle,
    /// Healthy and hunting.
    Alerted,
    /// Inside the post-hit invulnerability window.
    Hurt,
    /// Playing the death animation.
    Dying,
    /// Death animation finished; the entity is about to be purged.
    Dead,
}

/// Read-only snapshot of a mob's perception and health.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobStatus {
    /// Remaining health.
    pub health: i32,
    /// Current life-cycle state.
    pub state: MobState,
    /// Whether the target was visible during the latest tick.
    pub sees_target: bool,
    /// Whether the mob has ever seen its target.
    pub hunting: bool,
    /// Position where the target was last seen.
    pub last_seen_target: Vec2,
}

/// Read-only snapshot of a single entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Kind of entity.
    pub archetype: Archetype,
    /// Centre of the entity in world space.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Collision categories the entity belongs to.
    pub collision: CollisionMask,
    /// Draw priority; lower values are drawn first.
    pub draw_priority: i32,
    /// Render pose hint.
    pub pose: Pose,
    /// Animation frame hint.
    pub frame: usize,
    /// Whether the entity should be skipped while drawing this frame.
    pub hidden: bool,
}

/// Signed grid coordinate of a tile.
///
/// Coordinates may lie outside the level; queries treat those cells as open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: i32,
    row: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Contents of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TileType {
    /// Open floor.
    #[default]
    Empty = 0,
    /// Solid rock.
    Block = 1 << 0,
    /// Slope whose open side faces up and right.
    Slope45 = 1 << 1,
    /// Slope whose open side faces up and left.
    Slope135 = 1 << 2,
    /// Slope whose open side faces down and left.
    Slope225 = 1 << 3,
    /// Slope whose open side faces down and right.
    Slope315 = 1 << 4,
    /// Rock spike pointing up.
    TentacleUp = 1 << 5,
    /// Rock spike pointing down.
    TentacleDown = 1 << 6,
    /// Rock spike pointing left.
    TentacleLeft = 1 << 7,
    /// Rock spike pointing right.
    TentacleRight = 1 << 8,
    /// Explosive rune embedded in rock.
    Rune = 1 << 9,
    /// Free-standing pillar.
    Pylon = 1 << 10,
}

impl TileType {
    /// Bit pattern of the tile type.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self as u16
    }

    /// Whether the tile type belongs to the provided mask.
    #[must_use]
    pub const fn is(self, mask: TileMask) -> bool {
        self.bits() & mask.bits() != 0
    }

    /// Whether the tile blocks movement and sight.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        self.is(TileMask::SOLID)
    }

    /// Outward normal of slope tiles, `None` for every other type.
    #[must_use]
    pub fn slope_normal(self) -> Option<Vec2> {
        let d = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            TileType::Slope45 => Some(Vec2::new(d, -d)),
            TileType::Slope135 => Some(Vec2::new(-d, -d)),
            TileType::Slope225 => Some(Vec2::new(-d, d)),
            TileType::Slope315 => Some(Vec2::new(d, d)),
            _ => None,
        }
    }
}

/// Set of tile types used for classification queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileMask(u16);

impl TileMask {
    /// The four slope variants.
    pub const SLOPE: TileMask = TileMask(
        TileType::Slope45.bits()
            | TileType::Slope135.bits()
            | TileType::Slope225.bits()
            | TileType::Slope315.bits(),
    );
    /// The four tentacle variants.
    pub const TENTACLE: TileMask = TileMask(
        TileType::TentacleUp.bits()
            | TileType::TentacleDown.bits()
            | TileType::TentacleLeft.bits()
            | TileType::TentacleRight.bits(),
    );
    /// Every tile type that blocks movement and sight.
    pub const SOLID: TileMask = TileMask(
        TileType::Block.bits()
            | Self::SLOPE.0
            | Self::TENTACLE.0
            | TileType::Rune.bits()
            | TileType::Pylon.bits(),
    );
    /// Solid rock that is part of a cave wall.
    pub const TERRAIN: TileMask = TileMask(Self::SOLID.0 & !TileType::Pylon.bits());

    /// Creates a mask containing a single tile type.
    #[must_use]
    pub const fn of(kind: TileType) -> Self {
        Self(kind.bits())
    }

    /// Raw bit pattern of the mask.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }
}

/// Collision categories an entity belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionMask(u16);

impl CollisionMask {
    /// Takes no part in collision detection.
    pub const NONE: CollisionMask = CollisionMask(0);
    /// The player.
    pub const PLAYER: CollisionMask = CollisionMask(1 << 0);
    /// Hostile mobs and worm segments.
    pub const ENEMY: CollisionMask = CollisionMask(1 << 1);
    /// Any projectile.
    pub const SHOT: CollisionMask = CollisionMask(1 << 2);
    /// Projectile fired by the player.
    pub const PLAYER_SHOT: CollisionMask = CollisionMask(1 << 3);
    /// Projectile fired by a mob.
    pub const ENEMY_SHOT: CollisionMask = CollisionMask(1 << 4);
    /// Projectile that ricochets off walls.
    pub const BOUNCY_SHOT: CollisionMask = CollisionMask(1 << 5);
    /// Collectible pickup.
    pub const ITEM: CollisionMask = CollisionMask(1 << 6);
    /// The cat.
    pub const CAT: CollisionMask = CollisionMask(1 << 7);
    /// Blast radius of an explosion.
    pub const EXPLOSION: CollisionMask = CollisionMask(1 << 8);
    /// Explosive barrel.
    pub const BARREL: CollisionMask = CollisionMask(1 << 9);

    /// Raw bit pattern of the mask.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether the mask has no categories.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether the mask shares at least one category with `other`.
    #[must_use]
    pub const fn intersects(self, other: CollisionMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for CollisionMask {
    type Output = CollisionMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        CollisionMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for CollisionMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Axis-aligned rectangle in world space, used for camera views.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRect {
    min: Vec2,
    max: Vec2,
}

impl ViewRect {
    /// Creates a rectangle from its two corners.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a rectangle centred on `center` with the provided size.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::from_corners(center - half, center + half)
    }

    /// Corner with the smallest coordinates.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Corner with the largest coordinates.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Whether the rectangle overlaps another one.
    #[must_use]
    pub fn intersects(&self, other: &ViewRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Whether the point lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}
