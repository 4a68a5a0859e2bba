#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Feles simulation.
//!
//! The world owns the level, every entity and the session's progress. Hosts
//! mutate it exclusively through [`apply`] (or the [`advance_simulation`]
//! shorthand) and observe it through the read-only [`query`] module and the
//! events delivered to their [`EventSink`].

pub mod actor;
pub mod body;
pub mod logging;
pub mod spawn;

mod anim;
mod components;
mod entity;
mod frame;
mod session;
mod signals;

pub use signals::SignalObserver;

use std::time::Duration;

use feles_core::{
    Archetype, Command, ConfigError, EntityId, Event, EventSink, Mission, Placement, Signal,
    SoundEffect, Vec2, ViewRect, MAX_TICK, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use feles_level::{generate::generate, Level, LevelError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{
    entity::EntityList,
    frame::{Frame, Intent, SpawnRequest},
    session::Session,
    signals::SignalBus,
};

const TUTORIAL_MOVE: (&str, f32) = ("MOVE WITH WASD KEYS OR ARROWS", 4.0);
const TUTORIAL_SHOOT: (&str, f32) = ("HOLDING CLICK OR SPACE WILL SHOOT", 5.0);
const TUTORIAL_FUEL: (&str, f32) = ("THE MONSTERS PRODUCE FUEL FOR ASCENSION", 5.0);
const TUTORIAL_HUNT: (&str, f32) = ("EXCELLENT. NOW... GO GET THE CAT!", 4.0);
const CAT_RULE: (&str, f32) = ("YOU MUST ASCEND TO SLAY THE CAT", 4.0);

/// Failures while assembling a world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The level could not be built.
    #[error("level could not be built: {0}")]
    Level(#[from] LevelError),
    /// The mission configuration was rejected.
    #[error("mission rejected: {0}")]
    Config(#[from] ConfigError),
}

/// Represents the authoritative Feles world state.
#[derive(Debug)]
pub struct World {
    level: Level,
    entities: EntityList,
    rng: ChaCha8Rng,
    session: Session,
    signals: SignalBus,
    spawns: Vec<SpawnRequest>,
    outbox: Vec<Event>,
    intent: Intent,
    camera: ViewRect,
    player: Option<EntityId>,
}

impl World {
    /// Generates a level for `mission` and opens a session seeded by `seed`.
    pub fn new(mission: Mission, seed: u64) -> Result<Self, WorldError> {
        mission.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = generate(mission.map_width, mission.map_height, &mut rng)?;
        Ok(Self::assemble(level, mission, rng))
    }

    /// Parses a TOML mission and opens a session on a freshly generated level.
    pub fn from_toml(source: &str, seed: u64) -> Result<Self, WorldError> {
        Self::new(Mission::from_toml_str(source)?, seed)
    }

    /// Opens a session on a prepared level instead of a generated one.
    ///
    /// The mission's map dimensions are ignored in favour of the level's.
    pub fn with_level(level: Level, mission: Mission, seed: u64) -> Result<Self, WorldError> {
        mission.validate()?;
        Ok(Self::assemble(level, mission, ChaCha8Rng::seed_from_u64(seed)))
    }

    fn assemble(mut level: Level, mission: Mission, rng: ChaCha8Rng) -> Self {
        let _ = level.take_dirty();
        info!(
            columns = level.columns(),
            rows = level.rows(),
            love_quota = mission.love_quota,
            "session created"
        );
        let screen = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let camera = ViewRect::centered(level.pixel_size() / 2.0, screen);
        let mut world = Self {
            level,
            entities: EntityList::default(),
            rng,
            session: Session::new(mission),
            signals: SignalBus::default(),
            spawns: Vec::new(),
            outbox: Vec::new(),
            intent: Intent::default(),
            camera,
            player: None,
        };
        world.signals.raise(Signal::SessionStarted, None);
        world.outbox.push(Event::SoundRequested {
            sound: SoundEffect::IntroChime,
            origin: None,
        });
        world
    }

    /// Registers an observer for every future delivery of `signal`.
    pub fn listen(&mut self, signal: Signal, observer: Box<dyn SignalObserver>) {
        self.signals.listen(signal, observer);
    }

    fn player_position(&self) -> Option<Vec2> {
        self.player
            .and_then(|id| self.entities.get(id))
            .map(|entity| entity.body.position)
    }

    fn tick(&mut self, dt: Duration) {
        if dt > MAX_TICK {
            debug!(?dt, "tick skipped");
            self.outbox.push(Event::TickSkipped { dt });
            return;
        }

        let target = self.player_position();
        self.run_components(dt.as_secs_f32(), target);

        for (entity, archetype) in self.entities.purge() {
            if self.player == Some(entity) {
                self.player = None;
            }
            self.outbox.push(Event::EntityRemoved { entity, archetype });
        }

        self.flush_spawns();
        self.deliver_signals();
        self.follow_player();

        let tiles = self.level.take_dirty();
        if !tiles.is_empty() {
            self.outbox.push(Event::TilesChanged { tiles });
        }

        self.session.advance(dt);
        trace!(
            tick = self.session.ticks(),
            entities = self.entities.len(),
            "tick complete"
        );
        self.outbox.push(Event::TimeAdvanced { dt });
    }

    /// Runs every update, then every collision, in list order.
    fn run_components(&mut self, dt: f32, target: Option<Vec2>) {
        let mut frame = Frame {
            dt,
            level: &mut self.level,
            entities: &mut self.entities,
            rng: &mut self.rng,
            session: &mut self.session,
            signals: &mut self.signals,
            spawns: &mut self.spawns,
            outbox: &mut self.outbox,
            target,
            intent: self.intent,
            current: None,
        };
        let count = frame.entities.len();

        for index in 0..count {
            let Some((id, mut body, mut components)) = frame.entities.checkout(index) else {
                continue;
            };
            frame.current = Some(id);
            for component in &mut components {
                component.update(&mut body, &mut frame);
            }
            frame.entities.checkin(index, body, components);
        }

        for index in 0..count {
            let Some((id, mut body, mut components)) = frame.entities.checkout(index) else {
                continue;
            };
            frame.current = Some(id);
            if !body.collision.is_none() {
                for other in (0..count).filter(|&other| other != index) {
                    let Some(contact) = frame.entities.contact(other) else {
                        continue;
                    };
                    if contact.body.collision.is_none() || !body.overlaps(&contact.body) {
                        continue;
                    }
                    for component in &mut components {
                        component.on_collision(&mut body, &contact, &mut frame);
                    }
                }
            }
            frame.entities.checkin(index, body, components);
        }
    }

    fn flush_spawns(&mut self) {
        while !self.spawns.is_empty() {
            for request in std::mem::take(&mut self.spawns) {
                match request {
                    SpawnRequest::Archetype { archetype, placement } => {
                        let _ = self.spawn_archetype(archetype, placement);
                    }
                    SpawnRequest::Shot(shot) => {
                        let _ = spawn::shot(
                            self,
                            shot.position,
                            shot.direction,
                            shot.speed,
                            shot.enemy,
                            shot.bounces,
                        );
                    }
                    SpawnRequest::Love { position, count } => {
                        let _ = spawn::love(self, position, count);
                    }
                    SpawnRequest::StarBurst(position) => {
                        let _ = spawn::star_burst(self, position);
                    }
                }
            }
        }
    }

    fn resolve(&mut self, placement: Placement) -> Option<Vec2> {
        match placement {
            Placement::At(position) => position.is_finite().then_some(position),
            Placement::Center => self
                .level
                .find_center_spawn_point(&mut self.rng)
                .map(|tile| tile.center()),
            Placement::Offscreen => self
                .level
                .find_offscreen_spawn_point(&self.camera, &mut self.rng)
                .map(|tile| tile.center()),
        }
    }

    /// Creates one entity of `archetype`, reporting [`Event::SpawnFailed`] on failure.
    fn spawn_archetype(&mut self, archetype: Archetype, placement: Placement) -> Option<EntityId> {
        let spawned = self.resolve(placement).and_then(|position| match archetype {
            Archetype::Player => Some(spawn::player(self, position)),
            Archetype::Knight => Some(spawn::knight(self, position)),
            Archetype::Blargh => Some(spawn::blargh(self, position)),
            Archetype::Gopnik => Some(spawn::gopnik(self, position)),
            Archetype::Worm => Some(spawn::worm(self, position)),
            Archetype::Cat => Some(spawn::cat(self, position)),
            Archetype::Barrel => Some(spawn::barrel(self, position)),
            Archetype::Explosion => Some(spawn::explosion(self, position)),
            Archetype::Poof => Some(spawn::poof(self, position)),
            Archetype::Love => spawn::love(self, position, 1).first().copied(),
            Archetype::Star => spawn::star_burst(self, position).first().copied(),
            Archetype::Shot | Archetype::WormSegment => None,
        });
        if spawned.is_none() {
            warn!(?archetype, ?placement, "spawn failed");
            self.outbox.push(Event::SpawnFailed { archetype, placement });
        }
        spawned
    }

    /// Hands raised signals to observers, then applies the world's own reactions.
    fn deliver_signals(&mut self) {
        for (signal, source) in self.signals.deliver() {
            self.outbox.push(Event::SignalRaised { signal, source });
            self.react(signal);
        }
        self.flush_spawns();
    }

    fn react(&mut self, signal: Signal) {
        let tutorial = self.session.mission().tutorial;
        match signal {
            Signal::SessionStarted if tutorial => self.message(TUTORIAL_MOVE),
            Signal::PlayerMoved if tutorial => self.message(TUTORIAL_SHOOT),
            Signal::PlayerShot if tutorial => self.message(TUTORIAL_FUEL),
            Signal::PlayerAscended => {
                self.spawns.push(SpawnRequest::Archetype {
                    archetype: Archetype::Cat,
                    placement: Placement::Offscreen,
                });
                if let Some(position) = self.player_position() {
                    self.spawns.push(SpawnRequest::StarBurst(position));
                }
                self.sound(SoundEffect::Ascend);
                if tutorial {
                    self.message(TUTORIAL_HUNT);
                }
            }
            Signal::CatRule => self.message(CAT_RULE),
            Signal::CatDefeated => {
                let under_par = self.session.complete();
                info!(under_par, elapsed = ?self.session.elapsed(), "session completed");
                self.sound(SoundEffect::OutroChime);
                self.outbox.push(Event::SessionCompleted { under_par });
            }
            _ => {}
        }
    }

    fn sound(&mut self, sound: SoundEffect) {
        self.outbox.push(Event::SoundRequested { sound, origin: None });
    }

    fn message(&mut self, (text, seconds): (&'static str, f32)) {
        self.outbox.push(Event::MessageRequested {
            text,
            duration: Duration::from_secs_f32(seconds),
        });
    }

    /// Centres the camera on the player, kept inside the level where it fits.
    fn follow_player(&mut self) {
        let Some(position) = self.player_position() else {
            return;
        };
        let screen = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let size = self.level.pixel_size();
        let half = screen / 2.0;
        let axis = |value: f32, half: f32, extent: f32| {
            if extent > half * 2.0 {
                value.clamp(half, extent - half)
            } else {
                extent / 2.0
            }
        };
        let center = Vec2::new(axis(position.x, half.x, size.x), axis(position.y, half.y, size.y));
        self.camera = ViewRect::centered(center, screen);
    }
}

/// Applies the provided command to the world, forwarding resulting events to `sink`.
pub fn apply<S: EventSink + ?Sized>(world: &mut World, command: Command, sink: &mut S) {
    match command {
        Command::Tick { dt } => world.tick(dt),
        Command::SetPlayerIntent { movement, aim } => world.intent = Intent { movement, aim },
        Command::Spawn { archetype, placement } => {
            let _ = world.spawn_archetype(archetype, placement);
            world.follow_player();
        }
    }
    world.deliver_signals();

    for event in world.outbox.drain(..) {
        sink.emit(event);
    }
}

/// Advances the simulation by `dt`; shorthand for [`Command::Tick`].
pub fn advance_simulation<S: EventSink + ?Sized>(world: &mut World, dt: Duration, sink: &mut S) {
    apply(world, Command::Tick { dt }, sink);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use feles_core::{
        Archetype, Census, EntityId, EntitySnapshot, MobStatus, Mission, Signal, Vec2, ViewRect,
    };
    use feles_level::Level;

    use super::World;
    use crate::{components::Component, entity::Entity};

    /// Motion and remaining budget of a projectile.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ShotStatus {
        /// Current velocity.
        pub velocity: Vec2,
        /// Wall hits the shot can still survive.
        pub bounces: u32,
        /// Seconds until the shot expires.
        pub life: f32,
        /// Whether the shot hurts the player rather than mobs.
        pub enemy: bool,
    }

    fn component<'a, T: 'a>(
        world: &'a World,
        id: EntityId,
        pick: impl Fn(&'a Component) -> Option<T>,
    ) -> Option<T> {
        world
            .entities
            .get(id)
            .and_then(|entity| entity.components.iter().find_map(pick))
    }

    /// Tile grid the session plays on.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Mission the session was opened with.
    #[must_use]
    pub fn mission(world: &World) -> &Mission {
        world.session.mission()
    }

    /// Snapshots of every entity, back to front.
    #[must_use]
    pub fn entities(world: &World) -> Vec<EntitySnapshot> {
        world.entities.iter().map(Entity::snapshot).collect()
    }

    /// Snapshot of a single entity.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<EntitySnapshot> {
        world.entities.get(id).map(Entity::snapshot)
    }

    /// Snapshot of the player's avatar, if one exists.
    #[must_use]
    pub fn player(world: &World) -> Option<EntitySnapshot> {
        world.player.and_then(|id| entity(world, id))
    }

    /// Live entity counts per archetype.
    #[must_use]
    pub fn census(world: &World) -> Census {
        let mut census = Census::default();
        world
            .entities
            .iter()
            .for_each(|entity| census.record(entity.archetype));
        census
    }

    /// Number of live entities of `archetype`.
    #[must_use]
    pub fn count(world: &World, archetype: Archetype) -> u32 {
        census(world).count(archetype)
    }

    /// Perception and health of a mob.
    #[must_use]
    pub fn mob_status(world: &World, id: EntityId) -> Option<MobStatus> {
        component(world, id, |component| component.mob().map(|mob| mob.status()))
    }

    /// Remaining health of a mob or barrel.
    #[must_use]
    pub fn health(world: &World, id: EntityId) -> Option<i32> {
        component(world, id, |component| {
            component
                .mob()
                .map(|mob| mob.status().health)
                .or_else(|| component.barrel().map(|barrel| barrel.health()))
        })
    }

    /// Velocity of a moving entity.
    #[must_use]
    pub fn velocity(world: &World, id: EntityId) -> Option<Vec2> {
        component(world, id, Component::velocity)
    }

    /// Trail points a worm's segments follow, newest first.
    #[must_use]
    pub fn worm_trail(world: &World, id: EntityId) -> Option<Vec<Vec2>> {
        component(world, id, |component| component.trail().map(|trail| trail.points()))
    }

    /// Motion and remaining budget of a projectile.
    #[must_use]
    pub fn shot_status(world: &World, id: EntityId) -> Option<ShotStatus> {
        component(world, id, |component| {
            component.shot().map(|shot| ShotStatus {
                velocity: shot.velocity(),
                bounces: shot.bounces(),
                life: shot.life(),
                enemy: shot.is_enemy(),
            })
        })
    }

    /// Love collected so far.
    #[must_use]
    pub fn love(world: &World) -> u32 {
        world.session.love()
    }

    /// Times `signal` was raised this session.
    #[must_use]
    pub fn signal_count(world: &World, signal: Signal) -> u32 {
        world.signals.count(signal)
    }

    /// Area of the level currently on screen.
    #[must_use]
    pub fn camera(world: &World) -> ViewRect {
        world.camera
    }

    /// Simulated time since the session opened.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.session.elapsed()
    }

    /// Ticks simulated so far, skipped ticks excluded.
    #[must_use]
    pub fn tick_count(world: &World) -> u64 {
        world.session.ticks()
    }

    /// `Some(under_par)` once the cat has been defeated.
    #[must_use]
    pub fn outcome(world: &World) -> Option<bool> {
        world.session.outcome()
    }
}
