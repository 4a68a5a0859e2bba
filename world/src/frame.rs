//! Mutable context handed to components while a tick runs.

use feles_core::{Archetype, EntityId, Event, Placement, Signal, SoundEffect, Vec2};
use feles_level::Level;
use rand_chacha::ChaCha8Rng;

use crate::{entity::EntityList, session::Session, signals::SignalBus};

/// Player input captured from the latest `SetPlayerIntent`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Intent {
    pub(crate) movement: Vec2,
    pub(crate) aim: Option<Vec2>,
}

/// Parameters of a projectile waiting to be spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Projectile {
    pub(crate) position: Vec2,
    pub(crate) direction: Vec2,
    pub(crate) speed: f32,
    pub(crate) enemy: bool,
    pub(crate) bounces: u32,
}

/// Spawn deferred until the end of the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SpawnRequest {
    Archetype {
        archetype: Archetype,
        placement: Placement,
    },
    Shot(Projectile),
    Love {
        position: Vec2,
        count: u32,
    },
    StarBurst(Vec2),
}

pub(crate) struct Frame<'a> {
    pub(crate) dt: f32,
    pub(crate) level: &'a mut Level,
    pub(crate) entities: &'a mut EntityList,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) session: &'a mut Session,
    pub(crate) signals: &'a mut SignalBus,
    pub(crate) spawns: &'a mut Vec<SpawnRequest>,
    pub(crate) outbox: &'a mut Vec<Event>,
    /// Player position at the start of the tick.
    pub(crate) target: Option<Vec2>,
    pub(crate) intent: Intent,
    /// Entity whose components are currently running.
    pub(crate) current: Option<EntityId>,
}

impl Frame<'_> {
    pub(crate) fn sound(&mut self, sound: SoundEffect, origin: Option<Vec2>) {
        self.outbox.push(Event::SoundRequested { sound, origin });
    }

    pub(crate) fn raise(&mut self, signal: Signal) {
        self.signals.raise(signal, self.current);
    }

    pub(crate) fn spawn(&mut self, request: SpawnRequest) {
        self.spawns.push(request);
    }

    pub(crate) fn spawn_at(&mut self, archetype: Archetype, position: Vec2) {
        self.spawn(SpawnRequest::Archetype {
            archetype,
            placement: Placement::At(position),
        });
    }

    pub(crate) fn spawn_love(&mut self, position: Vec2, count: u32) {
        self.spawn(SpawnRequest::Love { position, count });
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.outbox.push(event);
    }
}
