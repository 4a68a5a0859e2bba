//! Entity factories.
//!
//! Each factory inserts the entity immediately, announces it through
//! [`Event::EntitySpawned`] and returns its identifier. Components that want
//! new entities in the middle of a tick queue requests instead; the world
//! replays them through these factories once the tick's updates and
//! collisions have finished.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, PI, TAU};

use feles_core::{
    vector, Archetype, CollisionMask, EntityId, Event, SoundEffect, Vec2, VisualEffect,
};
use rand::Rng;

use crate::{
    body::Body,
    components::{
        poof_ring, Barrel, Blargh, Cat, Component, Effect, Gopnik, Knight, Love, Player, Shot, Worm,
        LOVE_RADIUS, LOVE_SPEED, SHOT_RADIUS, WORM_SEGMENTS,
    },
    World,
};

const MOB_RADIUS: f32 = 6.0;
const LARGE_MOB_RADIUS: f32 = 7.0;
const STAR_SPEED: f32 = 50.0;

const PLAYER_PRIORITY: i32 = 10;
const PICKUP_PRIORITY: i32 = -1;
const POOF_PRIORITY: i32 = 5;
const EXPLOSION_PRIORITY: i32 = 20;
const STAR_PRIORITY: i32 = 25;

fn place(
    world: &mut World,
    archetype: Archetype,
    draw_priority: i32,
    body: Body,
    component: Component,
) -> EntityId {
    let position = body.position;
    let entity = world.entities.insert(archetype, draw_priority, body, vec![component]);
    world.outbox.push(Event::EntitySpawned {
        entity,
        archetype,
        position,
    });
    entity
}

/// Spawns the player's avatar and makes it the camera and mob target.
pub fn player(world: &mut World, position: Vec2) -> EntityId {
    let id = place(
        world,
        Archetype::Player,
        PLAYER_PRIORITY,
        Body::new(position, MOB_RADIUS, CollisionMask::PLAYER),
        Component::Player(Player::new()),
    );
    world.player = Some(id);
    id
}

/// Spawns a knight moving at the mission's knight speed.
pub fn knight(world: &mut World, position: Vec2) -> EntityId {
    let knight = Knight::new(world.session.mission().knight_speed, &mut world.rng);
    place(
        world,
        Archetype::Knight,
        0,
        Body::new(position, MOB_RADIUS, CollisionMask::ENEMY),
        Component::Knight(knight),
    )
}

/// Spawns a blargh.
pub fn blargh(world: &mut World, position: Vec2) -> EntityId {
    let blargh = Blargh::new(&mut world.rng);
    place(
        world,
        Archetype::Blargh,
        0,
        Body::new(position, LARGE_MOB_RADIUS, CollisionMask::ENEMY),
        Component::Blargh(blargh),
    )
}

/// Spawns a gopnik.
pub fn gopnik(world: &mut World, position: Vec2) -> EntityId {
    let gopnik = Gopnik::new(&mut world.rng);
    place(
        world,
        Archetype::Gopnik,
        0,
        Body::new(position, LARGE_MOB_RADIUS, CollisionMask::ENEMY),
        Component::Gopnik(gopnik),
    )
}

/// Spawns a worm and returns the identifier of its head.
///
/// Segments are inserted tail first, so the head draws above its body.
pub fn worm(world: &mut World, position: Vec2) -> EntityId {
    let mut segments = [None; WORM_SEGMENTS];
    for slot in segments.iter_mut().rev() {
        *slot = Some(place(
            world,
            Archetype::WormSegment,
            0,
            Body::new(position, MOB_RADIUS, CollisionMask::ENEMY),
            Component::Effect(Effect::segment()),
        ));
    }
    let worm = Worm::new(segments, &mut world.rng);
    place(
        world,
        Archetype::Worm,
        0,
        Body::new(position, LARGE_MOB_RADIUS, CollisionMask::ENEMY),
        Component::Worm(worm),
    )
}

/// Spawns the cat in a ring of smoke.
pub fn cat(world: &mut World, position: Vec2) -> EntityId {
    let cat = Cat::new(world.session.mission().cat_health, &mut world.rng);
    let id = place(
        world,
        Archetype::Cat,
        0,
        Body::new(position, MOB_RADIUS, CollisionMask::CAT),
        Component::Cat(cat),
    );
    for puff in poof_ring(position, &mut world.rng) {
        let _ = poof(world, puff);
    }
    id
}

/// Spawns an explosive barrel.
pub fn barrel(world: &mut World, position: Vec2) -> EntityId {
    place(
        world,
        Archetype::Barrel,
        PICKUP_PRIORITY,
        Body::new(position, MOB_RADIUS, CollisionMask::BARREL),
        Component::Barrel(Barrel::new()),
    )
}

/// Fires a projectile. `bounces` is how many wall hits it survives.
pub fn shot(
    world: &mut World,
    position: Vec2,
    direction: Vec2,
    speed: f32,
    enemy: bool,
    bounces: u32,
) -> EntityId {
    place(
        world,
        Archetype::Shot,
        0,
        Body::new(position, SHOT_RADIUS, Shot::collision(enemy, bounces)),
        Component::Shot(Shot::new(direction, speed, enemy, bounces)),
    )
}

/// Scatters `count` love pickups outward from `position`.
pub fn love(world: &mut World, position: Vec2, count: u32) -> Vec<EntityId> {
    let mut angle = world.rng.gen::<f32>() * TAU;
    let mut spawned = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let velocity = vector::from_angle(angle, LOVE_SPEED);
        angle += world.rng.gen::<f32>() * PI * 0.666;
        spawned.push(place(
            world,
            Archetype::Love,
            PICKUP_PRIORITY,
            Body::new(position, LOVE_RADIUS, CollisionMask::ITEM),
            Component::Love(Love::new(velocity)),
        ));
    }
    spawned
}

/// Spawns a growing explosion that destroys nearby terrain.
pub fn explosion(world: &mut World, position: Vec2) -> EntityId {
    world.outbox.push(Event::SoundRequested {
        sound: SoundEffect::Explode,
        origin: Some(position),
    });
    world.outbox.push(Event::VisualEffectRequested {
        effect: VisualEffect::Explosion,
        position,
    });
    place(
        world,
        Archetype::Explosion,
        EXPLOSION_PRIORITY,
        Body::new(position, 8.0, CollisionMask::EXPLOSION),
        Component::Effect(Effect::explosion()),
    )
}

/// Spawns a puff of smoke.
pub fn poof(world: &mut World, position: Vec2) -> EntityId {
    world.outbox.push(Event::VisualEffectRequested {
        effect: VisualEffect::Poof,
        position,
    });
    place(
        world,
        Archetype::Poof,
        POOF_PRIORITY,
        Body::new(position, 0.0, CollisionMask::NONE),
        Component::Effect(Effect::poof()),
    )
}

/// Spawns a ring of stars at irregular angles flying outward from `position`.
pub fn star_burst(world: &mut World, position: Vec2) -> Vec<EntityId> {
    world.outbox.push(Event::VisualEffectRequested {
        effect: VisualEffect::StarBurst,
        position,
    });
    let start = world.rng.gen::<f32>() * TAU;
    let mut spread = 0.0;
    let mut stars = Vec::new();
    while spread < TAU {
        let velocity = vector::from_angle(start + spread, STAR_SPEED);
        stars.push(place(
            world,
            Archetype::Star,
            STAR_PRIORITY,
            Body::new(position, 0.0, CollisionMask::NONE),
            Component::Effect(Effect::star(velocity)),
        ));
        spread += world.rng.gen::<f32>() * FRAC_PI_4 + FRAC_PI_8;
    }
    stars
}
