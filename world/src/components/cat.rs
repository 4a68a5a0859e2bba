use std::f32::consts::{FRAC_PI_4, PI, TAU};

use feles_core::{
    vector, Archetype, CollisionMask, Placement, Pose, Signal, SoundEffect, Vec2,
};
use rand::Rng;

use super::{mob::Mob, Behavior};
use crate::{
    actor::Actor,
    anim::{Anim, AnimEvent},
    body::Body,
    entity::Contact,
    frame::{Frame, SpawnRequest},
};

const MEOW_INTERVAL: f32 = 5.0;
const STUCK_STEP: f32 = 8.0 / 60.0;
const STUCK_SECONDS: f32 = 5.0;
const POOF_RING_RADIUS: f32 = 12.0;
/// Every this many shrugged-off shots the player is reminded of the rule.
const DUD_SHOTS_PER_REMINDER: u32 = 16;

/// The quarry: only ascended, bouncing shots can hurt it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cat {
    pub(crate) mob: Mob,
    run: Anim,
    meow_timer: f32,
    stuck_timer: f32,
    walk_distance: f32,
}

impl Cat {
    pub(crate) fn new(health: i32, rng: &mut impl Rng) -> Self {
        let mut actor = Actor::new(120.0, 100_000.0, 75_000.0);
        actor.set_desired_direction(vector::random_direction(rng));
        Self {
            mob: Mob::new(actor, health),
            run: Anim::looping(2, 0.1),
            meow_timer: rng.gen::<f32>() * MEOW_INTERVAL,
            stuck_timer: 0.0,
            walk_distance: 0.0,
        }
    }

    fn vanish(&self, body: &mut Body, frame: &mut Frame<'_>) {
        for position in poof_ring(body.position, frame.rng) {
            frame.spawn_at(Archetype::Poof, position);
        }
        body.remove();
        frame.spawn(SpawnRequest::Archetype {
            archetype: Archetype::Cat,
            placement: Placement::Offscreen,
        });
    }
}

/// Eight puffs of smoke around `center`, starting at a random angle.
pub(crate) fn poof_ring(center: Vec2, rng: &mut impl Rng) -> Vec<Vec2> {
    let start = rng.gen::<f32>() * TAU;
    (0..8)
        .map(|k| center + vector::from_angle(start + k as f32 * FRAC_PI_4, POOF_RING_RADIUS))
        .collect()
}

impl Behavior for Cat {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        if self.walk_distance.is_nan() {
            self.vanish(body, frame);
            return;
        }

        if self.mob.is_alive() {
            self.mob.wander(body, frame, 64.0, PI);
            self.meow_timer += frame.dt;
            if self.meow_timer > MEOW_INTERVAL {
                frame.sound(SoundEffect::CatMeow, Some(body.position));
                self.meow_timer = 0.0;
            }
            let _ = self.run.update(frame.dt);
            body.frame = self.run.frame();
            body.pose = Pose::Normal;
        } else {
            self.mob.actor.set_desired_direction(Vec2::ZERO);
        }

        if self.mob.should_die() {
            self.mob.actor.set_desired_direction(Vec2::ZERO);
            self.mob.die(Some(Anim::once(2, 0.5)));
            body.pose = Pose::Dying;
            body.frame = 0;
            frame.sound(SoundEffect::CatDie, None);
        }

        let start = body.position;
        if self.mob.update(body, frame) == Some(AnimEvent::Finished) {
            frame.raise(Signal::CatDefeated);
        }
        self.mob.actor.update(body, frame.level, frame.dt);
        let step = start.distance(body.position);
        self.walk_distance += step;

        if self.mob.is_alive() && step < STUCK_STEP {
            self.stuck_timer += frame.dt;
            if self.stuck_timer > STUCK_SECONDS {
                self.vanish(body, frame);
            }
        } else {
            self.stuck_timer = 0.0;
        }
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        let other = contact.body.collision;
        let hurts = other.intersects(CollisionMask::BOUNCY_SHOT)
            || !other.intersects(CollisionMask::PLAYER_SHOT);
        if hurts {
            self.mob.on_collision(body, contact, frame);
            if other.intersects(CollisionMask::CAT) {
                let away = body.position - contact.body.position;
                let jitter = Vec2::new(away.y, -away.x) * (frame.rng.gen::<f32>() * 2.0 - 1.0);
                self.mob.actor.set_desired_direction(away + jitter);
            }
        } else if frame.session.record_dud_shot() % DUD_SHOTS_PER_REMINDER == 0 {
            frame.raise(Signal::CatRule);
        }
    }
}
