use feles_core::{Pose, Vec2};
use rand::Rng;

use super::{
    mob::{begin_death, finish_death, Mob},
    Behavior,
};
use crate::{
    actor::Actor,
    body::Body,
    entity::Contact,
    frame::{Frame, Projectile, SpawnRequest},
};

pub(crate) const BLARGH_REWARD: u32 = 4;
const SHOOT_INTERVAL: f32 = 2.0;
/// Timer value at which the cycle's shot leaves.
const SHOOT_THRESHOLD: f32 = 0.5;
const ADVANCE_PAUSE: f32 = 0.5;

/// Lumbers toward the player and lobs a bouncing shot once per cycle.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Blargh {
    pub(crate) mob: Mob,
    shoot_timer: f32,
}

impl Blargh {
    pub(crate) fn new(rng: &mut impl Rng) -> Self {
        Self {
            mob: Mob::new(Actor::new(50.0, 100_000.0, 50_000.0), 5),
            shoot_timer: rng.gen::<f32>() / 2.0 + 0.5,
        }
    }
}

impl Behavior for Blargh {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        body.pose = if !self.mob.is_alive() {
            Pose::Dying
        } else if self.mob.is_hurt() {
            Pose::Hurt
        } else if self.shoot_timer < SHOOT_THRESHOLD {
            Pose::Shooting
        } else {
            Pose::Normal
        };

        let event = self.mob.update(body, frame);
        finish_death(body, BLARGH_REWARD, event, frame);

        if self.mob.hunting() {
            let dt = frame.dt;
            if self.shoot_timer > SHOOT_THRESHOLD && self.shoot_timer - dt < SHOOT_THRESHOLD {
                frame.spawn(SpawnRequest::Shot(Projectile {
                    position: body.position,
                    direction: self.mob.to_target(),
                    speed: 80.0,
                    enemy: true,
                    bounces: 2,
                }));
            }

            if self.shoot_timer < SHOOT_INTERVAL - ADVANCE_PAUSE {
                self.mob.actor.set_desired_direction(self.mob.to_target());
            } else {
                self.mob.actor.set_desired_direction(Vec2::ZERO);
            }

            if self.shoot_timer < SHOOT_INTERVAL {
                self.shoot_timer -= dt;
                if self.shoot_timer < 0.0 {
                    self.shoot_timer = SHOOT_INTERVAL;
                }
            } else if self.mob.sees_target() {
                self.shoot_timer -= dt;
            }
        }

        self.mob.actor.update(body, frame.level, frame.dt);
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        self.mob.on_collision(body, contact, frame);
        begin_death(&mut self.mob, body, frame);
    }
}
