use std::f32::consts::{FRAC_PI_2, FRAC_PI_8, TAU};

use feles_core::{vector, Pose};
use rand::Rng;

use super::{
    mob::{begin_death, finish_death, Mob},
    Behavior,
};
use crate::{
    actor::Actor,
    anim::Anim,
    body::Body,
    entity::Contact,
    frame::{Frame, Projectile, SpawnRequest},
};

pub(crate) const GOPNIK_REWARD: u32 = 5;
const VOLLEY_INTERVAL: f32 = 1.0;
const VOLLEY_SIZE: usize = 4;

/// Stands its ground and sprays a rotating cross of shots.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Gopnik {
    pub(crate) mob: Mob,
    idle: Anim,
    shoot_timer: f32,
    shoot_angle: f32,
}

impl Gopnik {
    pub(crate) fn new(rng: &mut impl Rng) -> Self {
        Self {
            mob: Mob::new(Actor::new(50.0, 10_000.0, 100_000.0), 6),
            idle: Anim::looping(2, 0.5),
            shoot_timer: rng.gen::<f32>() / 2.0 + 0.5,
            shoot_angle: rng.gen::<f32>() * TAU,
        }
    }
}

impl Behavior for Gopnik {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        if self.mob.is_alive() {
            let _ = self.idle.update(frame.dt);
            body.frame = self.idle.frame();
        }

        let event = self.mob.update(body, frame);
        finish_death(body, GOPNIK_REWARD, event, frame);
        self.mob.actor.update(body, frame.level, frame.dt);

        body.pose = if !self.mob.is_alive() {
            Pose::Dying
        } else if self.mob.is_hurt() {
            Pose::Hurt
        } else {
            Pose::Normal
        };

        if self.mob.hunting() {
            self.shoot_timer += frame.dt;
            if self.shoot_timer > VOLLEY_INTERVAL {
                self.shoot_timer = 0.0;
                for k in 0..VOLLEY_SIZE {
                    frame.spawn(SpawnRequest::Shot(Projectile {
                        position: body.position,
                        direction: vector::from_angle(self.shoot_angle + k as f32 * FRAC_PI_2, 1.0),
                        speed: 40.0,
                        enemy: true,
                        bounces: 0,
                    }));
                }
                self.shoot_angle += FRAC_PI_8;
            }
        }
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        self.mob.on_collision(body, contact, frame);
        begin_death(&mut self.mob, body, frame);
    }
}
