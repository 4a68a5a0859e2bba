use feles_core::{Pose, Vec2};
use rand::Rng;

use super::{
    mob::{begin_death, finish_death, Mob},
    Behavior,
};
use crate::{actor::Actor, body::Body, entity::Contact, frame::Frame};

pub(crate) const KNIGHT_REWARD: u32 = 3;
const CHARGE_INTERVAL: f32 = 2.0;
const CHARGE_SECONDS: f32 = 0.25;

/// Charges at the last place it saw the player, pausing between charges.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Knight {
    pub(crate) mob: Mob,
    charge_timer: f32,
}

impl Knight {
    pub(crate) fn new(speed: f32, rng: &mut impl Rng) -> Self {
        Self {
            mob: Mob::new(Actor::new(speed, 200_000.0, 25_000.0), 3),
            charge_timer: rng.gen::<f32>(),
        }
    }
}

impl Behavior for Knight {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        body.pose = if !self.mob.is_alive() {
            Pose::Dying
        } else if self.mob.is_hurt() {
            Pose::Hurt
        } else if self.charge_timer < 1.0 {
            Pose::Charging
        } else {
            Pose::Normal
        };

        let event = self.mob.update(body, frame);
        finish_death(body, KNIGHT_REWARD, event, frame);

        if self.mob.hunting() {
            self.charge_timer += frame.dt;
            if self.charge_timer > CHARGE_INTERVAL {
                self.charge_timer = 0.0;
                self.mob
                    .actor
                    .set_desired_direction(self.mob.last_seen_target() - body.position);
            } else if self.charge_timer > CHARGE_SECONDS {
                self.mob.actor.set_desired_direction(Vec2::ZERO);
            }
        } else {
            self.mob.actor.set_desired_direction(Vec2::ZERO);
        }

        self.mob.actor.update(body, frame.level, frame.dt);
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        self.mob.on_collision(body, contact, frame);
        begin_death(&mut self.mob, body, frame);
    }
}
