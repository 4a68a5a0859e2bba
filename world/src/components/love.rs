use feles_core::{CollisionMask, SoundEffect};

use super::Behavior;
use crate::{actor::Actor, anim::Anim, body::Body, entity::Contact, frame::Frame};

pub(crate) const LOVE_SPEED: f32 = 120.0;
pub(crate) const LOVE_RADIUS: f32 = 4.0;
const LOVE_FRICTION: f32 = 20_000.0;
const LOVE_LIFE: f32 = 6.0;
const BLINK_AFTER: f32 = 3.0;

/// Pickup scattered by dying mobs; slides to a halt and fades after a while.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Love {
    pub(crate) actor: Actor,
    blink: Anim,
    life: f32,
}

impl Love {
    pub(crate) fn new(velocity: feles_core::Vec2) -> Self {
        let mut actor = Actor::new(LOVE_SPEED, 0.0, LOVE_FRICTION);
        actor.set_velocity(velocity);
        Self {
            actor,
            blink: Anim::looping(2, 100.0),
            life: LOVE_LIFE,
        }
    }
}

impl Behavior for Love {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        self.actor.update(body, frame.level, frame.dt);
        let _ = self.blink.update(frame.dt);
        body.frame = self.blink.frame();
        self.life -= frame.dt;
        if self.life < BLINK_AFTER {
            self.blink.set_seconds_per_frame(0.5);
        }
        if self.life <= 0.0 {
            body.remove();
        }
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        if contact.body.collision.intersects(CollisionMask::PLAYER) {
            frame.sound(SoundEffect::LoveGet, None);
            body.remove();
        }
    }
}
