use feles_core::{Archetype, CollisionMask, Pose};

use super::Behavior;
use crate::{body::Body, entity::Contact, frame::Frame};

const BARREL_HEALTH: i32 = 40;
const DAMAGED_BELOW: i32 = 20;

/// Explodes once shots and blasts wear it down.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Barrel {
    health: i32,
}

impl Barrel {
    pub(crate) const fn new() -> Self {
        Self {
            health: BARREL_HEALTH,
        }
    }

    pub(crate) const fn health(&self) -> i32 {
        self.health
    }
}

impl Behavior for Barrel {
    fn update(&mut self, body: &mut Body, _frame: &mut Frame<'_>) {
        body.pose = if self.health < DAMAGED_BELOW {
            Pose::Damaged
        } else {
            Pose::Normal
        };
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        let other = contact.body.collision;
        if self.health > 0 {
            if other.intersects(CollisionMask::SHOT) {
                self.health -= 10;
            }
            if other.intersects(CollisionMask::EXPLOSION) {
                self.health -= 20;
            }
        }
        if self.health <= 0 && !body.pending_removal {
            body.remove();
            frame.spawn_at(Archetype::Explosion, body.position);
        }
    }
}
