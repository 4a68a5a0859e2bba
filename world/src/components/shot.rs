use feles_core::{Archetype, CollisionMask, TileType, Vec2};

use super::Behavior;
use crate::{anim::Anim, body::Body, entity::Contact, frame::Frame};

pub(crate) const SHOT_RADIUS: f32 = 4.0;
const SHOT_LIFE: f32 = 5.0;

/// Straight-flying projectile, optionally bouncing off walls.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Shot {
    velocity: Vec2,
    life: f32,
    enemy: bool,
    bounces: u32,
    spin: Option<Anim>,
}

impl Shot {
    pub(crate) fn new(direction: Vec2, speed: f32, enemy: bool, bounces: u32) -> Self {
        Self {
            velocity: direction.normalize_or_zero() * speed,
            life: SHOT_LIFE,
            enemy,
            bounces,
            spin: (bounces > 0).then(|| Anim::looping(2, 0.5)),
        }
    }

    /// Collision categories of a shot with the given allegiance and bounce budget.
    pub(crate) fn collision(enemy: bool, bounces: u32) -> CollisionMask {
        let mut mask = CollisionMask::SHOT;
        mask |= if enemy {
            CollisionMask::ENEMY_SHOT
        } else {
            CollisionMask::PLAYER_SHOT
        };
        if bounces > 0 {
            mask |= CollisionMask::BOUNCY_SHOT;
        }
        mask
    }

    pub(crate) const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub(crate) const fn bounces(&self) -> u32 {
        self.bounces
    }

    pub(crate) const fn life(&self) -> f32 {
        self.life
    }

    pub(crate) const fn is_enemy(&self) -> bool {
        self.enemy
    }
}

impl Behavior for Shot {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        if let Some(spin) = &mut self.spin {
            let _ = spin.update(frame.dt);
            body.frame = spin.frame();
        }

        let ahead = body.position + self.velocity * frame.dt;
        let hit = frame.level.sphere_intersects(ahead, body.radius);
        if hit.hit {
            if let Some(coord) = hit.tile {
                let tile = frame.level.tile(coord.column(), coord.row(), false);
                let (rune, center) = (tile.kind() == TileType::Rune, tile.center());
                if rune && body.collision.intersects(CollisionMask::BOUNCY_SHOT) {
                    let _ = frame.level.destroy_tile(coord);
                    frame.spawn_at(Archetype::Explosion, center);
                }
            }
            if self.bounces > 0 {
                if hit.normal != Vec2::ZERO {
                    self.velocity = hit.normal * self.velocity.length();
                }
                self.bounces -= 1;
            } else {
                body.remove();
                frame.spawn_at(Archetype::Poof, body.position);
            }
        }

        body.position += self.velocity * frame.dt;
        self.life -= frame.dt;
        if self.life < 0.0 {
            body.remove();
        }
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, _frame: &mut Frame<'_>) {
        let other = contact.body.collision;
        let struck = (other.intersects(CollisionMask::ENEMY) && !self.enemy)
            || (other.intersects(CollisionMask::PLAYER) && self.enemy)
            || other.intersects(CollisionMask::CAT | CollisionMask::BARREL);
        if struck {
            body.remove();
        }
    }
}
