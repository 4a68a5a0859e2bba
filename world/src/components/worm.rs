//! Segmented worm: a head entity steering body segments along its trail.

use std::collections::VecDeque;

use feles_core::{vector, CollisionMask, EntityId, Pose, SoundEffect, Vec2};
use rand::Rng;

use super::{mob::Mob, Behavior, Component};
use crate::{
    actor::Actor,
    anim::{Anim, AnimEvent},
    body::Body,
    entity::Contact,
    frame::Frame,
};

/// Body segments following the head, tail included.
pub(crate) const WORM_SEGMENTS: usize = 6;
/// Head travel between two trail samples.
pub(crate) const WORM_QDIST: f32 = 12.0;
pub(crate) const WORM_REWARD: u32 = 3;
const TURN_TIME_MIN: f32 = 2.0;
const TURN_TIME_MAX: f32 = 6.0;
const SEGMENT_DEATH_INTERVAL: f32 = 0.25;
const CHARGE_ALIGNMENT: f32 = 0.9;

/// Recent head positions, newest first, at most one per segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Trail {
    points: VecDeque<Vec2>,
    travelled: f32,
}

impl Trail {
    /// Accumulates head travel and samples `head` every [`WORM_QDIST`].
    pub(crate) fn advance(&mut self, distance: f32, head: Vec2) {
        if !distance.is_finite() {
            return;
        }
        self.travelled += distance;
        while self.travelled >= WORM_QDIST {
            self.travelled -= WORM_QDIST;
            self.points.push_front(head);
            self.points.truncate(WORM_SEGMENTS);
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    pub(crate) fn points(&self) -> Vec<Vec2> {
        self.points.iter().copied().collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Worm {
    pub(crate) mob: Mob,
    segments: [Option<EntityId>; WORM_SEGMENTS],
    trail: Trail,
    turn_rate: f32,
    turn_timer: f32,
    charging: bool,
    segment_death_timer: f32,
    charge_blink: f32,
}

impl Worm {
    pub(crate) fn new(segments: [Option<EntityId>; WORM_SEGMENTS], rng: &mut impl Rng) -> Self {
        let mut actor = Actor::new(100.0, 100_000.0, 50_000.0);
        actor.set_desired_direction(vector::random_direction(rng));
        Self {
            mob: Mob::new(actor, 11),
            segments,
            trail: Trail::default(),
            turn_rate: std::f32::consts::PI,
            turn_timer: random_turn_time(rng),
            charging: false,
            segment_death_timer: 0.0,
            charge_blink: 0.0,
        }
    }

    pub(crate) const fn trail(&self) -> &Trail {
        &self.trail
    }

    fn steer(&mut self, body: &Body, frame: &mut Frame<'_>) {
        if !self.charging {
            self.turn_timer -= frame.dt;
            if self.turn_timer < 0.0 {
                self.turn_timer = random_turn_time(frame.rng);
                self.turn_rate = -self.turn_rate;
                if self.mob.sees_target() {
                    self.charging = true;
                    self.turn_timer = TURN_TIME_MAX;
                    frame.sound(SoundEffect::Roar, Some(body.position));
                }
            }
            self.mob.wander(body, frame, 64.0, self.turn_rate);
            return;
        }

        let toward = self.mob.to_target().normalize_or_zero();
        let heading = self.mob.actor.movement();
        if toward.dot(heading) < CHARGE_ALIGNMENT {
            let side = vector::cross(toward, heading);
            let sign = if side == 0.0 { 0.0 } else { side.signum() };
            self.mob.actor.turn(self.turn_rate.abs() * -sign, frame.dt);
        } else {
            self.turn_timer -= frame.dt;
            if self.turn_timer < 0.0 {
                self.charging = false;
                self.turn_timer = random_turn_time(frame.rng);
            }
        }
    }

    fn drag_segments(&self, frame: &mut Frame<'_>) {
        let step = self.mob.actor.velocity().length() * frame.dt;
        for (index, segment) in self.segments.iter().enumerate() {
            let (Some(id), Some(target)) = (*segment, self.trail.get(index)) else {
                continue;
            };
            let Some(entity) = frame.entities.get_mut(id) else {
                continue;
            };
            let towards = target - entity.body.position;
            if towards.length() < step {
                entity.body.position = target;
            } else {
                entity.body.position += towards.normalize_or_zero() * step;
            }
        }
    }

    fn dissolve(&mut self, frame: &mut Frame<'_>) {
        self.mob.actor.set_desired_direction(Vec2::ZERO);
        self.segment_death_timer += frame.dt;
        if self.segment_death_timer <= SEGMENT_DEATH_INTERVAL {
            return;
        }
        self.segment_death_timer = 0.0;
        frame.sound(SoundEffect::EnemyDie, None);

        let last = self.segments.iter().rposition(Option::is_some);
        match last {
            Some(index) => {
                let segment = self.segments[index].take();
                if let Some(entity) = segment.and_then(|id| frame.entities.get_mut(id)) {
                    for component in &mut entity.components {
                        if let Component::Effect(effect) = component {
                            effect.dissolve();
                        }
                    }
                }
            }
            None => {
                self.mob.play_death(Anim::once(3, 0.1));
                self.segment_death_timer = f32::NEG_INFINITY;
            }
        }
    }
}

impl Behavior for Worm {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        self.charge_blink += frame.dt;
        body.pose = if !self.mob.is_alive() {
            Pose::Dying
        } else if self.mob.is_hurt() {
            Pose::Hurt
        } else if self.charging && (self.charge_blink * 4.0) as i32 % 2 == 0 {
            Pose::Charging
        } else {
            Pose::Normal
        };

        if self.mob.is_alive() {
            self.steer(body, frame);
            self.drag_segments(frame);
        } else {
            self.dissolve(frame);
        }

        let start = body.position;
        let event = self.mob.update(body, frame);
        if event == Some(AnimEvent::Finished) {
            body.remove();
            frame.spawn_love(body.position, WORM_REWARD);
        }
        self.mob.actor.update(body, frame.level, frame.dt);
        self.trail.advance(start.distance(body.position), body.position);
    }

    fn on_collision(&mut self, body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        let own_segment = self.segments.contains(&Some(contact.id));
        if !own_segment {
            self.mob.on_collision(body, contact, frame);
            if contact.body.collision == CollisionMask::ENEMY {
                self.mob.actor.turn(self.turn_rate, frame.dt);
                self.turn_timer = TURN_TIME_MAX;
            }
        }
        if self.mob.should_die() {
            self.mob.die(None);
        }
    }
}

fn random_turn_time(rng: &mut impl Rng) -> f32 {
    rng.gen::<f32>() * (TURN_TIME_MAX - TURN_TIME_MIN) + TURN_TIME_MIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_grows_one_sample_per_quantum_up_to_segment_count() {
        for samples in 0..10usize {
            let mut trail = Trail::default();
            for step in 0..samples {
                trail.advance(WORM_QDIST, Vec2::new(step as f32, 0.0));
            }
            assert_eq!(trail.points().len(), samples.min(WORM_SEGMENTS));
        }
    }

    #[test]
    fn tail_target_lags_behind_the_head() {
        let mut trail = Trail::default();
        for step in 0..9 {
            trail.advance(WORM_QDIST, Vec2::new(step as f32, 0.0));
        }

        assert_eq!(trail.get(0), Some(Vec2::new(8.0, 0.0)));
        assert_eq!(trail.get(WORM_SEGMENTS - 1), Some(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn short_moves_accumulate() {
        let mut trail = Trail::default();
        for _ in 0..11 {
            trail.advance(1.0, Vec2::ZERO);
        }
        assert!(trail.get(0).is_none());
        trail.advance(1.0, Vec2::X);
        assert_eq!(trail.get(0), Some(Vec2::X));
    }
}
