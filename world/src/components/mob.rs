//! Perception, damage and death shared by every hostile creature.

use feles_core::{CollisionMask, MobState, MobStatus, SoundEffect, Vec2, SCREEN_HEIGHT};

use crate::{
    actor::Actor,
    anim::{Anim, AnimEvent},
    body::Body,
    entity::Contact,
    frame::Frame,
};

const HURT_SECONDS: f32 = 0.5;
const FLICKER_SECONDS: f32 = 0.125;

#[derive(Clone, Debug, PartialEq)]
enum Vitality {
    Alive,
    /// Death latched; the animation may start later than the latch.
    Dying(Option<Anim>),
    Dead,
}

/// State common to every mob, embedded by each archetype.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Mob {
    pub(crate) actor: Actor,
    health: i32,
    hurt_timer: f32,
    sees_target: bool,
    hunting: bool,
    last_seen_target: Vec2,
    to_target: Vec2,
    vitality: Vitality,
}

impl Mob {
    pub(crate) fn new(actor: Actor, health: i32) -> Self {
        Self {
            actor,
            health,
            hurt_timer: 0.0,
            sees_target: false,
            hunting: false,
            last_seen_target: Vec2::ZERO,
            to_target: Vec2::ZERO,
            vitality: Vitality::Alive,
        }
    }

    pub(crate) const fn sees_target(&self) -> bool {
        self.sees_target
    }

    pub(crate) const fn hunting(&self) -> bool {
        self.hunting
    }

    pub(crate) const fn last_seen_target(&self) -> Vec2 {
        self.last_seen_target
    }

    pub(crate) const fn to_target(&self) -> Vec2 {
        self.to_target
    }

    pub(crate) fn is_hurt(&self) -> bool {
        self.hurt_timer > 0.0
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.vitality == Vitality::Alive
    }

    pub(crate) fn should_die(&self) -> bool {
        self.health <= 0 && self.is_alive()
    }

    pub(crate) fn status(&self) -> MobStatus {
        let state = match self.vitality {
            Vitality::Dead => MobState::Dead,
            Vitality::Dying(_) => MobState::Dying,
            Vitality::Alive if self.is_hurt() => MobState::Hurt,
            Vitality::Alive if self.hunting => MobState::Alerted,
            Vitality::Alive => MobState::Idle,
        };
        MobStatus {
            health: self.health,
            state,
            sees_target: self.sees_target,
            hunting: self.hunting,
            last_seen_target: self.last_seen_target,
        }
    }

    /// Looks for the target, counts down the hurt window and steps the death animation.
    pub(crate) fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) -> Option<AnimEvent> {
        self.perceive(body, frame);

        if self.hurt_timer > 0.0 {
            self.hurt_timer -= frame.dt;
            body.hidden = (self.hurt_timer / FLICKER_SECONDS) as i32 % 2 != 0;
            if self.hurt_timer < 0.0 {
                body.hidden = false;
                self.hurt_timer = 0.0;
            }
        }

        match &mut self.vitality {
            Vitality::Dying(Some(anim)) => {
                let event = anim.update(frame.dt);
                body.frame = anim.frame();
                if event == Some(AnimEvent::Finished) {
                    self.vitality = Vitality::Dead;
                }
                event
            }
            _ => None,
        }
    }

    fn perceive(&mut self, body: &Body, frame: &Frame<'_>) {
        let Some(target) = frame.target else {
            self.sees_target = false;
            return;
        };
        self.to_target = target - body.position;
        let distance = self.to_target.length();
        let hit = frame.level.raycast(body.position, self.to_target, SCREEN_HEIGHT);
        if hit.distance >= distance {
            self.last_seen_target = target;
            self.sees_target = true;
            self.hunting = true;
        } else {
            self.sees_target = false;
        }
    }

    /// Applies damage from player attacks and separates overlapping kin.
    pub(crate) fn on_collision(&mut self, body: &Body, contact: &Contact, frame: &mut Frame<'_>) {
        let other = contact.body.collision;
        let harmful = other.intersects(CollisionMask::PLAYER_SHOT | CollisionMask::EXPLOSION);
        if !self.is_hurt() && harmful {
            self.health -= 1;
            if other.intersects(CollisionMask::EXPLOSION) {
                self.health -= 9;
            } else if other.intersects(CollisionMask::BOUNCY_SHOT) {
                self.health -= 1;
            }
            if self.health > 0 {
                self.hurt_timer = HURT_SECONDS;
                frame.sound(SoundEffect::EnemyHurt, None);
            }
        }

        if other == body.collision && frame.dt > 0.0 {
            let apart = body.position - contact.body.position;
            if apart.length() != 0.0 {
                self.actor
                    .push(apart.normalize() * (body.radius + contact.body.radius / frame.dt));
            }
        }
    }

    /// Latches death, optionally starting the death animation straight away.
    pub(crate) fn die(&mut self, anim: Option<Anim>) {
        self.vitality = Vitality::Dying(anim);
    }

    /// Starts the death animation of a mob whose death is already latched.
    pub(crate) fn play_death(&mut self, anim: Anim) {
        if let Vitality::Dying(slot) = &mut self.vitality {
            *slot = Some(anim);
        }
    }

    /// Ray probe along the heading; turns away while a wall is within `reach`.
    pub(crate) fn wander(&mut self, body: &Body, frame: &Frame<'_>, reach: f32, turn_rate: f32) {
        let hit = frame.level.raycast(body.position, self.actor.movement(), reach);
        if hit.hit {
            self.actor.turn(turn_rate, frame.dt);
        }
    }
}

/// Shared death handling of the simple mobs: a two-frame fade dropping love.
pub(crate) fn finish_death(
    body: &mut Body,
    reward: u32,
    event: Option<AnimEvent>,
    frame: &mut Frame<'_>,
) {
    if event == Some(AnimEvent::Finished) {
        body.remove();
        frame.spawn_love(body.position, reward);
    }
}

/// Latches death with the standard animation and cry.
pub(crate) fn begin_death(mob: &mut Mob, body: &mut Body, frame: &mut Frame<'_>) {
    if mob.should_die() {
        mob.die(Some(Anim::once(2, 0.15)));
        body.frame = 0;
        frame.sound(SoundEffect::EnemyDie, None);
    }
}
