use feles_core::{vector, CollisionMask, Event, Pose, Signal, SoundEffect, Vec2};

use super::Behavior;
use crate::{
    actor::Actor,
    body::Body,
    entity::Contact,
    frame::{Frame, Projectile, SpawnRequest},
};

const SHOOT_INTERVAL: f32 = 0.2;
const SHOT_SPEED: f32 = 240.0;
const WARP_COOLDOWN: f32 = 4.0;
const HURT_SECONDS: f32 = 1.0;
const FLICKER_SECONDS: f32 = 0.125;
const MOVES_BEFORE_SIGNAL: u32 = 100;
const SHOTS_BEFORE_SIGNAL: u32 = 8;
const LOVE_LOST_PER_HIT: u32 = 10;
const LOVE_LOST_PER_HEAVY_HIT: u32 = 20;

/// The player's avatar, driven by the latest intent.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Player {
    pub(crate) actor: Actor,
    hurt: bool,
    ascended: bool,
    shoot_timer: f32,
    hurt_timer: f32,
    warp_cooldown: f32,
    moves: u32,
    shots: u32,
}

impl Player {
    pub(crate) fn new() -> Self {
        Self {
            actor: Actor::new(120.0, 500_000.0, 50_000.0).ignoring_bounds(),
            hurt: false,
            ascended: false,
            shoot_timer: 0.0,
            hurt_timer: 0.0,
            warp_cooldown: 0.0,
            moves: 0,
            shots: 0,
        }
    }

    fn shoot(&mut self, body: &Body, frame: &mut Frame<'_>) {
        if self.shoot_timer > 0.0 {
            self.shoot_timer -= frame.dt;
            return;
        }
        let Some(aim) = frame.intent.aim else {
            return;
        };
        let mut direction = vector::direction(aim);
        if direction == Vec2::ZERO {
            direction = self.actor.facing();
        }

        let (bounces, interval) = if self.ascended {
            (2, SHOOT_INTERVAL / 2.0)
        } else {
            (0, SHOOT_INTERVAL)
        };
        frame.spawn(SpawnRequest::Shot(Projectile {
            position: body.position,
            direction,
            speed: SHOT_SPEED,
            enemy: false,
            bounces,
        }));
        self.shoot_timer = interval;
        frame.sound(SoundEffect::PlayerShot, None);
        self.shots += 1;
        if self.shots == SHOTS_BEFORE_SIGNAL {
            frame.raise(Signal::PlayerShot);
        }
    }

    /// Wraps to the opposite edge when the landing spot is clear.
    fn wrap(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        let size = frame.level.pixel_size();
        let radius = body.radius;
        let position = body.position;
        let (landing, clamped) = if position.x < 0.0 {
            (Vec2::new(size.x - radius, position.y), Vec2::new(0.0, position.y))
        } else if position.x > size.x {
            (Vec2::new(radius, position.y), Vec2::new(size.x, position.y))
        } else if position.y < 0.0 {
            (Vec2::new(position.x, size.y - radius), Vec2::new(position.x, 0.0))
        } else if position.y > size.y {
            (Vec2::new(position.x, radius), Vec2::new(position.x, size.y))
        } else {
            return;
        };

        if !frame.level.sphere_intersects(landing, radius).hit && self.warp_cooldown <= 0.0 {
            body.position = landing;
            self.warp_cooldown = WARP_COOLDOWN;
            self.hurt_timer = HURT_SECONDS;
        } else {
            body.position = clamped;
        }
    }

    fn report_love(frame: &mut Frame<'_>) {
        let love = frame.session.love();
        let quota = frame.session.quota();
        frame.emit(Event::LoveChanged { love, quota });
    }
}

impl Behavior for Player {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        self.shoot(body, frame);

        if self.hurt_timer > 0.0 {
            self.hurt_timer -= frame.dt;
            body.hidden = (self.hurt_timer / FLICKER_SECONDS) as i32 % 2 != 0;
            if self.hurt_timer <= 0.0 {
                self.hurt = false;
                body.hidden = false;
            }
        }

        body.pose = if self.hurt {
            Pose::Hurt
        } else if self.ascended {
            Pose::Ascended
        } else if self.shoot_timer > 0.0 {
            Pose::Shooting
        } else {
            Pose::Normal
        };

        let movement = frame.intent.movement;
        if vector::direction(movement) != Vec2::ZERO {
            self.moves += 1;
            if self.moves == MOVES_BEFORE_SIGNAL {
                frame.raise(Signal::PlayerMoved);
            }
        }
        self.actor.set_desired_direction(movement);
        self.actor.update(body, frame.level, frame.dt);

        self.warp_cooldown -= frame.dt;
        self.wrap(body, frame);
    }

    fn on_collision(&mut self, _body: &mut Body, contact: &Contact, frame: &mut Frame<'_>) {
        let other = contact.body.collision;
        if other.intersects(CollisionMask::ITEM) {
            if frame.session.gain_love(1) {
                if !self.ascended {
                    frame.raise(Signal::PlayerAscended);
                }
                self.ascended = true;
            }
            Self::report_love(frame);
        } else if other
            .intersects(CollisionMask::ENEMY | CollisionMask::ENEMY_SHOT | CollisionMask::EXPLOSION)
        {
            if self.hurt || self.hurt_timer > 0.0 {
                return;
            }
            self.hurt = true;
            self.hurt_timer = HURT_SECONDS;
            let penalty = if other == CollisionMask::EXPLOSION || self.ascended {
                LOVE_LOST_PER_HEAVY_HIT
            } else {
                LOVE_LOST_PER_HIT
            };
            let emptied = frame.session.lose_love(penalty);
            if emptied && self.ascended {
                self.ascended = false;
                frame.sound(SoundEffect::Descend, None);
            } else {
                frame.sound(SoundEffect::PlayerHurt, None);
            }
            Self::report_love(frame);
        }
    }
}
