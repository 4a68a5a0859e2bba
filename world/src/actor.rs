//! Velocity integration and tile collision for moving entities.
//!
//! Accelerations and frictions are expressed per second squared and are
//! scaled by `dt²` each tick; all movement tuning in the game is calibrated
//! against that scaling.

use feles_core::{vector, Vec2};
use feles_level::Level;

use crate::body::Body;

/// Physically integrated movement state of an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    velocity: Vec2,
    movement: Vec2,
    facing: Vec2,
    max_speed: f32,
    acceleration: f32,
    friction: f32,
    ignore_bounds: bool,
}

impl Actor {
    /// Creates a resting actor with the provided tuning.
    #[must_use]
    pub fn new(max_speed: f32, acceleration: f32, friction: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            movement: Vec2::ZERO,
            facing: Vec2::Y,
            max_speed,
            acceleration,
            friction,
            ignore_bounds: false,
        }
    }

    /// Lets the actor leave the level's pixel bounds.
    #[must_use]
    pub fn ignoring_bounds(mut self) -> Self {
        self.ignore_bounds = true;
        self
    }

    /// Current velocity in world units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overrides the current velocity.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Adds an impulse to the current velocity.
    pub fn push(&mut self, impulse: Vec2) {
        self.velocity += impulse;
    }

    /// Unit vector of desired movement, or zero while idle.
    #[must_use]
    pub const fn movement(&self) -> Vec2 {
        self.movement
    }

    /// Last non-zero movement direction.
    #[must_use]
    pub const fn facing(&self) -> Vec2 {
        self.facing
    }

    /// Top speed in world units per second.
    #[must_use]
    pub const fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Sets the desired movement direction; near-zero input means "stop".
    pub fn set_desired_direction(&mut self, direction: Vec2) {
        self.movement = vector::direction(direction);
        if self.movement != Vec2::ZERO {
            self.facing = self.movement;
        }
    }

    /// Rotates the desired direction by `rate × dt` radians.
    pub fn turn(&mut self, rate: f32, dt: f32) {
        self.set_desired_direction(vector::rotate(self.movement, rate * dt));
    }

    /// Integrates one tick of movement and resolves it against the level.
    pub fn update(&mut self, body: &mut Body, level: &Level, dt: f32) {
        let dt2 = dt * dt;
        self.velocity += self.movement * (self.acceleration * dt2);

        if self.velocity.length() > self.max_speed {
            self.velocity = self.velocity.normalize_or_zero() * self.max_speed;
        }

        let speed = self.velocity.length();
        let drag = self.friction * dt2;
        if drag >= speed {
            self.velocity = Vec2::ZERO;
        } else {
            self.velocity -= self.velocity / speed * drag;
        }

        self.apply_movement(body, level, self.velocity * dt);
    }

    /// Moves the body by `displacement`, pushing it out of solid tiles.
    ///
    /// Only tiles under the swept circle are visited, in row-major order,
    /// each correcting the running displacement. Corners may leave a small
    /// residual overlap.
    pub fn apply_movement(&self, body: &mut Body, level: &Level, displacement: Vec2) {
        if !displacement.is_finite() {
            return;
        }
        let mut step = displacement;
        let area =
            level.grid_area_over_capsule(body.position, body.position + step, body.radius, true);
        for coord in area.cells() {
            let tile = level.tile(coord.column(), coord.row(), true);
            if !tile.is_solid() {
                continue;
            }
            let destination = body.position + step;
            let offset = destination - tile.project(destination);
            let push = body.radius - offset.length();
            if push > 0.0 {
                step += offset.normalize_or_zero() * push;
            }
        }

        if !self.ignore_bounds {
            let destination = body.position + step;
            if destination.x - body.radius < 0.0 && step.x < 0.0 {
                step.x = 0.0;
            }
            if destination.x + body.radius > level.pixel_width() && step.x > 0.0 {
                step.x = 0.0;
            }
            if destination.y - body.radius < 0.0 && step.y < 0.0 {
                step.y = 0.0;
            }
            if destination.y + body.radius > level.pixel_height() && step.y > 0.0 {
                step.y = 0.0;
            }
        }

        body.position += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feles_core::{CollisionMask, TileType, TILE_SIZE};

    const DT: f32 = 1.0 / 60.0;

    fn open_level() -> Level {
        Level::new(32, 32).expect("valid level")
    }

    #[test]
    fn converges_to_max_speed_without_friction() {
        let level = open_level();
        let mut body = Body::new(Vec2::new(40.0, 256.0), 6.0, CollisionMask::ENEMY);
        let mut actor = Actor::new(100.0, 100_000.0, 0.0);
        actor.set_desired_direction(Vec2::X);

        for _ in 0..30 {
            actor.update(&mut body, &level, DT);
        }

        assert!((actor.velocity().length() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn friction_settles_just_below_max_speed() {
        let level = open_level();
        let mut body = Body::new(Vec2::new(40.0, 256.0), 6.0, CollisionMask::ENEMY);
        let mut actor = Actor::new(100.0, 100_000.0, 50_000.0);
        actor.set_desired_direction(Vec2::X);

        for _ in 0..30 {
            actor.update(&mut body, &level, DT);
        }

        let expected = 100.0 - 50_000.0 * DT * DT;
        assert!((actor.velocity().length() - expected).abs() < 1e-2);
    }

    #[test]
    fn friction_stops_without_reversing() {
        let level = open_level();
        let mut body = Body::new(Vec2::new(256.0, 256.0), 6.0, CollisionMask::ITEM);
        let mut actor = Actor::new(120.0, 0.0, 20_000.0);
        actor.set_velocity(Vec2::new(30.0, -40.0));
        let initial = actor.velocity();

        for _ in 0..60 {
            actor.update(&mut body, &level, DT);
            assert!(actor.velocity().dot(initial) >= 0.0);
        }
        assert_eq!(actor.velocity(), Vec2::ZERO);
    }

    #[test]
    fn tiny_directions_mean_stop() {
        let mut actor = Actor::new(100.0, 1.0, 1.0);
        actor.set_desired_direction(Vec2::new(3.0, 4.0));
        assert!((actor.movement() - Vec2::new(0.6, 0.8)).length() < 1e-5);

        actor.set_desired_direction(Vec2::new(0.0001, 0.0));
        assert_eq!(actor.movement(), Vec2::ZERO);
        assert!((actor.facing() - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn turning_rotates_heading() {
        let mut actor = Actor::new(100.0, 1.0, 1.0);
        actor.set_desired_direction(Vec2::X);
        actor.turn(std::f32::consts::PI, 0.5);
        assert!((actor.movement() - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn wall_contact_leaves_no_penetration() {
        let mut level = open_level();
        level.set_tile(10, 10, TileType::Block, true);
        let wall = level.tile(10, 10, false).clone();
        let start = Vec2::new(wall.left() - 8.0, wall.center().y);
        let mut body = Body::new(start, 6.0, CollisionMask::ENEMY);
        let mut actor = Actor::new(100.0, 100_000.0, 0.0);
        actor.set_desired_direction(Vec2::X);

        for _ in 0..60 {
            actor.update(&mut body, &level, DT);
            let gap = body.position.distance(wall.project(body.position));
            assert!(gap >= body.radius - 1e-3, "penetrated by {}", body.radius - gap);
        }
    }

    #[test]
    fn level_bounds_stop_outward_motion() {
        let level = open_level();
        let mut body = Body::new(Vec2::new(8.0, 100.0), 6.0, CollisionMask::ENEMY);
        let actor = Actor::new(100.0, 0.0, 0.0);

        actor.apply_movement(&mut body, &level, Vec2::new(-5.0, 3.0));

        assert!((body.position.x - 8.0).abs() < f32::EPSILON);
        assert!((body.position.y - 103.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ignoring_bounds_allows_leaving() {
        let level = open_level();
        let mut body = Body::new(Vec2::new(8.0, 100.0), 6.0, CollisionMask::PLAYER);
        let actor = Actor::new(100.0, 0.0, 0.0).ignoring_bounds();

        actor.apply_movement(&mut body, &level, Vec2::new(-5.0 - TILE_SIZE, 0.0));

        assert!(body.position.x < 0.0);
    }
}
