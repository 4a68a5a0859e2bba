//! Physical presence shared by every entity.

use feles_core::{CollisionMask, Pose, Vec2};

/// Position, collision shape and render hints of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Centre of the entity in world space.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Collision categories the entity belongs to.
    pub collision: CollisionMask,
    /// Whether the entity should be skipped while drawing this frame.
    pub hidden: bool,
    /// Render pose hint.
    pub pose: Pose,
    /// Animation frame hint.
    pub frame: usize,
    /// Set once the entity should be purged at the end of the tick.
    pub pending_removal: bool,
}

impl Body {
    /// Creates a visible body at `position`.
    #[must_use]
    pub fn new(position: Vec2, radius: f32, collision: CollisionMask) -> Self {
        Self {
            position,
            radius,
            collision,
            hidden: false,
            pose: Pose::Normal,
            frame: 0,
            pending_removal: false,
        }
    }

    /// Whether two bodies' circles overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.position.distance(other.position) < self.radius + other.radius
    }

    /// Flags the body for removal at the end of the tick.
    pub fn remove(&mut self) {
        self.pending_removal = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_circles_do_not_overlap() {
        let a = Body::new(Vec2::ZERO, 4.0, CollisionMask::PLAYER);
        let b = Body::new(Vec2::new(8.0, 0.0), 4.0, CollisionMask::ENEMY);
        let c = Body::new(Vec2::new(7.9, 0.0), 4.0, CollisionMask::ENEMY);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }
}
