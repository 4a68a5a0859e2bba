//! Animated decorations: poofs, stars, explosions and worm segments.

use feles_core::{Archetype, TileType, Vec2};

use super::Behavior;
use crate::{
    anim::{Anim, AnimEvent},
    body::Body,
    frame::Frame,
};

pub(crate) const SEGMENT_REWARD: u32 = 2;
const EXPLOSION_RADII: [f32; 3] = [8.0, 16.0, 24.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EffectKind {
    Poof,
    Star,
    Explosion,
    Segment,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Effect {
    kind: EffectKind,
    anim: Option<Anim>,
    velocity: Vec2,
    acceleration: Vec2,
}

impl Effect {
    pub(crate) fn poof() -> Self {
        Self::animated(EffectKind::Poof, Anim::once(2, 0.1))
    }

    /// A star drifting outward and slowing to a halt.
    pub(crate) fn star(velocity: Vec2) -> Self {
        Self {
            velocity,
            acceleration: velocity * -0.5,
            ..Self::animated(EffectKind::Star, Anim::once(6, 0.1))
        }
    }

    pub(crate) fn explosion() -> Self {
        Self::animated(EffectKind::Explosion, Anim::once(5, 0.1))
    }

    /// Inert worm segment, steered by its head until it dissolves.
    pub(crate) const fn segment() -> Self {
        Self {
            kind: EffectKind::Segment,
            anim: None,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
        }
    }

    fn animated(kind: EffectKind, anim: Anim) -> Self {
        Self {
            kind,
            anim: Some(anim),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
        }
    }

    /// Starts the death fade of a worm segment.
    pub(crate) fn dissolve(&mut self) {
        if self.kind == EffectKind::Segment && self.anim.is_none() {
            self.anim = Some(Anim::once(2, 0.1));
        }
    }

    /// Blasts away every solid tile under the explosion; runes chain-react.
    fn blast(body: &Body, frame: &mut Frame<'_>) {
        let tiles: Vec<_> = frame
            .level
            .tiles_within_radius(body.position, body.radius)
            .into_iter()
            .map(|tile| (tile.coord(), tile.kind(), tile.center()))
            .collect();
        for (coord, kind, center) in tiles {
            if kind == TileType::Rune {
                frame.spawn_at(Archetype::Explosion, center);
            }
            let _ = frame.level.destroy_tile(coord);
        }
    }
}

impl Behavior for Effect {
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        self.velocity += self.acceleration * frame.dt;
        body.position += self.velocity * frame.dt;

        let Some(anim) = &mut self.anim else {
            return;
        };
        let event = anim.update(frame.dt);
        body.frame = anim.frame();
        let Some(event) = event else {
            return;
        };

        match (self.kind, event) {
            (EffectKind::Explosion, AnimEvent::Advanced(frame_index)) => {
                body.radius = EXPLOSION_RADII[frame_index.min(EXPLOSION_RADII.len() - 1)];
                Self::blast(body, frame);
            }
            (EffectKind::Explosion, AnimEvent::Finished) => {
                body.remove();
                Self::blast(body, frame);
            }
            (EffectKind::Segment, AnimEvent::Finished) => {
                body.remove();
                frame.spawn_love(body.position, SEGMENT_REWARD);
            }
            (EffectKind::Poof | EffectKind::Star, AnimEvent::Finished) => body.remove(),
            _ => {}
        }
    }
}
