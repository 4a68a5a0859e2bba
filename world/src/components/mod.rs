//! Per-archetype behaviour attached to entities.

mod barrel;
mod blargh;
mod cat;
mod effect;
mod gopnik;
mod knight;
mod love;
pub(crate) mod mob;
mod player;
mod shot;
mod worm;

pub(crate) use self::{
    barrel::Barrel,
    blargh::Blargh,
    cat::{poof_ring, Cat},
    effect::Effect,
    gopnik::Gopnik,
    knight::Knight,
    love::{Love, LOVE_RADIUS, LOVE_SPEED},
    player::Player,
    shot::{Shot, SHOT_RADIUS},
    worm::{Trail, Worm, WORM_SEGMENTS},
};

use feles_core::Vec2;

use crate::{body::Body, entity::Contact, frame::Frame};
use mob::Mob;

/// Hooks invoked by the scene during the update and collision phases.
pub(crate) trait Behavior {
    /// Advances the component by one tick.
    fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>);

    /// Reacts to overlapping `contact`; the contact sees the mirrored call separately.
    fn on_collision(&mut self, _body: &mut Body, _contact: &Contact, _frame: &mut Frame<'_>) {}
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Component {
    Player(Player),
    Knight(Knight),
    Blargh(Blargh),
    Gopnik(Gopnik),
    Worm(Worm),
    Cat(Cat),
    Shot(Shot),
    Love(Love),
    Barrel(Barrel),
    Effect(Effect),
}

impl Component {
    fn behavior(&mut self) -> &mut dyn Behavior {
        match self {
            Self::Player(player) => player,
            Self::Knight(knight) => knight,
            Self::Blargh(blargh) => blargh,
            Self::Gopnik(gopnik) => gopnik,
            Self::Worm(worm) => worm,
            Self::Cat(cat) => cat,
            Self::Shot(shot) => shot,
            Self::Love(love) => love,
            Self::Barrel(barrel) => barrel,
            Self::Effect(effect) => effect,
        }
    }

    pub(crate) fn update(&mut self, body: &mut Body, frame: &mut Frame<'_>) {
        self.behavior().update(body, frame);
    }

    pub(crate) fn on_collision(
        &mut self,
        body: &mut Body,
        contact: &Contact,
        frame: &mut Frame<'_>,
    ) {
        self.behavior().on_collision(body, contact, frame);
    }

    pub(crate) const fn mob(&self) -> Option<&Mob> {
        match self {
            Self::Knight(knight) => Some(&knight.mob),
            Self::Blargh(blargh) => Some(&blargh.mob),
            Self::Gopnik(gopnik) => Some(&gopnik.mob),
            Self::Worm(worm) => Some(&worm.mob),
            Self::Cat(cat) => Some(&cat.mob),
            _ => None,
        }
    }

    /// Velocity of physically simulated components.
    pub(crate) fn velocity(&self) -> Option<Vec2> {
        match self {
            Self::Player(player) => Some(player.actor.velocity()),
            Self::Love(love) => Some(love.actor.velocity()),
            Self::Shot(shot) => Some(shot.velocity()),
            other => other.mob().map(|mob| mob.actor.velocity()),
        }
    }

    pub(crate) const fn trail(&self) -> Option<&Trail> {
        match self {
            Self::Worm(worm) => Some(worm.trail()),
            _ => None,
        }
    }

    pub(crate) const fn shot(&self) -> Option<&Shot> {
        match self {
            Self::Shot(shot) => Some(shot),
            _ => None,
        }
    }

    pub(crate) const fn barrel(&self) -> Option<&Barrel> {
        match self {
            Self::Barrel(barrel) => Some(barrel),
            _ => None,
        }
    }
}
