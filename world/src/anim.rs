//! Frame-stepped animation clocks.

/// Reported by [`Anim::update`] whenever the frame changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AnimEvent {
    /// Moved on to the contained frame.
    Advanced(usize),
    /// A non-looping animation reached its end. Reported once.
    Finished,
}

/// Counts animation frames at a fixed number of seconds per frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Anim {
    frames: usize,
    seconds_per_frame: f32,
    looping: bool,
    timer: f32,
    frame: usize,
    finished: bool,
}

impl Anim {
    /// Plays `frames` frames once.
    pub(crate) fn once(frames: usize, seconds_per_frame: f32) -> Self {
        Self {
            frames: frames.max(1),
            seconds_per_frame,
            looping: false,
            timer: 0.0,
            frame: 0,
            finished: false,
        }
    }

    /// Cycles through `frames` frames forever.
    pub(crate) fn looping(frames: usize, seconds_per_frame: f32) -> Self {
        Self {
            looping: true,
            ..Self::once(frames, seconds_per_frame)
        }
    }

    pub(crate) const fn frame(&self) -> usize {
        self.frame
    }

    pub(crate) fn set_seconds_per_frame(&mut self, seconds_per_frame: f32) {
        self.seconds_per_frame = seconds_per_frame;
    }

    /// Advances the clock, reporting at most one frame change per call.
    pub(crate) fn update(&mut self, dt: f32) -> Option<AnimEvent> {
        if self.finished {
            return None;
        }
        self.timer += dt;
        if self.timer <= self.seconds_per_frame {
            return None;
        }
        self.timer = 0.0;
        self.frame += 1;
        if self.frame < self.frames {
            return Some(AnimEvent::Advanced(self.frame));
        }
        if self.looping {
            self.frame = 0;
            Some(AnimEvent::Advanced(0))
        } else {
            self.frame = self.frames - 1;
            self.finished = true;
            Some(AnimEvent::Finished)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_finishes_exactly_once() {
        let mut anim = Anim::once(2, 0.1);

        assert_eq!(anim.update(0.05), None);
        assert_eq!(anim.update(0.06), Some(AnimEvent::Advanced(1)));
        assert_eq!(anim.update(0.11), Some(AnimEvent::Finished));
        assert_eq!(anim.frame(), 1);
        assert_eq!(anim.update(1.0), None);
    }

    #[test]
    fn looping_wraps_to_first_frame() {
        let mut anim = Anim::looping(2, 0.5);

        assert_eq!(anim.update(0.6), Some(AnimEvent::Advanced(1)));
        assert_eq!(anim.update(0.6), Some(AnimEvent::Advanced(0)));
        assert_eq!(anim.frame(), 0);
    }
}
