//! Per-session progress: love meter, clock and cat bookkeeping.

use std::time::Duration;

use feles_core::Mission;

#[derive(Debug)]
pub(crate) struct Session {
    mission: Mission,
    love: u32,
    elapsed: Duration,
    ticks: u64,
    dud_shots: u32,
    outcome: Option<bool>,
}

impl Session {
    pub(crate) fn new(mission: Mission) -> Self {
        Self {
            mission,
            love: 0,
            elapsed: Duration::ZERO,
            ticks: 0,
            dud_shots: 0,
            outcome: None,
        }
    }

    pub(crate) const fn mission(&self) -> &Mission {
        &self.mission
    }

    pub(crate) const fn love(&self) -> u32 {
        self.love
    }

    pub(crate) const fn quota(&self) -> u32 {
        self.mission.love_quota
    }

    /// Adds love up to the quota. Returns `true` once the quota is met.
    pub(crate) fn gain_love(&mut self, amount: u32) -> bool {
        if self.love >= self.quota() {
            return true;
        }
        self.love = self.love.saturating_add(amount).min(self.quota());
        self.love >= self.quota()
    }

    /// Removes love down to zero. Returns `true` once the meter is empty.
    pub(crate) fn lose_love(&mut self, amount: u32) -> bool {
        if self.love == 0 {
            return true;
        }
        self.love = self.love.saturating_sub(amount);
        self.love == 0
    }

    /// Counts a player shot the cat shrugged off and returns the running total.
    pub(crate) fn record_dud_shot(&mut self) -> u32 {
        self.dud_shots += 1;
        self.dud_shots
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.ticks += 1;
    }

    pub(crate) const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Records completion and reports whether it beat the mission's par time.
    pub(crate) fn complete(&mut self) -> bool {
        let under_par = self.elapsed.as_secs_f32() < self.mission.par_time as f32;
        self.outcome = Some(under_par);
        under_par
    }

    pub(crate) const fn outcome(&self) -> Option<bool> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(quota: u32) -> Session {
        Session::new(Mission {
            love_quota: quota,
            ..Mission::default()
        })
    }

    #[test]
    fn love_saturates_at_quota() {
        let mut session = session(5);
        assert!(!session.gain_love(3));
        assert!(session.gain_love(4));
        assert_eq!(session.love(), 5);
        assert!(session.gain_love(1));
    }

    #[test]
    fn love_bottoms_out_at_zero() {
        let mut session = session(50);
        let _ = session.gain_love(15);
        assert!(!session.lose_love(10));
        assert!(session.lose_love(10));
        assert_eq!(session.love(), 0);
        assert!(session.lose_love(1));
    }

    #[test]
    fn completion_compares_against_par() {
        let mut session = session(1);
        session.advance(Duration::from_secs(30));
        assert!(session.complete());
        assert_eq!(session.outcome(), Some(true));
        assert_eq!(session.ticks(), 1);
    }
}
