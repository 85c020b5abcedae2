//! Jump charges, variable jump duration and coyote time.
//!
//! All timestamps are tick-clock seconds ([`super::motor::TickContext::now`]), so the jump
//! state advances only with the physics tick.
use super::config::JumpConfig;
use bevy::prelude::*;
use tracing::trace;

/// Upper bound on jump charges, regardless of config.
pub const MAX_JUMP_CHARGES: u8 = 2;

/// What the active movement state asks of the jump system this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum JumpEffect {
    #[default]
    None,
    /// Landed: charges are refilled.
    Refill,
    /// Hit a roof: any rising jump ends.
    EndJump,
}

#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct Jump {
    count: u8,
    jump_end: f32,
    coyote_end: f32,
    coyote_active: bool,
}

impl Jump {
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Whether the jump timer is still running.
    pub fn is_jumping(&self, now: f32) -> bool {
        now < self.jump_end
    }

    pub fn is_coyoting(&self) -> bool {
        self.coyote_active
    }

    fn max_charges(config: &JumpConfig) -> u8 {
        config.max_charges.min(MAX_JUMP_CHARGES)
    }

    /// Spends a charge and starts the jump timer. Fails without side effects once all charges are spent.
    pub fn try_jump(&mut self, now: f32, config: &JumpConfig) -> bool {
        if self.count >= Self::max_charges(config) {
            return false;
        }
        self.count += 1;
        self.jump_end = now + config.jump_duration;
        self.coyote_active = false;
        trace!(count = self.count, "jump started");
        true
    }

    /// Ends the rising part of the jump, e.g. when the button is released.
    pub fn stop_jump(&mut self, now: f32) {
        self.jump_end = self.jump_end.min(now);
    }

    /// Opens the coyote window, unless a jump is in progress.
    pub fn start_coyoting(&mut self, now: f32, config: &JumpConfig) {
        if self.is_jumping(now) {
            return;
        }
        self.coyote_active = true;
        self.coyote_end = now + config.coyote_duration;
    }

    /// Once the coyote window elapses without a jump, a charge is spent.
    pub fn update_coyoting(&mut self, now: f32) {
        if self.coyote_active && now >= self.coyote_end {
            self.coyote_active = false;
            self.count = (self.count + 1).min(MAX_JUMP_CHARGES);
            trace!(count = self.count, "coyote time elapsed");
        }
    }

    pub fn override_count(&mut self, count: u8) {
        self.count = count.min(MAX_JUMP_CHARGES);
    }

    /// The single per-tick jump update.
    ///
    /// Applies the active state's effect, then opens the coyote window if the character left
    /// the ground without jumping, then advances that window.
    pub fn apply(&mut self, now: f32, effect: JumpEffect, left_ground: bool, config: &JumpConfig) {
        match effect {
            JumpEffect::None => {}
            JumpEffect::Refill => {
                if !self.is_jumping(now) {
                    self.count = 0;
                    self.coyote_active = false;
                }
            }
            JumpEffect::EndJump => self.stop_jump(now),
        }
        if left_ground {
            self.start_coyoting(now, config);
        }
        self.update_coyoting(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JumpConfig {
        JumpConfig {
            max_charges: 2,
            jump_speed: 10.0,
            jump_duration: 0.3,
            coyote_duration: 0.1,
        }
    }

    #[test]
    fn two_charges_then_exhausted() {
        let mut jump = Jump::default();
        assert!(jump.try_jump(0.0, &config()));
        assert!(jump.try_jump(0.1, &config()));
        assert_eq!(jump.count(), 2);

        let before = jump.clone();
        assert!(!jump.try_jump(0.2, &config()));
        assert_eq!(jump, before);
    }

    #[test]
    fn stop_jump_ends_duration_early() {
        let mut jump = Jump::default();
        jump.try_jump(1.0, &config());
        assert!(jump.is_jumping(1.2));
        jump.stop_jump(1.1);
        assert!(!jump.is_jumping(1.1));
        assert!(!jump.is_jumping(1.2));
    }

    #[test]
    fn jump_duration_is_capped() {
        let mut jump = Jump::default();
        jump.try_jump(0.0, &config());
        assert!(jump.is_jumping(0.29));
        assert!(!jump.is_jumping(0.3));
    }

    #[test]
    fn unconsumed_coyote_window_spends_one_charge() {
        let mut jump = Jump::default();
        jump.apply(1.0, JumpEffect::None, true, &config());
        assert!(jump.is_coyoting());
        assert_eq!(jump.count(), 0);

        jump.apply(1.05, JumpEffect::None, false, &config());
        assert_eq!(jump.count(), 0);

        jump.apply(1.15, JumpEffect::None, false, &config());
        assert_eq!(jump.count(), 1);
        assert!(!jump.is_coyoting());

        jump.apply(2.0, JumpEffect::None, false, &config());
        assert_eq!(jump.count(), 1);
    }

    #[test]
    fn jumping_during_coyote_cancels_it() {
        let mut jump = Jump::default();
        jump.apply(1.0, JumpEffect::None, true, &config());
        assert!(jump.try_jump(1.05, &config()));
        assert!(!jump.is_coyoting());
        jump.apply(1.5, JumpEffect::None, false, &config());
        assert_eq!(jump.count(), 1);
    }

    #[test]
    fn no_coyote_while_jumping() {
        let mut jump = Jump::default();
        jump.try_jump(0.0, &config());
        jump.start_coyoting(0.1, &config());
        assert!(!jump.is_coyoting());
    }

    #[test]
    fn refill_waits_for_jump_to_end() {
        let mut jump = Jump::default();
        jump.try_jump(0.0, &config());
        jump.apply(0.1, JumpEffect::Refill, false, &config());
        assert_eq!(jump.count(), 1);
        jump.apply(0.5, JumpEffect::Refill, false, &config());
        assert_eq!(jump.count(), 0);
    }

    #[test]
    fn roof_ends_jump() {
        let mut jump = Jump::default();
        jump.try_jump(0.0, &config());
        jump.apply(0.1, JumpEffect::EndJump, false, &config());
        assert!(!jump.is_jumping(0.1));
    }

    #[test]
    fn override_is_clamped() {
        let mut jump = Jump::default();
        jump.override_count(7);
        assert_eq!(jump.count(), 2);
        jump.override_count(1);
        assert_eq!(jump.count(), 1);
    }

    #[test]
    fn count_stays_in_range_under_coyote() {
        let mut jump = Jump::default();
        jump.override_count(2);
        jump.apply(0.0, JumpEffect::None, true, &config());
        jump.apply(1.0, JumpEffect::None, false, &config());
        assert_eq!(jump.count(), 2);
    }
}
