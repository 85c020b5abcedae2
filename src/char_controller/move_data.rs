use super::config::PhysicsConfig;
use super::motor::TickContext;
use bevy::prelude::*;
use std::sync::Arc;

/// Environment multipliers, e.g. from water. Reset after every tick unless re-applied.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct Modifiers {
    pub move_speed_multiplier: f32,
    pub gravity_multiplier: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            move_speed_multiplier: 1.0,
            gravity_multiplier: 1.0,
        }
    }
}

/// Mutable per-character movement context.
#[derive(Clone, Debug)]
pub struct MoveData {
    pub velocity: Vec2,
    pub raw_speed: f32,
    /// Requested horizontal direction: -1, 0 or 1.
    pub sign: i8,
    pub colliding_left: bool,
    pub colliding_right: bool,
    pub modifiers: Modifiers,
    config: Arc<PhysicsConfig>,
}

impl MoveData {
    pub fn new(config: Arc<PhysicsConfig>) -> Self {
        Self {
            velocity: Vec2::ZERO,
            raw_speed: 0.0,
            sign: 0,
            colliding_left: false,
            colliding_right: false,
            modifiers: Modifiers::default(),
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn move_speed(&self) -> f32 {
        self.raw_speed * self.modifiers.move_speed_multiplier
    }

    pub fn sign_f32(&self) -> f32 {
        self.sign as f32
    }

    pub fn gravity_per_tick(&self, tick: &TickContext) -> f32 {
        self.config.gravity * self.modifiers.gravity_multiplier * tick.step()
    }

    /// Vertical velocity after one tick of gravity, never faster than the max fall speed.
    pub fn capped_gravity(&self, tick: &TickContext) -> f32 {
        capped_gravity(
            self.velocity.y,
            self.gravity_per_tick(tick),
            self.config.max_fall_speed,
        )
    }

    /// Whether the requested direction points at a side that is blocked this tick.
    pub fn pushing_into_collision(&self) -> bool {
        (self.sign < 0 && self.colliding_left) || (self.sign > 0 && self.colliding_right)
    }
}

/// Applies one tick of gravity to `vy`, clamped at `-max_fall_speed`.
pub fn capped_gravity(vy: f32, gravity_per_tick: f32, max_fall_speed: f32) -> f32 {
    (vy - gravity_per_tick).max(-max_fall_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capped_gravity_clamps_at_max_fall_speed() {
        assert_eq!(capped_gravity(-19.9, 1.0, 20.0), -20.0);
        assert_eq!(capped_gravity(5.0, 1.0, 20.0), 4.0);
    }

    #[test]
    fn capped_gravity_never_goes_below_max_fall_speed() {
        for vy in [-1000.0, -20.0, -19.0, 0.0, 3.5, 500.0] {
            for g in [0.0, 0.5, 1.0, 40.0] {
                assert!(capped_gravity(vy, g, 20.0) >= -20.0, "vy={vy} g={g}");
            }
        }
    }

    #[test]
    fn modifiers_scale_speed_and_gravity() {
        let mut data = MoveData::new(Arc::new(PhysicsConfig {
            gravity: 100.0,
            ..default()
        }));
        data.raw_speed = 200.0;
        data.modifiers = Modifiers {
            move_speed_multiplier: 0.5,
            gravity_multiplier: 0.25,
        };
        let tick = TickContext::new(0.1, 1.0, 0.0);
        assert_eq!(data.move_speed(), 100.0);
        assert!((data.gravity_per_tick(&tick) - 2.5).abs() < 1e-5);
    }

    #[test]
    fn pushing_into_collision_follows_sign() {
        let mut data = MoveData::new(Arc::new(PhysicsConfig::default()));
        data.colliding_right = true;
        data.sign = 1;
        assert!(data.pushing_into_collision());
        data.sign = -1;
        assert!(!data.pushing_into_collision());
        data.sign = 0;
        assert!(!data.pushing_into_collision());
    }
}
