use avian2d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Static level geometry.
    World,
    /// Things characters can stand on that move, like rolling balls.
    Support,
    Character,
    /// Sensors such as water volumes.
    Trigger,
}

impl GameLayer {
    pub fn world() -> CollisionLayers {
        CollisionLayers::new(GameLayer::World, [GameLayer::Character, GameLayer::Support])
    }

    pub fn support() -> CollisionLayers {
        CollisionLayers::new(
            GameLayer::Support,
            [GameLayer::World, GameLayer::Character, GameLayer::Support],
        )
    }

    pub fn character() -> CollisionLayers {
        CollisionLayers::new(
            GameLayer::Character,
            [GameLayer::World, GameLayer::Support, GameLayer::Trigger],
        )
    }

    pub fn trigger() -> CollisionLayers {
        CollisionLayers::new(GameLayer::Trigger, [GameLayer::Character])
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ColliderShape {
    Ball(f32),
    Cuboid(f32, f32),
    Capsule(f32, f32),
}

impl ColliderShape {
    /// Half the vertical extent of the shape.
    pub fn half_height(&self) -> f32 {
        match *self {
            ColliderShape::Ball(radius) => radius,
            ColliderShape::Cuboid(_, h) => h / 2.,
            ColliderShape::Capsule(radius, length) => radius + length / 2.,
        }
    }
}

impl From<ColliderShape> for Collider {
    fn from(value: ColliderShape) -> Self {
        match value {
            ColliderShape::Ball(radius) => Collider::circle(radius),
            ColliderShape::Cuboid(w, h) => Collider::rectangle(w, h),
            ColliderShape::Capsule(radius, length) => Collider::capsule(radius, length),
        }
    }
}

impl Default for ColliderShape {
    fn default() -> Self {
        ColliderShape::Capsule(6.0, 12.0)
    }
}

/// Gravity for plain rigid bodies such as the rolling ball. Matches the movement core's default
/// so props and characters fall alike.
pub const WORLD_GRAVITY: f32 = 1400.0;

fn world_gravity() -> Gravity {
    Gravity(Vec2::NEG_Y * WORLD_GRAVITY)
}

pub(crate) fn plugin(app: &mut App) {
    // Characters integrate their own gravity and spawn with `GravityScale(0.0)`.
    app.add_plugins(PhysicsPlugins::default().with_length_unit(20.0))
        .insert_resource(world_gravity());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_controller::prelude::PhysicsConfig;

    #[test]
    fn world_gravity_matches_character_gravity() {
        let gravity = world_gravity();
        assert_eq!(gravity.0, Vec2::new(0.0, -PhysicsConfig::default().gravity));
    }

    #[test]
    fn half_heights() {
        assert_eq!(ColliderShape::Ball(3.0).half_height(), 3.0);
        assert_eq!(ColliderShape::Cuboid(4.0, 10.0).half_height(), 5.0);
        assert_eq!(ColliderShape::Capsule(6.0, 12.0).half_height(), 12.0);
    }
}
