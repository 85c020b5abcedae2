//! Glue between the movement core and avian2d.
//!
//! Collects contacts from the contact graph, answers the sticking probe with shape casts,
//! looks up terrain under contacts and commits each tick's velocity to the rigid body.
use super::config::{JumpConfig, PhysicsConfig};
use super::contact::Contact;
use super::motor::{Body, Motor, TickContext};
use super::move_data::Modifiers;
use super::slip::Terrain;
use super::states::MoveState;
use super::sticking::{CircleProbe, PhysicsQuery, ProbeHit};
use crate::physics::GameLayer;
use crate::time::TickScale;
use avian2d::prelude::*;
use bevy::prelude::*;
use std::sync::Arc;

/// How many hits the sticking probe asks for.
const MAX_PROBE_HITS: u32 = 4;

/// A character moved by the contact-driven state machine.
#[derive(Component)]
#[require(MovementStatus, CollidingEntities)]
pub struct Character {
    pub motor: Motor,
    /// Half the height of the character's collider.
    pub half_height: f32,
}

impl Character {
    pub fn new(config: Arc<PhysicsConfig>, jump: JumpConfig, half_height: f32) -> Self {
        Self {
            motor: Motor::new(config, jump),
            half_height,
        }
    }
}

/// Read-only snapshot of a character's movement, refreshed every tick for animation, camera and AI.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementStatus {
    pub state: MoveState,
    pub grounded: bool,
    pub colliding_left: bool,
    pub colliding_right: bool,
    pub standing_still: bool,
    pub velocity: Vec2,
    pub jump_count: u8,
}

impl MovementStatus {
    fn of(motor: &Motor) -> Self {
        Self {
            state: motor.state(),
            grounded: motor.is_grounded(),
            colliding_left: motor.is_colliding_left(),
            colliding_right: motor.is_colliding_right(),
            standing_still: motor.is_standing_still(),
            velocity: motor.current_velocity(),
            jump_count: motor.jump().count(),
        }
    }
}

/// Terrain slipperyness in `[0, 1]`, on ground colliders.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Slipperyness(pub f32);

/// A movable body that characters may ride on, such as a rolling ball.
///
/// Only the part of its surface within `top_angle` degrees of straight up counts as ground
/// for the sticking probe.
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovablePlatform {
    pub top_angle: f32,
}

impl Default for MovablePlatform {
    fn default() -> Self {
        Self { top_angle: 30.0 }
    }
}

/// Sensor volume that changes movement while a character overlaps it, e.g. water.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ModifierZone {
    pub speed_multiplier: f32,
    pub gravity_multiplier: f32,
}

/// Physics queries backed by avian's spatial query pipeline.
pub struct AvianWorld<'a, 'w, 's> {
    pub spatial: &'a SpatialQuery<'w, 's>,
    pub platforms:
        &'a Query<'w, 's, (&'static MovablePlatform, &'static Position), Without<Character>>,
    pub sensors: &'a Query<'w, 's, (), With<Sensor>>,
    pub exclude: Entity,
}

impl PhysicsQuery for AvianWorld<'_, '_, '_> {
    fn circle_probe(&self, probe: &CircleProbe) -> Vec<ProbeHit> {
        let Ok(direction) = Dir2::new(probe.direction) else {
            return Vec::new();
        };
        let filter = SpatialQueryFilter::from_mask([GameLayer::World, GameLayer::Support])
            .with_excluded_entities([self.exclude]);
        self.spatial
            .shape_hits(
                &Collider::circle(probe.radius),
                probe.origin,
                0.0,
                direction,
                MAX_PROBE_HITS,
                &ShapeCastConfig::from_max_distance(probe.max_distance),
                &filter,
            )
            .into_iter()
            .map(|hit| ProbeHit {
                collider: hit.entity,
                distance: hit.distance,
                point: hit.point1,
                normal: hit.normal1,
                is_trigger: self.sensors.contains(hit.entity),
            })
            .collect()
    }

    fn platform_top(&self, collider: Entity, point: Vec2) -> Option<bool> {
        let (platform, position) = self.platforms.get(collider).ok()?;
        let from_center = point - position.0;
        let on_top = from_center.y > 0.0
            && from_center.angle_to(Vec2::Y).abs().to_degrees() <= platform.top_angle;
        Some(on_top)
    }
}

/// Terrain lookup through [`Slipperyness`] components.
pub struct AvianTerrain<'a, 'w, 's> {
    pub spatial: &'a SpatialQuery<'w, 's>,
    pub surfaces: &'a Query<'w, 's, &'static Slipperyness>,
}

impl Terrain for AvianTerrain<'_, '_, '_> {
    fn slipperyness(&self, point: Vec2) -> Option<f32> {
        let filter = SpatialQueryFilter::from_mask([GameLayer::World, GameLayer::Support]);
        self.spatial
            .point_intersections(point, &filter)
            .into_iter()
            .filter_map(|e| self.surfaces.get(e).ok())
            .map(|s| s.0)
            .reduce(f32::max)
    }
}

/// Feeds this tick's touching contacts into every character's motor.
pub(crate) fn collect_contacts(
    mut characters: Query<(Entity, &mut Character)>,
    collisions: Collisions,
    sensors: Query<(), With<Sensor>>,
) {
    for (entity, mut character) in characters.iter_mut() {
        for pair in collisions.collisions_with(entity) {
            if !pair.is_touching() {
                continue;
            }
            let (other, flip) = if pair.collider1 == entity {
                (pair.collider2, -1.0)
            } else {
                (pair.collider1, 1.0)
            };
            if sensors.contains(other) {
                continue;
            }
            for manifold in &pair.manifolds {
                // Manifold normals point from collider1 to collider2.
                let normal = manifold.normal * flip;
                for point in manifold.points.iter() {
                    if !character.motor.add_contact(Contact::new(point.point, normal, other)) {
                        trace!(?entity, "contact dropped");
                    }
                }
            }
        }
    }
}

/// Applies overlapping [`ModifierZone`]s for the coming tick.
pub(crate) fn apply_modifier_zones(
    mut characters: Query<(&mut Character, &CollidingEntities)>,
    zones: Query<&ModifierZone>,
) {
    for (mut character, colliding) in characters.iter_mut() {
        let modifiers = zones
            .iter_many(colliding.iter())
            .fold(Modifiers::default(), |acc, zone| Modifiers {
                move_speed_multiplier: acc.move_speed_multiplier * zone.speed_multiplier,
                gravity_multiplier: acc.gravity_multiplier * zone.gravity_multiplier,
            });
        character.motor.set_modifiers(modifiers);
    }
}

/// Runs one movement tick per character and commits the result to its body.
pub(crate) fn tick_characters(
    mut characters: Query<(
        Entity,
        &mut Character,
        &mut Position,
        &mut LinearVelocity,
        &mut MovementStatus,
    )>,
    spatial: SpatialQuery,
    platforms: Query<(&'static MovablePlatform, &'static Position), Without<Character>>,
    sensors: Query<(), With<Sensor>>,
    surfaces: Query<&'static Slipperyness>,
    time: Res<Time<Fixed>>,
    scale: Res<TickScale>,
) {
    let tick = TickContext::new(time.delta_secs(), scale.0, time.elapsed_secs());
    let terrain = AvianTerrain {
        spatial: &spatial,
        surfaces: &surfaces,
    };
    for (entity, mut character, mut position, mut velocity, mut status) in characters.iter_mut() {
        let world = AvianWorld {
            spatial: &spatial,
            platforms: &platforms,
            sensors: &sensors,
            exclude: entity,
        };
        let body = Body {
            position: position.0,
            half_height: character.half_height,
        };
        // Horizontal velocity belongs to the directives; vertical is whatever the solver left.
        let synced = Vec2::new(character.motor.current_velocity().x, velocity.y);
        character.motor.sync_velocity(synced);

        let outcome = character.motor.on_physics_tick(body, &tick, &world, &terrain);
        if outcome.snap > 0.0 {
            position.0.y -= outcome.snap;
        }
        velocity.0 = outcome.velocity;
        *status = MovementStatus::of(&character.motor);
    }
}
