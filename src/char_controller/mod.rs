//! Contact-driven character movement.
//!
//! Every physics tick, the contacts a character touches are bucketed by angle into one of five
//! movement states (grounded, sloped, walled, roofed or airborne) and the winning state turns the
//! requested direction into a velocity. Player and NPCs share the same [`motor::Motor`]; they only
//! differ in who calls `move_dir`, `push`, `stop` and the jump methods.
//!
//! The core modules are plain logic over [`sticking::PhysicsQuery`] and [`slip::Terrain`];
//! [`avian`] implements those for avian2d and wires the motor into `FixedUpdate`.

pub mod avian;
pub mod classify;
pub mod config;
pub mod contact;
pub mod jump;
pub mod motor;
pub mod move_data;
pub mod slip;
pub mod states;
pub mod sticking;

use crate::time::MovementSystems;
use bevy::prelude::*;
use config::MovementConfig;
use std::sync::Arc;

/// Re-exports common types related to character movement.
pub mod prelude {
    pub use super::SharedPhysicsConfig;
    pub use super::avian::{
        Character, ModifierZone, MovablePlatform, MovementStatus, Slipperyness,
    };
    pub use super::config::{JumpConfig, MovementConfig, PhysicsConfig};
    pub use super::motor::Motor;
    pub use super::states::MoveState;
}

const CONFIG_PATH: &str = "assets/movement/config.ron";

/// The validated physics config, shared by every character spawned with it.
#[derive(Resource, Clone, Debug)]
pub struct SharedPhysicsConfig(pub Arc<config::PhysicsConfig>);

pub(crate) fn plugin(app: &mut App) {
    let config = MovementConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        error!("invalid movement config {CONFIG_PATH}: {e}; using defaults");
        MovementConfig::default()
    });
    info!(
        slope_angle = config.physics.slope_angle,
        wall_angle = config.physics.wall_angle,
        "movement config loaded"
    );

    app.insert_resource(SharedPhysicsConfig(Arc::new(config.physics.clone())))
        .insert_resource(config)
        .register_type::<MovementConfig>()
        .register_type::<avian::MovementStatus>()
        .register_type::<avian::Slipperyness>()
        .register_type::<avian::MovablePlatform>()
        .register_type::<avian::ModifierZone>()
        .add_systems(
            FixedUpdate,
            (
                avian::collect_contacts.in_set(MovementSystems::CollectContacts),
                avian::apply_modifier_zones.in_set(MovementSystems::ApplyZones),
                avian::tick_characters.in_set(MovementSystems::Tick),
            ),
        );
}
