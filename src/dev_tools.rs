//! Development tools for the game. This plugin is only enabled in dev builds.

use crate::char_controller::prelude::*;
use avian2d::prelude::PhysicsDebugPlugin;
use bevy::{input::common_conditions::input_just_pressed, prelude::*};
use bevy_inspector_egui::bevy_egui::EguiPlugin;

/// Whether movement gizmos are drawn.
#[derive(Resource, Default)]
struct ShowMovement(bool);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ShowMovement>()
        .add_systems(
            Update,
            (
                toggle_movement_gizmos.run_if(input_just_pressed(TOGGLE_KEY)),
                draw_movement.run_if(|show: Res<ShowMovement>| show.0),
            ),
        );
    //inspect stuff and things
    app.add_plugins((
        EguiPlugin::default(),
        bevy_inspector_egui::quick::WorldInspectorPlugin::new(),
        PhysicsDebugPlugin::default(),
    ));
}

const TOGGLE_KEY: KeyCode = KeyCode::Backquote;

fn toggle_movement_gizmos(mut show: ResMut<ShowMovement>) {
    show.0 = !show.0;
}

fn state_color(state: MoveState) -> Color {
    match state {
        MoveState::Grounded => Color::srgb(0.2, 0.9, 0.2),
        MoveState::Sloped => Color::srgb(0.9, 0.9, 0.2),
        MoveState::Walled => Color::srgb(0.9, 0.5, 0.1),
        MoveState::Roofed => Color::srgb(0.9, 0.1, 0.1),
        MoveState::Airborne => Color::srgb(0.4, 0.6, 1.0),
    }
}

fn draw_movement(mut gizmos: Gizmos, characters: Query<(&GlobalTransform, &MovementStatus)>) {
    for (transform, status) in characters.iter() {
        let origin = transform.translation().truncate();
        let color = state_color(status.state);
        gizmos.arrow_2d(origin, origin + status.velocity * 0.1, color);
        if status.colliding_left {
            gizmos.line_2d(origin, origin - Vec2::X * 12.0, color);
        }
        if status.colliding_right {
            gizmos.line_2d(origin, origin + Vec2::X * 12.0, color);
        }
    }
}
