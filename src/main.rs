// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

mod actors;
mod char_controller;
#[cfg(feature = "dev")]
mod dev_tools;
mod input;
mod level;
mod physics;
mod time;

use bevy::prelude::*;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        // Add Bevy plugins.
        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Ledgewalk".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }
                    .into(),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        );

        // The movement core runs on a fixed 60 Hz tick.
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Add other plugins.
        app.add_plugins((
            time::plugin,
            physics::plugin,
            char_controller::plugin,
            input::plugin,
            actors::plugin,
            level::plugin,
            #[cfg(feature = "dev")]
            dev_tools::plugin,
        ));
    }
}
