use bevy::prelude::*;

/// Scale applied to the fixed step length by the movement core. Set once, read every tick.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct TickScale(pub f32);

impl Default for TickScale {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Per-tick ordering of the movement core in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum MovementSystems {
    /// Characters decide where they want to go.
    Directives,
    CollectContacts,
    ApplyZones,
    Tick,
}

#[derive(Event, Debug, Clone, Copy)]
pub enum Pause {
    Toggle,
    Enable,
    Disable,
}

pub(crate) fn plugin(app: &mut App) {
    app.init_resource::<TickScale>()
        .register_type::<TickScale>()
        .configure_sets(
            FixedUpdate,
            (
                MovementSystems::Directives,
                MovementSystems::CollectContacts,
                MovementSystems::ApplyZones,
                MovementSystems::Tick,
            )
                .chain(),
        )
        .add_observer(toggle_pause);
}

fn toggle_pause(obs: On<Pause>, mut virtual_time: ResMut<Time<Virtual>>) {
    match obs.event() {
        Pause::Toggle => {
            if virtual_time.is_paused() {
                virtual_time.unpause();
            } else {
                virtual_time.pause();
            }
        }
        Pause::Enable => virtual_time.pause(),
        Pause::Disable => virtual_time.unpause(),
    }
    info!(paused = virtual_time.is_paused(), "pause toggled");
}
