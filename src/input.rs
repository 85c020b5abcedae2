use crate::actors::Player;
use crate::char_controller::prelude::*;
use crate::time::Pause;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

#[derive(InputAction)]
#[action_output(f32)]
pub struct Move;

#[derive(InputAction)]
#[action_output(bool)]
pub struct JumpAction;

#[derive(InputAction)]
#[action_output(bool)]
pub struct TogglePause;

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(EnhancedInputPlugin)
        .add_input_context::<Player>()
        .add_observer(walk)
        .add_observer(halt)
        .add_observer(jump)
        .add_observer(release_jump)
        .add_observer(toggle_pause);
}

pub fn bind_player(commands: &mut Commands, player: Entity) {
    commands.entity(player).insert(actions!(Player[
        (
            Action::<Move>::new(),
            Bindings::spawn((
                Bidirectional::new(KeyCode::KeyD, KeyCode::KeyA),
                Bidirectional::new(KeyCode::ArrowRight, KeyCode::ArrowLeft),
            )),
        ),
        (Action::<JumpAction>::new(), bindings![KeyCode::Space, KeyCode::KeyW]),
        (Action::<TogglePause>::new(), bindings![KeyCode::Escape]),
    ]));
}

fn walk(movement: On<Fire<Move>>, mut players: Query<(&Player, &mut Character)>) {
    let Ok((player, mut character)) = players.get_mut(movement.context) else {
        return;
    };
    character
        .motor
        .move_dir(Vec2::new(movement.value, 0.0), player.speed);
}

fn halt(movement: On<Complete<Move>>, mut players: Query<&mut Character, With<Player>>) {
    if let Ok(mut character) = players.get_mut(movement.context) {
        character.motor.stop();
    }
}

fn jump(
    pressed: On<Start<JumpAction>>,
    mut players: Query<&mut Character, With<Player>>,
    time: Res<Time<Fixed>>,
) {
    let Ok(mut character) = players.get_mut(pressed.context) else {
        return;
    };
    if !character.motor.try_jump(time.elapsed_secs()) {
        debug!("no jump charges left");
    }
}

fn release_jump(
    released: On<Complete<JumpAction>>,
    mut players: Query<&mut Character, With<Player>>,
    time: Res<Time<Fixed>>,
) {
    if let Ok(mut character) = players.get_mut(released.context) {
        character.motor.stop_jump(time.elapsed_secs());
    }
}

fn toggle_pause(_: On<Start<TogglePause>>, mut commands: Commands) {
    commands.trigger(Pause::Toggle);
}
