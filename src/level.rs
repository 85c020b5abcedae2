//! A small test course touching every movement state.
use crate::char_controller::prelude::*;
use crate::physics::GameLayer;
use avian2d::prelude::*;
use bevy::prelude::*;

const GROUND: Color = Color::srgb(0.35, 0.3, 0.25);
const ICE: Color = Color::srgb(0.7, 0.85, 1.0);
const WATER: Color = Color::srgba(0.2, 0.4, 0.9, 0.4);

pub(crate) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

fn block(name: &'static str, center: Vec2, size: Vec2, degrees: f32, color: Color) -> impl Bundle {
    (
        Name::new(name),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        GameLayer::world(),
        Sprite::from_color(color, size),
        Transform::from_translation(center.extend(0.0))
            .with_rotation(Quat::from_rotation_z(degrees.to_radians())),
    )
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 0.5,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 40.0, 0.0),
    ));

    let floor = Vec2::new(200.0, 20.0);
    commands.spawn(block("Floor", Vec2::new(-200.0, 0.0), floor, 0.0, GROUND));
    // A one-unit step down, small enough for the sticking probe.
    commands.spawn(block("Step", Vec2::new(0.0, -1.0), floor, 0.0, GROUND));
    commands.spawn((
        block("Ice", Vec2::new(200.0, -1.0), floor, 0.0, ICE),
        Slipperyness(0.9),
    ));
    commands.spawn(block("Gentle slope", Vec2::new(-330.0, 30.0), Vec2::new(120.0, 10.0), -20.0, GROUND));
    commands.spawn(block("Steep slope", Vec2::new(330.0, 40.0), Vec2::new(120.0, 10.0), 55.0, GROUND));
    commands.spawn(block("Left wall", Vec2::new(-400.0, 100.0), Vec2::new(20.0, 200.0), 0.0, GROUND));
    commands.spawn(block("Right wall", Vec2::new(400.0, 100.0), Vec2::new(20.0, 200.0), 0.0, GROUND));
    commands.spawn(block("Roof", Vec2::new(-150.0, 90.0), Vec2::new(120.0, 10.0), 0.0, GROUND));

    commands.spawn((
        Name::new("Rolling ball"),
        RigidBody::Dynamic,
        Collider::circle(16.0),
        GameLayer::support(),
        MovablePlatform::default(),
        Sprite::from_color(GROUND, Vec2::splat(32.0)),
        Transform::from_xyz(100.0, 40.0, 0.0),
    ));

    commands.spawn((
        Name::new("Pool"),
        Sensor,
        Collider::rectangle(120.0, 60.0),
        GameLayer::trigger(),
        ModifierZone {
            speed_multiplier: 0.5,
            gravity_multiplier: 0.3,
        },
        Sprite::from_color(WATER, Vec2::new(120.0, 60.0)),
        Transform::from_xyz(-260.0, 40.0, 2.0),
    ));
}
