use crate::char_controller::prelude::*;
use crate::physics::{ColliderShape, GameLayer};
use crate::time::MovementSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy_transform_interpolation::prelude::*;
use serde::Deserialize;
use std::fs::read_to_string;

/// Tuning for one kind of character, read from `assets/actors/<id>.ron`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ActorDefinition {
    pub collider: ColliderShape,
    pub speed: f32,
    /// Overrides the shared jump tuning.
    pub jump: Option<JumpConfig>,
    pub color: (f32, f32, f32),
}

impl Default for ActorDefinition {
    fn default() -> Self {
        Self {
            collider: ColliderShape::default(),
            speed: 160.0,
            jump: None,
            color: (0.9, 0.9, 0.9),
        }
    }
}

impl ActorDefinition {
    pub fn load(id: &str) -> Self {
        let path = format!("assets/actors/{}.ron", id.to_lowercase());
        let Some(source) = read_to_string(&path).ok() else {
            warn!("did not find an actor file at {path}");
            return Self::default();
        };
        ron::de::from_str::<ActorDefinition>(&source)
            .map_err(|e| warn!("could not parse {path}: {e}"))
            .unwrap_or_default()
    }
}

/// The character driven by player input.
#[derive(Component, Debug, Default)]
pub struct Player {
    pub speed: f32,
}

/// Walks back and forth, turning around whenever it bumps into something.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Pacer {
    pub direction: f32,
    pub speed: f32,
}

pub fn actor_bundle(
    definition: &ActorDefinition,
    physics: &SharedPhysicsConfig,
    jump: &JumpConfig,
    position: Vec2,
) -> impl Bundle {
    let shape = definition.collider;
    let (r, g, b) = definition.color;
    let size = Vec2::new(
        match shape {
            ColliderShape::Ball(radius) | ColliderShape::Capsule(radius, _) => radius * 2.,
            ColliderShape::Cuboid(w, _) => w,
        },
        shape.half_height() * 2.,
    );
    (
        Character::new(
            physics.0.clone(),
            definition.jump.clone().unwrap_or_else(|| jump.clone()),
            shape.half_height(),
        ),
        RigidBody::Dynamic,
        Collider::from(shape),
        LockedAxes::ROTATION_LOCKED,
        GravityScale(0.0),
        Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
        GameLayer::character(),
        TranslationInterpolation,
        Sprite::from_color(Color::srgb(r, g, b), size),
        Transform::from_translation(position.extend(1.0)),
    )
}

pub(crate) fn plugin(app: &mut App) {
    app.register_type::<Pacer>()
        .add_systems(Startup, spawn_actors)
        .add_systems(
            FixedUpdate,
            pace.in_set(MovementSystems::Directives),
        );
}

fn spawn_actors(
    mut commands: Commands,
    physics: Res<SharedPhysicsConfig>,
    config: Res<MovementConfig>,
) {
    let player = ActorDefinition::load("player");
    info!(speed = player.speed, "spawning player");
    let player_entity = commands
        .spawn((
            Name::new("Player"),
            Player {
                speed: player.speed,
            },
            actor_bundle(&player, &physics, &config.jump, Vec2::new(-200.0, 80.0)),
        ))
        .id();
    crate::input::bind_player(&mut commands, player_entity);

    let walker = ActorDefinition::load("walker");
    commands.spawn((
        Name::new("Walker"),
        Pacer {
            direction: 1.0,
            speed: walker.speed,
        },
        actor_bundle(&walker, &physics, &config.jump, Vec2::new(60.0, 80.0)),
    ));
}

fn pace(mut pacers: Query<(&mut Pacer, &mut Character, &MovementStatus)>) {
    for (mut pacer, mut character, status) in pacers.iter_mut() {
        if (pacer.direction > 0.0 && status.colliding_right)
            || (pacer.direction < 0.0 && status.colliding_left)
        {
            pacer.direction = -pacer.direction;
        }
        character
            .motor
            .move_dir(Vec2::new(pacer.direction, 0.0), pacer.speed);
    }
}
