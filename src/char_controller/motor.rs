//! Per-character movement state machine.
//!
//! [`Motor`] owns everything one character needs to turn this tick's contacts into a velocity.
//! The caller feeds contacts in, calls [`Motor::on_physics_tick`] once per fixed step and commits
//! the returned velocity and snap to its physics body.
use super::classify::{CollisionFlags, StateBuffers, classify};
use super::config::{JumpConfig, PhysicsConfig};
use super::contact::{Contact, ContactBuffer};
use super::jump::Jump;
use super::move_data::{Modifiers, MoveData};
use super::slip::{Terrain, contact_slipperyness};
use super::states::MoveState;
use super::sticking::{PhysicsQuery, try_stick};
use bevy::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Horizontal speed under which a grounded character counts as standing still.
const STILL_EPSILON: f32 = 0.01;

/// Timing for one fixed physics step.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct TickContext {
    /// Fixed step length in seconds.
    pub delta: f32,
    /// Injected tick-length scale factor.
    pub scale: f32,
    /// Tick-clock time in seconds at this step.
    pub now: f32,
}

impl TickContext {
    pub fn new(delta: f32, scale: f32, now: f32) -> Self {
        Self { delta, scale, now }
    }

    /// Scaled step length.
    pub fn step(&self) -> f32 {
        self.delta * self.scale
    }
}

/// Where the character's collision volume is this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub half_height: f32,
}

/// Result of one tick, to be committed to the physics body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub state: MoveState,
    pub velocity: Vec2,
    /// Downward distance to move the body before applying velocity.
    pub snap: f32,
}

#[derive(Clone, Debug)]
pub struct Motor {
    data: MoveData,
    jump: Jump,
    jump_config: JumpConfig,
    contacts: ContactBuffer,
    buffers: StateBuffers,
    state: MoveState,
    next_modifiers: Modifiers,
}

impl Motor {
    pub fn new(config: Arc<PhysicsConfig>, jump_config: JumpConfig) -> Self {
        Self {
            data: MoveData::new(config),
            jump: Jump::default(),
            jump_config,
            contacts: ContactBuffer::new(),
            buffers: StateBuffers::new(),
            state: MoveState::Airborne,
            next_modifiers: Modifiers::default(),
        }
    }

    /// Walks or runs toward `direction.x` at `speed`.
    ///
    /// In the air the horizontal velocity changes at once. On surfaces the active state
    /// blends toward the new target on the next tick, so terrain grip applies.
    pub fn move_dir(&mut self, direction: Vec2, speed: f32) {
        self.data.sign = if direction.x > 0.0 {
            1
        } else if direction.x < 0.0 {
            -1
        } else {
            0
        };
        self.data.raw_speed = speed.max(0.0);
        if self.state == MoveState::Airborne {
            self.data.velocity.x = self.data.sign_f32() * self.data.raw_speed;
        }
    }

    /// Adds an instant velocity change, e.g. knockback.
    pub fn push(&mut self, direction: Vec2, force: f32) {
        self.data.velocity += direction.normalize_or_zero() * force;
    }

    pub fn stop(&mut self) {
        self.data.sign = 0;
        self.data.raw_speed = 0.0;
        if self.state == MoveState::Airborne {
            self.data.velocity.x = 0.0;
        }
    }

    /// Environment multipliers for the next tick only.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.next_modifiers = modifiers;
    }

    /// Contact collector entry point. Returns `false` for duplicates or a full buffer.
    pub fn add_contact(&mut self, contact: Contact) -> bool {
        self.contacts.push(contact)
    }

    pub fn contacts(&self) -> &[Contact] {
        self.contacts.as_slice()
    }

    /// Starts a jump if a charge is left. The upward velocity applies immediately so the
    /// take-off tick already counts as a rising jump.
    pub fn try_jump(&mut self, now: f32) -> bool {
        if !self.jump.try_jump(now, &self.jump_config) {
            return false;
        }
        self.data.velocity.y = self.data.velocity.y.max(self.jump_config.jump_speed);
        true
    }

    pub fn stop_jump(&mut self, now: f32) {
        self.jump.stop_jump(now);
    }

    pub fn override_jump_count(&mut self, count: u8) {
        self.jump.override_count(count);
    }

    pub fn jump(&self) -> &Jump {
        &self.jump
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state == MoveState::Grounded
    }

    pub fn is_colliding_left(&self) -> bool {
        self.data.colliding_left
    }

    pub fn is_colliding_right(&self) -> bool {
        self.data.colliding_right
    }

    pub fn current_velocity(&self) -> Vec2 {
        self.data.velocity
    }

    pub fn is_standing_still(&self) -> bool {
        self.is_grounded() && self.data.velocity.x.abs() < STILL_EPSILON
    }

    /// Overwrites the velocity, e.g. with what the physics engine actually did last step.
    pub fn sync_velocity(&mut self, velocity: Vec2) {
        self.data.velocity = velocity;
    }

    /// Advances the state machine one fixed step.
    ///
    /// Contacts must already be collected for this tick. They are consumed and the buffer is
    /// empty afterwards.
    pub fn on_physics_tick(
        &mut self,
        body: Body,
        tick: &TickContext,
        query: &impl PhysicsQuery,
        terrain: &impl Terrain,
    ) -> TickOutcome {
        self.data.modifiers = self.next_modifiers;
        let previous = self.state;

        let rising_jump = self.jump.is_jumping(tick.now) && self.data.velocity.y > 0.0;

        let config = self.data.config();
        let probe_top = body.position + Vec2::Y * body.half_height;
        let probe_depth = (2.0 * body.half_height - config.probe_radius).max(0.0);
        let stick = if rising_jump {
            None
        } else {
            try_stick(
                previous,
                self.contacts.as_slice(),
                probe_top,
                probe_depth,
                config,
                query,
            )
        };
        let mut snap = 0.0;
        let mut position = body.position;
        if let Some(stick) = stick {
            snap = stick.snap;
            position.y -= snap;
            self.contacts.push(stick.contact);
        }

        let classification = classify(
            self.contacts.as_slice(),
            position,
            self.data.config(),
            rising_jump,
            &mut self.buffers,
        );
        let CollisionFlags { left, right } = classification.flags;
        self.data.colliding_left = left;
        self.data.colliding_right = right;
        let state = classification.state;
        if state != previous {
            debug!(?previous, ?state, "movement state changed");
        }

        let left_ground = previous == MoveState::Grounded && state != MoveState::Grounded;
        self.jump.apply(
            tick.now,
            state.handle_jump(),
            left_ground,
            &self.jump_config,
        );

        let contacts = self.buffers.get(state);
        let slipperyness = if state == MoveState::Grounded {
            contact_slipperyness(contacts, terrain)
        } else {
            0.0
        };
        let mut velocity = state.execute(&self.data, contacts, slipperyness, tick);
        if self.jump.is_jumping(tick.now)
            && matches!(state, MoveState::Airborne | MoveState::Walled)
        {
            velocity.y = velocity.y.max(self.jump_config.jump_speed);
        }

        self.data.velocity = velocity;
        self.state = state;
        self.contacts.clear();
        self.next_modifiers = Modifiers::default();

        TickOutcome {
            state,
            velocity,
            snap,
        }
    }
}
