//! Buckets contacts by angle and picks the active movement state.
use super::config::{CEILING_ANGLE, PhysicsConfig};
use super::contact::Contact;
use super::states::MoveState;
use bevy::prelude::*;

/// Working contacts kept per state.
pub const STATE_BUFFER_LEN: usize = 3;

/// Category of a single contact angle.
pub fn classify_angle(angle: f32, config: &PhysicsConfig) -> MoveState {
    if angle > CEILING_ANGLE {
        MoveState::Roofed
    } else if angle > config.wall_angle {
        MoveState::Walled
    } else if angle > config.slope_angle {
        MoveState::Sloped
    } else {
        MoveState::Grounded
    }
}

/// Reusable per-state contact buffers, indexed by [`MoveState::index`].
#[derive(Clone, Debug, Default)]
pub struct StateBuffers {
    contacts: [Vec<Contact>; 5],
    hits: [usize; 5],
}

impl StateBuffers {
    pub fn new() -> Self {
        Self {
            contacts: std::array::from_fn(|_| Vec::with_capacity(STATE_BUFFER_LEN)),
            hits: [0; 5],
        }
    }

    pub fn clear(&mut self) {
        self.contacts.iter_mut().for_each(Vec::clear);
        self.hits = [0; 5];
    }

    fn push(&mut self, state: MoveState, contact: Contact) {
        let i = state.index();
        self.hits[i] += 1;
        if self.contacts[i].len() < STATE_BUFFER_LEN {
            self.contacts[i].push(contact);
        }
    }

    /// Contacts stored for `state` this tick.
    pub fn get(&self, state: MoveState) -> &[Contact] {
        &self.contacts[state.index()]
    }

    /// Whether any contact fell into `state`, including ones past the buffer length.
    pub fn has(&self, state: MoveState) -> bool {
        self.hits[state.index()] > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub struct CollisionFlags {
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub state: MoveState,
    pub flags: CollisionFlags,
}

/// Sorts `contacts` into `buffers` and picks the winning state.
///
/// `position` is the character's center, used to decide which side steep contacts are on.
/// While `rising_jump` is set, ground and slope contacts are ignored so a fresh jump is not
/// snapped back down.
pub fn classify(
    contacts: &[Contact],
    position: Vec2,
    config: &PhysicsConfig,
    rising_jump: bool,
    buffers: &mut StateBuffers,
) -> Classification {
    buffers.clear();
    let mut flags = CollisionFlags::default();

    for contact in contacts {
        buffers.push(classify_angle(contact.angle, config), *contact);
        if contact.angle > config.slope_angle {
            if contact.point.x < position.x {
                flags.left = true;
            } else if contact.point.x > position.x {
                flags.right = true;
            }
        }
    }

    let state = MoveState::PRIORITY
        .into_iter()
        .filter(|s| !(rising_jump && s.sticks()))
        .find(|s| *s == MoveState::Airborne || buffers.has(*s))
        .unwrap_or_default();

    Classification { state, flags }
}
