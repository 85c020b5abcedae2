//! Per-tick collision contacts and the bounded buffer they are collected into.
use bevy::prelude::*;

/// Maximum number of contacts kept for a single physics tick.
pub const MAX_CONTACTS: usize = 8;

/// Points and normals closer than this are considered the same contact.
const DEDUP_EPSILON: f32 = 1e-3;

/// One point where the character's collider touches another surface this tick.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct Contact {
    /// World-space contact point.
    pub point: Vec2,
    /// Unit surface normal, pointing from the touched surface toward the character.
    pub normal: Vec2,
    /// The collider that was touched.
    pub collider: Entity,
    /// Angle in degrees between [`Self::normal`] and world up, in `[0, 180]`.
    pub angle: f32,
}

impl Contact {
    pub fn new(point: Vec2, normal: Vec2, collider: Entity) -> Self {
        let normal = normal.normalize_or(Vec2::Y);
        Self {
            point,
            normal,
            collider,
            angle: angle_from_up(normal),
        }
    }

    fn same_as(&self, other: &Contact) -> bool {
        self.collider == other.collider
            && self.point.distance_squared(other.point) <= DEDUP_EPSILON * DEDUP_EPSILON
            && self.normal.distance_squared(other.normal) <= DEDUP_EPSILON * DEDUP_EPSILON
    }
}

/// Angle in degrees between `normal` and world up. Ground is 0, a vertical wall 90, a flat roof 180.
pub fn angle_from_up(normal: Vec2) -> f32 {
    let Some(normal) = normal.try_normalize() else {
        return 0.0;
    };
    normal.dot(Vec2::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Deduplicated, bounded list of this tick's contacts.
///
/// Filled by the contact collector before the movement tick and cleared after it.
#[derive(Clone, Debug, Default, Reflect)]
pub struct ContactBuffer {
    contacts: Vec<Contact>,
}

impl ContactBuffer {
    pub fn new() -> Self {
        Self {
            contacts: Vec::with_capacity(MAX_CONTACTS),
        }
    }

    /// Adds a contact. Returns `false` if it was a duplicate or the buffer is full.
    pub fn push(&mut self, contact: Contact) -> bool {
        if self.contacts.len() >= MAX_CONTACTS {
            return false;
        }
        if self.contacts.iter().any(|c| c.same_as(&contact)) {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}
