//! The five movement states and the velocity each one produces.
use super::config::{CEILING_ANGLE, PhysicsConfig};
use super::contact::Contact;
use super::jump::JumpEffect;
use super::motor::TickContext;
use super::move_data::MoveData;
use super::slip::slip_delta;
use bevy::prelude::*;

/// Contact spreads shorter than this fall back to the contact normal for direction.
pub const MIN_CONTACT_SPREAD: f32 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum MoveState {
    Grounded,
    Sloped,
    Walled,
    Roofed,
    #[default]
    Airborne,
}

impl MoveState {
    /// Classification priority, highest first.
    pub const PRIORITY: [MoveState; 5] = [
        MoveState::Grounded,
        MoveState::Sloped,
        MoveState::Walled,
        MoveState::Roofed,
        MoveState::Airborne,
    ];

    pub const fn index(self) -> usize {
        match self {
            MoveState::Grounded => 0,
            MoveState::Sloped => 1,
            MoveState::Walled => 2,
            MoveState::Roofed => 3,
            MoveState::Airborne => 4,
        }
    }

    /// Lower contact-angle bound of this state. Airborne has none and reports `-1`.
    pub fn config_angle(self, config: &PhysicsConfig) -> f32 {
        match self {
            MoveState::Grounded => 0.0,
            MoveState::Sloped => config.slope_angle,
            MoveState::Walled => config.wall_angle,
            MoveState::Roofed => CEILING_ANGLE,
            MoveState::Airborne => -1.0,
        }
    }

    /// States in which the sticking probe may keep the character attached.
    pub fn sticks(self) -> bool {
        matches!(self, MoveState::Grounded | MoveState::Sloped)
    }

    /// What this state asks of the jump system.
    pub fn handle_jump(self) -> JumpEffect {
        match self {
            MoveState::Grounded => JumpEffect::Refill,
            MoveState::Roofed => JumpEffect::EndJump,
            _ => JumpEffect::None,
        }
    }

    /// Velocity for this tick.
    ///
    /// `contacts` are the contacts classified into this state. `slipperyness` only matters
    /// on the ground.
    pub fn execute(
        self,
        data: &MoveData,
        contacts: &[Contact],
        slipperyness: f32,
        tick: &TickContext,
    ) -> Vec2 {
        match self {
            MoveState::Grounded => grounded(data, contacts, slipperyness),
            MoveState::Sloped => sloped(data, contacts, tick),
            MoveState::Walled => walled(data, contacts, tick),
            MoveState::Roofed => roofed(data, contacts, tick),
            MoveState::Airborne => Vec2::new(data.velocity.x, data.capped_gravity(tick)),
        }
    }
}

/// Surface direction estimated from contact points.
///
/// Uses the leftmost-to-rightmost spread of the points, or the perpendicular of the first
/// contact's normal when the points are too close together. The result always points right,
/// or straight up for a vertical surface.
pub fn direction_from_contacts(contacts: &[Contact]) -> Vec2 {
    let Some(first) = contacts.first() else {
        return Vec2::X;
    };
    let leftmost = contacts
        .iter()
        .min_by(|a, b| a.point.x.total_cmp(&b.point.x))
        .unwrap_or(first);
    let rightmost = contacts
        .iter()
        .max_by(|a, b| a.point.x.total_cmp(&b.point.x))
        .unwrap_or(first);

    let spread = rightmost.point - leftmost.point;
    let direction = if spread.length() < MIN_CONTACT_SPREAD {
        first.normal.perp()
    } else {
        spread.normalize()
    };
    if direction.x < 0.0 || (direction.x == 0.0 && direction.y < 0.0) {
        -direction
    } else {
        direction
    }
}

fn grounded(data: &MoveData, contacts: &[Contact], slipperyness: f32) -> Vec2 {
    let target = if data.pushing_into_collision() {
        Vec2::ZERO
    } else {
        direction_from_contacts(contacts) * data.move_speed() * data.sign_f32()
    };
    data.velocity.lerp(target, slip_delta(slipperyness))
}

fn sloped(data: &MoveData, contacts: &[Contact], tick: &TickContext) -> Vec2 {
    let tangent = direction_from_contacts(contacts);
    let downslope = if tangent.y > 0.0 { -tangent } else { tangent };

    if data.sign != 0 && data.sign_f32() == downslope.x.signum() {
        return Vec2::new(data.move_speed() * data.sign_f32(), data.capped_gravity(tick));
    }
    let config = data.config();
    data.velocity
        .lerp(downslope * config.slope_speed, config.slope_friction)
}

fn walled(data: &MoveData, contacts: &[Contact], tick: &TickContext) -> Vec2 {
    let vy = data.capped_gravity(tick);
    if data.pushing_into_collision() {
        return Vec2::new(0.0, vy);
    }
    let along = direction_from_contacts(contacts);
    let along = if along.y < 0.0 { -along } else { along };
    // Leaving the wall always gets full speed; a vertical wall has no horizontal tangent.
    let vx = data.sign_f32() * data.move_speed() * along.x.abs().max(escape_factor(data));
    Vec2::new(vx, vy)
}

/// 1 when the input points away from the walls touched this tick, 0 otherwise.
fn escape_factor(data: &MoveData) -> f32 {
    let away = (data.sign > 0 && data.colliding_left) || (data.sign < 0 && data.colliding_right);
    if away { 1.0 } else { 0.0 }
}

fn roofed(data: &MoveData, contacts: &[Contact], tick: &TickContext) -> Vec2 {
    // Roof normals point down, so the rightward tangent is the negated normal perpendicular.
    let along = direction_from_contacts(contacts);
    let mut velocity = along * data.move_speed() * data.sign_f32();
    velocity.y += data.velocity.y.min(0.0) - data.gravity_per_tick(tick);
    velocity
}
