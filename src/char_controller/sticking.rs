//! Keeps grounded characters attached across small gaps and steps.
//!
//! When a character that was on the ground last tick reports no contacts at all, a small
//! circle is cast downward. If it finds ground close enough, the body is snapped down onto it
//! and a synthetic contact is fed to the classifier, so the character never flickers into the
//! air for a single tick.
use super::config::PhysicsConfig;
use super::contact::Contact;
use super::states::MoveState;
use bevy::prelude::*;
use tracing::trace;

/// Downward circle cast issued by the sticking heuristic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleProbe {
    pub origin: Vec2,
    pub radius: f32,
    pub direction: Vec2,
    pub max_distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit {
    pub collider: Entity,
    /// Distance travelled by the probe before touching.
    pub distance: f32,
    pub point: Vec2,
    /// Surface normal at `point`.
    pub normal: Vec2,
    pub is_trigger: bool,
}

/// Physics queries the movement core needs from the engine.
///
/// Implementations only report world and support geometry; the layer filter is theirs.
pub trait PhysicsQuery {
    /// Hits along the probe, nearest first.
    fn circle_probe(&self, probe: &CircleProbe) -> Vec<ProbeHit>;

    /// For movable platforms, whether `point` lies on the surface a character can ride on top of.
    /// `None` for every other collider.
    fn platform_top(&self, _collider: Entity, _point: Vec2) -> Option<bool> {
        None
    }
}

/// A physics world with nothing in it.
pub struct EmptyWorld;

impl PhysicsQuery for EmptyWorld {
    fn circle_probe(&self, _probe: &CircleProbe) -> Vec<ProbeHit> {
        Vec::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickResult {
    /// How far the body must move down.
    pub snap: f32,
    /// Contact to classify in place of the missing ones.
    pub contact: Contact,
}

/// Runs the sticking probe if it applies this tick.
///
/// `top` is the top of the character's collision volume; the probe starts there so it
/// cannot begin inside the ground it is looking for.
pub fn try_stick(
    previous: MoveState,
    contacts: &[Contact],
    top: Vec2,
    depth: f32,
    config: &PhysicsConfig,
    query: &impl PhysicsQuery,
) -> Option<StickResult> {
    if !previous.sticks() || !contacts.is_empty() {
        return None;
    }
    let probe = CircleProbe {
        origin: top,
        radius: config.probe_radius,
        direction: Vec2::NEG_Y,
        max_distance: depth + config.ground_cast_distance,
    };
    let hit = query
        .circle_probe(&probe)
        .into_iter()
        .filter(|hit| !hit.is_trigger)
        .filter(|hit| query.platform_top(hit.collider, hit.point).unwrap_or(true))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))?;

    let snap = (hit.distance - depth).max(0.0);
    if snap > config.ground_cast_distance {
        return None;
    }
    trace!(snap, "sticking to ground");
    Some(StickResult {
        snap,
        contact: Contact::new(hit.point, hit.normal, hit.collider),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Returns canned hits and remembers the last probe.
    #[derive(Default)]
    struct FakeWorld {
        hits: Vec<ProbeHit>,
        platform: Option<(Entity, bool)>,
        last_probe: RefCell<Option<CircleProbe>>,
    }

    impl PhysicsQuery for FakeWorld {
        fn circle_probe(&self, probe: &CircleProbe) -> Vec<ProbeHit> {
            *self.last_probe.borrow_mut() = Some(*probe);
            self.hits
                .iter()
                .copied()
                .filter(|h| h.distance <= probe.max_distance)
                .collect()
        }

        fn platform_top(&self, collider: Entity, _point: Vec2) -> Option<bool> {
            match self.platform {
                Some((platform, top)) if platform == collider => Some(top),
                _ => None,
            }
        }
    }

    fn entities<const N: usize>() -> [Entity; N] {
        let mut world = World::new();
        std::array::from_fn(|_| world.spawn_empty().id())
    }

    fn hit(collider: Entity, distance: f32) -> ProbeHit {
        ProbeHit {
            collider,
            distance,
            point: Vec2::new(0.0, -distance),
            normal: Vec2::Y,
            is_trigger: false,
        }
    }

    fn config() -> PhysicsConfig {
        PhysicsConfig {
            ground_cast_distance: 0.1,
            probe_radius: 0.2,
            ..default()
        }
    }

    const DEPTH: f32 = 1.0;

    #[test]
    fn snaps_down_onto_nearby_ground() {
        let [ground] = entities();
        let world = FakeWorld {
            hits: vec![hit(ground, DEPTH + 0.05)],
            ..default()
        };
        let stick = try_stick(MoveState::Grounded, &[], Vec2::ZERO, DEPTH, &config(), &world)
            .expect("should stick");
        assert!((stick.snap - 0.05).abs() < 1e-5);
        assert_eq!(stick.contact.angle, 0.0);

        let probe = world.last_probe.borrow().expect("probe was cast");
        assert_eq!(probe.direction, Vec2::NEG_Y);
        assert_eq!(probe.radius, 0.2);
    }

    #[test]
    fn only_after_ground_and_without_contacts() {
        let [ground] = entities();
        let world = FakeWorld {
            hits: vec![hit(ground, DEPTH + 0.05)],
            ..default()
        };
        for previous in [MoveState::Airborne, MoveState::Walled, MoveState::Roofed] {
            assert!(try_stick(previous, &[], Vec2::ZERO, DEPTH, &config(), &world).is_none());
        }
        assert!(try_stick(MoveState::Sloped, &[], Vec2::ZERO, DEPTH, &config(), &world).is_some());

        let contact = Contact::new(Vec2::ZERO, Vec2::Y, ground);
        assert!(
            try_stick(MoveState::Grounded, &[contact], Vec2::ZERO, DEPTH, &config(), &world)
                .is_none()
        );
    }

    #[test]
    fn too_far_falls_through() {
        let [ground] = entities();
        let world = FakeWorld {
            hits: vec![hit(ground, DEPTH + 0.5)],
            ..default()
        };
        assert!(try_stick(MoveState::Grounded, &[], Vec2::ZERO, DEPTH, &config(), &world).is_none());
    }

    #[test]
    fn triggers_are_ignored_and_nearest_wins() {
        let [sensor, near, far] = entities();
        let mut trigger = hit(sensor, DEPTH + 0.01);
        trigger.is_trigger = true;
        let world = FakeWorld {
            hits: vec![hit(far, DEPTH + 0.08), trigger, hit(near, DEPTH + 0.03)],
            ..default()
        };
        let stick =
            try_stick(MoveState::Grounded, &[], Vec2::ZERO, DEPTH, &config(), &world).unwrap();
        assert_eq!(stick.contact.collider, near);
    }

    #[test]
    fn movable_platform_counts_only_on_top() {
        let [platform] = entities();
        let mut world = FakeWorld {
            hits: vec![hit(platform, DEPTH + 0.02)],
            platform: Some((platform, false)),
            ..default()
        };
        assert!(try_stick(MoveState::Grounded, &[], Vec2::ZERO, DEPTH, &config(), &world).is_none());

        world.platform = Some((platform, true));
        assert!(try_stick(MoveState::Grounded, &[], Vec2::ZERO, DEPTH, &config(), &world).is_some());
    }

    #[test]
    fn empty_world_never_sticks() {
        assert!(
            try_stick(MoveState::Grounded, &[], Vec2::ZERO, DEPTH, &config(), &EmptyWorld)
                .is_none()
        );
    }
}
