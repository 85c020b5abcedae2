//! Terrain slipperyness and the damping factor derived from it.
use super::contact::Contact;
use bevy::prelude::*;

/// How far into the surface a contact is sampled for terrain data.
pub const TERRAIN_SAMPLE_DEPTH: f32 = 0.5;

/// Terrain data lookup.
pub trait Terrain {
    /// Slipperyness in `[0, 1]` at `point`, or `None` where there is no terrain data.
    fn slipperyness(&self, point: Vec2) -> Option<f32>;
}

/// Terrain without any slippery surfaces.
pub struct NoTerrain;

impl Terrain for NoTerrain {
    fn slipperyness(&self, _point: Vec2) -> Option<f32> {
        None
    }
}

/// Per-tick blend factor toward the target velocity on the ground.
///
/// Exactly `0` slipperyness responds instantly. Anything above zero goes through the
/// icy curve, which starts around `0.0999` and drops to `0.005` at `1`. Values are clamped
/// to `[0, 1]` first and non-finite ones count as `0`.
pub fn slip_delta(slipperyness: f32) -> f32 {
    let s = if slipperyness.is_finite() {
        slipperyness.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if s == 0.0 {
        return 1.0;
    }
    0.005 + 0.095 * (1.0 - s)
}

/// Slipperyness under a set of contacts. The iciest sample wins.
pub fn contact_slipperyness(contacts: &[Contact], terrain: &impl Terrain) -> f32 {
    contacts
        .iter()
        .map(|c| {
            terrain
                .slipperyness(c.point - c.normal * TERRAIN_SAMPLE_DEPTH)
                .unwrap_or(0.0)
        })
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Everything left of x=0 is ice.
    struct HalfIce(f32);

    impl Terrain for HalfIce {
        fn slipperyness(&self, point: Vec2) -> Option<f32> {
            (point.x < 0.0).then_some(self.0)
        }
    }

    fn ground(x: f32) -> Contact {
        Contact::new(Vec2::new(x, 0.0), Vec2::Y, Entity::PLACEHOLDER)
    }

    #[test]
    fn zero_is_instant() {
        assert_eq!(slip_delta(0.0), 1.0);
    }

    #[test]
    fn icy_curve() {
        assert!((slip_delta(1.0) - 0.005).abs() < 1e-7);
        assert!((slip_delta(0.5) - 0.0525).abs() < 1e-6);
        // Barely icy is already far slower than normal ground.
        assert!((slip_delta(1e-4) - 0.0999905).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(slip_delta(3.0), slip_delta(1.0));
        assert_eq!(slip_delta(-0.2), 1.0);
        assert_eq!(slip_delta(-0.0), 1.0);
    }

    #[test]
    fn non_finite_values_are_grippy() {
        assert_eq!(slip_delta(f32::NAN), 1.0);
        assert_eq!(slip_delta(f32::INFINITY), 1.0);
        assert_eq!(slip_delta(f32::NEG_INFINITY), 1.0);
    }

    #[test]
    fn missing_terrain_is_grippy() {
        assert_eq!(contact_slipperyness(&[ground(1.0)], &NoTerrain), 0.0);
        assert_eq!(contact_slipperyness(&[ground(1.0)], &HalfIce(0.8)), 0.0);
    }

    #[test]
    fn icy_contact_wins() {
        let contacts = [ground(1.0), ground(-1.0)];
        assert_eq!(contact_slipperyness(&contacts, &HalfIce(0.8)), 0.8);
        assert_eq!(contact_slipperyness(&[], &HalfIce(0.8)), 0.0);
    }
}
