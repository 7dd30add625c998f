// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Geographic and world-space coordinate utilities.
//!
//! World positions are Earth-centred, Earth-fixed Cartesian coordinates in
//! meters on the WGS84 ellipsoid, the frame the scene engine picks in.
//! Persisted geometry is stored as `Geographic` records (degrees and meters).
//! Everything here is pure: no allocation beyond the returned values and no
//! failure modes beyond propagating NaN input.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A position in the scene's world frame (ECEF meters)
pub type WorldPoint = DVec3;

/// WGS84 semi-major axis (meters)
const WGS84_A: f64 = 6_378_137.0;

/// WGS84 semi-minor axis (meters)
const WGS84_B: f64 = 6_356_752.314_245_179;

/// First eccentricity squared
const WGS84_E2: f64 = 1.0 - (WGS84_B * WGS84_B) / (WGS84_A * WGS84_A);

/// Iteration cap for the geodetic latitude solve
const MAX_LATITUDE_ITERATIONS: usize = 16;

/// Convergence tolerance for the latitude solve (radians)
const LATITUDE_EPSILON: f64 = 1e-15;

/// A geographic position as persisted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geographic {
    /// Degrees east
    pub longitude: f64,
    /// Degrees north
    pub latitude: f64,
    /// Meters above the ellipsoid
    #[serde(default)]
    pub height: f64,
}

impl Geographic {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }

    /// Convert to a world-space point
    pub fn to_world(&self) -> WorldPoint {
        let lon = self.longitude.to_radians();
        let lat = self.latitude.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let n = prime_vertical_radius(sin_lat);
        let h = self.height;

        DVec3::new(
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - WGS84_E2) + h) * sin_lat,
        )
    }

    /// Convert a world-space point back to geographic coordinates
    ///
    /// Uses a fixed-point iteration on the geodetic latitude that stays
    /// well-conditioned at the poles.
    pub fn from_world(point: WorldPoint) -> Self {
        let p = point.x.hypot(point.y);
        let longitude = point.y.atan2(point.x);

        let mut latitude = point.z.atan2(p * (1.0 - WGS84_E2));
        for _ in 0..MAX_LATITUDE_ITERATIONS {
            let n = prime_vertical_radius(latitude.sin());
            let next = (point.z + WGS84_E2 * n * latitude.sin()).atan2(p);
            let converged = (next - latitude).abs() < LATITUDE_EPSILON;
            latitude = next;
            if converged {
                break;
            }
        }

        let (sin_lat, cos_lat) = latitude.sin_cos();
        let n = prime_vertical_radius(sin_lat);
        let height = p * cos_lat + (point.z + WGS84_E2 * n * sin_lat) * sin_lat - n;

        Self {
            longitude: longitude.to_degrees(),
            latitude: latitude.to_degrees(),
            height,
        }
    }

    /// Same position, shifted vertically
    pub fn with_height(self, height: f64) -> Self {
        Self { height, ..self }
    }
}

fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
}

/// Straight-line distance between two world points
pub fn distance(a: WorldPoint, b: WorldPoint) -> f64 {
    a.distance(b)
}

/// Closest point on segment `a`–`b` to `target`
///
/// The segment parameter is clamped to [0, 1]. A degenerate segment
/// (zero length) yields `a`.
pub fn closest_point_on_segment(target: WorldPoint, a: WorldPoint, b: WorldPoint) -> WorldPoint {
    let segment = b - a;
    let len_sq = segment.length_squared();
    if len_sq <= 0.0 {
        return a;
    }
    let t = ((target - a).dot(segment) / len_sq).clamp(0.0, 1.0);
    a + segment * t
}

/// Whether a ring's first and last coordinates coincide horizontally
pub fn is_ring_closed(ring: &[Geographic]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => {
            first.longitude == last.longitude && first.latitude == last.latitude
        }
        _ => true,
    }
}

/// Close a polygon ring by repeating its first coordinate if needed
pub fn close_ring(ring: &[Geographic]) -> Vec<Geographic> {
    let mut closed = ring.to_vec();
    if !is_ring_closed(ring)
        && let Some(first) = ring.first()
    {
        closed.push(*first);
    }
    closed
}

/// Bounding sphere (center, radius) of a set of world points
///
/// Centered on the centroid; `None` for an empty set.
pub fn bounding_sphere(points: &[WorldPoint]) -> Option<(WorldPoint, f64)> {
    if points.is_empty() {
        return None;
    }
    let center = points.iter().copied().sum::<DVec3>() / points.len() as f64;
    let radius = points
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0_f64, f64::max);
    Some((center, radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip(geo: Geographic) {
        let world = geo.to_world();
        let back = Geographic::from_world(world).to_world();
        let tolerance = world.length() * 1e-6;
        assert!(
            world.distance(back) <= tolerance,
            "round trip drifted: {world:?} -> {back:?}"
        );
    }

    #[test]
    fn round_trip_preserves_world_point() {
        assert_round_trip(Geographic::new(26.1025, 44.4268, 85.0));
        assert_round_trip(Geographic::new(-122.4194, 37.7749, 0.0));
        assert_round_trip(Geographic::new(179.9, -45.0, 1200.5));
        assert_round_trip(Geographic::new(0.0, 0.0, -30.0));
    }

    #[test]
    fn round_trip_at_poles() {
        assert_round_trip(Geographic::new(0.0, 90.0, 10.0));
        assert_round_trip(Geographic::new(45.0, -89.9999, 0.0));
    }

    #[test]
    fn from_world_recovers_degrees_and_height() {
        let geo = Geographic::new(13.405, 52.52, 34.0);
        let back = Geographic::from_world(geo.to_world());
        assert!((back.longitude - geo.longitude).abs() < 1e-9);
        assert!((back.latitude - geo.latitude).abs() < 1e-9);
        assert!((back.height - geo.height).abs() < 1e-6);
    }

    #[test]
    fn equator_prime_meridian_is_on_x_axis() {
        let world = Geographic::new(0.0, 0.0, 0.0).to_world();
        assert!((world.x - WGS84_A).abs() < 1e-6);
        assert!(world.y.abs() < 1e-6);
        assert!(world.z.abs() < 1e-6);
    }

    #[test]
    fn closest_point_clamps_to_segment() {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(10.0, 0.0, 0.0);

        let mid = closest_point_on_segment(DVec3::new(4.0, 3.0, 0.0), a, b);
        assert_eq!(mid, DVec3::new(4.0, 0.0, 0.0));

        let before = closest_point_on_segment(DVec3::new(-5.0, 1.0, 0.0), a, b);
        assert_eq!(before, a);

        let after = closest_point_on_segment(DVec3::new(15.0, -1.0, 0.0), a, b);
        assert_eq!(after, b);
    }

    #[test]
    fn degenerate_segment_returns_start() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(closest_point_on_segment(DVec3::ZERO, a, a), a);
    }

    #[test]
    fn close_ring_appends_first_when_open() {
        let ring = vec![
            Geographic::new(0.0, 0.0, 0.0),
            Geographic::new(1.0, 0.0, 0.0),
            Geographic::new(1.0, 1.0, 0.0),
        ];
        let closed = close_ring(&ring);
        assert_eq!(closed.len(), 4);
        assert_eq!(closed[3], ring[0]);

        // Already closed rings are left alone
        assert_eq!(close_ring(&closed).len(), 4);
    }

    #[test]
    fn bounding_sphere_encloses_points() {
        let points = [DVec3::new(-1.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0)];
        let (center, radius) = bounding_sphere(&points).unwrap();
        assert_eq!(center, DVec3::ZERO);
        assert_eq!(radius, 1.0);
        assert!(bounding_sphere(&[]).is_none());
    }
}
