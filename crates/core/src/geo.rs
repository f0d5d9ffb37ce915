// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Geodetic primitives shared by every engagement planner: points, and the
//! haversine distance/bearing helpers used to turn waypoint lists into
//! timed trajectories.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used by [`distance_m`]. Fixed per spec, not
/// a pluggable ellipsoid model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A 2D geodetic point: latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint2D {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint2D {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True iff latitude/longitude are within the bounds the planner's
    /// validity predicate enforces: lat in [-90, 90], lon in [-180, 180].
    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A 3D geodetic point: latitude/longitude in degrees, depth in meters
/// (positive down, per the weapon-waypoint convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint3D {
    pub latitude: f64,
    pub longitude: f64,
    pub depth_m: f64,
}

impl GeoPoint3D {
    pub fn new(latitude: f64, longitude: f64, depth_m: f64) -> Self {
        Self { latitude, longitude, depth_m }
    }

    pub fn to_2d(self) -> GeoPoint2D {
        GeoPoint2D::new(self.latitude, self.longitude)
    }

    /// True iff lat/lon/depth are within the planner's accepted ranges:
    /// lat in [-90, 90], lon in [-180, 180], depth in [-1000, 10000] m.
    pub fn in_bounds(&self) -> bool {
        self.to_2d().in_bounds() && (-1000.0..=10_000.0).contains(&self.depth_m)
    }

    /// Linear interpolation between two samples, the default
    /// `current_position` method (§9, Open Question c).
    pub fn lerp(a: GeoPoint3D, b: GeoPoint3D, t: f64) -> GeoPoint3D {
        let t = t.clamp(0.0, 1.0);
        GeoPoint3D {
            latitude: a.latitude + (b.latitude - a.latitude) * t,
            longitude: a.longitude + (b.longitude - a.longitude) * t,
            depth_m: a.depth_m + (b.depth_m - a.depth_m) * t,
        }
    }
}

/// Great-circle distance between two points, in meters, via haversine with
/// a fixed Earth radius.
pub fn distance_m(p1: GeoPoint2D, p2: GeoPoint2D) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let delta_lat = (p2.latitude - p1.latitude).to_radians();
    let delta_lon = (p2.longitude - p1.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing from `from` to `to`, in degrees, normalized to `[0, 360)`.
pub fn bearing_deg(from: GeoPoint2D, to: GeoPoint2D) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}

#[cfg(test)]
#[path = "geo_tests.rs"]
mod tests;
