//! WGS-84 / GCJ-02 coordinate offset transform.
//!
//! # Responsibility
//! - Convert between the unmodified global system (WGS-84, what we persist)
//!   and the regionally distorted display system (GCJ-02, what the map tile
//!   provider renders).
//!
//! # Invariants
//! - Footprints are persisted in WGS-84 only; the two systems are distinct
//!   types so a display-system point cannot reach a persistence API.
//! - Outside the mainland bounding rectangle both directions are the
//!   identity (silent pass-through, not validation).
//! - The series coefficients and ellipsoid constants reproduce the reference
//!   algorithm bit-for-bit; they are an interoperability contract, not a
//!   tuning surface.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// Krasovsky 1940 ellipsoid, as used by the reference algorithm.
const SEMI_MAJOR_AXIS_M: f64 = 6378245.0;
const ECCENTRICITY_SQUARED: f64 = 0.00669342162296594323;

/// A point in the unmodified global system. This is the only coordinate
/// shape persistence APIs accept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wgs84Point {
    pub lng: f64,
    pub lat: f64,
}

/// A point in the distorted display system. Produced at render time and
/// accepted from map click/drag input; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gcj02Point {
    pub lng: f64,
    pub lat: f64,
}

impl Wgs84Point {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Converts to the display system for rendering.
    pub fn to_display(self) -> Gcj02Point {
        wgs84_to_gcj02(self)
    }
}

impl Gcj02Point {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Converts back to the storage system before persisting.
    pub fn to_storage(self) -> Wgs84Point {
        gcj02_to_wgs84(self)
    }
}

/// WGS-84 -> GCJ-02 (storage -> display).
pub fn wgs84_to_gcj02(point: Wgs84Point) -> Gcj02Point {
    match mainland_offset(point.lng, point.lat) {
        Some((d_lng, d_lat)) => Gcj02Point {
            lng: point.lng + d_lng,
            lat: point.lat + d_lat,
        },
        None => Gcj02Point {
            lng: point.lng,
            lat: point.lat,
        },
    }
}

/// GCJ-02 -> WGS-84 (display -> storage).
///
/// The correction terms are evaluated at the distorted input because the
/// true storage point is unknown; the computed forward offset is then
/// subtracted back out. This single-step approximation carries a sub-meter
/// to few-meter residual, which the reference algorithm accepts as well.
pub fn gcj02_to_wgs84(point: Gcj02Point) -> Wgs84Point {
    match mainland_offset(point.lng, point.lat) {
        Some((d_lng, d_lat)) => Wgs84Point {
            lng: point.lng - d_lng,
            lat: point.lat - d_lat,
        },
        None => Wgs84Point {
            lng: point.lng,
            lat: point.lat,
        },
    }
}

/// Angular offset in degrees applied inside the distortion region, or `None`
/// when the point is outside the coarse mainland rectangle.
fn mainland_offset(lng: f64, lat: f64) -> Option<(f64, f64)> {
    if out_of_mainland(lng, lat) {
        return None;
    }

    let mut d_lat = transform_lat(lng - 105.0, lat - 35.0);
    let mut d_lng = transform_lng(lng - 105.0, lat - 35.0);

    let rad_lat = lat / 180.0 * PI;
    let mut magic = rad_lat.sin();
    magic = 1.0 - ECCENTRICITY_SQUARED * magic * magic;
    let sqrt_magic = magic.sqrt();

    d_lat = (d_lat * 180.0)
        / ((SEMI_MAJOR_AXIS_M * (1.0 - ECCENTRICITY_SQUARED)) / (magic * sqrt_magic) * PI);
    d_lng = (d_lng * 180.0) / (SEMI_MAJOR_AXIS_M / sqrt_magic * rad_lat.cos() * PI);

    Some((d_lng, d_lat))
}

// Coarse national-border rectangle; not precise, but what the reference
// algorithm uses.
fn out_of_mainland(lng: f64, lat: f64) -> bool {
    !(lng > 73.66 && lng < 135.05 && lat > 3.86 && lat < 53.55)
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret =
        -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}
