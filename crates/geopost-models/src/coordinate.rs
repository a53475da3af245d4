//! Geographic positions attached to messages.
//!
//! Every posted message receives a position drawn uniformly from a fixed
//! [`BoundingBox`]. The draw goes through the [`CoordinateSource`] trait so
//! callers can inject a seeded or scripted source.

use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Number of decimal places kept on each axis.
pub const COORDINATE_DECIMALS: i32 = 6;

/// Round a degree value to [`COORDINATE_DECIMALS`] places.
pub fn round_degrees(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate as given (no rounding).
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a coordinate rounded to [`COORDINATE_DECIMALS`] places.
    pub fn rounded(lat: f64, lon: f64) -> Self {
        Self {
            lat: round_degrees(lat),
            lon: round_degrees(lon),
        }
    }
}

// ---------------------------------------------------------------------------
// BoundingBox
// ---------------------------------------------------------------------------

/// Inclusive latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl BoundingBox {
    /// The box messages are placed in by default: lat 9..22, lon 21..38.
    pub const DEFAULT: BoundingBox = BoundingBox {
        lat_min: 9.0,
        lat_max: 22.0,
        lon_min: 21.0,
        lon_max: 38.0,
    };

    /// Build a box from `(min, max)` pairs.
    ///
    /// Both ranges must be finite and non-empty (`min <= max`).
    pub fn new(lat: (f64, f64), lon: (f64, f64)) -> Result<Self, ModelError> {
        for (axis, (min, max)) in [("latitude", lat), ("longitude", lon)] {
            if !min.is_finite() || !max.is_finite() {
                return Err(ModelError::InvalidBoundingBox {
                    reason: format!("{axis} bounds must be finite"),
                });
            }
            if min > max {
                return Err(ModelError::InvalidBoundingBox {
                    reason: format!("{axis} range is empty ({min} > {max})"),
                });
            }
        }
        Ok(Self {
            lat_min: lat.0,
            lat_max: lat.1,
            lon_min: lon.0,
            lon_max: lon.1,
        })
    }

    /// Latitude range as `(min, max)`.
    pub fn lat_range(&self) -> (f64, f64) {
        (self.lat_min, self.lat_max)
    }

    /// Longitude range as `(min, max)`.
    pub fn lon_range(&self) -> (f64, f64) {
        (self.lon_min, self.lon_max)
    }

    /// Whether `coord` lies inside the box (edges included).
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.lat_min..=self.lat_max).contains(&coord.lat)
            && (self.lon_min..=self.lon_max).contains(&coord.lon)
    }

    /// Draw a rounded coordinate uniformly from the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinate {
        let lat = rng.gen_range(self.lat_min..=self.lat_max);
        let lon = rng.gen_range(self.lon_min..=self.lon_max);
        // Rounding can step past an edge that is not itself on the 1e-6 grid.
        Coordinate {
            lat: round_degrees(lat).clamp(self.lat_min, self.lat_max),
            lon: round_degrees(lon).clamp(self.lon_min, self.lon_max),
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Coordinate sources
// ---------------------------------------------------------------------------

/// Supplies the position for each new message.
pub trait CoordinateSource {
    /// Produce the next coordinate.
    fn next_coordinate(&mut self) -> Coordinate;
}

/// Uniform draws from a [`BoundingBox`] using any [`Rng`].
#[derive(Debug, Clone)]
pub struct UniformCoordinates<R> {
    bounds: BoundingBox,
    rng: R,
}

impl<R: Rng> UniformCoordinates<R> {
    /// Draw from `bounds` with the given generator.
    pub fn new(bounds: BoundingBox, rng: R) -> Self {
        Self { bounds, rng }
    }

    /// The box draws are taken from.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }
}

/// Uniform draws using the thread-local generator.
pub type ThreadCoordinates = UniformCoordinates<ThreadRng>;

impl UniformCoordinates<ThreadRng> {
    /// Draw from `bounds` with the thread-local generator.
    pub fn thread_local(bounds: BoundingBox) -> Self {
        Self::new(bounds, rand::thread_rng())
    }
}

impl<R: Rng> CoordinateSource for UniformCoordinates<R> {
    fn next_coordinate(&mut self) -> Coordinate {
        self.bounds.sample(&mut self.rng)
    }
}

/// Replays a fixed list of coordinates, cycling when exhausted.
///
/// Useful when a caller needs reproducible positions without a generator.
#[derive(Debug, Clone)]
pub struct ScriptedCoordinates {
    script: Vec<Coordinate>,
    next: usize,
}

impl ScriptedCoordinates {
    /// Replay `script` in order. An empty script yields `(0, 0)`.
    pub fn new(script: Vec<Coordinate>) -> Self {
        Self { script, next: 0 }
    }
}

impl CoordinateSource for ScriptedCoordinates {
    fn next_coordinate(&mut self) -> Coordinate {
        if self.script.is_empty() {
            return Coordinate::new(0.0, 0.0);
        }
        let coord = self.script[self.next % self.script.len()];
        self.next += 1;
        coord
    }
}
