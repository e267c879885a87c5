//! Slider geometry: value domain to track pixels and back.
//!
//! The mapping is linear over the track rectangle. All functions here are
//! pure; measurement and dispatch live in [`crate::session`] and
//! [`crate::gesture`].

use serde::{Deserialize, Serialize};

use crate::result::{DeslizarError, DeslizarResult};

/// A point in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Snapshot of a slider's value domain and current value.
///
/// Read from the live control before any interaction and re-read after every
/// gesture; the control's own value is the only ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    /// Minimum value of the domain
    pub min: f64,
    /// Maximum value of the domain
    pub max: f64,
    /// Value reported by the control at measurement time
    pub current_value: f64,
}

impl SliderSpec {
    /// Create a validated snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DeslizarError::DegenerateRange`] if `max <= min`. The current
    /// value is clamped into `[min, max]` rather than rejected.
    pub fn new(min: f64, max: f64, current_value: f64) -> DeslizarResult<Self> {
        if max <= min {
            return Err(DeslizarError::DegenerateRange { min, max });
        }
        Ok(Self {
            min,
            max,
            current_value: current_value.clamp(min, max),
        })
    }

    /// Build a snapshot from raw attribute strings.
    ///
    /// Missing `min`/`max` fall back to the HTML range defaults 0 and 100.
    /// A missing `value` falls back to the midpoint, matching how browsers
    /// initialize an unset range input.
    ///
    /// # Errors
    ///
    /// Returns [`DeslizarError::AttributeNotNumeric`] for unparseable
    /// attributes and [`DeslizarError::DegenerateRange`] for `max <= min`.
    pub fn from_attributes(
        min: Option<&str>,
        max: Option<&str>,
        value: Option<&str>,
    ) -> DeslizarResult<Self> {
        let min = parse_numeric("min", min, 0.0)?;
        let max = parse_numeric("max", max, 100.0)?;
        if max <= min {
            return Err(DeslizarError::DegenerateRange { min, max });
        }
        let value = parse_numeric("value", value, min + (max - min) / 2.0)?;
        Self::new(min, max, value)
    }

    /// Width of the value domain
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into `[min, max]`
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

fn parse_numeric(name: &str, raw: Option<&str>, default: f64) -> DeslizarResult<f64> {
    match raw {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| DeslizarError::AttributeNotNumeric {
                name: name.to_string(),
                value: s.to_string(),
            }),
    }
}

/// The slider's bounding box in viewport pixels at the moment of measurement.
///
/// Stale as soon as the page scrolls or re-renders, so it is re-measured with
/// bounded retries rather than cached across an operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    /// Left edge of the track
    pub origin_x: f64,
    /// Top edge of the track
    pub origin_y: f64,
    /// Track width; must be positive to be usable
    pub width: f64,
    /// Track height
    pub height: f64,
}

impl TrackGeometry {
    /// Create a new track geometry
    #[must_use]
    pub const fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Whether the box can anchor a gesture (a zero-width box means the
    /// element is not laid out yet)
    #[must_use]
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0
    }

    /// Vertical coordinate used for all gestures
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.origin_y + self.height / 2.0
    }

    /// Right edge of the track
    #[must_use]
    pub fn end_x(&self) -> f64 {
        self.origin_x + self.width
    }
}

/// Map a slider value to the horizontal pixel coordinate on the track.
///
/// Values outside `[min, max]` are clamped to the boundary before mapping so
/// an out-of-range target can never produce a coordinate that lands on a
/// different control.
#[must_use]
pub fn value_to_x(spec: &SliderSpec, geom: &TrackGeometry, value: f64) -> f64 {
    let fraction = (spec.clamp(value) - spec.min) / spec.span();
    geom.origin_x + fraction * geom.width
}

/// Inverse of [`value_to_x`]: map a horizontal pixel coordinate back to the
/// value domain. Coordinates outside the track are clamped to its edges.
#[must_use]
pub fn x_to_value(spec: &SliderSpec, geom: &TrackGeometry, x: f64) -> f64 {
    let clamped = x.clamp(geom.origin_x, geom.end_x());
    let fraction = (clamped - geom.origin_x) / geom.width;
    spec.min + fraction * spec.span()
}
