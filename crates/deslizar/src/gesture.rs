//! Drag simulation: press–move–release gestures along the slider track.
//!
//! A single instantaneous move-and-release is frequently not recognized by
//! slider widgets that listen for continuous pointer movement to update
//! their internal drag state, so every drag is decomposed into interpolated
//! intermediate moves that emulate a human-speed gesture.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Point, TrackGeometry};
use crate::result::{DeslizarError, DeslizarResult};
use crate::session::{PointerPhase, SliderHandle, SliderSession};

/// Bounding-box reads attempted before giving up on an unmeasurable element
pub const GEOMETRY_RETRY_ATTEMPTS: u32 = 3;

/// Backoff between geometry acquisition attempts (milliseconds)
pub const GEOMETRY_RETRY_BACKOFF_MS: u64 = 150;

/// Interpolation steps for a full-track drag
pub const DEFAULT_DRAG_STEPS: u32 = 10;

/// An ordered sequence of pointer positions from a start point to an end
/// point.
///
/// The first sample is the start, the last is the end, and the interpolation
/// fraction increases monotonically across the sequence. Paths are built,
/// consumed by one gesture, and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerPath {
    points: Vec<Point>,
}

impl PointerPath {
    /// Linearly interpolate `steps` samples between `start` and `end`
    /// (fraction `i/steps` for `i` in `1..=steps`), preceded by the start
    /// point itself. `steps` is raised to at least 1.
    #[must_use]
    pub fn interpolate(start: Point, end: Point, steps: u32) -> Self {
        let steps = steps.max(1);
        let mut points = Vec::with_capacity(steps as usize + 1);
        points.push(start);
        for i in 1..=steps {
            let fraction = f64::from(i) / f64::from(steps);
            points.push(Point::new(
                start.x + (end.x - start.x) * fraction,
                start.y + (end.y - start.y) * fraction,
            ));
        }
        Self { points }
    }

    /// All samples, start first
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// First sample
    #[must_use]
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// Last sample
    #[must_use]
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

/// Acquire the slider's track geometry, tolerating a transiently
/// detached/unmeasurable element.
///
/// Retries up to [`GEOMETRY_RETRY_ATTEMPTS`] bounding-box reads with
/// [`GEOMETRY_RETRY_BACKOFF_MS`] of backoff between them. A box without
/// positive width counts as unmeasurable, same as no box at all.
///
/// # Errors
///
/// [`DeslizarError::GeometryUnavailable`] once the budget is exhausted:
/// fatal, the control never became interactive. Transport errors from the
/// session propagate immediately.
pub async fn acquire_geometry<S: SliderSession + ?Sized>(
    session: &S,
    handle: &SliderHandle,
) -> DeslizarResult<TrackGeometry> {
    for attempt in 1..=GEOMETRY_RETRY_ATTEMPTS {
        match session.bounding_box(handle).await? {
            Some(geom) if geom.is_measurable() => return Ok(geom),
            _ => {
                debug!(attempt, selector = %handle.selector, "slider not measurable yet");
                if attempt < GEOMETRY_RETRY_ATTEMPTS {
                    session
                        .sleep(Duration::from_millis(GEOMETRY_RETRY_BACKOFF_MS))
                        .await;
                }
            }
        }
    }
    Err(DeslizarError::GeometryUnavailable {
        attempts: GEOMETRY_RETRY_ATTEMPTS,
    })
}

/// Perform one press–move–release gesture from `start` to `end`.
///
/// Dispatches a pointer-down at `start`, `steps` linearly interpolated
/// pointer-moves, and a pointer-up at `end`. The gesture is atomic: there is
/// no cancellation point between down and up, since a dangling pointer-down
/// would leave the simulated device in an invalid state.
///
/// # Errors
///
/// Propagates any dispatch failure from the session.
pub async fn simulate_drag<S: SliderSession + ?Sized>(
    session: &S,
    start: Point,
    end: Point,
    steps: u32,
) -> DeslizarResult<()> {
    let path = PointerPath::interpolate(start, end, steps);
    debug!(
        from_x = start.x,
        to_x = end.x,
        steps = path.points().len() - 1,
        "simulating drag"
    );
    session
        .dispatch_pointer(PointerPhase::Down, start.x, start.y)
        .await?;
    for point in &path.points()[1..] {
        session
            .dispatch_pointer(PointerPhase::Move, point.x, point.y)
            .await?;
    }
    let end = path.end();
    session
        .dispatch_pointer(PointerPhase::Up, end.x, end.y)
        .await?;
    Ok(())
}
