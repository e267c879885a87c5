//! Browser-session collaborator boundary.
//!
//! The drag core never talks to a browser directly; it goes through the
//! [`SliderSession`] trait. This keeps the geometry and convergence logic
//! testable against [`MockSession`] and lets the CDP implementation in
//! [`crate::browser`] be swapped out without touching the core.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::geometry::TrackGeometry;
use crate::result::DeslizarResult;

/// Handle to a slider element on the live page.
///
/// Opaque to the core; the session implementation decides how the selector is
/// resolved. The live DOM control behind it is the sole source of truth for
/// the slider's value, so nothing read through this handle is cached beyond a
/// single measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderHandle {
    /// CSS selector identifying the control
    pub selector: String,
}

impl SliderHandle {
    /// Create a new handle from a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

/// Phase of a simulated pointer gesture.
///
/// Down/move/up is the one mechanism that reliably updates widget-internal
/// drag state; no input/change/click event fallbacks are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    /// Press the primary button
    Down,
    /// Move with the button held
    Move,
    /// Release the primary button
    Up,
}

impl PointerPhase {
    /// Get the phase name string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Move => "move",
            Self::Up => "up",
        }
    }
}

impl std::fmt::Display for PointerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Abstract browser session driving one slider control.
///
/// One invocation of the drag core owns its session exclusively for its
/// duration; simulated pointer state (down/up) is inherently exclusive per
/// input device, so concurrent slider drives belong in separate sessions.
#[async_trait]
pub trait SliderSession: Send + Sync {
    /// Bounding box of the control in viewport pixels.
    ///
    /// `Ok(None)` signals a transiently unmeasurable element (animation,
    /// re-layout); callers retry with backoff. Transport failures are `Err`.
    async fn bounding_box(&self, handle: &SliderHandle) -> DeslizarResult<Option<TrackGeometry>>;

    /// Read an attribute (`min`, `max`, `value`) from the control.
    ///
    /// `Ok(None)` means the attribute is absent, letting the caller apply
    /// the HTML range defaults.
    async fn read_attribute(
        &self,
        handle: &SliderHandle,
        name: &str,
    ) -> DeslizarResult<Option<String>>;

    /// Dispatch one low-level pointer event at viewport coordinates
    async fn dispatch_pointer(&self, phase: PointerPhase, x: f64, y: f64) -> DeslizarResult<()>;

    /// Suspend the calling flow, used for retry backoff
    async fn sleep(&self, duration: Duration);
}

// ============================================================================
// Mock session for unit testing
// ============================================================================

/// Internal state of the synthetic slider behind [`MockSession`]
#[derive(Debug)]
struct MockState {
    min: f64,
    max: f64,
    value: f64,
    step: f64,
    bias: f64,
    geometry: TrackGeometry,
    pointer_down: bool,
    bounding_box_failures: u32,
    call_history: Vec<String>,
}

impl MockState {
    /// Update the slider value from a horizontal pixel coordinate, the way a
    /// real range input quantizes a drag position to its step granularity.
    fn apply_x(&mut self, x: f64) {
        if self.max <= self.min || self.geometry.width <= 0.0 {
            return;
        }
        let clamped = x.clamp(self.geometry.origin_x, self.geometry.end_x());
        let fraction = (clamped - self.geometry.origin_x) / self.geometry.width;
        let raw = self.min + fraction * (self.max - self.min) + self.bias;
        let snapped = self.min + ((raw - self.min) / self.step).round() * self.step;
        self.value = snapped.clamp(self.min, self.max);
    }
}

/// In-memory session with a synthetic snapping slider, for unit tests.
///
/// The synthetic control behaves like an `<input type="range">`: pointer-down
/// grabs the thumb, moves while pressed update the value, and the value snaps
/// to the configured step granularity. A drag bias can be injected to emulate
/// widgets whose drag handling lands off-target, which is what the corrective
/// loop exists to absorb.
#[derive(Debug)]
pub struct MockSession {
    state: Mutex<MockState>,
}

impl MockSession {
    /// Default track used when none is configured
    const DEFAULT_GEOMETRY: TrackGeometry = TrackGeometry::new(80.0, 200.0, 400.0, 20.0);

    /// Create a session whose slider spans `[min, max]` starting at `value`,
    /// snapping to integer steps on the default 400px track
    #[must_use]
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        Self {
            state: Mutex::new(MockState {
                min,
                max,
                value,
                step: 1.0,
                bias: 0.0,
                geometry: Self::DEFAULT_GEOMETRY,
                pointer_down: false,
                bounding_box_failures: 0,
                call_history: Vec::new(),
            }),
        }
    }

    /// Set the track geometry
    #[must_use]
    pub fn with_geometry(self, geometry: TrackGeometry) -> Self {
        self.state.lock().unwrap().geometry = geometry;
        self
    }

    /// Set the snap granularity (default 1.0)
    #[must_use]
    pub fn with_step(self, step: f64) -> Self {
        self.state.lock().unwrap().step = step;
        self
    }

    /// Offset every drag landing by `bias` value units, emulating a widget
    /// whose internal drag handling is off-target
    #[must_use]
    pub fn with_drag_bias(self, bias: f64) -> Self {
        self.state.lock().unwrap().bias = bias;
        self
    }

    /// Make the next `n` bounding-box reads report the element as
    /// unmeasurable
    #[must_use]
    pub fn with_bounding_box_failures(self, n: u32) -> Self {
        self.state.lock().unwrap().bounding_box_failures = n;
        self
    }

    /// Current value of the synthetic slider
    #[must_use]
    pub fn value(&self) -> f64 {
        self.state.lock().unwrap().value
    }

    /// Whether the simulated pointer is currently pressed
    #[must_use]
    pub fn pointer_is_down(&self) -> bool {
        self.state.lock().unwrap().pointer_down
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.lock().unwrap().call_history.clone()
    }

    /// Check if a method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .call_history
            .iter()
            .any(|c| c.starts_with(method))
    }

    /// Number of recorded calls whose entry starts with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }
}

#[async_trait]
impl SliderSession for MockSession {
    async fn bounding_box(&self, handle: &SliderHandle) -> DeslizarResult<Option<TrackGeometry>> {
        let mut state = self.state.lock().unwrap();
        state
            .call_history
            .push(format!("bounding_box:{}", handle.selector));
        if state.bounding_box_failures > 0 {
            state.bounding_box_failures -= 1;
            return Ok(None);
        }
        Ok(Some(state.geometry))
    }

    async fn read_attribute(
        &self,
        handle: &SliderHandle,
        name: &str,
    ) -> DeslizarResult<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state
            .call_history
            .push(format!("read_attribute:{}:{name}", handle.selector));
        let value = match name {
            "min" => Some(state.min),
            "max" => Some(state.max),
            "value" => Some(state.value),
            _ => None,
        };
        Ok(value.map(|v| format!("{v}")))
    }

    async fn dispatch_pointer(&self, phase: PointerPhase, x: f64, y: f64) -> DeslizarResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .call_history
            .push(format!("dispatch_pointer:{phase}:{x}:{y}"));
        match phase {
            PointerPhase::Down => {
                state.pointer_down = true;
                state.apply_x(x);
            }
            PointerPhase::Move => {
                // Hover moves with the button up do not grab the thumb
                if state.pointer_down {
                    state.apply_x(x);
                }
            }
            PointerPhase::Up => {
                if state.pointer_down {
                    state.apply_x(x);
                }
                state.pointer_down = false;
            }
        }
        Ok(())
    }

    async fn sleep(&self, duration: Duration) {
        // Recorded but not slept, so tests stay fast
        self.state
            .lock()
            .unwrap()
            .call_history
            .push(format!("sleep:{}", duration.as_millis()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> SliderHandle {
        SliderHandle::new("input[type=range]")
    }

    mod pointer_phase_tests {
        use super::*;

        #[test]
        fn test_phase_names() {
            assert_eq!(PointerPhase::Down.as_str(), "down");
            assert_eq!(PointerPhase::Move.as_str(), "move");
            assert_eq!(PointerPhase::Up.as_str(), "up");
        }

        #[test]
        fn test_phase_display() {
            assert_eq!(format!("{}", PointerPhase::Down), "down");
        }
    }

    mod slider_handle_tests {
        use super::*;

        #[test]
        fn test_handle_selector() {
            let h = SliderHandle::new("#range-1");
            assert_eq!(h.selector, "#range-1");
        }
    }

    mod mock_session_tests {
        use super::*;

        #[tokio::test]
        async fn test_bounding_box_returns_geometry() {
            let session = MockSession::new(0.0, 100.0, 0.0);
            let geom = session.bounding_box(&handle()).await.unwrap().unwrap();
            assert_eq!(geom.origin_x, 80.0);
            assert_eq!(geom.width, 400.0);
        }

        #[tokio::test]
        async fn test_bounding_box_failures_then_recovery() {
            let session = MockSession::new(0.0, 100.0, 0.0).with_bounding_box_failures(2);
            assert!(session.bounding_box(&handle()).await.unwrap().is_none());
            assert!(session.bounding_box(&handle()).await.unwrap().is_none());
            assert!(session.bounding_box(&handle()).await.unwrap().is_some());
        }

        #[tokio::test]
        async fn test_read_attributes() {
            let session = MockSession::new(5.0, 50.0, 20.0);
            let h = handle();
            assert_eq!(
                session.read_attribute(&h, "min").await.unwrap().as_deref(),
                Some("5")
            );
            assert_eq!(
                session.read_attribute(&h, "max").await.unwrap().as_deref(),
                Some("50")
            );
            assert_eq!(
                session
                    .read_attribute(&h, "value")
                    .await
                    .unwrap()
                    .as_deref(),
                Some("20")
            );
            assert!(session
                .read_attribute(&h, "data-id")
                .await
                .unwrap()
                .is_none());
        }

        #[tokio::test]
        async fn test_drag_updates_value() {
            let session = MockSession::new(0.0, 100.0, 0.0);
            // Press at the left edge, release at 95% of the track
            session
                .dispatch_pointer(PointerPhase::Down, 80.0, 210.0)
                .await
                .unwrap();
            assert!(session.pointer_is_down());
            session
                .dispatch_pointer(PointerPhase::Up, 460.0, 210.0)
                .await
                .unwrap();
            assert!(!session.pointer_is_down());
            assert_eq!(session.value(), 95.0);
        }

        #[tokio::test]
        async fn test_hover_move_does_not_grab() {
            let session = MockSession::new(0.0, 100.0, 30.0);
            session
                .dispatch_pointer(PointerPhase::Move, 460.0, 210.0)
                .await
                .unwrap();
            assert_eq!(session.value(), 30.0);
        }

        #[tokio::test]
        async fn test_value_snaps_to_step() {
            let session = MockSession::new(0.0, 100.0, 0.0).with_step(5.0);
            session
                .dispatch_pointer(PointerPhase::Down, 80.0, 210.0)
                .await
                .unwrap();
            // 93% of the track = raw 93, snaps to 95
            session
                .dispatch_pointer(PointerPhase::Up, 452.0, 210.0)
                .await
                .unwrap();
            assert_eq!(session.value(), 95.0);
        }

        #[tokio::test]
        async fn test_drag_bias_shifts_landing() {
            let session = MockSession::new(0.0, 100.0, 0.0).with_drag_bias(3.0);
            session
                .dispatch_pointer(PointerPhase::Down, 80.0, 210.0)
                .await
                .unwrap();
            session
                .dispatch_pointer(PointerPhase::Up, 460.0, 210.0)
                .await
                .unwrap();
            assert_eq!(session.value(), 98.0);
        }

        #[tokio::test]
        async fn test_landing_clamped_to_domain() {
            let session = MockSession::new(0.0, 100.0, 0.0).with_drag_bias(20.0);
            session
                .dispatch_pointer(PointerPhase::Down, 480.0, 210.0)
                .await
                .unwrap();
            session
                .dispatch_pointer(PointerPhase::Up, 480.0, 210.0)
                .await
                .unwrap();
            assert_eq!(session.value(), 100.0);
        }

        #[tokio::test]
        async fn test_call_history() {
            let session = MockSession::new(0.0, 100.0, 0.0);
            session.bounding_box(&handle()).await.unwrap();
            session.sleep(Duration::from_millis(150)).await;
            assert!(session.was_called("bounding_box"));
            assert!(session.was_called("sleep:150"));
            assert!(!session.was_called("dispatch_pointer"));
            assert_eq!(session.call_count("sleep"), 1);
        }
    }
}
