//! Deslizar: closed-loop pointer-drag value setter for range-slider controls.
//!
//! Deslizar (Spanish: "to slide") drives a continuous slider control to a
//! target value despite not controlling the browser's native input pipeline
//! directly. It reconciles an imprecise physical-interaction simulation
//! (mouse movement over a bounded track) with an exact target state (a
//! numeric slider value) using geometric computation, multi-step
//! interpolation, and closed-loop correction.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    DESLIZAR Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────┐     │
//! │   │ Geometry   │    │ Drag       │    │ Convergence    │     │
//! │   │ Mapper     │───►│ Simulator  │───►│ Corrector      │     │
//! │   │ (geometry) │    │ (gesture)  │    │ (converge)     │     │
//! │   └────────────┘    └────────────┘    └───────┬────────┘     │
//! │                                               │              │
//! │                 ┌─────────────────────────────▼───────────┐  │
//! │                 │ SliderSession (session / browser+CDP)   │  │
//! │                 └─────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The live DOM control is the sole source of truth: its value and bounding
//! box are re-measured around every gesture and never cached across a
//! mutation.
//!
//! # Example
//!
//! ```ignore
//! use deslizar::{drive_to_value, Browser, BrowserConfig, DriveOptions};
//!
//! let browser = Browser::launch(BrowserConfig::default()).await?;
//! let mut page = browser.new_page().await?;
//! page.goto("https://example.com/slider-demo").await?;
//!
//! let slider = page.slider("input[type=range]").await?;
//! let result = drive_to_value(&page, &slider, 95.0, &DriveOptions::default()).await?;
//! assert!(result.within_tolerance, "landed at {}", result.achieved_value);
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod browser;
mod converge;
mod geometry;
mod gesture;
mod result;
mod session;

pub use converge::{
    drive_to_value, read_slider_spec, AttemptResult, DriveOptions, CORRECTION_TRACK_FRACTION,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_TOLERANCE,
};
pub use geometry::{value_to_x, x_to_value, Point, SliderSpec, TrackGeometry};
pub use gesture::{
    acquire_geometry, simulate_drag, PointerPath, DEFAULT_DRAG_STEPS, GEOMETRY_RETRY_ATTEMPTS,
    GEOMETRY_RETRY_BACKOFF_MS,
};
pub use result::{DeslizarError, DeslizarResult};
pub use session::{MockSession, PointerPhase, SliderHandle, SliderSession};

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{Browser, Page};
