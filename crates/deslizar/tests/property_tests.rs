//! Property-based tests for deslizar.
//!
//! Uses proptest to verify the geometric invariants hold for arbitrary
//! value domains and track rectangles.

use deslizar::{value_to_x, x_to_value, Point, PointerPath, SliderSpec, TrackGeometry};
use proptest::prelude::*;

fn arb_spec() -> impl Strategy<Value = SliderSpec> {
    (-1000.0f64..1000.0, 1.0f64..1000.0, 0.0f64..=1.0).prop_map(|(min, span, frac)| {
        SliderSpec::new(min, min + span, min + frac * span).unwrap()
    })
}

fn arb_geom() -> impl Strategy<Value = TrackGeometry> {
    (-500.0f64..500.0, -500.0f64..500.0, 10.0f64..2000.0, 1.0f64..50.0)
        .prop_map(|(x, y, w, h)| TrackGeometry::new(x, y, w, h))
}

proptest! {
    /// Mapping a value to a pixel and back must return the same value.
    #[test]
    fn prop_round_trip_law(spec in arb_spec(), geom in arb_geom(), frac in 0.0f64..=1.0) {
        let value = spec.min + frac * spec.span();
        let back = x_to_value(&spec, &geom, value_to_x(&spec, &geom, value));
        prop_assert!((back - value).abs() < 1e-6 * spec.span().max(1.0),
            "round trip drifted: {} -> {}", value, back);
    }

    /// Mapped coordinates never leave the track, even for wild targets.
    #[test]
    fn prop_mapped_x_stays_on_track(
        spec in arb_spec(),
        geom in arb_geom(),
        value in -1e6f64..1e6,
    ) {
        let x = value_to_x(&spec, &geom, value);
        prop_assert!(x >= geom.origin_x - 1e-9);
        prop_assert!(x <= geom.end_x() + 1e-9);
    }

    /// Mapping is monotonic: a larger value never maps left of a smaller one.
    #[test]
    fn prop_mapping_monotonic(
        spec in arb_spec(),
        geom in arb_geom(),
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let x_lo = value_to_x(&spec, &geom, spec.min + lo * spec.span());
        let x_hi = value_to_x(&spec, &geom, spec.min + hi * spec.span());
        prop_assert!(x_lo <= x_hi + 1e-9);
    }

    /// Interpolated paths start at the start, end at the end, and advance
    /// monotonically.
    #[test]
    fn prop_pointer_path_invariants(
        sx in -500.0f64..500.0,
        ex in -500.0f64..500.0,
        y in 0.0f64..500.0,
        steps in 1u32..50,
    ) {
        let start = Point::new(sx, y);
        let end = Point::new(ex, y);
        let path = PointerPath::interpolate(start, end, steps);

        prop_assert_eq!(path.points().len(), steps as usize + 1);
        prop_assert!((path.start().x - sx).abs() < 1e-9);
        prop_assert!((path.end().x - ex).abs() < 1e-9);

        let dir = (ex - sx).signum();
        for pair in path.points().windows(2) {
            prop_assert!((pair[1].x - pair[0].x) * dir >= -1e-9);
        }
    }
}
