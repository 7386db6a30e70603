//! Per-move duration model

use crate::machine::AxisState;

/// Seconds spent moving from `prev` to `next` at `next`'s feedrate
///
/// A move that only changes the extrusion axis (a retract or prime) is timed
/// by the feedstock travel; everything else by the straight-line XYZ distance.
pub fn motion_time(prev: &AxisState, next: &AxisState) -> f64 {
    let distance = if prev.xyz() == next.xyz() && prev.a != next.a {
        (next.a - prev.a).abs()
    } else {
        prev.xyz()
            .iter()
            .zip(next.xyz())
            .map(|(p, n)| (n - p).powi(2))
            .sum::<f64>()
            .sqrt()
    };
    distance / next.feedrate
}
