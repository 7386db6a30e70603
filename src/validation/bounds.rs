//! Geometric sanity checks over the finished toolpath

use crate::error::ValidationError;
use crate::metrics::{Aggregate, BoundingBox, PrintMetrics};
use crate::toolpath::{Command, MoveTag, Toolpath};

/// Allowed magnitude of the X/Y center ratio
pub const CENTER_TOLERANCE: f64 = 0.15;

/// The lowest extrusion must sit strictly between 0 and this height (mm)
pub const Z_START_LIMIT: f64 = 0.5;

/// Build the final metrics, failing on the first violated invariant
///
/// Pure over its inputs, so running it again on the same toolpath and the
/// metrics it produced yields the same result.
pub fn finalize(
    toolpath: &Toolpath,
    aggregate: &Aggregate,
) -> Result<PrintMetrics, ValidationError> {
    if aggregate.extruder_temperature <= 0 {
        return Err(ValidationError::ZeroExtruderTemperature);
    }

    let extrusion_distance_mm = toolpath
        .body()
        .iter()
        .filter(|cmd| cmd.is_move())
        .filter_map(|cmd| cmd.parameter("a"))
        .reduce(f64::max)
        .ok_or(ValidationError::NoMoves)?;

    let bounding_box = BoundingBox::from_points(
        toolpath
            .body()
            .iter()
            .filter(|cmd| is_extrusion_move(cmd))
            .filter_map(position),
    )
    .ok_or(ValidationError::NoExtrusionMoves)?;

    log::debug!("bounding box {:?}", bounding_box);
    check_bounds(&bounding_box)?;

    Ok(PrintMetrics {
        time_s: aggregate.time_s,
        bed_temp: aggregate.bed_temp,
        heatbed_enabled: aggregate.heatbed_enabled,
        z_transitions: aggregate.z_transitions,
        extruder_temperature: aggregate.extruder_temperature,
        extrusion_distance_mm,
        command_count: toolpath.command_count(),
        bounding_box,
    })
}

/// Print must be centered on the origin in X/Y and start on the plate
pub fn check_bounds(bbox: &BoundingBox) -> Result<(), ValidationError> {
    for (axis, ratio) in [('X', bbox.x_center_ratio()), ('Y', bbox.y_center_ratio())] {
        log::debug!("{} center ratio {}", axis, ratio);
        if !(-CENTER_TOLERANCE < ratio && ratio < CENTER_TOLERANCE) {
            return Err(ValidationError::CenterOffset { axis, ratio });
        }
    }

    if !(0.0 < bbox.z_min && bbox.z_min < Z_START_LIMIT) {
        return Err(ValidationError::ZStart { z_min: bbox.z_min });
    }

    Ok(())
}

fn is_extrusion_move(cmd: &Command) -> bool {
    cmd.is_move() && (cmd.has_tag(MoveTag::Infill) || cmd.has_tag(MoveTag::LeakyTravelMove))
}

fn position(cmd: &Command) -> Option<[f64; 3]> {
    Some([cmd.parameter("x")?, cmd.parameter("y")?, cmd.parameter("z")?])
}
