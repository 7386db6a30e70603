//! Print metrics
//!
//! Running accumulation during the pass and the finalized record handed to
//! metadata templating.

pub mod aggregator;
pub mod time;

pub use aggregator::{Aggregate, MetricAggregator, TemperatureConflict};
pub use time::motion_time;

use serde::Serialize;

/// Grams of filament per millimetre of feedstock
pub const FILAMENT_GRAMS_PER_MM: f64 = 0.00305;

/// Axis-aligned extents of the extruded moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x_max: f64,
    pub x_min: f64,
    pub y_max: f64,
    pub y_min: f64,
    pub z_max: f64,
    pub z_min: f64,
}

impl BoundingBox {
    /// Extents of a non-empty set of `[x, y, z]` points
    pub fn from_points(points: impl IntoIterator<Item = [f64; 3]>) -> Option<Self> {
        let mut points = points.into_iter();
        let [x, y, z] = points.next()?;
        let start = BoundingBox {
            x_max: x,
            x_min: x,
            y_max: y,
            y_min: y,
            z_max: z,
            z_min: z,
        };
        Some(points.fold(start, |b, [x, y, z]| BoundingBox {
            x_max: b.x_max.max(x),
            x_min: b.x_min.min(x),
            y_max: b.y_max.max(y),
            y_min: b.y_min.min(y),
            z_max: b.z_max.max(z),
            z_min: b.z_min.min(z),
        }))
    }

    /// `(max + min) / (max - min)`: 0 when centered on the origin
    pub fn x_center_ratio(&self) -> f64 {
        (self.x_max + self.x_min) / (self.x_max - self.x_min)
    }

    pub fn y_center_ratio(&self) -> f64 {
        (self.y_max + self.y_min) / (self.y_max - self.y_min)
    }
}

/// Derived physical quantities of one translated print
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintMetrics {
    pub time_s: f64,
    pub bed_temp: i64,
    pub heatbed_enabled: bool,
    pub z_transitions: u32,
    pub extruder_temperature: i64,
    pub extrusion_distance_mm: f64,
    /// Written array length, header and footer included
    pub command_count: usize,
    pub bounding_box: BoundingBox,
}

impl PrintMetrics {
    pub fn num_z_layers(&self) -> u32 {
        self.z_transitions + 1
    }

    /// Reported alongside `duration_s`; always half of it
    pub fn commanded_duration_s(&self) -> f64 {
        self.time_s / 2.0
    }

    pub fn extrusion_mass_g(&self) -> f64 {
        self.extrusion_distance_mm * FILAMENT_GRAMS_PER_MM
    }
}

impl From<&PrintMetrics> for Aggregate {
    fn from(metrics: &PrintMetrics) -> Self {
        Aggregate {
            time_s: metrics.time_s,
            bed_temp: metrics.bed_temp,
            heatbed_enabled: metrics.heatbed_enabled,
            z_transitions: metrics.z_transitions,
            extruder_temperature: metrics.extruder_temperature,
            tool_temperatures: Default::default(),
        }
    }
}
