//! `meta.json` templating
//!
//! The embedded template carries the slicer profile a MakerBot expects. Each
//! machine and extruder model overrides a handful of its fields; the print
//! metrics fill in the rest.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::metrics::PrintMetrics;

const TEMPLATE: &str = include_str!("../resources/meta_template.json");

const START_POSITION: &str = "/miracle_config/gaggles/default/startPosition";

/// Target printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
pub enum MachineModel {
    #[value(name = "replicator-5", alias = "Rep5")]
    #[serde(rename = "replicator-5")]
    Replicator5,
    #[default]
    #[value(name = "replicator-plus", alias = "RepPlus")]
    #[serde(rename = "replicator-plus")]
    ReplicatorPlus,
    #[value(name = "replicator-mini", alias = "Mini5")]
    #[serde(rename = "replicator-mini")]
    ReplicatorMini,
    #[value(name = "replicator-mini-plus", alias = "MiniPlus")]
    #[serde(rename = "replicator-mini-plus")]
    ReplicatorMiniPlus,
}

/// Bed position the firmware starts each print from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPosition {
    pub x: i32,
    pub y: i32,
    pub z: f64,
}

impl MachineModel {
    pub fn bot_type(&self) -> &'static str {
        match self {
            MachineModel::Replicator5 => "replicator_5",
            MachineModel::ReplicatorPlus => "replicator_b",
            MachineModel::ReplicatorMini => "mini_4",
            MachineModel::ReplicatorMiniPlus => "mini_8",
        }
    }

    pub fn start_position(&self) -> StartPosition {
        let (x, y, z) = match self {
            MachineModel::Replicator5 => (-125, -99, 0.2),
            MachineModel::ReplicatorPlus => (-150, -100, 0.2),
            MachineModel::ReplicatorMini => (-59, -48, 1.0),
            MachineModel::ReplicatorMiniPlus => (-59, 37, 0.2),
        };
        StartPosition { x, y, z }
    }

    fn apply(&self, meta: &mut Value) -> Result<()> {
        let start = self.start_position();
        set(meta, "/bot_type", json!(self.bot_type()))?;
        set(meta, "/miracle_config/_bot", json!(self.bot_type()))?;
        set(meta, &format!("{START_POSITION}/x"), json!(start.x))?;
        set(meta, &format!("{START_POSITION}/y"), json!(start.y))?;
        set(meta, &format!("{START_POSITION}/z"), json!(start.z))
    }
}

/// Installed extruder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
pub enum ExtruderModel {
    #[value(name = "smart-extruder", alias = "SmartExt")]
    #[serde(rename = "smart-extruder")]
    SmartExtruder,
    #[default]
    #[value(name = "smart-extruder-plus", alias = "SmartExtPlus")]
    #[serde(rename = "smart-extruder-plus")]
    SmartExtruderPlus,
    #[value(name = "tough-extruder", alias = "ToughExt")]
    #[serde(rename = "tough-extruder")]
    ToughExtruder,
    #[value(name = "experimental-extruder", alias = "ExperimentalExt")]
    #[serde(rename = "experimental-extruder")]
    ExperimentalExtruder,
}

impl ExtruderModel {
    pub fn tool_type(&self) -> &'static str {
        match self {
            ExtruderModel::SmartExtruder => "mk12",
            ExtruderModel::SmartExtruderPlus => "mk13",
            ExtruderModel::ToughExtruder => "mk13_impla",
            ExtruderModel::ExperimentalExtruder => "mk13_experimental",
        }
    }

    fn apply(&self, meta: &mut Value) -> Result<()> {
        set(meta, "/tool_type", json!(self.tool_type()))?;
        set(meta, "/tool_types", json!([self.tool_type()]))?;
        set(meta, "/miracle_config/_extruders", json!([self.tool_type()]))
    }
}

fn set(meta: &mut Value, pointer: &str, value: Value) -> Result<()> {
    let slot = meta
        .pointer_mut(pointer)
        .with_context(|| format!("metadata template has no field {pointer}"))?;
    *slot = value;
    Ok(())
}

/// Render `meta.json` for one print
pub fn render(
    metrics: &PrintMetrics,
    machine: MachineModel,
    extruder: ExtruderModel,
    uuid: Uuid,
) -> Result<Value> {
    let mut meta: Value =
        serde_json::from_str(TEMPLATE).context("embedded metadata template is not valid JSON")?;

    machine.apply(&mut meta)?;
    extruder.apply(&mut meta)?;

    let bounding_box =
        serde_json::to_value(metrics.bounding_box).context("serializing bounding box")?;
    let fields = [
        ("/bounding_box", bounding_box),
        ("/total_commands", json!(metrics.command_count)),
        ("/duration_s", json!(metrics.time_s)),
        ("/commanded_duration_s", json!(metrics.commanded_duration_s())),
        ("/num_z_transitions", json!(metrics.z_transitions)),
        ("/num_z_layers", json!(metrics.num_z_layers())),
        ("/platform_temperature", json!(metrics.bed_temp)),
        ("/extruder_temperature", json!(metrics.extruder_temperature)),
        ("/extruder_temperatures", json!([metrics.extruder_temperature])),
        ("/extrusion_distance_mm", json!(metrics.extrusion_distance_mm)),
        ("/extrusion_distances_mm", json!([metrics.extrusion_distance_mm])),
        ("/extrusion_mass_g", json!(metrics.extrusion_mass_g())),
        ("/extrusion_masses_g", json!([metrics.extrusion_mass_g()])),
        ("/uuid", json!(uuid.to_string())),
    ];
    for (pointer, value) in fields {
        set(&mut meta, pointer, value)?;
    }

    Ok(meta)
}
