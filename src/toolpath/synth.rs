//! Command synthesis
//!
//! Pure functions from machine state to toolpath commands. Nothing here
//! touches the command log; the translator appends what these return.

use serde_json::json;

use crate::machine::{AxisState, FanDuty, FanState, Motion, ToolTemperature};
use crate::toolpath::command::{absolute_move_metadata, Command, MoveTag};

/// Material announced with every layer section
const MATERIAL_INDEX: u32 = 0;

/// Tag a move from its variant and the extrusion change
pub fn classify_move(motion: Motion, prev_a: f64, next_a: f64) -> MoveTag {
    match motion {
        Motion::Rapid => MoveTag::TravelMove,
        Motion::Controlled if next_a > prev_a => MoveTag::Infill,
        Motion::Controlled if next_a < prev_a => MoveTag::Retract,
        Motion::Controlled => MoveTag::LeakyTravelMove,
    }
}

/// `move` carrying the full post-update axis state
pub fn move_command(motion: Motion, prev: &AxisState, next: &AxisState) -> Command {
    let tag = classify_move(motion, prev.a, next.a);
    Command::new(
        "move",
        absolute_move_metadata(),
        json!({
            "a": next.a,
            "feedrate": next.feedrate,
            "x": next.x,
            "y": next.y,
            "z": next.z,
        }),
        vec![tag.to_string()],
    )
}

/// `set_toolhead_temperature`
///
/// With a known tool index the whole record is sent; without one the
/// single-extruder form carries the bare temperature.
pub fn toolhead_temperature_command(tool: &ToolTemperature) -> Command {
    let parameters = match tool.index {
        Some(index) => json!({ "index": index, "temperature": tool.temperature }),
        None => json!({ "temperature": tool.temperature }),
    };
    Command::new("set_toolhead_temperature", json!({}), parameters, vec![])
}

pub fn toggle_fan_command(fan: &FanState) -> Command {
    Command::new(
        "toggle_fan",
        json!({}),
        json!({ "index": fan.index, "value": fan.value }),
        vec![],
    )
}

pub fn fan_duty_command(duty: &FanDuty) -> Command {
    Command::new(
        "fan_duty",
        json!({}),
        json!({ "index": duty.index, "value": duty.value }),
        vec![],
    )
}

/// Announce a new layer section; layer 0 comes from the fixed header
pub fn layer_section_commands(index: i64) -> Vec<Command> {
    if index <= 0 {
        return Vec::new();
    }
    vec![
        Command::comment(format!("Layer Section {index} ({index})")),
        Command::comment(format!("Material {MATERIAL_INDEX}")),
    ]
}
