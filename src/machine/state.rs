//! Machine state records
//!
//! One live instance of each is threaded through a translation pass.

/// Tool-tip position after offsets, plus feedrate
///
/// Written out as the parameters of a `move` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisState {
    /// Extrusion (feedstock) position in mm
    pub a: f64,
    /// mm/s
    pub feedrate: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            a: 0.0,
            feedrate: 23.0,
            x: -10.3,
            y: -0.25,
            z: 0.3,
        }
    }
}

impl AxisState {
    /// Spatial position only
    pub fn xyz(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Additive per-axis coordinate offset set by `G92`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub a: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Offset {
    fn default() -> Self {
        Self {
            a: 0.0,
            x: 0.0,
            y: 0.0,
            z: -0.05,
        }
    }
}

/// Last commanded heater target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolTemperature {
    /// Unset until an M104 names a tool, then sticky
    pub index: Option<u32>,
    /// °C
    pub temperature: i64,
}

/// Fan on/off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanState {
    pub index: u32,
    pub value: bool,
}

/// Fan duty cycle in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FanDuty {
    pub index: u32,
    pub value: f64,
}

/// All mutable interpreter state besides the metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineState {
    pub axis: AxisState,
    pub offset: Offset,
    pub tool: ToolTemperature,
    pub fan: FanState,
    pub duty: FanDuty,
}
