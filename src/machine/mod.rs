//! Axis & machine state
//!
//! Position, offsets, heater and fan records, and the opcode handlers that
//! mutate them.

pub mod handlers;
pub mod state;

pub use handlers::{Motion, MotionOutcome};
pub use state::{AxisState, FanDuty, FanState, MachineState, Offset, ToolTemperature};
