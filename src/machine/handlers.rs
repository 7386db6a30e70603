//! Instruction handlers
//!
//! Each recognized opcode mutates [`MachineState`] and reports what the
//! command synthesizer and metric aggregator need to know.

use crate::error::{Result, TranslateError};
use crate::machine::state::{AxisState, MachineState};
use crate::parser::Instruction;

/// Full duty for an `M106 S` value
const FAN_DUTY_SCALE: f64 = 255.0;

/// Motion instruction variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// `G0`
    Rapid,
    /// `G1`
    Controlled,
}

/// What a motion line did to the axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionOutcome {
    /// The line carried a lone `F` word
    FeedrateOnly,
    /// The tool moved; `prev` is the state before the line
    Moved { prev: AxisState },
}

/// Convert a slicer feedrate (mm/min) to mm/s
fn feedrate_from_word(value: f64) -> f64 {
    value / 60.0
}

impl MachineState {
    /// `G0`/`G1`: apply offset-adjusted coordinates and feedrate
    pub fn apply_motion(&mut self, ins: &Instruction, line: usize) -> Result<MotionOutcome> {
        if let [word] = ins.words.as_slice()
            && word.letter == 'F'
        {
            self.axis.feedrate = feedrate_from_word(ins.float(word, line)?);
            return Ok(MotionOutcome::FeedrateOnly);
        }

        let prev = self.axis;
        for word in &ins.words {
            match word.letter {
                'E' => self.axis.a = self.offset.a + ins.float(word, line)?,
                'X' => self.axis.x = self.offset.x + ins.float(word, line)?,
                'Y' => self.axis.y = self.offset.y + ins.float(word, line)?,
                'Z' => self.axis.z = self.offset.z + ins.float(word, line)?,
                'F' => self.axis.feedrate = feedrate_from_word(ins.float(word, line)?),
                _ => {}
            }
        }

        if self.axis.feedrate.is_nan() || self.axis.feedrate <= 0.0 {
            return Err(TranslateError::NonPositiveFeedrate {
                line,
                feedrate: self.axis.feedrate,
            });
        }

        Ok(MotionOutcome::Moved { prev })
    }

    /// `G92`: re-base the named axes without moving the tool
    pub fn apply_coordinate_reset(&mut self, ins: &Instruction, line: usize) -> Result<()> {
        for word in &ins.words {
            match word.letter {
                'E' => self.offset.a = self.axis.a + ins.float(word, line)?,
                'X' => self.offset.x = self.axis.x + ins.float(word, line)?,
                'Y' => self.offset.y = self.axis.y + ins.float(word, line)?,
                'Z' => self.offset.z = self.axis.z + ins.float(word, line)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// `M104`: update the tool temperature record
    ///
    /// Returns every temperature commanded on the line, in order.
    pub fn apply_tool_temperature(&mut self, ins: &Instruction, line: usize) -> Result<Vec<i64>> {
        let mut commanded = Vec::new();
        for word in &ins.words {
            match word.letter {
                'T' => self.tool.index = Some(ins.number(word, line)?),
                'S' => {
                    self.tool.temperature = ins.number(word, line)?;
                    commanded.push(self.tool.temperature);
                }
                _ => {}
            }
        }
        Ok(commanded)
    }

    /// `M106`: set fan index and duty, switching the fan on
///
/// Duty outside `S0..=S255` is clamped to [0, 1].
    ///
    /// Returns `true` when the fan was off before this line.
    pub fn apply_fan_duty(&mut self, ins: &Instruction, line: usize) -> Result<bool> {
        for word in &ins.words {
            match word.letter {
                'P' => {
                    let index = ins.number(word, line)?;
                    self.duty.index = index;
                    self.fan.index = index;
                }
                'S' => {
                    self.duty.value = (ins.float(word, line)? / FAN_DUTY_SCALE).clamp(0.0, 1.0)
                }
                _ => {}
            }
        }

        let switched_on = !self.fan.value;
        self.fan.value = true;
        Ok(switched_on)
    }

    /// `M107`
    pub fn apply_fan_off(&mut self) {
        self.fan.value = false;
    }
}
