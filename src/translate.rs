//! Single-pass G-code to toolpath translation
//!
//! Every line is interpreted in order against one [`MachineState`]; the
//! resulting commands go to the toolpath and the metric aggregator at the
//! same time. Validation runs once after the last line.

use std::path::Path;

use crate::error::{Result, TranslateError, ValidationError};
use crate::machine::{MachineState, Motion, MotionOutcome};
use crate::metrics::{MetricAggregator, PrintMetrics, TemperatureConflict};
use crate::parser::{detect_slicer, parse_line, Instruction, ParsedLine, Slicer};
use crate::progress::{NoProgress, Progress, PROGRESS_INTERVAL};
use crate::toolpath::{synth, Command, Toolpath};
use crate::validation;

/// Opcodes the translator interprets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// G0
    RapidMove,
    /// G1
    LinearMove,
    /// G92
    SetPosition,
    /// M104
    SetToolTemperature,
    /// M105
    ReportTemperature,
    /// M109
    WaitForTemperature,
    /// M106
    FanDuty,
    /// M107
    FanOff,
    /// M140
    SetBedTemperature,
    /// M82
    ExtruderAbsolute,
}

impl Opcode {
    pub fn parse(code: &str) -> Option<Opcode> {
        let opcode = match code {
            "G0" => Opcode::RapidMove,
            "G1" => Opcode::LinearMove,
            "G92" => Opcode::SetPosition,
            "M104" => Opcode::SetToolTemperature,
            "M105" => Opcode::ReportTemperature,
            "M109" => Opcode::WaitForTemperature,
            "M106" => Opcode::FanDuty,
            "M107" => Opcode::FanOff,
            "M140" => Opcode::SetBedTemperature,
            "M82" => Opcode::ExtruderAbsolute,
            _ => return None,
        };
        Some(opcode)
    }
}

/// Translation switches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Follow each instruction's output with a comment holding its source
    pub annotate: bool,
}

/// Everything one pass produces
#[derive(Debug, Clone)]
pub struct Translation {
    pub toolpath: Toolpath,
    /// Serialized toolpath, already checked to parse back identically
    pub toolpath_json: String,
    pub metrics: PrintMetrics,
    pub conflicts: Vec<TemperatureConflict>,
    pub slicer: Option<Slicer>,
}

/// Stateful interpreter for one input
#[derive(Debug)]
pub struct Translator {
    options: TranslateOptions,
    state: MachineState,
    aggregator: MetricAggregator,
    toolpath: Toolpath,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self::with_state(options, MachineState::default())
    }

    /// Start from a given machine state instead of the power-on defaults
    pub fn with_state(options: TranslateOptions, state: MachineState) -> Self {
        Self {
            options,
            state,
            aggregator: MetricAggregator::new(),
            toolpath: Toolpath::new(),
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn toolpath(&self) -> &Toolpath {
        &self.toolpath
    }

    pub fn aggregator(&self) -> &MetricAggregator {
        &self.aggregator
    }

    /// Interpret every line of `content`, then validate
    pub fn run(mut self, content: &str, progress: &mut dyn Progress) -> Result<Translation> {
        let slicer = detect_slicer(content.lines());
        if let Some(slicer) = slicer {
            log::info!("input generated by {}", slicer);
        }

        let total = content.lines().count();
        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            if line_no % PROGRESS_INTERVAL == 0 || line_no == total {
                progress.line(line_no, total);
            }
            self.interpret_line(line_no, line, progress)?;
        }
        progress.finish();

        let mut translation = self.finish()?;
        translation.slicer = slicer;
        Ok(translation)
    }

    /// Interpret one raw line
    pub fn interpret_line(
        &mut self,
        line_no: usize,
        line: &str,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        match parse_line(line) {
            ParsedLine::Empty => Ok(()),
            ParsedLine::LayerMarker(text) => {
                let index: i64 = text
                    .parse()
                    .map_err(|_| TranslateError::MalformedLayerMarker {
                        line: line_no,
                        text: text.clone(),
                    })?;
                self.toolpath.extend(synth::layer_section_commands(index));
                Ok(())
            }
            ParsedLine::Instruction(ins) => {
                self.interpret_instruction(line_no, &ins, progress)?;
                if self.options.annotate {
                    self.toolpath.push(Command::comment(ins.source()));
                }
                Ok(())
            }
        }
    }

    fn interpret_instruction(
        &mut self,
        line_no: usize,
        ins: &Instruction,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        let Some(opcode) = Opcode::parse(&ins.opcode) else {
            log::debug!("line {}: ignoring {}", line_no, ins.opcode);
            progress.unrecognized(line_no, &ins.opcode);
            return Ok(());
        };

        match opcode {
            Opcode::RapidMove | Opcode::LinearMove => {
                let motion = if opcode == Opcode::RapidMove {
                    Motion::Rapid
                } else {
                    Motion::Controlled
                };
                if let MotionOutcome::Moved { prev } = self.state.apply_motion(ins, line_no)? {
                    let next = self.state.axis;
                    self.toolpath.push(synth::move_command(motion, &prev, &next));
                    self.aggregator.record_motion(&prev, &next);
                }
            }
            Opcode::SetPosition => self.state.apply_coordinate_reset(ins, line_no)?,
            Opcode::SetToolTemperature => {
                for temperature in self.state.apply_tool_temperature(ins, line_no)? {
                    self.aggregator
                        .record_extruder_temperature(temperature, line_no);
                }
                self.toolpath
                    .push(synth::toolhead_temperature_command(&self.state.tool));
                self.aggregator.record_tool_temperature(&self.state.tool);
            }
            Opcode::ReportTemperature
            | Opcode::WaitForTemperature
            | Opcode::ExtruderAbsolute => {}
            Opcode::FanDuty => {
                if self.state.apply_fan_duty(ins, line_no)? {
                    self.toolpath.push(synth::toggle_fan_command(&self.state.fan));
                }
                self.toolpath.push(synth::fan_duty_command(&self.state.duty));
            }
            Opcode::FanOff => {
                self.state.apply_fan_off();
                self.toolpath.push(synth::toggle_fan_command(&self.state.fan));
            }
            Opcode::SetBedTemperature => {
                let temperature = ins.required('S', line_no)?;
                self.aggregator.record_bed_temperature(temperature);
            }
        }

        Ok(())
    }

    /// Serialize, self-check, and validate the finished toolpath
    pub fn finish(self) -> Result<Translation> {
        let toolpath_json =
            self.toolpath
                .to_json()
                .map_err(|e| ValidationError::ToolpathRoundTrip {
                    reason: e.to_string(),
                })?;
        self.toolpath.verify_round_trip(&toolpath_json)?;

        let (aggregate, conflicts) = self.aggregator.into_parts();
        let metrics = validation::finalize(&self.toolpath, &aggregate)?;
        log::info!(
            "{} commands, {:.1} s, {} layers, {:.1} mm filament",
            metrics.command_count,
            metrics.time_s,
            metrics.num_z_layers(),
            metrics.extrusion_distance_mm
        );

        Ok(Translation {
            toolpath: self.toolpath,
            toolpath_json,
            metrics,
            conflicts,
            slicer: None,
        })
    }
}

/// Translate G-code text without progress reporting
pub fn translate(content: &str, options: &TranslateOptions) -> Result<Translation> {
    Translator::new(options.clone()).run(content, &mut NoProgress)
}

/// Read and translate a G-code file
pub fn translate_file(
    path: &Path,
    options: &TranslateOptions,
    progress: &mut dyn Progress,
) -> Result<Translation> {
    let content = std::fs::read_to_string(path)?;
    Translator::new(options.clone()).run(&content, progress)
}
