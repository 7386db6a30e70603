//! Running metrics accumulated during the translation pass

use std::collections::BTreeMap;

use crate::machine::{AxisState, ToolTemperature};
use crate::metrics::time::motion_time;

/// A later nonzero extruder temperature that lost to the first one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureConflict {
    pub line: usize,
    pub kept: i64,
    pub ignored: i64,
}

/// Values known once the pass is over, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub time_s: f64,
    pub bed_temp: i64,
    pub heatbed_enabled: bool,
    pub z_transitions: u32,
    /// First nonzero commanded extruder temperature, 0 if none
    pub extruder_temperature: i64,
    /// Per-tool temperature bookkeeping
    ///
    /// Kept so both M104 branches stay observable; `meta.json` reports only
    /// `extruder_temperature`, so this never reaches [`PrintMetrics`].
    ///
    /// [`PrintMetrics`]: crate::metrics::PrintMetrics
    pub tool_temperatures: BTreeMap<u32, i64>,
}

#[derive(Debug, Default)]
pub struct MetricAggregator {
    aggregate: Aggregate,
    conflicts: Vec<TemperatureConflict>,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one executed move, returning its duration
    pub fn record_motion(&mut self, prev: &AxisState, next: &AxisState) -> f64 {
        let elapsed = motion_time(prev, next);
        self.aggregate.time_s += elapsed;
        if next.z > prev.z {
            self.aggregate.z_transitions += 1;
        }
        elapsed
    }

    /// First nonzero value wins; a differing later one is a conflict
    pub fn record_extruder_temperature(
        &mut self,
        temperature: i64,
        line: usize,
    ) -> Option<TemperatureConflict> {
        if temperature == 0 {
            return None;
        }

        let kept = self.aggregate.extruder_temperature;
        if kept == 0 {
            self.aggregate.extruder_temperature = temperature;
            return None;
        }
        if kept == temperature {
            return None;
        }

        let conflict = TemperatureConflict {
            line,
            kept,
            ignored: temperature,
        };
        log::warn!(
            "line {}: multiple temperatures issued during print, keeping {} and ignoring {}",
            line,
            kept,
            temperature
        );
        self.conflicts.push(conflict);
        Some(conflict)
    }

    /// Per-tool bookkeeping after an `M104`
    ///
    /// An indexed tool keeps its first nonzero value; the unindexed
    /// single-extruder form always overwrites tool 0.
    // TODO: the two branches disagree on first-wins; unify once a
    // multi-extruder machine profile exists to test against.
    pub fn record_tool_temperature(&mut self, tool: &ToolTemperature) {
        let temps = &mut self.aggregate.tool_temperatures;
        match tool.index {
            Some(index) => {
                let slot = temps.entry(index).or_insert(0);
                if *slot == 0 {
                    *slot = tool.temperature;
                }
            }
            None => {
                temps.insert(0, tool.temperature);
            }
        }
    }

    pub fn record_bed_temperature(&mut self, temperature: i64) {
        self.aggregate.bed_temp = temperature;
        self.aggregate.heatbed_enabled = true;
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    pub fn conflicts(&self) -> &[TemperatureConflict] {
        &self.conflicts
    }

    pub fn into_parts(self) -> (Aggregate, Vec<TemperatureConflict>) {
        (self.aggregate, self.conflicts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_z(z: f64) -> AxisState {
        AxisState {
            z,
            ..AxisState::default()
        }
    }

    #[test]
    fn z_transitions_count_strict_rises_only() {
        let mut agg = MetricAggregator::new();
        agg.record_motion(&at_z(0.2), &at_z(0.4));
        agg.record_motion(&at_z(0.4), &at_z(0.4));
        agg.record_motion(&at_z(0.4), &at_z(0.2));
        agg.record_motion(&at_z(0.2), &at_z(0.6));

        assert_eq!(agg.aggregate().z_transitions, 2);
    }

    #[test]
    fn time_is_the_sum_of_deltas() {
        let mut agg = MetricAggregator::new();
        let a = agg.record_motion(&at_z(0.0), &at_z(2.3));
        let b = agg.record_motion(&at_z(2.3), &at_z(4.6));

        assert!(a > 0.0 && b > 0.0);
        assert_eq!(agg.aggregate().time_s, a + b);
    }

    #[test]
    fn first_nonzero_temperature_wins() {
        let mut agg = MetricAggregator::new();
        assert_eq!(agg.record_extruder_temperature(0, 1), None);
        assert_eq!(agg.record_extruder_temperature(215, 2), None);
        assert_eq!(agg.record_extruder_temperature(215, 3), None);
        assert_eq!(agg.record_extruder_temperature(0, 4), None);

        let conflict = agg.record_extruder_temperature(210, 5).unwrap();
        assert_eq!(
            conflict,
            TemperatureConflict {
                line: 5,
                kept: 215,
                ignored: 210
            }
        );
        assert_eq!(agg.aggregate().extruder_temperature, 215);
        assert_eq!(agg.conflicts().len(), 1);
    }

    #[test]
    fn tool_bookkeeping_branches() {
        let mut agg = MetricAggregator::new();
        agg.record_tool_temperature(&ToolTemperature {
            index: Some(1),
            temperature: 200,
        });
        agg.record_tool_temperature(&ToolTemperature {
            index: Some(1),
            temperature: 190,
        });
        assert_eq!(agg.aggregate().tool_temperatures[&1], 200);

        agg.record_tool_temperature(&ToolTemperature {
            index: None,
            temperature: 215,
        });
        agg.record_tool_temperature(&ToolTemperature {
            index: None,
            temperature: 0,
        });
        assert_eq!(agg.aggregate().tool_temperatures[&0], 0);
    }

    #[test]
    fn bed_temperature_enables_heatbed() {
        let mut agg = MetricAggregator::new();
        assert!(!agg.aggregate().heatbed_enabled);

        agg.record_bed_temperature(60);
        assert!(agg.aggregate().heatbed_enabled);
        assert_eq!(agg.aggregate().bed_temp, 60);
    }
}
