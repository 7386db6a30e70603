//! Progress reporting
//!
//! Observability only: nothing reported here feeds back into translation.

/// Lines between progress ticks
pub const PROGRESS_INTERVAL: usize = 100;

/// Receives progress events from a translation pass
pub trait Progress {
    /// Called every [`PROGRESS_INTERVAL`] lines and on the last line
    fn line(&mut self, _line: usize, _total: usize) {}

    /// An opcode the translator does not interpret
    fn unrecognized(&mut self, _line: usize, _opcode: &str) {}

    /// The pass is over
    fn finish(&mut self) {}
}

/// Discards all events
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Reports through `log`, coalescing unrecognized opcodes between ticks
#[derive(Debug, Default)]
pub struct LogProgress {
    ignoring: Vec<String>,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_ignored(&mut self) {
        if self.ignoring.is_empty() {
            return;
        }
        let opcodes: Vec<String> = self.ignoring.drain(..).map(|op| format!("'{}'", op)).collect();
        log::info!("ignoring {}", opcodes.join(" "));
    }
}

impl Progress for LogProgress {
    fn line(&mut self, line: usize, total: usize) {
        self.flush_ignored();
        let percent = if total == 0 {
            100.0
        } else {
            line as f64 / total as f64 * 100.0
        };
        log::info!("{:>width$}/{} {:>3.0}%", line, total, percent, width = total.to_string().len());
    }

    fn unrecognized(&mut self, _line: usize, opcode: &str) {
        self.ignoring.push(opcode.to_string());
    }

    fn finish(&mut self) {
        self.flush_ignored();
    }
}
