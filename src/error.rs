//! Error types for translation and validation.
//!
//! Every fatal condition aborts the whole conversion; nothing is written
//! once one of these has been returned.

use thiserror::Error;

/// Result alias for the translation pipeline
pub type Result<T, E = TranslateError> = std::result::Result<T, E>;

/// Fatal failure while interpreting the instruction stream
#[derive(Error, Debug)]
pub enum TranslateError {
    /// A recognized opcode carried a word whose value is not a number
    #[error("line {line}: malformed word '{word}' for {opcode}")]
    MalformedInstruction {
        line: usize,
        opcode: String,
        word: String,
    },

    /// A recognized opcode is missing a word it cannot do without
    #[error("line {line}: {opcode} requires an {letter} word")]
    MissingWord {
        line: usize,
        opcode: String,
        letter: char,
    },

    /// A motion line needs a positive feedrate to compute its duration
    #[error("line {line}: feedrate must be positive, got {feedrate} mm/s")]
    NonPositiveFeedrate { line: usize, feedrate: f64 },

    /// A `;LAYER:` marker whose index is not an integer
    #[error("line {line}: malformed layer marker '{text}'")]
    MalformedLayerMarker { line: usize, text: String },

    #[error("failed to read G-code input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Sanity check failure over the finished toolpath
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("no nonzero extruder temperature was ever commanded")]
    ZeroExtruderTemperature,

    #[error("toolpath did not survive a JSON round trip: {reason}")]
    ToolpathRoundTrip { reason: String },

    #[error("toolpath contains no move commands")]
    NoMoves,

    #[error("toolpath contains no extrusion moves to measure")]
    NoExtrusionMoves,

    /// `(max + min) / (max - min)` fell outside the centering tolerance
    #[error("print is not centered in {axis}: center ratio {ratio}")]
    CenterOffset { axis: char, ratio: f64 },

    /// The lowest extrusion does not sit on the build plate
    #[error("print does not start near the build plate: z_min {z_min}")]
    ZStart { z_min: f64 },
}
