//! G-code to MakerBot toolpath converter
//!
//! Interprets slicer G-code in a single pass and produces:
//! - a `.jsontoolpath` command stream with semantic move tags
//! - print metrics (duration, bounding box, layers, filament, temperature)
//! - `meta.json`, slicer thumbnails, and the packaged `.makerbot` archive

pub mod config;
pub mod error;
pub mod machine;
pub mod metadata;
pub mod metrics;
pub mod package;
pub mod parser;
pub mod progress;
pub mod thumbnail;
pub mod toolpath;
pub mod translate;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use error::{TranslateError, ValidationError};
pub use metrics::{BoundingBox, PrintMetrics};
pub use parser::{parse_line, ParsedLine};
pub use toolpath::{Command, MoveTag, Toolpath};
pub use translate::{translate, translate_file, TranslateOptions, Translation, Translator};
