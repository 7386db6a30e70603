//! Toolpath command records and their JSON form
//!
//! A `.jsontoolpath` is a JSON array of `{"command": {...}}` objects. The
//! translated body is always wrapped in a fixed header and footer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ValidationError;

/// Semantic classification of a `move`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveTag {
    TravelMove,
    Infill,
    LeakyTravelMove,
    Retract,
}

impl MoveTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveTag::TravelMove => "Travel Move",
            MoveTag::Infill => "Infill",
            MoveTag::LeakyTravelMove => "Leaky Travel Move",
            MoveTag::Retract => "Retract",
        }
    }

    /// Tags whose moves lay down material and count toward the bounding box
    pub fn is_extrusion(&self) -> bool {
        matches!(self, MoveTag::Infill | MoveTag::LeakyTravelMove)
    }
}

impl fmt::Display for MoveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted unit of the toolpath
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub function: String,
    pub metadata: Map<String, Value>,
    pub parameters: Map<String, Value>,
    pub tags: Vec<String>,
}

impl Command {
    pub fn new(function: &str, metadata: Value, parameters: Value, tags: Vec<String>) -> Self {
        Self {
            function: function.to_string(),
            metadata: into_map(metadata),
            parameters: into_map(parameters),
            tags,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new("comment", json!({}), json!({ "comment": text.into() }), vec![])
    }

    pub fn is_move(&self) -> bool {
        self.function == "move"
    }

    pub fn has_tag(&self, tag: MoveTag) -> bool {
        self.tags.iter().any(|t| t == tag.as_str())
    }

    /// Numeric parameter, if present
    pub fn parameter(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).and_then(Value::as_f64)
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `{"command": ...}` wrapper used on disk
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    command: Command,
}

/// Metadata attached to every absolute `move`
pub fn absolute_move_metadata() -> Value {
    json!({ "relative": { "a": false, "x": false, "y": false, "z": false } })
}

/// Fixed preamble: first layer section, raft geometry, and a travel to the start corner
pub fn header() -> Vec<Command> {
    vec![
        Command::comment("Layer Section 0 (0)"),
        Command::comment("Material 0"),
        Command::comment("Lower Position  0"),
        Command::comment("Upper Position  0.3"),
        Command::comment("Thickness       0.3"),
        Command::comment("Width           2.5"),
        Command::new(
            "move",
            absolute_move_metadata(),
            json!({ "a": 0.0, "feedrate": 23.0, "x": -50.0, "y": -50.0, "z": 0.30 }),
            vec![MoveTag::TravelMove.to_string()],
        ),
    ]
}

pub fn footer() -> Vec<Command> {
    vec![Command::comment("End of print")]
}

/// Ordered, append-only command log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toolpath {
    body: Vec<Command>,
}

impl Toolpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.body.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.body.extend(commands);
    }

    /// Commands translated from the input, without header and footer
    pub fn body(&self) -> &[Command] {
        &self.body
    }

    /// Every command as written, header and footer included
    pub fn commands(&self) -> Vec<Command> {
        let mut all = header();
        all.extend(self.body.iter().cloned());
        all.extend(footer());
        all
    }

    /// Length of the written array
    pub fn command_count(&self) -> usize {
        header().len() + self.body.len() + footer().len()
    }

    /// Serialize as a JSON array, one command per line
    pub fn to_json(&self) -> serde_json::Result<String> {
        let lines = self
            .commands()
            .into_iter()
            .map(|command| serde_json::to_string(&Envelope { command }))
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(format!("[\n{}\n]", lines.join(",\n")))
    }

    /// Parse `text` back and check it matches this toolpath exactly
    pub fn verify_round_trip(&self, text: &str) -> Result<(), ValidationError> {
        let parsed: Vec<Envelope> =
            serde_json::from_str(text).map_err(|e| ValidationError::ToolpathRoundTrip {
                reason: e.to_string(),
            })?;

        let expected = self.commands();
        if parsed.len() != expected.len() {
            return Err(ValidationError::ToolpathRoundTrip {
                reason: format!(
                    "expected {} commands, parsed {}",
                    expected.len(),
                    parsed.len()
                ),
            });
        }

        if let Some(index) = parsed
            .iter()
            .zip(&expected)
            .position(|(got, want)| &got.command != want)
        {
            return Err(ValidationError::ToolpathRoundTrip {
                reason: format!("command {} differs after parsing", index),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_footer_wrap_the_body() {
        let mut toolpath = Toolpath::new();
        toolpath.push(Command::comment("hello"));

        let all = toolpath.commands();
        assert_eq!(all.len(), 9);
        assert_eq!(toolpath.command_count(), 9);
        assert_eq!(all[7], Command::comment("hello"));
        assert_eq!(
            all.last().unwrap().parameters["comment"],
            Value::from("End of print")
        );
        assert!(all[6].has_tag(MoveTag::TravelMove));
    }

    #[test]
    fn json_has_one_command_per_line() {
        let toolpath = Toolpath::new();
        let text = toolpath.to_json().unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.first(), Some(&"["));
        assert_eq!(lines.last(), Some(&"]"));
        assert_eq!(lines.len(), 10);
        assert_eq!(
            lines[1],
            r#"{"command":{"function":"comment","metadata":{},"parameters":{"comment":"Layer Section 0 (0)"},"tags":[]}},"#
        );
        assert_eq!(
            lines[7],
            r#"{"command":{"function":"move","metadata":{"relative":{"a":false,"x":false,"y":false,"z":false}},"parameters":{"a":0.0,"feedrate":23.0,"x":-50.0,"y":-50.0,"z":0.3},"tags":["Travel Move"]}},"#
        );
        assert_eq!(
            lines[8],
            r#"{"command":{"function":"comment","metadata":{},"parameters":{"comment":"End of print"},"tags":[]}}"#
        );
    }

    #[test]
    fn round_trip_accepts_own_output() {
        let mut toolpath = Toolpath::new();
        toolpath.push(Command::new(
            "move",
            absolute_move_metadata(),
            json!({ "a": 0.1 + 0.2, "feedrate": 15.0, "x": 1.0 / 3.0, "y": -2.5, "z": 0.3 }),
            vec![MoveTag::Infill.to_string()],
        ));

        let text = toolpath.to_json().unwrap();
        assert_eq!(toolpath.verify_round_trip(&text), Ok(()));
    }

    #[test]
    fn round_trip_rejects_mismatches() {
        let toolpath = Toolpath::new();
        let text = toolpath.to_json().unwrap();

        let truncated = &text[..text.len() - 3];
        assert!(matches!(
            toolpath.verify_round_trip(truncated),
            Err(ValidationError::ToolpathRoundTrip { .. })
        ));

        let mut longer = toolpath.clone();
        longer.push(Command::comment("extra"));
        assert!(matches!(
            longer.verify_round_trip(&text),
            Err(ValidationError::ToolpathRoundTrip { .. })
        ));
    }

    #[test]
    fn tag_strings() {
        assert_eq!(MoveTag::LeakyTravelMove.to_string(), "Leaky Travel Move");
        assert!(MoveTag::Infill.is_extrusion());
        assert!(MoveTag::LeakyTravelMove.is_extrusion());
        assert!(!MoveTag::TravelMove.is_extrusion());
        assert!(!MoveTag::Retract.is_extrusion());
    }
}
