//! GCode Parser
//!
//! Line tokenization and a thin structure over the tokens.

pub mod ast;
pub mod lexer;

pub use ast::{Instruction, ParsedLine, Word, LAYER_MARKER};
pub use lexer::{tokenize_line, Token, TokenKind};

use std::fmt;

/// Parse a single line of GCode into structured data
pub fn parse_line(line: &str) -> ParsedLine {
    if let Some(index) = line.strip_prefix(LAYER_MARKER) {
        return ParsedLine::LayerMarker(index.trim().to_string());
    }
    ast::tokens_to_parsed_line(lexer::tokenize_line(line))
}

/// Slicer that produced the input, read from its banner comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slicer {
    PrusaSlicer,
    OrcaSlicer,
    SuperSlicer,
    Cura,
}

impl fmt::Display for Slicer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slicer::PrusaSlicer => "PrusaSlicer",
            Slicer::OrcaSlicer => "OrcaSlicer",
            Slicer::SuperSlicer => "SuperSlicer",
            Slicer::Cura => "Cura",
        };
        f.write_str(name)
    }
}

/// Detect the slicer from the banner in the first few comment lines
pub fn detect_slicer<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<Slicer> {
    let banner_re = regex::Regex::new(r"(?i)\b(PrusaSlicer|OrcaSlicer|SuperSlicer|Cura)").ok()?;

    for line in lines.into_iter().take(5) {
        if !line.trim_start().starts_with(lexer::COMMENT_DELIMITER) {
            continue;
        }
        if let Some(captures) = banner_re.captures(line) {
            let slicer = match captures.get(1)?.as_str().to_ascii_lowercase().as_str() {
                "prusaslicer" => Slicer::PrusaSlicer,
                "orcaslicer" => Slicer::OrcaSlicer,
                "superslicer" => Slicer::SuperSlicer,
                _ => Slicer::Cura,
            };
            return Some(slicer);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_instruction() {
        let result = parse_line("G1 X10 Y20");

        if let ParsedLine::Instruction(ins) = result {
            assert_eq!(ins.opcode, "G1");
            assert_eq!(ins.words.len(), 2);
            assert_eq!(ins.words[0].letter, 'X');
            assert_eq!(ins.words[0].value, "10");
        } else {
            panic!("Expected instruction");
        }
    }

    #[test]
    fn test_parse_layer_marker() {
        assert_eq!(
            parse_line(";LAYER:12\n"),
            ParsedLine::LayerMarker("12".to_string())
        );
        assert_eq!(parse_line("; LAYER:12"), ParsedLine::Empty);
    }

    #[test]
    fn test_parse_comment_only() {
        assert_eq!(parse_line("; this is a comment"), ParsedLine::Empty);
    }

    #[test]
    fn test_parse_empty_line() {
        assert!(matches!(parse_line("   "), ParsedLine::Empty));
    }

    #[test]
    fn test_detect_slicer() {
        let prusa = ["; generated by PrusaSlicer 2.7.1 on 2024-01-01", "G28"];
        assert_eq!(detect_slicer(prusa), Some(Slicer::PrusaSlicer));

        let cura = [";FLAVOR:Marlin", ";Generated with Cura_SteamEngine 5.6.0"];
        assert_eq!(detect_slicer(cura), Some(Slicer::Cura));

        let unknown = ["G28", "; hand written"];
        assert_eq!(detect_slicer(unknown), None);
    }
}
