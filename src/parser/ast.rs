//! Parsed line types
//!
//! Minimal structure over the token list. Word values stay textual until an
//! instruction handler asks for them.

use std::str::FromStr;

use crate::error::{Result, TranslateError};
use crate::parser::lexer::{Token, TokenKind};

/// Prefix of a layer-section boundary annotation
pub const LAYER_MARKER: &str = ";LAYER:";

/// A parsed line of GCode
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// An opcode with its words
    Instruction(Instruction),
    /// A `;LAYER:<n>` annotation, index kept as raw text
    LayerMarker(String),
    /// Blank or comment-only
    Empty,
}

/// An opcode like "G1" or "M104" with its words
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Upper-cased opcode
    pub opcode: String,
    pub words: Vec<Word>,
}

/// A word like "X10" or "S255"
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Upper-cased letter
    pub letter: char,
    /// Numeric literal as written
    pub value: String,
}

impl Word {
    fn from_token(text: &str) -> Option<Word> {
        let mut chars = text.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        Some(Word {
            letter,
            value: chars.as_str().to_string(),
        })
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.letter, self.value)
    }
}

impl Instruction {
    /// First word with the given letter
    pub fn word(&self, letter: char) -> Option<&Word> {
        self.words.iter().find(|w| w.letter == letter)
    }

    /// Parse a word's literal, attributing failure to this opcode and line
    pub fn number<T: FromStr>(&self, word: &Word, line: usize) -> Result<T> {
        word.value
            .parse::<T>()
            .map_err(|_| TranslateError::MalformedInstruction {
                line,
                opcode: self.opcode.clone(),
                word: word.to_string(),
            })
    }

    /// Parse a word as a finite decimal
    ///
    /// `f64::from_str` also takes `nan` and `inf`, which no slicer writes and
    /// which cannot be carried into the toolpath.
    pub fn float(&self, word: &Word, line: usize) -> Result<f64> {
        let value: f64 = self.number(word, line)?;
        if !value.is_finite() {
            return Err(TranslateError::MalformedInstruction {
                line,
                opcode: self.opcode.clone(),
                word: word.to_string(),
            });
        }
        Ok(value)
    }

    /// Parse the word with `letter`, failing when it is absent
    pub fn required<T: FromStr>(&self, letter: char, line: usize) -> Result<T> {
        let word = self.word(letter).ok_or_else(|| TranslateError::MissingWord {
            line,
            opcode: self.opcode.clone(),
            letter,
        })?;
        self.number(word, line)
    }

    /// Space-joined source form, used for annotations
    pub fn source(&self) -> String {
        std::iter::once(self.opcode.clone())
            .chain(self.words.iter().map(Word::to_string))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Convert tokens into a parsed line
pub fn tokens_to_parsed_line(tokens: Vec<Token>) -> ParsedLine {
    let mut iter = tokens.into_iter();
    let opcode = match iter.next() {
        Some(token) if token.kind == TokenKind::Opcode => token.text.to_ascii_uppercase(),
        _ => return ParsedLine::Empty,
    };

    let words = iter
        .filter(|t| t.kind == TokenKind::Word)
        .filter_map(|t| Word::from_token(&t.text))
        .collect();

    ParsedLine::Instruction(Instruction { opcode, words })
}
