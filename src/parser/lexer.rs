//! GCode Lexer
//!
//! Splits one raw line into comment-free tokens.
//! Numbers stay as text here; the instruction handlers parse them so a bad
//! literal is reported against the opcode that owns it.

/// Comment delimiter, everything after it is dropped
pub const COMMENT_DELIMITER: char = ';';

/// Token types in GCode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Leading code like "G1", "M104"
    Opcode,
    /// Trailing word like "X10", "S255"
    Word,
}

/// A token with its text content
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Strip the trailing comment from a line
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_DELIMITER) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Tokenize a line of GCode into tokens
///
/// The first whitespace-separated piece is the opcode, the rest are words.
/// Blank and comment-only lines produce no tokens.
pub fn tokenize_line(line: &str) -> Vec<Token> {
    strip_comment(line)
        .split_whitespace()
        .enumerate()
        .map(|(idx, text)| Token {
            kind: if idx == 0 {
                TokenKind::Opcode
            } else {
                TokenKind::Word
            },
            text: text.to_string(),
        })
        .collect()
}
