//! Lexer for emphasis markers using logos
//!
//! The lexer only splits the input into marker-candidate runs and plain text;
//! deciding which runs open, close, or degrade to literal text is the job of
//! the parser, since that depends on the stack of currently open spans.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
enum RawToken {
    /// A run of one or more asterisks, e.g. `*`, `**`, `***`, `****`
    #[regex(r"\*+")]
    Stars,

    /// A run of one or more underscores; only exactly three form a marker
    #[regex(r"_+")]
    Underscores,

    /// Everything that can never be part of a marker
    #[regex(r"[^*_]+")]
    Text,
}

/// A marker-candidate segment of the input
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Plain text with no marker characters
    Text(String),
    /// A run of `n` consecutive asterisks
    Stars(usize),
    /// A run of `n` consecutive underscores
    Underscores(usize),
}

/// Split a string into text and marker-run segments.
///
/// The segments cover the input exactly: concatenating their source text
/// reproduces the input.
pub fn tokenize(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut lexer = RawToken::lexer(input);

    while let Some(token) = lexer.next() {
        let slice = lexer.slice();
        match token {
            Ok(RawToken::Stars) => segments.push(Segment::Stars(slice.len())),
            Ok(RawToken::Underscores) => segments.push(Segment::Underscores(slice.len())),
            // Unreachable with the patterns above, but logos surfaces a
            // Result; treat anything unexpected as plain text so the lexer
            // can never drop characters.
            Ok(RawToken::Text) | Err(_) => match segments.last_mut() {
                Some(Segment::Text(prev)) => prev.push_str(slice),
                _ => segments.push(Segment::Text(slice.to_string())),
            },
        }
    }

    segments
}
