//! Inline emphasis parsing for slide text.
//!
//! Turns a plain string carrying emphasis markers (`**bold**`, `*italic*`,
//! `___underline___`, `***bold italic***`) into an ordered sequence of
//! [`FormattedRun`]s. Malformed or unbalanced markup never fails: unmatched
//! markers are kept as literal text and only lose their formatting.

mod lexer;
mod parser;

pub use parser::{parse, FormattedRun, ParsedText, RunStyle};
