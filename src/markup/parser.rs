//! Stack-based pairing of emphasis markers into formatted runs
//!
//! Scans left to right over the lexer's segments while maintaining a stack of
//! open spans. At each marker run the parser first tries to close the span on
//! top of the stack, then to open the longest marker that is not already
//! open. A run that would close the top span only to reopen the same marker
//! with its leftover is read as a longer marker opening inside the span
//! instead, so `*a **b** c*` nests bold within italic. Whatever remains of
//! the run, and any span still open at end of input, is kept as literal text
//! with its formatting discarded.

use serde::Serialize;

use super::lexer::{tokenize, Segment};

/// Emphasis flags carried by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl RunStyle {
    /// The empty flag set
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Union of two flag sets; applying a flag twice is idempotent
    fn union(self, other: Self) -> Self {
        Self {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
        }
    }
}

/// A contiguous text span tagged with a set of emphasis flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRun {
    pub text: String,
    pub style: RunStyle,
}

impl FormattedRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::plain())
    }
}

/// Result of parsing one string of author text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    /// Ordered runs covering the whole input
    pub runs: Vec<FormattedRun>,
    /// True if any marker was left unmatched and degraded to literal text
    pub degraded: bool,
}

impl ParsedText {
    /// Concatenate the run texts, ignoring flags
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// The emphasis markers, identified by their delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// `***`
    BoldItalic,
    /// `**`
    Bold,
    /// `*`
    Italic,
    /// `___` (exactly three underscores)
    Underline,
}

impl Marker {
    fn len(self) -> usize {
        match self {
            Marker::BoldItalic => 3,
            Marker::Bold => 2,
            Marker::Italic => 1,
            Marker::Underline => 3,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Marker::BoldItalic => "***",
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::Underline => "___",
        }
    }

    fn style(self) -> RunStyle {
        match self {
            Marker::BoldItalic => RunStyle {
                bold: true,
                italic: true,
                underline: false,
            },
            Marker::Bold => RunStyle {
                bold: true,
                ..RunStyle::plain()
            },
            Marker::Italic => RunStyle {
                italic: true,
                ..RunStyle::plain()
            },
            Marker::Underline => RunStyle {
                underline: true,
                ..RunStyle::plain()
            },
        }
    }

    fn is_star(self) -> bool {
        !matches!(self, Marker::Underline)
    }

    /// Star markers, longest first
    const STAR_CANDIDATES: [Marker; 3] = [Marker::BoldItalic, Marker::Bold, Marker::Italic];
}

/// One element of the paired-marker event stream (first pass output)
#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Open { marker: Marker, paired: bool },
    Close { marker: Marker },
    Literal(&'static str),
}

/// Parse a string into formatted runs. Never fails.
pub fn parse(input: &str) -> ParsedText {
    let pieces = pair_markers(tokenize(input));
    emit_runs(pieces)
}

/// First pass: decide for every marker run which markers close, open, or
/// degrade. Closing is attempted before opening, longest marker first.
fn pair_markers(segments: Vec<Segment>) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = Vec::new();
    // Stack of open spans: marker kind plus its index into `pieces`, so the
    // opener can be marked paired when its closer arrives.
    let mut stack: Vec<(Marker, usize)> = Vec::new();

    for segment in segments {
        match segment {
            Segment::Text(text) => pieces.push(Piece::Text(text)),
            Segment::Stars(n) => {
                let mut remaining = n;
                while remaining > 0 {
                    let open_kinds: Vec<Marker> = stack.iter().map(|(m, _)| *m).collect();
                    let longest_not_open = |kinds: &[Marker], budget: usize| {
                        Marker::STAR_CANDIDATES
                            .iter()
                            .copied()
                            .find(|m| m.len() <= budget && !kinds.contains(m))
                    };

                    // Close the top of the stack if its marker fits, unless
                    // the leftover stars would immediately reopen the same
                    // marker. That leftover is really a longer marker opening
                    // inside the current span (`*a **b` nests bold in italic),
                    // not a close (`**a***` still closes the bold first).
                    if let Some(&(top, open_idx)) = stack.last() {
                        if top.is_star() && top.len() <= remaining {
                            let after: Vec<Marker> = open_kinds
                                .iter()
                                .copied()
                                .filter(|m| *m != top)
                                .collect();
                            let reopens_top = longest_not_open(&after, remaining - top.len())
                                .is_some_and(|m| m == top);
                            if !reopens_top {
                                if let Piece::Open { paired, .. } = &mut pieces[open_idx] {
                                    *paired = true;
                                }
                                pieces.push(Piece::Close { marker: top });
                                stack.pop();
                                remaining -= top.len();
                                continue;
                            }
                        }
                    }
                    // Open the longest star marker that is not already open.
                    match longest_not_open(&open_kinds, remaining) {
                        Some(marker) => {
                            stack.push((marker, pieces.len()));
                            pieces.push(Piece::Open {
                                marker,
                                paired: false,
                            });
                            remaining -= marker.len();
                        }
                        None => {
                            // No marker applies; the rest of the run is text.
                            pieces.push(Piece::Text("*".repeat(remaining)));
                            remaining = 0;
                        }
                    }
                }
            }
            Segment::Underscores(n) => {
                let mut remaining = n;
                while remaining >= 3 {
                    if let Some(&(Marker::Underline, open_idx)) = stack.last() {
                        if let Piece::Open { paired, .. } = &mut pieces[open_idx] {
                            *paired = true;
                        }
                        pieces.push(Piece::Close {
                            marker: Marker::Underline,
                        });
                        stack.pop();
                        remaining -= 3;
                    } else if !stack.iter().any(|(m, _)| *m == Marker::Underline) {
                        stack.push((Marker::Underline, pieces.len()));
                        pieces.push(Piece::Open {
                            marker: Marker::Underline,
                            paired: false,
                        });
                        remaining -= 3;
                    } else {
                        break;
                    }
                }
                if remaining > 0 {
                    // Fewer than three underscores is always literal.
                    pieces.push(Piece::Text("_".repeat(remaining)));
                }
            }
        }
    }

    // Spans still open at end of input degrade to their literal delimiter.
    for (marker, open_idx) in stack {
        pieces[open_idx] = Piece::Literal(marker.literal());
    }

    pieces
}

/// Second pass: walk the paired event stream and emit runs, merging adjacent
/// runs that carry the same flag set.
fn emit_runs(pieces: Vec<Piece>) -> ParsedText {
    let mut runs: Vec<FormattedRun> = Vec::new();
    let mut open: Vec<Marker> = Vec::new();
    let mut buffer = String::new();
    let mut degraded = false;

    let current_style = |open: &[Marker]| {
        open.iter()
            .fold(RunStyle::plain(), |style, m| style.union(m.style()))
    };

    let flush = |runs: &mut Vec<FormattedRun>, buffer: &mut String, style: RunStyle| {
        if buffer.is_empty() {
            return;
        }
        let text = std::mem::take(buffer);
        match runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => runs.push(FormattedRun::new(text, style)),
        }
    };

    for piece in pieces {
        match piece {
            Piece::Text(text) => buffer.push_str(&text),
            Piece::Literal(text) => {
                buffer.push_str(text);
                degraded = true;
            }
            Piece::Open { marker, paired } => {
                debug_assert!(paired, "unpaired opener should have been degraded");
                flush(&mut runs, &mut buffer, current_style(&open));
                open.push(marker);
            }
            Piece::Close { marker } => {
                flush(&mut runs, &mut buffer, current_style(&open));
                if let Some(pos) = open.iter().rposition(|m| *m == marker) {
                    open.remove(pos);
                }
            }
        }
    }
    flush(&mut runs, &mut buffer, current_style(&open));

    ParsedText { runs, degraded }
}
