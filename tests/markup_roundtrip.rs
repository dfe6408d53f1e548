//! Round-trip and degradation properties of the emphasis parser

use slidecraft::markup::{parse, RunStyle};

fn flags(bold: bool, italic: bool, underline: bool) -> RunStyle {
    RunStyle {
        bold,
        italic,
        underline,
    }
}

#[test]
fn test_emphasis_sequence_scenario() {
    let parsed = parse("**bold** and *italic* and ___underline___ and ***both***");

    let expected = [
        ("bold", flags(true, false, false)),
        (" and ", flags(false, false, false)),
        ("italic", flags(false, true, false)),
        (" and ", flags(false, false, false)),
        ("underline", flags(false, false, true)),
        (" and ", flags(false, false, false)),
        ("both", flags(true, true, false)),
    ];

    assert_eq!(parsed.runs.len(), expected.len());
    for (run, (text, style)) in parsed.runs.iter().zip(expected.iter()) {
        assert_eq!(run.text, *text);
        assert_eq!(run.style, *style);
    }
}

#[test]
fn test_malformed_inputs_roundtrip_exactly() {
    // Without any matched marker pair, no character may be lost.
    let inputs = [
        "*lonely star",
        "**two stars",
        "***three",
        "___three underscores",
        "__two is literal__",
        "____",
        "trailing stars***",
        "*start and ___end",
        "_",
        "",
    ];
    for input in inputs {
        let parsed = parse(input);
        assert_eq!(parsed.plain_text(), input, "input: {input:?}");
    }
}

#[test]
fn test_wellformed_inputs_strip_only_markers() {
    let cases = [
        ("**a**", "a"),
        ("*a*", "a"),
        ("___a___", "a"),
        ("***a***", "a"),
        ("x **a** y *b* z", "x a y b z"),
        ("*nest **inside** out*", "nest inside out"),
    ];
    for (input, expected) in cases {
        let parsed = parse(input);
        assert_eq!(parsed.plain_text(), expected, "input: {input:?}");
        assert!(!parsed.degraded, "input: {input:?}");
    }
}

#[test]
fn test_nested_markers_stack_flags() {
    let parsed = parse("*nest **inside** out*");
    let runs: Vec<(&str, RunStyle)> = parsed
        .runs
        .iter()
        .map(|r| (r.text.as_str(), r.style))
        .collect();
    assert_eq!(
        runs,
        vec![
            ("nest ", flags(false, true, false)),
            ("inside", flags(true, true, false)),
            (" out", flags(false, true, false)),
        ]
    );
    assert!(!parsed.degraded);
}

#[test]
fn test_mixed_balanced_and_unbalanced() {
    // The balanced italic survives; the dangling bold degrades to text.
    let parsed = parse("**open *ok* still open");
    assert_eq!(parsed.plain_text(), "**open ok still open");
    assert!(parsed.degraded);

    let italic_run = parsed
        .runs
        .iter()
        .find(|r| r.style.italic)
        .expect("Italic run should survive");
    assert_eq!(italic_run.text, "ok");
    assert!(!italic_run.style.bold);
}

#[test]
fn test_parse_is_deterministic() {
    let input = "a **b** c *d* ___e___ *f";
    assert_eq!(parse(input), parse(input));
}
