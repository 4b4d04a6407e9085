use lease_abstract::fonts::{FontStyle, MM_PER_PT, line_height, text_width, wrap_text};

#[test]
fn widths_follow_helvetica_metrics() {
    // "Hi" = 722 + 222 units in regular, 722 + 278 in bold.
    let regular = text_width("Hi", FontStyle::Normal, 10.0);
    let bold = text_width("Hi", FontStyle::Bold, 10.0);
    assert!((regular - 944.0 * 10.0 / 1000.0 * MM_PER_PT).abs() < 1e-4);
    assert!((bold - 1000.0 * 10.0 / 1000.0 * MM_PER_PT).abs() < 1e-4);
    assert_eq!(
        text_width("Hi", FontStyle::Italic, 10.0),
        regular,
        "oblique shares regular metrics"
    );
    assert_eq!(text_width("", FontStyle::Normal, 10.0), 0.0);
}

#[test]
fn line_height_scales_with_size() {
    assert!((line_height(10.0) - 10.0 * 1.15 * MM_PER_PT).abs() < 1e-5);
    assert!(line_height(9.0) < line_height(10.0));
}

#[test]
fn wrap_breaks_between_words() {
    let text = "Right of First Refusal on adjacent space";
    let max = text_width("Right of First", FontStyle::Normal, 10.0) + 0.01;
    let lines = wrap_text(text, FontStyle::Normal, 10.0, max);

    assert_eq!(lines[0], "Right of First");
    assert_eq!(lines.join(" "), text);
    for line in &lines {
        assert!(text_width(line, FontStyle::Normal, 10.0) <= max);
    }
}

#[test]
fn wrap_keeps_overlong_word_whole() {
    let lines = wrap_text("a Supercalifragilistic b", FontStyle::Normal, 10.0, 5.0);
    assert_eq!(lines, ["a", "Supercalifragilistic", "b"]);
}

#[test]
fn wrap_respects_explicit_newlines_and_empty_input() {
    let lines = wrap_text("first\nsecond", FontStyle::Normal, 10.0, 500.0);
    assert_eq!(lines, ["first", "second"]);

    assert_eq!(wrap_text("", FontStyle::Normal, 10.0, 100.0), [""]);
}
