#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::ErrorCode;
use pretty_assertions::assert_eq;

fn render(diag: &Diagnostic, source: Option<&str>, colors: bool) -> String {
    let mode = if colors {
        ColorMode::Always
    } else {
        ColorMode::Never
    };
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, mode, false);
        if let Some(src) = source {
            emitter = emitter.with_source(src);
        }
        emitter.emit(diag);
        emitter.flush();
    }
    String::from_utf8(output).unwrap()
}

fn division_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E6001)
        .with_message("division by zero")
        .with_label(Span::new(16, 22), "divisor is zero")
        .with_note("raised at runtime")
        .with_suggestion("check the divisor")
}

#[test]
fn test_terminal_emitter_no_color_without_source() {
    let text = render(&division_diagnostic(), None, false);
    assert!(text.starts_with("error[E6001]: division by zero\n"));
    assert!(text.contains("--> 16..22: divisor is zero"));
    assert!(text.contains("= note: raised at runtime"));
    assert!(text.contains("= help: check the divisor"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn test_terminal_emitter_renders_snippet() {
    let src = "let x be 1\nshow 10 / 0\n";
    let diag = Diagnostic::error(ErrorCode::E6001)
        .with_message("division by zero")
        .with_label(Span::new(16, 22), "divisor is zero");
    let text = render(&diag, Some(src), false);
    let expected = "error[E6001]: division by zero\n \
                    --> 2:6\n  |\n\
                    2 | show 10 / 0\n  \
                    |      ^^^^^^ divisor is zero\n\n";
    assert_eq!(text, expected);
}

#[test]
fn test_terminal_emitter_with_color() {
    let text = render(&division_diagnostic(), None, true);
    assert!(text.contains("\x1b["));
    assert!(text.contains("E6001"));
}

#[test]
fn test_caret_width_clamped_to_line() {
    assert_eq!(caret_width(Span::new(0, 100), 1, "short"), 5);
    assert_eq!(caret_width(Span::new(3, 3), 4, "abcdef"), 1);
}

#[test]
fn test_emit_all_and_summary() {
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
        emitter.emit_all(&[
            Diagnostic::error(ErrorCode::E1001).with_message("error 1"),
            Diagnostic::error(ErrorCode::E1002).with_message("error 2"),
        ]);
        emitter.emit_summary(2, 0);
        emitter.flush();
    }
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("error 1"));
    assert!(text.contains("error 2"));
    assert!(text.contains("aborting due to 2 previous errors"));
}

#[test]
fn test_color_mode() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
    assert_eq!(ColorMode::from_flag("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::from_flag("sometimes"), None);
}
