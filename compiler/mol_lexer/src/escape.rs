//! String escape processing shared by plain and interpolated strings.

use mol_ir::Span;

use crate::LexError;

/// The character a `\c` escape stands for.
pub(crate) fn escape_char(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '{' => Some('{'),
        '}' => Some('}'),
        _ => None,
    }
}

/// Resolve the escape starting at byte `i` of `text` (which holds `\`).
///
/// Returns the decoded character and the byte length of the sequence.
/// `text_start` is the absolute offset of `text` for error spans.
pub(crate) fn escape_at(text: &str, i: usize, text_start: u32) -> Result<(char, usize), LexError> {
    let next = text.get(i + 1..).and_then(|rest| rest.chars().next());
    match next.and_then(escape_char) {
        Some(decoded) => Ok((decoded, 1 + next.map_or(0, char::len_utf8))),
        None => {
            let len = 1 + next.map_or(0, char::len_utf8);
            let sequence = text.get(i..i + len).unwrap_or("\\");
            let start = text_start.saturating_add(offset(i));
            Err(LexError::invalid_escape(
                sequence,
                Span::new(start, start.saturating_add(offset(len))),
            ))
        }
    }
}

/// Process the escapes in a plain string body.
pub(crate) fn unescape_string(text: &str, text_start: u32) -> Result<String, LexError> {
    if !text.contains('\\') {
        return Ok(text.to_owned());
    }
    let mut result = String::with_capacity(text.len());
    let mut i = 0;
    while let Some(c) = text.get(i..).and_then(|rest| rest.chars().next()) {
        if c == '\\' {
            let (decoded, len) = escape_at(text, i, text_start)?;
            result.push(decoded);
            i += len;
        } else {
            result.push(c);
            i += c.len_utf8();
        }
    }
    Ok(result)
}

/// Byte offsets inside a single token always fit in `u32`; the whole source
/// was checked before lexing started.
#[inline]
pub(crate) fn offset(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use mol_diagnostic::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unescape_plain_text_is_unchanged() {
        assert_eq!(unescape_string("hello", 0), Ok("hello".to_string()));
    }

    #[test]
    fn test_unescape_known_escapes() {
        assert_eq!(
            unescape_string(r#"a\nb\t\"q\" \{x\}"#, 0),
            Ok("a\nb\t\"q\" {x}".to_string())
        );
    }

    #[test]
    fn test_unknown_escape_is_an_error_with_span() {
        let err = unescape_string(r"ab\qc", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0005);
        assert_eq!(err.span, Span::new(12, 14));
        assert!(err.message.contains(r"\q"));
    }

    #[test]
    fn test_nul_and_single_quote_escapes_are_rejected() {
        for (text, sequence) in [(r"a\0", r"\0"), (r"a\'b", r"\'")] {
            let err = unescape_string(text, 0).unwrap_err();
            assert_eq!(err.code, ErrorCode::E0005);
            assert!(err.message.contains(sequence));
        }
    }
}
