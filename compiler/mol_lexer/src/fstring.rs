//! Splitting interpolated strings into literal text and holes.
//!
//! The lexer validates an f-string body up front and keeps it raw; the parser
//! splits it again and lexes each hole on its own, shifting the hole's spans
//! by the offset reported here.

use mol_ir::Span;

use crate::escape::{escape_at, offset};
use crate::LexError;

/// One piece of an f-string body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FStringPiece<'a> {
    /// Literal text with escapes already processed.
    Literal(String),
    /// Source of an interpolated expression and its absolute start offset.
    Hole { source: &'a str, offset: u32 },
}

/// Split an f-string body (text between `f"` and `"`).
///
/// A hole runs from `{` to the first following `}`; `\{` and `\}` produce
/// literal braces. A `}` with no opening `{` is literal text.
pub fn split_fstring(body: &str, body_start: u32) -> Result<Vec<FStringPiece<'_>>, LexError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while let Some(c) = body.get(i..).and_then(|rest| rest.chars().next()) {
        match c {
            '\\' => {
                let (decoded, len) = escape_at(body, i, body_start)?;
                literal.push(decoded);
                i += len;
            }
            '{' => {
                let hole_start = i + 1;
                let Some(close) = body[hole_start..].find('}') else {
                    let start = body_start.saturating_add(offset(i));
                    let end = body_start.saturating_add(offset(body.len()));
                    return Err(LexError::unterminated_interpolation(Span::new(start, end)));
                };
                if !literal.is_empty() {
                    pieces.push(FStringPiece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(FStringPiece::Hole {
                    source: &body[hole_start..hole_start + close],
                    offset: body_start.saturating_add(offset(hole_start)),
                });
                i = hole_start + close + 1;
            }
            _ => {
                literal.push(c);
                i += c.len_utf8();
            }
        }
    }

    if !literal.is_empty() {
        pieces.push(FStringPiece::Literal(literal));
    }
    Ok(pieces)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use mol_diagnostic::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_literal_and_holes() {
        let pieces = split_fstring("Hello {name}, {age}!", 2).unwrap();
        assert_eq!(
            pieces,
            vec![
                FStringPiece::Literal("Hello ".to_string()),
                FStringPiece::Hole {
                    source: "name",
                    offset: 9
                },
                FStringPiece::Literal(", ".to_string()),
                FStringPiece::Hole {
                    source: "age",
                    offset: 17
                },
                FStringPiece::Literal("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let pieces = split_fstring(r"\{x\}", 0).unwrap();
        assert_eq!(pieces, vec![FStringPiece::Literal("{x}".to_string())]);
    }

    #[test]
    fn test_unclosed_hole() {
        let err = split_fstring("total: {x + 1", 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0006);
        assert_eq!(err.span, Span::new(7, 13));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(split_fstring("", 0).unwrap(), vec![]);
    }
}
