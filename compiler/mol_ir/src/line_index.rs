//! Byte offset to line/column mapping.

/// Start offsets of every line in a source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineIndex { line_starts }
    }

    /// 1-based line and column of `offset`. Columns count bytes.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col + 1)
    }

    /// Byte range of the 1-based `line`, without its newline.
    pub fn line_span(&self, line: u32, source: &str) -> Option<std::ops::Range<usize>> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(source.len(), |next| (*next as usize).saturating_sub(1));
        Some(start..end.max(start))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_first_line() {
        let index = LineIndex::new("let x be 1\nshow x\n");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(4), (1, 5));
    }

    #[test]
    fn test_line_col_later_lines() {
        let index = LineIndex::new("let x be 1\nshow x\n");
        assert_eq!(index.line_col(11), (2, 1));
        assert_eq!(index.line_col(16), (2, 6));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_line_span() {
        let src = "a\nbcd\n";
        let index = LineIndex::new(src);
        assert_eq!(index.line_span(2, src), Some(2..5));
        assert_eq!(&src[2..5], "bcd");
        assert_eq!(index.line_span(0, src), None);
    }
}
