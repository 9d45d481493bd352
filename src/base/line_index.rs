//! Line-start table for byte offset ⇄ line/column conversion.
//!
//! Built once per text and kept next to it; a text change builds a new one.
//! Columns count Unicode scalar values from the start of the line.

use super::{Position, Span, TextRange, TextSize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of every line
    line_starts: Vec<TextSize>,
    /// Total length of the indexed text
    len: TextSize,
    /// Lines made of ASCII only, where byte and char columns coincide
    ascii_lines: Vec<bool>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let mut ascii_lines = Vec::new();
        let mut ascii = true;

        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
                ascii_lines.push(ascii);
                ascii = true;
            } else if !c.is_ascii() {
                ascii = false;
            }
        }
        ascii_lines.push(ascii);

        Self {
            line_starts,
            len: TextSize::of(text),
            ascii_lines,
        }
    }

    /// Number of lines (a trailing newline starts an empty last line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Length of the text this index was built from
    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    /// Convert a byte offset into a 0-based line/column position.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let column = if self.ascii_lines[line] {
            usize::from(offset - line_start)
        } else {
            text.get(usize::from(line_start)..usize::from(offset))
                .map(|s| s.chars().count())
                .unwrap_or_default()
        };
        Position::new(line, column)
    }

    /// Convert a byte range into a line/column span
    pub fn span(&self, text: &str, range: TextRange) -> Span {
        Span::new(
            self.position(text, range.start()),
            self.position(text, range.end()),
        )
    }

    /// Convert a 0-based line/column position back into a byte offset.
    ///
    /// Returns `None` when the line does not exist. Columns past the end of
    /// the line clamp to the line end.
    pub fn offset(&self, text: &str, line: usize, column: usize) -> Option<TextSize> {
        let line_start = *self.line_starts.get(line)?;
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - TextSize::new(1))
            .unwrap_or(self.len);

        if self.ascii_lines[line] {
            let column = u32::try_from(column).unwrap_or(u32::MAX);
            let offset = u32::from(line_start).saturating_add(column);
            return Some(TextSize::new(offset).min(line_end));
        }

        let line_text = text.get(usize::from(line_start)..usize::from(line_end))?;
        let byte_column = line_text
            .char_indices()
            .nth(column)
            .map(|(idx, _)| idx)
            .unwrap_or(line_text.len());
        Some(line_start + TextSize::new(byte_column as u32))
    }
}
