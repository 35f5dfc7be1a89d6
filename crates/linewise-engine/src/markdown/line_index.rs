//! Byte offset to line/column conversion.

use crate::ast::{Point, Position};

pub struct LineIndex<'a> {
    source: &'a str,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// The point at byte `offset`, which must lie on a char boundary.
    pub fn point(&self, offset: usize) -> Point {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(0, |s| s.chars().count());
        Point {
            line: line + 1,
            column: column + 1,
            offset,
        }
    }

    pub fn position(&self, range: std::ops::Range<usize>) -> Position {
        Position::new(self.point(range.start), self.point(range.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn points_on_first_and_later_lines() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(
            index.point(0),
            Point {
                line: 1,
                column: 1,
                offset: 0
            }
        );
        assert_eq!(
            index.point(4),
            Point {
                line: 2,
                column: 2,
                offset: 4
            }
        );
        assert_eq!(index.point(6).line, 3);
    }

    #[test]
    fn columns_count_chars() {
        let index = LineIndex::new("é—x");
        let offset = "é—".len();
        assert_eq!(index.point(offset).column, 3);
    }
}
