/// Position tracking for descriptor elements
///
/// Stores the source location (line/column) recorded in a descriptor's
/// `source_code_info`, used when reporting diagnostics against elements.
/// A span representing a range in source code (0-indexed, as protoc emits it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a span from line/column coordinates
    pub fn from_coords(
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// Create a span from a protoc `span` array.
    ///
    /// protoc emits `[start_line, start_col, end_col]` when the span fits on one
    /// line and `[start_line, start_col, end_line, end_col]` otherwise. Anything
    /// else is not a span.
    pub fn from_proto(span: &[i32]) -> Option<Self> {
        let coords: Vec<usize> = span
            .iter()
            .map(|v| usize::try_from(*v).ok())
            .collect::<Option<_>>()?;
        match coords.as_slice() {
            [line, start_col, end_col] => Some(Self::from_coords(*line, *start_col, *line, *end_col)),
            [start_line, start_col, end_line, end_col] => Some(Self::from_coords(
                *start_line,
                *start_col,
                *end_line,
                *end_col,
            )),
            _ => None,
        }
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: Position) -> bool {
        if position.line < self.start.line || position.line > self.end.line {
            return false;
        }
        if position.line == self.start.line && position.column < self.start.column {
            return false;
        }
        if position.line == self.end.line && position.column > self.end.column {
            return false;
        }
        true
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
