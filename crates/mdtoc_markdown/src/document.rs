//! Text positions, edits and the buffer the edits are applied to.

use regex::Regex;
use serde::Serialize;
use std::cmp::Reverse;

/// Zero-based line and character (not byte) offset.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering the whole text of `line`, excluding the line break.
    pub fn of_line(line: usize, text: &str) -> Self {
        Self::new(
            Position::new(line, 0),
            Position::new(line, text.chars().count()),
        )
    }

    /// Range covering `line` including its line break.
    pub fn whole_line(line: usize) -> Self {
        Self::new(Position::new(line, 0), Position::new(line + 1, 0))
    }
}

/// Edit expressed in the coordinates of the unmodified document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { at: Position, text: String },
    Delete(TextRange),
    Replace { range: TextRange, text: String },
}

/// Text buffer owned by the host, the markdown tools only read its lines and
/// hand back the edits to apply.
pub trait TextBuffer {
    fn lines(&self) -> Vec<String>;

    /// Returns the range from the first line matching `start` to the end of
    /// the next line matching `stop`.
    fn locate_marker_range(&self, start: &Regex, stop: &Regex) -> Option<TextRange> {
        find_marker_range(&self.lines(), start, stop)
    }

    /// Applies all the `edits` at once.
    fn apply_edits(&mut self, edits: Vec<Edit>);
}

pub fn find_marker_range<S: AsRef<str>>(
    lines: &[S],
    start: &Regex,
    stop: &Regex,
) -> Option<TextRange> {
    let mut start_line = None;

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if start_line.is_none() && start.is_match(line) {
            start_line.replace(idx);
        } else if stop.is_match(line) {
            return start_line.map(|start_line| {
                TextRange::new(
                    Position::new(start_line, 0),
                    Position::new(idx, line.chars().count()),
                )
            });
        }
    }

    None
}

/// In-memory markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Converts `position` to a byte offset, clamped to the document.
    fn offset_of(&self, position: Position) -> usize {
        let mut line_start = 0;
        for _ in 0..position.line {
            match self.text[line_start..].find('\n') {
                Some(idx) => line_start += idx + 1,
                None => return self.text.len(),
            }
        }

        let line = &self.text[line_start..];
        let line = line.split('\n').next().unwrap_or_default();
        let line = line.strip_suffix('\r').unwrap_or(line);

        line_start
            + line
                .char_indices()
                .nth(position.character)
                .map(|(idx, _)| idx)
                .unwrap_or(line.len())
    }
}

impl TextBuffer for Document {
    fn lines(&self) -> Vec<String> {
        self.text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }

    fn apply_edits(&mut self, edits: Vec<Edit>) {
        let mut edits = edits
            .into_iter()
            .enumerate()
            .map(|(idx, edit)| {
                let (start, end, text) = match edit {
                    Edit::Insert { at, text } => {
                        let offset = self.offset_of(at);
                        (offset, offset, text)
                    }
                    Edit::Delete(range) => {
                        (self.offset_of(range.start), self.offset_of(range.end), String::new())
                    }
                    Edit::Replace { range, text } => {
                        (self.offset_of(range.start), self.offset_of(range.end), text)
                    }
                };
                (idx, start, end.max(start), text)
            })
            .collect::<Vec<_>>();

        // Back to front so that the offsets of the pending edits stay valid, a
        // deletion goes before an insertion at the same offset and insertions
        // at the same offset keep their order.
        edits.sort_by_key(|(idx, start, end, _)| (Reverse(*start), start == end, Reverse(*idx)));

        for (_, start, end, text) in edits {
            self.text.replace_range(start..end, &text);
        }
    }
}
