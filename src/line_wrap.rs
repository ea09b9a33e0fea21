use log::trace;

// @module: Greedy two-line wrapping of cue text

/// Default maximum characters per display line
pub const DEFAULT_MAX_LINE_LENGTH: usize = 38;

/// One or two wrapped display lines carved out of a cue's flattened text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Wrapped lines (one or two)
    pub lines: Vec<String>,
}

impl Chunk {
    /// Character weight of the chunk, used for proportional timing
    pub fn weight(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum()
    }
}

/// Wrap flattened cue text into chunks of at most two lines each.
///
/// Words are packed greedily into a two-line buffer:
/// - a word joins the current line when the line is empty or still fits
///   within `max_line_length` after a separating space;
/// - when the first line is full, the word opens the second line;
/// - when both lines are full, the buffer is finalized as a chunk and the
///   word opens a fresh chunk.
///
/// A word longer than `max_line_length` is still placed on an empty line so
/// the wrapper always makes progress. Empty text yields a single chunk with
/// one empty line.
pub fn wrap_text(text: &str, max_line_length: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut first = String::new();
    let mut second: Option<String> = None;

    for word in text.split_whitespace() {
        let current = second.as_mut().unwrap_or(&mut first);

        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        if current.chars().count() + 1 + word.chars().count() <= max_line_length {
            current.push(' ');
            current.push_str(word);
            continue;
        }

        if second.is_none() {
            second = Some(word.to_string());
            continue;
        }

        // Both lines full: finalize this chunk and start the next one
        let mut lines = vec![std::mem::take(&mut first)];
        if let Some(line) = second.take() {
            lines.push(line);
        }
        chunks.push(Chunk { lines });
        first.push_str(word);
    }

    let mut lines = vec![first];
    if let Some(line) = second {
        lines.push(line);
    }
    chunks.push(Chunk { lines });

    trace!("Wrapped text into {} chunk(s)", chunks.len());
    chunks
}
