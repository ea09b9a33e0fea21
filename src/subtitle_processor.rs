use std::fmt;
use anyhow::{Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// @module: SRT cue parsing and serialization

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Display lines (one or two)
    pub lines: Vec<String>,
}

impl Cue {
    /// Creates a new cue from a start/end span and display lines
    pub fn new(start_ms: u64, end_ms: u64, lines: Vec<String>) -> Self {
        Cue {
            start_ms,
            end_ms,
            lines,
        }
    }

    // @creates: Validated cue
    // @validates: Time ordering and line count
    pub fn new_validated(start_ms: u64, end_ms: u64, lines: Vec<String>) -> Result<Self> {
        if end_ms < start_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} < start time {}",
                end_ms,
                start_ms
            ));
        }

        if lines.is_empty() || lines.len() > 2 {
            return Err(anyhow!(
                "Cue must carry one or two display lines, got {}",
                lines.len()
            ));
        }

        Ok(Cue {
            start_ms,
            end_ms,
            lines,
        })
    }

    /// Cue text flattened to a single line, words separated by single spaces
    pub fn flattened_text(&self) -> String {
        self.lines
            .iter()
            .flat_map(|line| line.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().map_err(|_| anyhow!("Failed to parse hours in: {}", timestamp))?;
        let minutes: u64 = parts[1].parse().map_err(|_| anyhow!("Failed to parse minutes in: {}", timestamp))?;
        let seconds: u64 = parts[2].parse().map_err(|_| anyhow!("Failed to parse seconds in: {}", timestamp))?;
        let millis: u64 = parts[3].parse().map_err(|_| anyhow!("Failed to parse milliseconds in: {}", timestamp))?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// One parsed block of an SRT document.
///
/// A block whose timestamp line does not match the SRT pattern is kept as an
/// opaque passthrough: its original lines are preserved verbatim and it is
/// never rewrapped or split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueBlock {
    /// A well-formed timed cue
    Timed(Cue),
    /// An unparseable block, emitted unchanged
    Passthrough(Vec<String>),
}

/// Ordered collection of parsed cue blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueDocument {
    /// Blocks in original document order
    pub blocks: Vec<CueBlock>,
}

impl CueDocument {
    /// Create an empty document
    pub fn new() -> Self {
        CueDocument { blocks: Vec::new() }
    }

    /// Number of timed cues in the document
    pub fn timed_cue_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, CueBlock::Timed(_)))
            .count()
    }

    /// Parse raw subtitle text into a document.
    ///
    /// Accepts either plain SRT text or a JSON object with a `text` field
    /// holding the SRT text as a string (some upstream services double-encode
    /// their results). Parsing never fails: a block with a missing or
    /// unparseable timestamp becomes a passthrough block.
    pub fn parse(input: &str) -> Self {
        let content = Self::unwrap_json_payload(input);

        let mut blocks = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for raw_line in content.lines() {
            let line = raw_line.trim_end_matches('\r');
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(Self::parse_block(&current));
                    current.clear();
                }
            } else {
                current.push(line.to_string());
            }
        }
        if !current.is_empty() {
            blocks.push(Self::parse_block(&current));
        }

        debug!(
            "Parsed {} blocks ({} timed)",
            blocks.len(),
            blocks.iter().filter(|b| matches!(b, CueBlock::Timed(_))).count()
        );

        CueDocument { blocks }
    }

    /// Unwrap a JSON `{"text": "..."}` payload if the input is one
    fn unwrap_json_payload(input: &str) -> String {
        let trimmed = input.trim_start();
        if trimmed.starts_with('{') {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
                if let Some(Value::String(text)) = map.get("text") {
                    debug!("Unwrapped JSON-wrapped subtitle payload");
                    return text.clone();
                }
            }
        }
        input.to_string()
    }

    /// Parse one block: index line, timestamp line, then text lines.
    ///
    /// The index line is discarded; output indices are reassigned on
    /// serialization. Text lines are trimmed and joined with single spaces.
    fn parse_block(lines: &[String]) -> CueBlock {
        if lines.len() >= 2 {
            if let Some(caps) = TIMESTAMP_REGEX.captures(&lines[1]) {
                let start = Self::capture_to_ms(&caps, 1);
                let end = Self::capture_to_ms(&caps, 5);
                let text = lines[2..]
                    .iter()
                    .flat_map(|l| l.split_whitespace())
                    .collect::<Vec<_>>()
                    .join(" ");
                return CueBlock::Timed(Cue::new(start, end, vec![text]));
            }
        }

        warn!(
            "Block without a parseable timestamp, keeping verbatim: {:?}",
            lines.first().map(|s| s.as_str()).unwrap_or("")
        );
        CueBlock::Passthrough(lines.to_vec())
    }

    /// Convert four regex captures starting at `start_idx` to milliseconds
    fn capture_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let hours: u64 = caps.get(start_idx).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let minutes: u64 = caps.get(start_idx + 1).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let seconds: u64 = caps.get(start_idx + 2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let millis: u64 = caps.get(start_idx + 3).map_or(0, |m| m.as_str().parse().unwrap_or(0));

        (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
    }

    /// Serialize the document back to SRT text.
    ///
    /// Timed cues receive fresh sequential indices starting at 1; input
    /// indices are discarded. Passthrough blocks are emitted verbatim and do
    /// not consume an index. Blocks are separated by exactly one blank line
    /// and the output ends with a single trailing newline.
    pub fn to_srt_string(&self) -> String {
        let mut rendered: Vec<String> = Vec::with_capacity(self.blocks.len());
        let mut index = 0usize;

        for block in &self.blocks {
            match block {
                CueBlock::Timed(cue) => {
                    index += 1;
                    let mut text = format!(
                        "{}\n{} --> {}",
                        index,
                        cue.format_start_time(),
                        cue.format_end_time()
                    );
                    for line in cue.lines.iter().filter(|l| !l.is_empty()) {
                        text.push('\n');
                        text.push_str(line);
                    }
                    rendered.push(text);
                }
                CueBlock::Passthrough(lines) => {
                    rendered.push(lines.join("\n"));
                }
            }
        }

        let mut output = rendered.join("\n\n");
        output.push('\n');
        output
    }
}

impl fmt::Display for CueDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_srt_string())
    }
}
