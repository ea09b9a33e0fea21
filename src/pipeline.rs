use log::{debug, info};

use crate::line_wrap::{self, DEFAULT_MAX_LINE_LENGTH};
use crate::subtitle_processor::{Cue, CueBlock, CueDocument};
use crate::timing;
use crate::transcriber::{TranscriptSegment, Transcription};

// @module: The parse -> wrap -> redistribute -> serialize transform

/// Stateless formatting pipeline for subtitle documents.
///
/// Each cue is processed independently: its text is flattened, wrapped to at
/// most two lines of `max_line_length` characters, and when the text needs
/// more than one chunk the cue's time span is carved proportionally across
/// the chunks. Passthrough blocks are left untouched. The whole transform is
/// a pure function from text to text, with no I/O.
#[derive(Debug, Clone)]
pub struct SubtitlePipeline {
    /// Maximum characters per display line
    max_line_length: usize,
}

impl Default for SubtitlePipeline {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl SubtitlePipeline {
    /// Create a pipeline with the given maximum line length
    pub fn new(max_line_length: usize) -> Self {
        SubtitlePipeline {
            max_line_length: max_line_length.max(1),
        }
    }

    /// Reflow raw subtitle text: parse, wrap and split cues, serialize.
    ///
    /// Never fails: malformed blocks degrade to verbatim passthrough.
    pub fn reflow(&self, input: &str) -> String {
        let document = CueDocument::parse(input);
        self.reflow_document(document).to_srt_string()
    }

    /// Reflow an already-parsed document
    pub fn reflow_document(&self, document: CueDocument) -> CueDocument {
        let mut blocks = Vec::with_capacity(document.blocks.len());
        let mut split_count = 0usize;

        for block in document.blocks {
            match block {
                CueBlock::Timed(cue) => {
                    let produced = self.process_cue(cue);
                    if produced.len() > 1 {
                        split_count += 1;
                    }
                    blocks.extend(produced.into_iter().map(CueBlock::Timed));
                }
                passthrough @ CueBlock::Passthrough(_) => blocks.push(passthrough),
            }
        }

        if split_count > 0 {
            info!("Split {} oversized cue(s)", split_count);
        }

        CueDocument { blocks }
    }

    /// Wrap one cue and, when it overflows two lines, split its time span
    fn process_cue(&self, cue: Cue) -> Vec<Cue> {
        let text = cue.flattened_text();
        let chunks = line_wrap::wrap_text(&text, self.max_line_length);

        if chunks.len() == 1 {
            // Identity passthrough: original timestamps, rewrapped lines
            return vec![Cue::new(cue.start_ms, cue.end_ms, chunks[0].lines.clone())];
        }

        debug!(
            "Cue {} --> {} wraps into {} chunks",
            cue.format_start_time(),
            cue.format_end_time(),
            chunks.len()
        );
        timing::redistribute(cue.start_ms, cue.end_ms, &chunks)
    }

    /// Normalize a transcription result into parser-ready SRT text.
    ///
    /// Timed segments are rendered as numbered SRT blocks; a raw text blob is
    /// assumed to already be subtitle text and is returned as-is.
    pub fn normalize_transcription(&self, transcription: &Transcription) -> String {
        match transcription {
            Transcription::RawText(text) => text.clone(),
            Transcription::Segments(segments) => Self::segments_to_srt(segments),
        }
    }

    /// Full transform from a transcription result to reflowed SRT text
    pub fn format_transcription(&self, transcription: &Transcription) -> String {
        self.reflow(&self.normalize_transcription(transcription))
    }

    /// Render timed segments as SRT blocks
    fn segments_to_srt(segments: &[TranscriptSegment]) -> String {
        let mut output = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                Cue::format_timestamp(seconds_to_ms(segment.start)),
                Cue::format_timestamp(seconds_to_ms(segment.end)),
                segment.text.trim()
            ));
        }
        output
    }
}

/// Convert fractional seconds to whole milliseconds
fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}
