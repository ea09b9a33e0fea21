/*!
 * Tests for the subtitle formatting pipeline
 */

use subgen::pipeline::SubtitlePipeline;
use subgen::subtitle_processor::{CueBlock, CueDocument};
use subgen::transcriber::{TranscriptSegment, Transcription};

use crate::common;

/// Test that a well-formed short document passes through unchanged
#[test]
fn test_reflow_withShortCues_shouldBeIdentity() {
    let pipeline = SubtitlePipeline::default();
    let output = pipeline.reflow(common::sample_srt());

    assert_eq!(output, common::sample_srt());
}

/// Test the oversized cue splitting scenario end to end
#[test]
fn test_reflow_withOversizedCue_shouldSplitIntoTimedCues() {
    let pipeline = SubtitlePipeline::default();
    let output = pipeline.reflow(common::long_cue_srt());
    let document = CueDocument::parse(&output);

    assert_eq!(document.timed_cue_count(), 2);

    let cues: Vec<_> = document
        .blocks
        .iter()
        .filter_map(|b| match b {
            CueBlock::Timed(cue) => Some(cue),
            _ => None,
        })
        .collect();

    // Split cues cover the original 5000ms span exactly
    assert_eq!(cues[0].start_ms, 0);
    assert_eq!(cues.last().unwrap().end_ms, 5000);
    let total: u64 = cues.iter().map(|c| c.end_ms - c.start_ms).sum();
    assert_eq!(total, 5000);

    for cue in &cues {
        assert!(cue.lines.len() <= 2);
        for line in &cue.lines {
            assert!(line.chars().count() <= 38);
        }
    }

    // Fresh sequential indices
    assert!(output.starts_with("1\n00:00:00,000 --> "));
    assert!(output.contains("\n\n2\n"));
    assert!(output.ends_with("into multiple cues\n"));
}

/// Test that a cue with two short lines is re-wrapped but keeps its span
#[test]
fn test_reflow_withMultiLineShortCue_shouldKeepTimestamps() {
    let input = "1\n00:00:01,000 --> 00:00:03,000\nHello\nthere\n";
    let pipeline = SubtitlePipeline::default();
    let output = pipeline.reflow(input);

    // Two short lines flatten onto one line under the limit
    assert_eq!(output, "1\n00:00:01,000 --> 00:00:03,000\nHello there\n");
}

/// Test that passthrough blocks survive reflow verbatim
#[test]
fn test_reflow_withMalformedBlock_shouldPreserveItVerbatim() {
    let input = "1\n00:00:01,000 --> 00:00:02,000\nGood cue\n\nnot a cue at all\njust noise\n";
    let pipeline = SubtitlePipeline::default();
    let output = pipeline.reflow(input);

    assert!(output.contains("not a cue at all\njust noise"));
    assert!(output.starts_with("1\n00:00:01,000"));
}

/// Test JSON-wrapped input is unwrapped before formatting
#[test]
fn test_reflow_withJsonWrappedInput_shouldUnwrap() {
    let payload = serde_json::json!({ "text": common::sample_srt() }).to_string();
    let pipeline = SubtitlePipeline::default();

    assert_eq!(pipeline.reflow(&payload), common::sample_srt());
}

/// Test custom line length changes the split point
#[test]
fn test_reflow_withCustomLineLength_shouldWrapTighter() {
    let input = "1\n00:00:00,000 --> 00:00:10,000\none two three four five six seven eight\n";
    let pipeline = SubtitlePipeline::new(10);
    let document = CueDocument::parse(&pipeline.reflow(input));

    assert!(document.timed_cue_count() >= 2);
}

/// Test normalization of timed segments into SRT text
#[test]
fn test_normalize_withSegments_shouldRenderSrtBlocks() {
    let transcription = Transcription::Segments(vec![
        TranscriptSegment {
            start: 0.0,
            end: 2.5,
            text: " Hello world ".to_string(),
        },
        TranscriptSegment {
            start: 2.5,
            end: 4.0,
            text: "Second segment".to_string(),
        },
    ]);

    let pipeline = SubtitlePipeline::default();
    let normalized = pipeline.normalize_transcription(&transcription);

    assert_eq!(
        normalized,
        "1\n00:00:00,000 --> 00:00:02,500\nHello world\n\n\
         2\n00:00:02,500 --> 00:00:04,000\nSecond segment\n"
    );
}

/// Test normalization of a raw text result is a passthrough
#[test]
fn test_normalize_withRawText_shouldReturnTextUnchanged() {
    let transcription = Transcription::RawText(common::sample_srt().to_string());
    let pipeline = SubtitlePipeline::default();

    assert_eq!(pipeline.normalize_transcription(&transcription), common::sample_srt());
}

/// Test the full transcription-to-SRT transform
#[test]
fn test_format_transcription_withLongSegment_shouldSplitCues() {
    let transcription = Transcription::Segments(vec![TranscriptSegment {
        start: 0.0,
        end: 5.0,
        text: "This is a very long line of subtitle text that definitely exceeds \
               thirty eight characters and needs wrapping into multiple cues"
            .to_string(),
    }]);

    let pipeline = SubtitlePipeline::default();
    let output = pipeline.format_transcription(&transcription);
    let document = CueDocument::parse(&output);

    assert!(document.timed_cue_count() >= 2);
    assert!(output.ends_with('\n'));
}

/// Test that negative or non-finite segment times degrade to zero
#[test]
fn test_normalize_withNegativeTimes_shouldClampToZero() {
    let transcription = Transcription::Segments(vec![TranscriptSegment {
        start: -3.0,
        end: f64::NAN,
        text: "Broken times".to_string(),
    }]);

    let pipeline = SubtitlePipeline::default();
    let normalized = pipeline.normalize_transcription(&transcription);

    assert!(normalized.contains("00:00:00,000 --> 00:00:00,000"));
}
