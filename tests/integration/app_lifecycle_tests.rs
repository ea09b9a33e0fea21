/*!
 * Controller and job lifecycle tests
 */

use subgen::app_config::Config;
use subgen::app_controller::{Controller, RunOptions};
use subgen::jobs::JobStore;
use subgen::subtitle_processor::CueDocument;
use subgen::transcriber::mock::MockTranscriber;
use subgen::transcriber::{TranscriptSegment, Transcription};

use crate::common;

fn controller_with(transcriber: MockTranscriber) -> Controller {
    Controller::with_parts(
        Config::default(),
        Box::new(transcriber),
        JobStore::new_in_memory().unwrap(),
    )
    .unwrap()
}

/// Test that an invalid configuration is rejected at construction
#[test]
fn test_controller_withInvalidConfig_shouldFailFast() {
    let mut config = Config::default();
    config.transcriber.endpoint = String::new();

    let result = Controller::with_parts(
        config,
        Box::new(MockTranscriber::with_raw_text("")),
        JobStore::new_in_memory().unwrap(),
    );

    assert!(result.is_err());
}

/// Test formatting a segmented transcription splits oversized cues
#[test]
fn test_format_transcription_withLongSegment_shouldSplit() {
    let controller = controller_with(MockTranscriber::with_raw_text(""));

    let transcription = Transcription::Segments(vec![TranscriptSegment {
        start: 0.0,
        end: 5.0,
        text: "This is a very long line of subtitle text that definitely exceeds \
               thirty eight characters and needs wrapping into multiple cues"
            .to_string(),
    }]);

    let output = controller.format_transcription(&transcription);
    assert!(CueDocument::parse(&output).timed_cue_count() >= 2);
}

/// Test that disabling splitting normalizes without reflowing
#[test]
fn test_format_transcription_withSplittingDisabled_shouldOnlyNormalize() {
    let mut config = Config::default();
    config.formatting.split_long_cues = false;

    let controller = Controller::with_parts(
        config,
        Box::new(MockTranscriber::with_raw_text("")),
        JobStore::new_in_memory().unwrap(),
    )
    .unwrap();

    let transcription = Transcription::Segments(vec![TranscriptSegment {
        start: 0.0,
        end: 5.0,
        text: "This is a very long line of subtitle text that definitely exceeds \
               thirty eight characters and needs wrapping into multiple cues"
            .to_string(),
    }]);

    let output = controller.format_transcription(&transcription);
    let document = CueDocument::parse(&output);

    // One cue, original span untouched
    assert_eq!(document.timed_cue_count(), 1);
    assert!(output.contains("00:00:00,000 --> 00:00:05,000"));
}

/// Test a run against a missing input fails before doing any work
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() {
    let controller = controller_with(MockTranscriber::with_raw_text(""));
    let result = controller
        .run("/nonexistent/video.mp4".into(), &RunOptions::default())
        .await;

    assert!(result.is_err());
    assert!(controller.store().list().unwrap().is_empty());
}

/// Test that an unreachable service fails a run before any job is registered
#[tokio::test]
async fn test_run_withUnreachableService_shouldFailBeforeRegisteringJob() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let video = common::create_test_file(&dir, "movie.mp4", "fake video").unwrap();

    let mut config = Config::default();
    config.output_dir = dir.to_string_lossy().to_string();

    let controller = Controller::with_parts(
        config,
        Box::new(MockTranscriber::failing()),
        JobStore::new_in_memory().unwrap(),
    )
    .unwrap();

    let result = controller.run(video, &RunOptions::default()).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unreachable"));
    assert!(controller.store().list().unwrap().is_empty());
}

/// Test that existing subtitles are skipped without force
#[tokio::test]
async fn test_run_withExistingSubtitles_shouldSkipWithoutForce() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&dir, "movie.mp4", "fake video").unwrap();

    let mut config = Config::default();
    config.output_dir = dir.to_string_lossy().to_string();

    // Pre-existing subtitle output next to the video name
    common::create_test_subtitle(&dir, "movie.srt").unwrap();

    let controller = Controller::with_parts(
        config,
        Box::new(MockTranscriber::with_raw_text("")),
        JobStore::new_in_memory().unwrap(),
    )
    .unwrap();

    let result = controller.run(video, &RunOptions::default()).await;

    // Skip is a clean no-op: no error, no job registered
    assert!(result.is_ok());
    assert!(controller.store().list().unwrap().is_empty());
}

/// Test the formatting pipeline honors the configured line length
#[test]
fn test_controller_pipeline_shouldUseConfiguredLineLength() {
    let mut config = Config::default();
    config.formatting.max_line_length = 10;

    let controller = Controller::with_parts(
        config,
        Box::new(MockTranscriber::with_raw_text("")),
        JobStore::new_in_memory().unwrap(),
    )
    .unwrap();

    let input = "1\n00:00:00,000 --> 00:00:10,000\none two three four five six seven eight\n";
    let output = controller.pipeline().reflow(input);

    assert!(CueDocument::parse(&output).timed_cue_count() >= 2);
}
