/*!
 * # subgen - Subtitle generation and burn-in toolkit
 *
 * A Rust library for turning video speech into well-formed subtitles.
 *
 * ## Features
 *
 * - Extract audio from video files (mono, 16 kHz) via ffmpeg
 * - Transcribe audio through a configurable speech-to-text HTTP service
 * - Normalize transcripts into SRT cues
 * - Wrap cue text to a bounded line width and split oversized cues,
 *   redistributing their time spans proportionally
 * - Burn styled subtitles into video via ffmpeg force_style
 * - Track job artifacts and lifecycle state in a local SQLite registry
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing and serialization
 * - `line_wrap`: Greedy two-line wrapping of cue text
 * - `timing`: Proportional time-span redistribution for split cues
 * - `pipeline`: The parse -> wrap -> redistribute -> serialize transform
 * - `transcriber`: Speech-to-text service clients:
 *   - `transcriber::whisper_api`: HTTP client for Whisper-style services
 *   - `transcriber::mock`: Mock client for tests
 * - `media`: ffmpeg invocation (audio extraction, burn-in render)
 * - `jobs`: Job registry with lifecycle states and artifact cleanup
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod jobs;
pub mod line_wrap;
pub mod media;
pub mod pipeline;
pub mod subtitle_processor;
pub mod timing;
pub mod transcriber;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, MediaError, TranscriberError};
pub use pipeline::SubtitlePipeline;
pub use subtitle_processor::{Cue, CueDocument};
pub use transcriber::{Transcription, TranscriptSegment};
