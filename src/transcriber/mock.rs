/*!
 * Mock transcriber implementations for testing.
 *
 * This module provides mock clients that simulate different behaviors:
 * - `MockTranscriber::with_segments(..)` - Succeeds with timed segments
 * - `MockTranscriber::with_raw_text(..)` - Succeeds with a raw SRT blob
 * - `MockTranscriber::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::TranscriberError;

use super::{Transcriber, TranscriptSegment, Transcription};

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the given segments
    Segments(Vec<TranscriptSegment>),
    /// Return the given raw subtitle text
    RawText(String),
    /// Always fail with a request error
    Failing,
    /// Simulate slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock transcriber for testing controller and pipeline behavior
#[derive(Debug)]
pub struct MockTranscriber {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of transcribe calls seen
    call_count: Arc<AtomicUsize>,
}

impl MockTranscriber {
    /// Create a new mock with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that returns the given timed segments
    pub fn with_segments(segments: Vec<TranscriptSegment>) -> Self {
        Self::new(MockBehavior::Segments(segments))
    }

    /// Mock that returns a raw subtitle text blob
    pub fn with_raw_text(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::RawText(text.into()))
    }

    /// Mock that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of transcribe calls made against this mock
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio_path: &Path,
        _language: Option<&str>,
    ) -> Result<Transcription, TranscriberError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Segments(segments) => Ok(Transcription::Segments(segments.clone())),
            MockBehavior::RawText(text) => Ok(Transcription::RawText(text.clone())),
            MockBehavior::Failing => Err(TranscriberError::RequestFailed(
                "mock transcriber configured to fail".to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(*delay_ms)).await;
                Ok(Transcription::RawText(String::new()))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), TranscriberError> {
        match self.behavior {
            MockBehavior::Failing => Err(TranscriberError::ConnectionError(
                "mock transcriber configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
