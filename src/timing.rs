use log::warn;

use crate::line_wrap::Chunk;
use crate::subtitle_processor::Cue;

// @module: Proportional time-span redistribution for split cues

/// Minimum duration in milliseconds granted to a non-final split cue.
/// Prevents imperceptibly short cues when a chunk carries very little text.
pub const MIN_CUE_DURATION_MS: u64 = 200;

/// Split one cue's time span across its wrapped chunks.
///
/// Each non-final chunk receives a share of the original span proportional to
/// its character weight, floored at [`MIN_CUE_DURATION_MS`]. The final chunk's
/// end is forced to the original `end_ms` exactly, so the split cues always
/// cover the original span without rounding drift.
///
/// When the floors alone would overrun the span (many tiny chunks inside a
/// short cue), the minimum is abandoned and shares are purely proportional,
/// which keeps every cue monotonic and span-covering. This case is logged.
pub fn redistribute(start_ms: u64, end_ms: u64, chunks: &[Chunk]) -> Vec<Cue> {
    if chunks.len() <= 1 {
        let lines = chunks
            .first()
            .map(|c| c.lines.clone())
            .unwrap_or_else(|| vec![String::new()]);
        return vec![Cue::new(start_ms, end_ms, lines)];
    }

    // Denominators floored at 1 to guard zero-length spans and empty text
    let total_ms = end_ms.saturating_sub(start_ms).max(1);
    let total_len: u64 = chunks.iter().map(|c| c.weight() as u64).sum::<u64>().max(1);

    if floors_overrun_span(start_ms, end_ms, total_ms, total_len, chunks) {
        warn!(
            "Minimum cue duration of {}ms would overrun the {}ms span across {} chunks, \
             falling back to pure proportional shares",
            MIN_CUE_DURATION_MS,
            total_ms,
            chunks.len()
        );
        return assign_shares(start_ms, end_ms, total_ms, total_len, chunks, false);
    }

    assign_shares(start_ms, end_ms, total_ms, total_len, chunks, true)
}

/// Check whether the per-chunk duration floor would leave the final chunk
/// with a zero or negative duration.
fn floors_overrun_span(
    start_ms: u64,
    end_ms: u64,
    total_ms: u64,
    total_len: u64,
    chunks: &[Chunk],
) -> bool {
    let mut cursor = start_ms;
    for chunk in &chunks[..chunks.len() - 1] {
        let share = total_ms * chunk.weight() as u64 / total_len;
        cursor += share.max(MIN_CUE_DURATION_MS);
    }
    cursor >= end_ms
}

fn assign_shares(
    start_ms: u64,
    end_ms: u64,
    total_ms: u64,
    total_len: u64,
    chunks: &[Chunk],
    with_floor: bool,
) -> Vec<Cue> {
    let mut cues = Vec::with_capacity(chunks.len());
    let mut cursor = start_ms;

    for (i, chunk) in chunks.iter().enumerate() {
        let is_last = i == chunks.len() - 1;
        let end = if is_last {
            end_ms
        } else {
            let share = total_ms * chunk.weight() as u64 / total_len;
            if with_floor {
                cursor + share.max(MIN_CUE_DURATION_MS)
            } else {
                // cap: a degenerate span must not push the cursor past end_ms
                (cursor + share).min(end_ms)
            }
        };

        cues.push(Cue::new(cursor, end, chunk.lines.clone()));
        cursor = end;
    }

    cues
}
