/*!
 * Job registry for pipeline artifacts and lifecycle state.
 *
 * Each processed video gets an explicit record mapping its id to the video,
 * audio, subtitle and rendered artifact paths, together with a lifecycle
 * state that moves through defined transitions:
 *
 * `uploaded -> audio_extracted -> transcribed -> rendered`
 *
 * Records are persisted in a local SQLite database so interrupted runs can
 * be inspected and cleaned up. Cleanup removes the record and all of its
 * artifacts together.
 */

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

pub mod models;
pub mod store;

pub use models::{JobRecord, JobState};
pub use store::JobStore;

/// SHA-256 hash of a file's contents, hex-encoded.
///
/// Used to tie a job record to the exact source video it was created for.
pub fn hash_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {:?}", path))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file
            .read(&mut buffer)
            .with_context(|| format!("Failed to read file for hashing: {:?}", path))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
