//! Hashing utilities for game state.
//!
//! Commit identifiers are SHA-256 digests over a deterministic bincode
//! encoding of the snapshot, so identical histories produce identical ids.

use crawl_core::GameState;
use sha2::{Digest, Sha256};

/// SHA-256 of the bincode encoding of `state`.
pub fn state_digest(state: &GameState) -> Result<[u8; 32], bincode::Error> {
    let bytes = bincode::serialize(state)?;
    Ok(Sha256::digest(&bytes).into())
}

/// Digest of a new commit: parent id, sequence number and snapshot digest.
///
/// The sequence number keeps ids fresh when the same state is committed
/// twice in a row.
pub fn commit_digest(
    parent: Option<&str>,
    sequence: u64,
    state: &GameState,
) -> Result<String, bincode::Error> {
    let mut hasher = Sha256::new();
    hasher.update(parent.unwrap_or_default().as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(state_digest(state)?);
    Ok(hex::encode(hasher.finalize()))
}
