//! Replay orchestrator: rebuild an engine from its journal.
//!
//! All validation is delegated to the engine. A journal produced by one
//! engine replays into an identical state in a fresh one.

use blog_engine::engine::BlogEngine;
use blog_engine::events::EventEnvelope;
use blog_engine::hashing::canonical_hash;
use blog_engine::{CredentialScheme, ReversedStride};
use tracing::debug;

use crate::error::ReplayError;

/// Rebuild an engine from `events` under the default credential scheme,
/// returning it with its canonical hash.
pub fn rebuild_engine(events: &[EventEnvelope]) -> Result<(BlogEngine, String), ReplayError> {
    rebuild_engine_with(events, Box::new(ReversedStride))
}

/// Rebuild under `scheme`. It must be the scheme the journal's
/// credentials were derived with, or no password verifies afterwards.
pub fn rebuild_engine_with(
    events: &[EventEnvelope],
    scheme: Box<dyn CredentialScheme>,
) -> Result<(BlogEngine, String), ReplayError> {
    let mut engine = BlogEngine::with_scheme(scheme);
    engine
        .apply_sequence(events)
        .map_err(|source| ReplayError::Apply {
            position: engine.journal().len(),
            source,
        })?;
    let hash = canonical_hash(&engine);
    debug!(events = events.len(), %hash, "journal replayed");
    Ok((engine, hash))
}

/// Canonical hash of the state `events` rebuild into.
pub fn rebuild_hash(events: &[EventEnvelope]) -> Result<String, ReplayError> {
    rebuild_engine(events).map(|(_, hash)| hash)
}

/// Replay `source`'s journal into a fresh engine and check the result
/// hashes the same as `source`.
pub fn verify_replay(source: &BlogEngine) -> Result<String, ReplayError> {
    let expected = canonical_hash(source);
    let actual = rebuild_hash(source.journal().entries())?;
    if actual != expected {
        return Err(ReplayError::Diverged { expected, actual });
    }
    Ok(actual)
}

/// Replay the same events twice and require identical hashes.
pub fn verify_determinism(events: &[EventEnvelope]) -> Result<String, ReplayError> {
    let first = rebuild_hash(events)?;
    let second = rebuild_hash(events)?;
    if first != second {
        return Err(ReplayError::Diverged {
            expected: first,
            actual: second,
        });
    }
    Ok(first)
}
