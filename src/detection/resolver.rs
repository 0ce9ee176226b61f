//! Overlap resolution between candidate sources.
//!
//! Candidates are considered by `(priority, start)` and accepted greedily
//! when none of their bytes is already claimed. A higher-priority candidate
//! therefore always wins in full, however short it is; the result does not
//! maximise total coverage and is not meant to.

use crate::domain::Entity;

/// Selects a non-overlapping subset of `candidates`.
///
/// `text_len` is the byte length of the source text; candidate ends are
/// clamped to it and candidates left empty by the clamp are dropped.
/// Accepted entities are returned in acceptance order. Equal keys keep their
/// input order, so the result is deterministic for a given input.
pub fn resolve(mut candidates: Vec<Entity>, text_len: usize) -> Vec<Entity> {
    if candidates.is_empty() {
        return Vec::new();
    }

    candidates.sort_by_key(|c| (c.priority, c.start));

    let mut occupied = vec![false; text_len];
    let mut accepted = Vec::new();

    for candidate in candidates {
        let end = candidate.end.min(text_len);
        if candidate.start >= end {
            continue;
        }
        let span = &mut occupied[candidate.start..end];
        if span.iter().any(|&taken| taken) {
            tracing::trace!(
                surface = %candidate.surface,
                category = %candidate.category,
                priority = %candidate.priority,
                "Discarding overlapping candidate"
            );
            continue;
        }
        span.fill(true);
        accepted.push(candidate);
    }

    accepted
}
