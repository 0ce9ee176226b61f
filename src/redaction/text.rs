//! Length-preserving text redaction.

use crate::domain::Entity;

/// Glyph written over every redacted character.
pub const BLOCK_GLYPH: char = '█';

/// Replaces every character inside an entity span with [`BLOCK_GLYPH`].
///
/// The output has the same number of characters as `text`, and every
/// character outside the spans (line breaks included) is copied unchanged.
/// Overlapping spans are tolerated; spans starting past the end of the text
/// are skipped and ends are clamped. A span boundary that falls inside a
/// multi-byte character blocks that whole character.
pub fn redact_text(text: &str, entities: &[Entity]) -> String {
    let len = text.len();
    let mut masked = vec![false; len];
    for entity in entities {
        if entity.start >= len {
            continue;
        }
        let end = entity.end.min(len);
        if entity.start < end {
            masked[entity.start..end].fill(true);
        }
    }

    let mut out = String::with_capacity(len + len / 2);
    for (idx, ch) in text.char_indices() {
        let covered = masked[idx..idx + ch.len_utf8()].iter().any(|&m| m);
        out.push(if covered { BLOCK_GLYPH } else { ch });
    }
    out
}
