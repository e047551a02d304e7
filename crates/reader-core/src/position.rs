//! Progress-offset resolution.
//!
//! The narration engine reports offsets relative to the text slice it was
//! handed, not to the full document. Each signal is resolved independently
//! against the full segmentation, never incrementally from the previous
//! word, so coalesced, skipped, or non-monotonic signals cannot accumulate
//! drift.

use aloud_segment::Segmentation;

/// Map a slice-relative progress offset to a word index in `segmentation`.
///
/// `slice_start_word` is the word the active request's slice begins at; the
/// offset is made absolute by adding that token's start, then the first token
/// whose start is at or past the absolute offset wins. An offset at or beyond
/// the last token resolves to the last index: that is the normal case for
/// the final word of the document, not a lookup failure.
///
/// Returns `None` only for an empty segmentation.
pub fn resolve(
    offset: usize,
    segmentation: &Segmentation,
    slice_start_word: usize,
) -> Option<usize> {
    let last = segmentation.last_index()?;
    let base = segmentation.get(slice_start_word.min(last))?.start;
    let absolute = base.saturating_add(offset);

    let found = segmentation
        .tokens()
        .iter()
        .position(|t| t.start >= absolute);

    Some(found.unwrap_or(last))
}
