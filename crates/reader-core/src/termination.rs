//! Completion-signal classification.
//!
//! At least one narration engine fires its "finished" signal both on genuine
//! end-of-speech and as a side effect of canceling a request, which the
//! controller does on every parameter-change restart. Taking those signals at
//! face value would tear the session down mid-restart, so completions pass
//! through a policy keyed by [`EngineCapabilities::completion_signal_reliable`]
//! before any state is cleared.

use aloud_narrator_interface::EngineCapabilities;
use aloud_segment::{Segmentation, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionVerdict {
    /// The echo of an explicit user stop; the armed flag has been observed.
    IntentionalStop,
    /// Genuine end-of-text: tear the session down.
    Completed,
    /// A cancel artifact. Ignore it, leave state untouched, and wait for the
    /// real signal.
    Spurious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPolicy {
    completion_signal_reliable: bool,
}

impl TerminationPolicy {
    pub fn for_engine(capabilities: EngineCapabilities) -> Self {
        Self {
            completion_signal_reliable: capabilities.completion_signal_reliable,
        }
    }

    /// Policy that trusts every completion signal for the active request.
    pub fn trusting() -> Self {
        Self {
            completion_signal_reliable: true,
        }
    }

    /// Policy with the compensating heuristics on.
    pub fn compensating() -> Self {
        Self {
            completion_signal_reliable: false,
        }
    }

    /// Classify one completion signal for the active request.
    ///
    /// `stop_armed` is the one-shot flag an explicit Stop sets; it wins over
    /// everything else. After that, a tracked index at the last word is a
    /// genuine completion on any engine. On a reliable engine every remaining
    /// completion is genuine too (progress may simply have coalesced away the
    /// final words); on a defective engine the remaining signals go through
    /// the normalized-text fallback and default to spurious.
    ///
    /// The fallback requires the index match as well as the text match: the
    /// same word can recur earlier in the document, so text equality alone
    /// never proves end-of-text. A last token that normalizes to nothing
    /// (pure punctuation) falls through to spurious.
    pub fn classify(
        &self,
        stop_armed: bool,
        word_index: usize,
        segmentation: &Segmentation,
    ) -> CompletionVerdict {
        if stop_armed {
            return CompletionVerdict::IntentionalStop;
        }

        let Some(last) = segmentation.last_index() else {
            // nothing left to speak
            return CompletionVerdict::Completed;
        };

        if word_index == last {
            return CompletionVerdict::Completed;
        }

        if self.completion_signal_reliable {
            return CompletionVerdict::Completed;
        }

        let current = segmentation.get(word_index).map(normalized);
        let tail = segmentation.get(last).map(normalized);
        match (current, tail) {
            (Some(current), Some(tail))
                if !current.is_empty() && current == tail && word_index == last =>
            {
                CompletionVerdict::Completed
            }
            _ => CompletionVerdict::Spurious,
        }
    }
}

/// Token text with trailing punctuation and symbol characters stripped.
fn normalized(token: &Token) -> &str {
    token.text.trim_end_matches(|c: char| !c.is_alphanumeric())
}
