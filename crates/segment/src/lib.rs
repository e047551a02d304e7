//! # Snapshot-based word segmentation
//!
//! The source text is scanned **once** per playback session into a
//! [`Segmentation`]: an owned snapshot of the text plus every maximal run of
//! non-whitespace characters with its byte offset. The snapshot is the sole
//! oracle for narration slices and for progress-offset resolution; text the
//! user keeps editing never reaches a segmentation that is already in use.
//!
//! Sentence boundaries are not stored. A sentence range is derived on demand
//! from a word index by walking to the nearest `.`/`!`/`?`-terminated tokens,
//! so it can never go stale against the token list it was computed from.

/// One word of the source text.
///
/// `text` is a maximal run of non-whitespace characters (never empty, no
/// internal whitespace). `start` is the byte offset of its first character in
/// the source snapshot; the scanner walks `char_indices`, so `start` always
/// falls on a character boundary.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Token {
    pub text: String,
    pub start: usize,
}

impl Token {
    /// Whether this token closes a sentence (`.`, `!` or `?` suffix).
    pub fn ends_sentence(&self) -> bool {
        self.text.ends_with(['.', '!', '?'])
    }
}

/// Inclusive word-index range of one sentence, valid only against the
/// segmentation it was computed from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type,
)]
pub struct SentenceRange {
    pub start: usize,
    pub end: usize,
}

impl SentenceRange {
    pub fn contains(&self, word_index: usize) -> bool {
        self.start <= word_index && word_index <= self.end
    }
}

/// The fixed word index of one playback session.
///
/// Token `start` offsets are strictly increasing. Created at session start,
/// held unchanged through pauses, resumes and parameter-change restarts,
/// discarded when the session fully stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    source: String,
    tokens: Vec<Token>,
}

impl Segmentation {
    /// Scan `text` into a segmentation, snapshotting the text.
    ///
    /// Empty or whitespace-only input yields an empty segmentation. The
    /// caller refuses to start playback on those; it is not an error here.
    pub fn of(text: &str) -> Self {
        Self {
            source: text.to_string(),
            tokens: scan(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, word_index: usize) -> Option<&Token> {
        self.tokens.get(word_index)
    }

    /// Index of the last token, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.tokens.len().checked_sub(1)
    }

    /// The snapshotted source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tail of the snapshot starting at `word_index`'s token: the text a
    /// narration request for that word is issued with. Out-of-range indices
    /// clamp to the last token.
    ///
    /// Returns the empty string on an empty segmentation.
    pub fn slice_from(&self, word_index: usize) -> &str {
        match self.clamped(word_index) {
            Some(i) => &self.source[self.tokens[i].start..],
            None => "",
        }
    }

    /// Derive the sentence enclosing `word_index`.
    ///
    /// Walks backward while the preceding token does not end a sentence and
    /// forward while the current token does not (or until the last token).
    /// A text without any terminator is one sentence spanning everything,
    /// intended rather than degenerate. O(sentence length).
    ///
    /// Out-of-range indices clamp to the last token; an empty segmentation
    /// yields the empty `{0, 0}` range.
    pub fn sentence_range_of(&self, word_index: usize) -> SentenceRange {
        let Some(i) = self.clamped(word_index) else {
            return SentenceRange { start: 0, end: 0 };
        };
        let last = self.tokens.len() - 1;

        let mut start = i;
        while start > 0 && !self.tokens[start - 1].ends_sentence() {
            start -= 1;
        }

        let mut end = i;
        while end < last && !self.tokens[end].ends_sentence() {
            end += 1;
        }

        SentenceRange { start, end }
    }

    fn clamped(&self, word_index: usize) -> Option<usize> {
        self.last_index().map(|last| word_index.min(last))
    }
}

fn scan(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = run_start.take() {
                tokens.push(Token {
                    text: text[start..i].to_string(),
                    start,
                });
            }
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }

    if let Some(start) = run_start {
        tokens.push(Token {
            text: text[start..].to_string(),
            start,
        });
    }

    tokens
}
