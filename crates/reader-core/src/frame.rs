use aloud_narrator_interface::VoiceId;
use aloud_segment::SentenceRange;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    specta::Type,
)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Snapshot of everything a rendering layer needs to paint the highlight.
///
/// This is the rendering contract: `word_index` and `sentence` always move
/// together (never a fresh word with a stale sentence range), and both are
/// `None` exactly when `state` is [`PlaybackState::Idle`]. `rate` and `voice`
/// are the *active* parameters, the ones the audible narration was issued
/// with, so a UI can show the lagging value while a change waits for resume.
///
/// Word indices refer to the session's fixed segmentation, exposed separately
/// via [`crate::ReaderSession::segmentation`]; the token list does not change
/// for the lifetime of a session, so it is not repeated in every frame.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct HighlightFrame {
    pub state: PlaybackState,
    pub word_index: Option<usize>,
    pub sentence: Option<SentenceRange>,
    pub rate: f32,
    pub voice: Option<VoiceId>,
}
