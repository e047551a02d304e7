//! Contract between the read-along core and an external narration engine.
//!
//! The engine is a black box that accepts a text slice plus playback
//! parameters and later emits asynchronous progress and completion signals.
//! Everything here is a *request*, never a synchronous guarantee: `speak`
//! returns a handle immediately, `cancel`/`pause`/`resume` take effect at the
//! engine's discretion, and results are observed only through the
//! [`EngineEvent`]s the host pumps back into the core.
//!
//! Implementations adapt a concrete platform (OS speech synthesis, a TTS
//! server, …) to this trait at the boundary; the core stays platform-free.
//! [`ScriptedEngine`] is the deterministic in-memory implementation used by
//! tests and tooling.

pub mod scripted;

pub use scripted::ScriptedEngine;

// ── Voices ───────────────────────────────────────────────────────────────────

/// Opaque voice identifier.
///
/// The core compares voices only by equality (to decide whether a resume can
/// continue the suspended request or must restart with new parameters); it
/// never inspects the contents.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, specta::Type,
)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoiceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VoiceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct VoiceInfo {
    pub id: VoiceId,
    /// BCP 47 language tag as reported by the platform (e.g. `en-US`).
    pub language: String,
    /// Whether synthesis runs locally (no network round-trip).
    pub local: bool,
}

/// Enumerates the voices an engine can speak with.
///
/// Platforms may report an empty catalog until their voice list has loaded,
/// so selection is always optional.
pub trait VoiceCatalog {
    fn voices(&self) -> Vec<VoiceInfo>;

    /// The voice to preselect: the first local one, if any.
    fn default_voice(&self) -> Option<VoiceId> {
        self.voices().into_iter().find(|v| v.local).map(|v| v.id)
    }
}

// ── Requests and signals ─────────────────────────────────────────────────────

/// Identifies one narration request for the lifetime of the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, specta::Type,
)]
pub struct RequestHandle(pub u64);

impl std::fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrationRequest {
    /// The text slice to speak: a tail of the session's source snapshot.
    pub text: String,
    /// Speech rate multiplier, positive, typically 0.5–2.0.
    pub rate: f32,
    /// `None` selects the engine's default voice.
    pub voice: Option<VoiceId>,
}

/// Asynchronous signal from the engine, pumped into the core by the host.
///
/// Per-request ordering is assumed to match emission order; signals from
/// different requests may interleave around a cancel and are told apart by
/// `handle`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// The engine reached `offset` (bytes into the request's text slice).
    /// Offsets may coalesce, skip words, or move non-monotonically.
    Progress { handle: RequestHandle, offset: usize },
    /// The request stopped producing audio. On at least one platform this
    /// fires both on genuine end-of-speech and as a side effect of `cancel`,
    /// which is why completion handling is policy-gated in the core.
    Finished { handle: RequestHandle },
}

impl EngineEvent {
    pub fn handle(&self) -> RequestHandle {
        match self {
            Self::Progress { handle, .. } | Self::Finished { handle } => *handle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct EngineCapabilities {
    /// Whether `Finished` is emitted only on genuine end-of-speech.
    ///
    /// `false` means the engine also fires it when a request is canceled
    /// (conflating "I stopped you" with "I finished"), and completion
    /// signals must pass the core's compensating heuristics before any state
    /// is torn down. Defaults to `false`; an adapter opts in to `true` only
    /// when its platform never emits cancel echoes.
    pub completion_signal_reliable: bool,
}

impl Default for EngineCapabilities {
    fn default() -> Self {
        Self {
            completion_signal_reliable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("narration engine unavailable: {0}")]
    Unavailable(String),
    #[error("voice not in catalog: {0}")]
    UnknownVoice(VoiceId),
}

// ── Engine ───────────────────────────────────────────────────────────────────

/// Black-box audio narration engine.
///
/// Exactly one request is meant to be speaking at a time; the core enforces
/// this by canceling the previous request before issuing a new one. Control
/// methods are fire-and-forget: an engine is free to apply them late, and a
/// `cancel` may surface as a trailing [`EngineEvent::Finished`].
pub trait NarrationEngine {
    fn capabilities(&self) -> EngineCapabilities;

    /// Begin speaking `request`. The returned handle tags every signal the
    /// engine later emits for it.
    fn speak(&mut self, request: NarrationRequest) -> Result<RequestHandle, EngineError>;

    fn cancel(&mut self, handle: RequestHandle);

    fn pause(&mut self, handle: RequestHandle);

    fn resume(&mut self, handle: RequestHandle);
}
