//! The playback state machine.
//!
//! `Idle → Playing → {Paused ⇄ Playing} → Idle`, with `Playing → Idle` on
//! natural completion or explicit stop. One [`ReaderSession`] owns the
//! injected narration engine, the session's fixed segmentation snapshot, and
//! the tracked position; every transition goes through it on a single logical
//! thread.
//!
//! Exactly one narration request is active at a time by construction: a
//! restart always cancels the prior request before speaking the new slice,
//! and signals carrying a stale handle are never authoritative. Calls from
//! the wrong source state (resume while playing, pause while idle, …) are
//! no-ops, not errors.

use aloud_narrator_interface::{
    EngineEvent, NarrationEngine, NarrationRequest, RequestHandle, VoiceId,
};
use aloud_segment::{Segmentation, SentenceRange};

use crate::frame::{HighlightFrame, PlaybackState};
use crate::params::{self, PlaybackParams};
use crate::position;
use crate::termination::{CompletionVerdict, TerminationPolicy};

/// Narration in flight (or suspended) for one fixed segmentation.
struct ActiveNarration {
    session_id: String,
    segmentation: Segmentation,
    handle: RequestHandle,
    /// Word the active request's slice begins at; progress offsets are
    /// relative to this token's start.
    slice_start: usize,
    word_index: usize,
    sentence: SentenceRange,
    /// What the in-flight request was actually issued with. May lag the
    /// requested parameters while paused; a restart re-synchronizes them.
    active: PlaybackParams,
    paused: bool,
}

pub struct ReaderSession<E> {
    engine: E,
    policy: TerminationPolicy,
    requested: PlaybackParams,
    narration: Option<ActiveNarration>,
    /// One-shot, armed by [`stop`](ReaderSession::stop): the next completion
    /// signal is the cancel's echo, not end-of-text.
    stop_armed: bool,
}

impl<E: NarrationEngine> ReaderSession<E> {
    pub fn new(engine: E) -> Self {
        let policy = TerminationPolicy::for_engine(engine.capabilities());
        Self::with_policy(engine, policy)
    }

    pub fn with_policy(engine: E, policy: TerminationPolicy) -> Self {
        Self {
            engine,
            policy,
            requested: PlaybackParams::default(),
            narration: None,
            stop_armed: false,
        }
    }

    // ── State inspection ────────────────────────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        match &self.narration {
            None => PlaybackState::Idle,
            Some(n) if n.paused => PlaybackState::Paused,
            Some(_) => PlaybackState::Playing,
        }
    }

    /// The rendering snapshot. Word index and sentence range always change
    /// together, so no frame can pair a fresh word with a stale sentence.
    pub fn frame(&self) -> HighlightFrame {
        match &self.narration {
            None => HighlightFrame {
                state: PlaybackState::Idle,
                word_index: None,
                sentence: None,
                rate: self.requested.rate,
                voice: self.requested.voice.clone(),
            },
            Some(n) => HighlightFrame {
                state: self.state(),
                word_index: Some(n.word_index),
                sentence: Some(n.sentence),
                rate: n.active.rate,
                voice: n.active.voice.clone(),
            },
        }
    }

    /// The session's fixed segmentation, for painting the document. `None`
    /// while idle.
    pub fn segmentation(&self) -> Option<&Segmentation> {
        self.narration.as_ref().map(|n| &n.segmentation)
    }

    /// The parameters the user last selected (which the next request will be
    /// issued with).
    pub fn requested_params(&self) -> &PlaybackParams {
        &self.requested
    }

    /// Host-side access to the injected engine, for pumping its signals.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ── User transitions ────────────────────────────────────────────────────

    /// Begin a fresh session: segment `text` once, fix the snapshot, and
    /// speak from the first word with the requested parameters.
    ///
    /// No-op on empty or whitespace-only text, and while a session is
    /// already active (restarts go through parameter changes, not `start`).
    pub fn start(&mut self, text: &str) {
        if self.narration.is_some() {
            tracing::warn!("start_ignored_session_active");
            return;
        }

        let segmentation = Segmentation::of(text);
        if segmentation.is_empty() {
            tracing::debug!("start_ignored_empty_text");
            return;
        }

        // A stale armed stop must not eat this session's real completion.
        self.stop_armed = false;

        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %session_id, words = segmentation.len(), "session_started");
        self.speak_from(segmentation, 0, session_id);
    }

    /// `Playing → Paused`: ask the engine to suspend output. Position and
    /// parameters stay put. No-op outside `Playing`.
    pub fn pause(&mut self) {
        let Some(n) = self.narration.as_mut() else {
            tracing::debug!("pause_ignored_idle");
            return;
        };
        if n.paused {
            return;
        }

        self.engine.pause(n.handle);
        n.paused = true;
    }

    /// `Paused → Playing`. If rate and voice are unchanged the suspended
    /// request simply continues; if the user edited either while paused, the
    /// suspended request is stale and narration restarts from the current
    /// word with the new parameters. No-op outside `Paused`.
    pub fn resume(&mut self) {
        let stale = match self.narration.as_ref() {
            Some(n) if n.paused => n.active != self.requested,
            _ => {
                tracing::debug!("resume_ignored_not_paused");
                return;
            }
        };

        if stale {
            tracing::debug!("resume_restarts_stale_parameters");
            self.restart_from_current_word();
        } else if let Some(n) = self.narration.as_mut() {
            self.engine.resume(n.handle);
            n.paused = false;
        }
    }

    /// Any state → `Idle`: cancel narration, clear the highlight, discard
    /// the segmentation. The next `start` is a fresh session. No-op while
    /// already idle.
    pub fn stop(&mut self) {
        let Some(n) = self.narration.take() else {
            tracing::debug!("stop_ignored_idle");
            return;
        };

        self.engine.cancel(n.handle);
        // The cancel may surface as a completion signal; arm the one-shot
        // flag so that signal reads as this stop, not as end-of-text.
        self.stop_armed = true;
        tracing::info!(session_id = %n.session_id, "session_stopped");
    }

    /// Select a new speech rate (clamped to the speakable range).
    ///
    /// Applied immediately while playing (restart from the current word), on
    /// the next resume while paused, on the next start while idle.
    pub fn set_rate(&mut self, rate: f32) {
        let mut params = self.requested.clone();
        params.rate = params::clamp_rate(rate);
        self.set_params(params);
    }

    /// Select a new voice (`None` = engine default). Same timing as
    /// [`set_rate`](ReaderSession::set_rate).
    pub fn set_voice(&mut self, voice: Option<VoiceId>) {
        let mut params = self.requested.clone();
        params.voice = voice;
        self.set_params(params);
    }

    /// Replace both playback parameters at once. Edits arriving together are
    /// carried by a single restart; a UI that changes rate and voice in one
    /// gesture should call this rather than the two single-field setters.
    pub fn set_params(&mut self, params: PlaybackParams) {
        self.requested = PlaybackParams {
            rate: params::clamp_rate(params.rate),
            voice: params.voice,
        };

        let needs_restart =
            matches!(&self.narration, Some(n) if !n.paused && n.active != self.requested);
        if needs_restart {
            self.restart_from_current_word();
        }
    }

    // ── Engine signals ──────────────────────────────────────────────────────

    /// Feed one signal from the narration engine. Returns `true` if the
    /// visible frame changed.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::Progress { handle, offset } => self.on_progress(handle, offset),
            EngineEvent::Finished { handle } => self.on_finished(handle),
        }
    }

    fn on_progress(&mut self, handle: RequestHandle, offset: usize) -> bool {
        let Some(n) = self.narration.as_mut() else {
            return false;
        };
        if n.handle != handle {
            tracing::debug!(%handle, active = %n.handle, "stale_progress_ignored");
            return false;
        }

        let Some(word_index) = position::resolve(offset, &n.segmentation, n.slice_start) else {
            return false;
        };

        let sentence = n.segmentation.sentence_range_of(word_index);
        n.word_index = word_index;
        n.sentence = sentence;
        true
    }

    fn on_finished(&mut self, handle: RequestHandle) -> bool {
        let verdict = match self.narration.as_ref() {
            None => {
                if self.stop_armed {
                    // rule 1: the echo of an explicit stop
                    self.stop_armed = false;
                    tracing::debug!(%handle, "stop_echo_consumed");
                } else {
                    tracing::debug!(%handle, "completion_ignored_idle");
                }
                return false;
            }
            Some(n) if n.handle != handle => {
                // completion of a request we canceled for a restart
                tracing::debug!(%handle, active = %n.handle, "stale_completion_ignored");
                return false;
            }
            Some(n) => self.policy.classify(self.stop_armed, n.word_index, &n.segmentation),
        };

        match verdict {
            CompletionVerdict::Spurious => {
                tracing::debug!(%handle, "spurious_completion_ignored");
                false
            }
            CompletionVerdict::IntentionalStop | CompletionVerdict::Completed => {
                self.stop_armed = false;
                if let Some(n) = self.narration.take() {
                    tracing::info!(session_id = %n.session_id, "session_completed");
                }
                true
            }
        }
    }

    // ── Internal ────────────────────────────────────────────────────────────

    /// Cancel the in-flight request and re-issue narration from the tracked
    /// word with the currently requested parameters. The word index is
    /// preserved across the restart; it only moves again on the new request's
    /// first progress signal.
    fn restart_from_current_word(&mut self) {
        let Some(n) = self.narration.take() else {
            return;
        };

        self.engine.cancel(n.handle);
        tracing::debug!(canceled = %n.handle, from_word = n.word_index, "narration_restarted");
        self.speak_from(n.segmentation, n.word_index, n.session_id);
    }

    /// Issue a narration request for the slice beginning at `from_word` and
    /// make it the active one. On engine failure the session degrades to
    /// idle (nothing highlighted) rather than surfacing an error.
    fn speak_from(&mut self, segmentation: Segmentation, from_word: usize, session_id: String) {
        let sentence = segmentation.sentence_range_of(from_word);
        let request = NarrationRequest {
            text: segmentation.slice_from(from_word).to_string(),
            rate: self.requested.rate,
            voice: self.requested.voice.clone(),
        };

        match self.engine.speak(request) {
            Ok(handle) => {
                tracing::debug!(%handle, from_word, rate = self.requested.rate, "narration_speaking");
                self.narration = Some(ActiveNarration {
                    session_id,
                    segmentation,
                    handle,
                    slice_start: from_word,
                    word_index: from_word,
                    sentence,
                    active: self.requested.clone(),
                    paused: false,
                });
            }
            Err(error) => {
                tracing::warn!(%error, session_id = %session_id, "narration_speak_failed");
                self.narration = None;
            }
        }
    }
}
