//! Deterministic in-memory engine for tests and tooling.
//!
//! [`ScriptedEngine`] speaks nothing: it scripts the signal stream a real
//! engine would emit, one event per [`poll_event`](ScriptedEngine::poll_event)
//! call, so a test (or the terminal replay tool) can interleave user actions
//! between signals at exact points. `speak` queues one `Progress` per word
//! boundary of the request text followed by one `Finished`; `cancel` drops
//! the request's remaining signals and, unless constructed as reliable,
//! fires the spurious `Finished` the completion heuristics exist for.

use crate::{
    EngineCapabilities, EngineError, EngineEvent, NarrationEngine, NarrationRequest,
    RequestHandle, VoiceCatalog, VoiceId, VoiceInfo,
};

use std::collections::VecDeque;

/// Control call recorded for test assertions, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCall {
    Cancel(RequestHandle),
    Pause(RequestHandle),
    Resume(RequestHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpokenRequest {
    pub handle: RequestHandle,
    pub request: NarrationRequest,
}

pub struct ScriptedEngine {
    capabilities: EngineCapabilities,
    queue: VecDeque<EngineEvent>,
    next_handle: u64,
    paused: bool,
    requests: Vec<SpokenRequest>,
    control_log: Vec<ControlCall>,
}

impl ScriptedEngine {
    /// Engine with the defective completion signal (`cancel` fires a
    /// spurious `Finished`): the platform the core compensates for.
    pub fn new() -> Self {
        Self::with_capabilities(EngineCapabilities::default())
    }

    /// Engine whose `Finished` only ever means genuine end-of-speech.
    pub fn reliable() -> Self {
        Self::with_capabilities(EngineCapabilities {
            completion_signal_reliable: true,
        })
    }

    pub fn with_capabilities(capabilities: EngineCapabilities) -> Self {
        Self {
            capabilities,
            queue: VecDeque::new(),
            next_handle: 0,
            paused: false,
            requests: Vec::new(),
            control_log: Vec::new(),
        }
    }

    /// Next scripted signal, or `None` while paused / drained.
    pub fn poll_event(&mut self) -> Option<EngineEvent> {
        if self.paused {
            return None;
        }
        self.queue.pop_front()
    }

    /// All requests `speak` has received, oldest first.
    pub fn requests(&self) -> &[SpokenRequest] {
        &self.requests
    }

    pub fn last_request(&self) -> Option<&SpokenRequest> {
        self.requests.last()
    }

    pub fn control_log(&self) -> &[ControlCall] {
        &self.control_log
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    fn script_request(&mut self, handle: RequestHandle, text: &str) {
        for offset in word_starts(text) {
            self.queue.push_back(EngineEvent::Progress { handle, offset });
        }
        self.queue.push_back(EngineEvent::Finished { handle });
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrationEngine for ScriptedEngine {
    fn capabilities(&self) -> EngineCapabilities {
        self.capabilities
    }

    fn speak(&mut self, request: NarrationRequest) -> Result<RequestHandle, EngineError> {
        if let Some(voice) = &request.voice {
            if !self.voices().iter().any(|v| &v.id == voice) {
                return Err(EngineError::UnknownVoice(voice.clone()));
            }
        }

        let handle = RequestHandle(self.next_handle);
        self.next_handle += 1;

        // a fresh request always starts audible, even if the previous one
        // was suspended when it got canceled
        self.paused = false;

        self.script_request(handle, &request.text);
        self.requests.push(SpokenRequest { handle, request });
        Ok(handle)
    }

    fn cancel(&mut self, handle: RequestHandle) {
        self.control_log.push(ControlCall::Cancel(handle));
        self.queue.retain(|e| e.handle() != handle);

        // The defect under test: a canceled request still reports "finished".
        if !self.capabilities.completion_signal_reliable {
            self.queue.push_back(EngineEvent::Finished { handle });
        }
    }

    fn pause(&mut self, handle: RequestHandle) {
        self.control_log.push(ControlCall::Pause(handle));
        self.paused = true;
    }

    fn resume(&mut self, handle: RequestHandle) {
        self.control_log.push(ControlCall::Resume(handle));
        self.paused = false;
    }
}

impl VoiceCatalog for ScriptedEngine {
    fn voices(&self) -> Vec<VoiceInfo> {
        vec![
            VoiceInfo {
                id: VoiceId::new("aria"),
                language: "en-US".to_string(),
                local: true,
            },
            VoiceInfo {
                id: VoiceId::new("baker"),
                language: "en-US".to_string(),
                local: true,
            },
            VoiceInfo {
                id: VoiceId::new("cloud-news"),
                language: "en-GB".to_string(),
                local: false,
            },
        ]
    }
}

/// Byte offsets of each word boundary the engine will announce: maximal
/// non-whitespace runs, the same shape a platform's word-boundary callbacks
/// take over the slice it was handed.
fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_word = false;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            starts.push(i);
            in_word = true;
        }
    }

    starts
}
