use aloud_narrator_interface::scripted::ControlCall;
use aloud_narrator_interface::{EngineEvent, ScriptedEngine, VoiceId};
use aloud_segment::SentenceRange;
use reader_core::{PlaybackState, ReaderSession};

const TEXT: &str = "Hello world. This is a test!";

fn session() -> ReaderSession<ScriptedEngine> {
    ReaderSession::new(ScriptedEngine::new())
}

/// Pump every queued engine signal into the session.
fn pump(s: &mut ReaderSession<ScriptedEngine>) {
    while step(s).is_some() {}
}

/// Deliver the next queued engine signal, if any.
fn step(s: &mut ReaderSession<ScriptedEngine>) -> Option<EngineEvent> {
    let event = s.engine_mut().poll_event()?;
    s.handle_event(event.clone());
    Some(event)
}

/// Deliver `n` signals.
fn step_n(s: &mut ReaderSession<ScriptedEngine>, n: usize) {
    for _ in 0..n {
        step(s).expect("engine ran out of scripted signals");
    }
}

fn active_handle(s: &mut ReaderSession<ScriptedEngine>) -> aloud_narrator_interface::RequestHandle {
    s.engine_mut().last_request().unwrap().handle
}

#[test]
fn progress_signals_advance_word_and_sentence_together() {
    let mut s = session();
    s.start(TEXT);

    // first signal: offset 0, still "Hello"
    step(&mut s);
    assert_eq!(s.frame().word_index, Some(0));

    // offset 6 is the start of "world."
    step(&mut s);
    let frame = s.frame();
    assert_eq!(frame.word_index, Some(1));
    assert_eq!(frame.sentence, Some(SentenceRange { start: 0, end: 1 }));

    // offset 13 crosses into the second sentence
    step(&mut s);
    let frame = s.frame();
    assert_eq!(frame.word_index, Some(2));
    assert_eq!(frame.sentence, Some(SentenceRange { start: 2, end: 5 }));
}

#[test]
fn every_frame_pairs_word_with_its_own_sentence() {
    let mut s = session();
    s.start(TEXT);

    while step(&mut s).is_some() {
        let frame = s.frame();
        if let Some(word_index) = frame.word_index {
            let seg = s.segmentation().expect("active session has a segmentation");
            assert_eq!(frame.sentence, Some(seg.sentence_range_of(word_index)));
        }
    }
}

#[test]
fn full_narration_completes_back_to_idle() {
    let mut s = session();
    s.start(TEXT);
    pump(&mut s);

    let frame = s.frame();
    assert_eq!(frame.state, PlaybackState::Idle);
    assert_eq!(frame.word_index, None);
    assert_eq!(frame.sentence, None);
    assert!(s.segmentation().is_none());
}

#[test]
fn pause_suspends_without_touching_position_or_params() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 4); // at "is"

    s.pause();

    let frame = s.frame();
    assert_eq!(frame.state, PlaybackState::Paused);
    assert_eq!(frame.word_index, Some(3));
    assert_eq!(frame.rate, 1.0);
    assert!(
        s.engine_mut()
            .control_log()
            .iter()
            .any(|c| matches!(c, ControlCall::Pause(_)))
    );
}

#[test]
fn resume_with_unchanged_params_continues_the_suspended_request() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 6); // at "test!", the last word
    s.pause();

    s.resume();

    // the engine was resumed, no second request was issued
    assert_eq!(s.engine_mut().requests().len(), 1);
    assert!(
        s.engine_mut()
            .control_log()
            .iter()
            .any(|c| matches!(c, ControlCall::Resume(_)))
    );
    let frame = s.frame();
    assert_eq!(frame.state, PlaybackState::Playing);
    assert_eq!(frame.word_index, Some(5));
    assert_eq!(frame.rate, 1.0);
}

#[test]
fn rate_change_while_playing_restarts_from_the_current_word() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 4); // at "is" (index 3, offset 18)
    let tokens_before = s.segmentation().unwrap().tokens().to_vec();

    s.set_rate(1.5);

    // a new request sliced from "is", at the new rate
    let request = s.engine_mut().last_request().unwrap().request.clone();
    assert_eq!(request.text, "is a test!");
    assert_eq!(request.rate, 1.5);
    assert_eq!(s.engine_mut().requests().len(), 2);

    // the word index survives the restart until new progress arrives
    let frame = s.frame();
    assert_eq!(frame.word_index, Some(3));
    assert_eq!(frame.rate, 1.5);

    // the segmentation snapshot is the same one, not a re-scan
    assert_eq!(s.segmentation().unwrap().tokens(), tokens_before);

    // the canceled request's spurious completion arrives first and is stale
    let echo = step(&mut s).unwrap();
    assert!(matches!(echo, EngineEvent::Finished { .. }));
    assert_eq!(s.frame().state, PlaybackState::Playing);

    // the new request's signals then play out to genuine completion
    pump(&mut s);
    assert_eq!(s.frame().state, PlaybackState::Idle);
}

#[test]
fn progress_from_a_restarted_slice_resolves_absolutely() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 5); // at "a" (index 4)

    s.set_rate(0.8);
    step(&mut s); // stale Finished from the canceled request

    // new slice "a test!": offset 0 -> word 4, offset 2 -> word 5
    step(&mut s);
    assert_eq!(s.frame().word_index, Some(4));
    step(&mut s);
    assert_eq!(s.frame().word_index, Some(5));
}

#[test]
fn params_changed_while_paused_restart_once_on_resume() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 2); // at "world."
    s.pause();

    s.set_rate(2.0);
    s.set_voice(Some(VoiceId::new("baker")));

    // still paused, nothing reissued, active params lag the requested ones
    assert_eq!(s.engine_mut().requests().len(), 1);
    assert_eq!(s.frame().state, PlaybackState::Paused);
    assert_eq!(s.frame().rate, 1.0);

    s.resume();

    // one restart carrying both edits, sliced from the paused word
    assert_eq!(s.engine_mut().requests().len(), 2);
    let request = s.engine_mut().last_request().unwrap().request.clone();
    assert_eq!(request.text, "world. This is a test!");
    assert_eq!(request.rate, 2.0);
    assert_eq!(request.voice, Some(VoiceId::new("baker")));

    // the suspended request was canceled, not resumed
    assert!(
        !s.engine_mut()
            .control_log()
            .iter()
            .any(|c| matches!(c, ControlCall::Resume(_)))
    );
    assert_eq!(s.frame().state, PlaybackState::Playing);
    assert_eq!(s.frame().word_index, Some(1));

    // the restarted narration plays out to genuine completion
    pump(&mut s);
    assert_eq!(s.frame().state, PlaybackState::Idle);
}

#[test]
fn simultaneous_rate_and_voice_edit_restarts_once_while_playing() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 4); // at "is"

    s.set_params(
        reader_core::PlaybackParams::default()
            .with_rate(1.5)
            .with_voice("aria"),
    );

    assert_eq!(s.engine_mut().requests().len(), 2);
    let request = &s.engine_mut().last_request().unwrap().request;
    assert_eq!(request.rate, 1.5);
    assert_eq!(request.voice, Some(VoiceId::new("aria")));
}

#[test]
fn stop_consumes_the_cancel_echo_exactly_once() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 3);

    s.stop();
    assert_eq!(s.frame().state, PlaybackState::Idle);

    // the cancel's spurious completion is pending; consuming it changes nothing
    let echo = step(&mut s).unwrap();
    assert!(matches!(echo, EngineEvent::Finished { .. }));
    assert_eq!(s.frame().state, PlaybackState::Idle);
    assert_eq!(step(&mut s), None);

    // a following session still completes genuinely
    s.start(TEXT);
    pump(&mut s);
    assert_eq!(s.frame().state, PlaybackState::Idle);
}

#[test]
fn stale_progress_after_restart_is_ignored() {
    let mut s = session();
    s.start(TEXT);
    let old = active_handle(&mut s);
    step_n(&mut s, 4); // at "is"

    s.set_rate(1.5);

    // a leftover boundary signal from the canceled request must not move the
    // highlight resolved against the new slice
    let changed = s.handle_event(EngineEvent::Progress {
        handle: old,
        offset: 0,
    });
    assert!(!changed);
    assert_eq!(s.frame().word_index, Some(3));
}

#[test]
fn mid_text_completion_is_ignored_on_the_defective_engine() {
    let mut s = session();
    s.start(TEXT);
    let handle = active_handle(&mut s);
    step_n(&mut s, 3); // at "This"

    let changed = s.handle_event(EngineEvent::Finished { handle });

    assert!(!changed);
    assert_eq!(s.frame().state, PlaybackState::Playing);
    assert_eq!(s.frame().word_index, Some(2));
}

#[test]
fn mid_text_completion_is_trusted_on_a_reliable_engine() {
    let mut s = ReaderSession::new(ScriptedEngine::reliable());
    s.start(TEXT);
    let handle = active_handle(&mut s);
    step_n(&mut s, 3); // at "This"

    let changed = s.handle_event(EngineEvent::Finished { handle });

    assert!(changed);
    assert_eq!(s.frame().state, PlaybackState::Idle);
}

#[test]
fn restart_on_a_reliable_engine_has_no_echo_to_ignore() {
    let mut s = ReaderSession::new(ScriptedEngine::reliable());
    s.start(TEXT);
    step_n(&mut s, 4);

    s.set_rate(1.5);

    // next signal is already the new request's first boundary
    let next = step(&mut s).unwrap();
    assert!(matches!(next, EngineEvent::Progress { offset: 0, .. }));

    pump(&mut s);
    assert_eq!(s.frame().state, PlaybackState::Idle);
}

#[test]
fn completion_tracked_at_last_word_ends_the_session() {
    let mut s = session();
    s.start(TEXT);
    step_n(&mut s, 6); // all progress signals delivered, tracked at "test!"
    assert_eq!(s.frame().word_index, Some(5));

    let handle = active_handle(&mut s);
    let changed = s.handle_event(EngineEvent::Finished { handle });

    assert!(changed);
    assert_eq!(s.frame().state, PlaybackState::Idle);
}

#[test]
fn source_edits_after_start_never_reach_the_session() {
    let mut document = String::from(TEXT);
    let mut s = session();
    s.start(&document);

    // the user keeps typing while narration runs
    document.push_str(" And now for something new.");

    s.set_rate(1.5); // restart slices from the snapshot, not the edited text
    let request = &s.engine_mut().last_request().unwrap().request;
    assert_eq!(request.text, "Hello world. This is a test!");
    assert_eq!(s.segmentation().unwrap().len(), 6);
}
