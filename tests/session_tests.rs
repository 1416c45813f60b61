// Integration tests for the recording session controller
//
// The controller is a pure state machine, so these tests drive it with the
// same event sequences a UI shell would produce and assert on the phases
// and effects that come back.

use voicejot::{SessionEffect, SessionErrorKind, SessionEvent, SessionPhase, SessionState};

/// Drive a fresh machine into `Recording` and return it with the epoch the
/// recognition engine was started under.
fn recording_session() -> (SessionState, u64) {
    let state = SessionState::new();
    let (state, effects) = state.apply(SessionEvent::StartRequested);
    assert_eq!(effects, vec![SessionEffect::AcquireCapabilities]);

    let (state, effects) = state.apply(SessionEvent::PermissionGranted);
    assert_eq!(state.phase(), SessionPhase::Recording);

    let epoch = effects
        .iter()
        .find_map(|fx| match fx {
            SessionEffect::StartRecognition { epoch } => Some(*epoch),
            _ => None,
        })
        .expect("recording start must start recognition");
    assert!(effects.contains(&SessionEffect::StartCapture));

    (state, epoch)
}

fn upload_effect(effects: &[SessionEffect]) -> &voicejot::RecordingArtifact {
    effects
        .iter()
        .find_map(|fx| match fx {
            SessionEffect::Upload(artifact) => Some(artifact),
            _ => None,
        })
        .expect("stop must produce an upload effect")
}

#[test]
fn test_transcript_preserves_final_segment_order() {
    let (mut state, _) = recording_session();

    for (ticks, text) in [(2, "first thing"), (3, "second thing"), (1, "third")] {
        for _ in 0..ticks {
            state = state.apply(SessionEvent::Tick).0;
        }
        state = state.apply(SessionEvent::FinalSegment(text.to_string())).0;
    }

    let (state, effects) = state.apply(SessionEvent::StopRequested);
    assert_eq!(state.phase(), SessionPhase::Finalizing);

    let artifact = upload_effect(&effects);
    assert_eq!(artifact.transcript, "first thing second thing third");

    let offsets: Vec<u64> = artifact.lines.iter().map(|l| l.offset_secs).collect();
    assert_eq!(offsets, vec![2, 5, 6]);
}

#[test]
fn test_delayed_recognition_end_after_stop_never_restarts() {
    let (state, epoch) = recording_session();

    let (state, effects) = state.apply(SessionEvent::StopRequested);
    assert!(effects.contains(&SessionEffect::StopEngines));

    // The engine's own end event arrives late, carrying the old epoch
    let (state, effects) = state.apply(SessionEvent::RecognitionEnded { epoch });
    assert!(
        effects.is_empty(),
        "stale recognition end must be discarded, got {effects:?}"
    );
    assert_eq!(state.phase(), SessionPhase::Finalizing);
}

#[test]
fn test_recognition_end_while_recording_restarts_current_epoch() {
    let (state, epoch) = recording_session();

    let (state, effects) = state.apply(SessionEvent::RecognitionEnded { epoch });
    assert_eq!(effects, vec![SessionEffect::StartRecognition { epoch }]);

    // An end event from some earlier engine instance does nothing
    let (_, effects) = state.apply(SessionEvent::RecognitionEnded { epoch: epoch - 1 });
    assert!(effects.is_empty());
}

#[test]
fn test_interim_segments_update_in_place_until_final() {
    let (mut state, _) = recording_session();

    state = state.apply(SessionEvent::Tick).0;
    state = state.apply(SessionEvent::InterimSegment("hel".into())).0;
    state = state.apply(SessionEvent::InterimSegment("hello wor".into())).0;

    assert_eq!(state.interim(), Some("hello wor"));
    assert!(state.lines().is_empty(), "interim text is not a line yet");

    state = state.apply(SessionEvent::FinalSegment("hello world".into())).0;
    assert_eq!(state.interim(), None);
    assert_eq!(state.lines().len(), 1);
    assert_eq!(state.lines()[0].offset_secs, 1);
    assert_eq!(state.lines()[0].text, "hello world");
}

#[test]
fn test_interim_text_never_enters_the_artifact() {
    let (mut state, _) = recording_session();

    state = state.apply(SessionEvent::FinalSegment("kept".into())).0;
    state = state.apply(SessionEvent::InterimSegment("dropped".into())).0;

    let (_, effects) = state.apply(SessionEvent::StopRequested);
    assert_eq!(upload_effect(&effects).transcript, "kept");
}

#[test]
fn test_duration_comes_from_tick_counter() {
    let (mut state, _) = recording_session();

    for _ in 0..5 {
        state = state.apply(SessionEvent::Tick).0;
    }

    let (_, effects) = state.apply(SessionEvent::StopRequested);
    assert_eq!(upload_effect(&effects).duration_secs, 5);
}

#[test]
fn test_audio_chunks_concatenate_in_order() {
    let (mut state, _) = recording_session();

    state = state.apply(SessionEvent::AudioChunk(vec![1, 2])).0;
    state = state.apply(SessionEvent::AudioChunk(vec![3])).0;
    state = state.apply(SessionEvent::AudioChunk(vec![4, 5])).0;

    let (_, effects) = state.apply(SessionEvent::StopRequested);
    assert_eq!(upload_effect(&effects).audio, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_permission_denied_returns_to_idle_with_permission_error() {
    let state = SessionState::new();
    let (state, _) = state.apply(SessionEvent::StartRequested);
    assert_eq!(state.phase(), SessionPhase::Armed);

    let (state, effects) = state.apply(SessionEvent::PermissionDenied);
    assert_eq!(state.phase(), SessionPhase::Idle);
    assert_eq!(
        effects,
        vec![SessionEffect::ReportError(SessionErrorKind::Permission)]
    );
}

#[test]
fn test_engine_failure_while_recording_aborts_and_clears_state() {
    let (mut state, _) = recording_session();

    state = state.apply(SessionEvent::Tick).0;
    state = state.apply(SessionEvent::FinalSegment("doomed".into())).0;
    state = state.apply(SessionEvent::AudioChunk(vec![9])).0;

    let (state, effects) = state.apply(SessionEvent::EngineFailed("mic unplugged".into()));
    assert_eq!(state.phase(), SessionPhase::Aborted);
    assert!(effects.contains(&SessionEffect::StopEngines));
    assert!(effects.contains(&SessionEffect::ReportError(SessionErrorKind::Recording)));

    // Nothing survives an abort
    assert_eq!(state.elapsed_secs(), 0);
    assert!(state.lines().is_empty());
    assert!(state.pending_upload().is_none());

    // A new session can be started from Aborted
    let (state, effects) = state.apply(SessionEvent::StartRequested);
    assert_eq!(state.phase(), SessionPhase::Armed);
    assert_eq!(effects, vec![SessionEffect::AcquireCapabilities]);
}

#[test]
fn test_failed_upload_keeps_artifact_for_retry() {
    let (mut state, _) = recording_session();
    state = state.apply(SessionEvent::FinalSegment("note".into())).0;

    let (state, effects) = state.apply(SessionEvent::StopRequested);
    let original = upload_effect(&effects).clone();

    let (state, effects) = state.apply(SessionEvent::UploadFailed);
    assert_eq!(
        effects,
        vec![SessionEffect::ReportError(SessionErrorKind::Network)]
    );
    assert_eq!(state.pending_upload(), Some(&original));

    // Retry re-issues the same artifact without re-recording
    let (state, effects) = state.apply(SessionEvent::RetryUpload);
    assert_eq!(upload_effect(&effects), &original);

    let (state, _) = state.apply(SessionEvent::UploadSucceeded {
        recording_id: "abc".into(),
    });
    assert_eq!(state.phase(), SessionPhase::Idle);
    assert!(state.pending_upload().is_none());
}

#[test]
fn test_new_session_resets_counters_after_success() {
    let (mut state, first_epoch) = recording_session();
    state = state.apply(SessionEvent::Tick).0;
    state = state.apply(SessionEvent::FinalSegment("old".into())).0;

    let (state, _) = state.apply(SessionEvent::StopRequested);
    let (state, _) = state.apply(SessionEvent::UploadSucceeded {
        recording_id: "r1".into(),
    });

    let (state, _) = state.apply(SessionEvent::StartRequested);
    let (state, effects) = state.apply(SessionEvent::PermissionGranted);

    assert_eq!(state.elapsed_secs(), 0);
    assert!(state.lines().is_empty());

    // The new recognition epoch supersedes everything from the first session
    let new_epoch = effects
        .iter()
        .find_map(|fx| match fx {
            SessionEffect::StartRecognition { epoch } => Some(*epoch),
            _ => None,
        })
        .unwrap();
    assert!(new_epoch > first_epoch);
}
