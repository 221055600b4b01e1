//! Voice subsystem integration tests
//!
//! Exercises the controllers against scripted engines, without a real audio
//! or microphone stack.

use std::sync::Arc;

use quizvoice::voice::{
    match_transcript, Emotion, RecognitionFailure, ScriptedOutcome, ScriptedRecognition,
    SessionConfig, SpeakOptions, SpeechInput, SpeechOutput, SynthesisCall,
};
use quizvoice::{CapabilityDetector, KeyValueStore, LogLevel, MemoryStore};

mod common;

use common::{capturing_engine, test_log, voice, EventRecorder};

#[test]
fn test_speak_cancels_before_every_dispatch() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak("first question", &SpeakOptions::default());
    output.speak("second question", &SpeakOptions::default());

    let calls = engine.calls();
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[0], SynthesisCall::Cancel));
    assert!(matches!(calls[1], SynthesisCall::Speak(_)));
    assert!(matches!(calls[2], SynthesisCall::Cancel));
    assert!(matches!(calls[3], SynthesisCall::Speak(_)));
}

#[test]
fn test_symbols_never_reach_the_engine() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak(
        "Great job! \u{1F389}\u{1F31F} You earned a star \u{2B50}",
        &SpeakOptions::default(),
    );

    let utterances = engine.utterances();
    assert_eq!(utterances.len(), 1);
    let text = &utterances[0].text;
    assert!(!text.contains('\u{1F389}'));
    assert!(!text.contains('\u{1F31F}'));
    assert!(!text.contains('\u{2B50}'));
    assert!(text.contains("Great job!"));
}

#[test]
fn test_default_prosody() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak("hello", &SpeakOptions::default());

    let utterance = &engine.utterances()[0];
    assert!((utterance.rate - 0.9).abs() < f32::EPSILON);
    assert!((utterance.pitch - 1.1).abs() < f32::EPSILON);
    assert!((utterance.volume - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_correct_answer_uses_celebration_prosody() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak_correct_answer("Dogs really do dream!");

    let utterance = &engine.utterances()[0];
    assert!(utterance.text.starts_with("Correct! Dogs really do dream!"));
    assert!((utterance.rate - 1.0).abs() < f32::EPSILON);
    assert!((utterance.pitch - 1.4).abs() < f32::EPSILON);
}

#[test]
fn test_incorrect_answer_wording() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak_incorrect_answer("Cats sleep a lot.");

    let utterance = &engine.utterances()[0];
    assert!(utterance.text.starts_with("That's okay! Cats sleep a lot."));
    assert!(utterance.text.contains("Keep trying, you're learning so much!"));
}

#[test]
fn test_quiz_complete_tiers() {
    let cases = [
        (4, 4, "Perfect score!"),
        (8, 10, "Excellent work!"),
        (3, 4, "Great job!"),
        (2, 4, "Good effort!"),
    ];

    for (score, total, prefix) in cases {
        let engine = capturing_engine();
        let output = SpeechOutput::new(Some(engine.clone()), test_log());
        output.speak_quiz_complete(score, total);

        let utterance = &engine.utterances()[0];
        assert!(
            utterance.text.starts_with(prefix),
            "({score}/{total}) expected tier {prefix:?}, spoke {:?}",
            utterance.text
        );
    }
}

#[test]
fn test_caller_overrides_beat_emotion_prosody() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak(
        "slow celebration",
        &SpeakOptions {
            rate: Some(0.5),
            pitch: None,
            emotion: Some(Emotion::Celebration),
        },
    );

    let utterance = &engine.utterances()[0];
    assert!((utterance.rate - 0.5).abs() < f32::EPSILON);
    assert!((utterance.pitch - 1.4).abs() < f32::EPSILON);
}

#[test]
fn test_encouragement_phrase_appended_deterministically() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log()).with_rng_seed(7);
    output.speak("Nice try!", &SpeakOptions::with_emotion(Emotion::Encouraging));

    let other_engine = capturing_engine();
    let other = SpeechOutput::new(Some(other_engine.clone()), test_log()).with_rng_seed(7);
    other.speak("Nice try!", &SpeakOptions::with_emotion(Emotion::Encouraging));

    let first = &engine.utterances()[0].text;
    let second = &other_engine.utterances()[0].text;
    assert_eq!(first, second);
    assert!(first.len() > "Nice try! ".len(), "phrase should be appended");
}

#[test]
fn test_gentle_emotion_gets_no_encouragement_phrase() {
    let engine = capturing_engine();
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak("Take your time.", &SpeakOptions::with_emotion(Emotion::Gentle));

    assert_eq!(engine.utterances()[0].text, "Take your time.");
}

#[test]
fn test_voice_selection_prefers_hinted_voice() {
    let engine = capturing_engine(); // Daniel, Samantha, Alex
    let output = SpeechOutput::new(Some(engine), test_log());

    assert_eq!(output.selected_voice().unwrap().name, "Samantha");
}

#[test]
fn test_set_voice_requires_exact_name() {
    let engine = capturing_engine();
    let mut output = SpeechOutput::new(Some(engine), test_log());

    output.set_voice("Alex");
    assert_eq!(output.selected_voice().unwrap().name, "Alex");

    // Unknown name is a no-op
    output.set_voice("Nonexistent");
    assert_eq!(output.selected_voice().unwrap().name, "Alex");
}

#[test]
fn test_missing_engine_fails_soft() {
    let log = test_log();
    let output = SpeechOutput::new(None, log.clone());

    assert!(!output.is_supported());
    output.speak("hello", &SpeakOptions::default());
    output.stop();

    let errors: Vec<_> = log
        .snapshot()
        .into_iter()
        .filter(|entry| entry.level == LogLevel::Error)
        .collect();
    assert!(!errors.is_empty());
}

#[test]
fn test_empty_voice_catalog_fails_soft() {
    let engine = Arc::new(quizvoice::voice::CapturingSynthesis::with_voices(vec![]));
    let output = SpeechOutput::new(Some(engine.clone()), test_log());

    output.speak("hello", &SpeakOptions::default());

    assert!(engine.utterances().is_empty());
}

#[test]
fn test_dispatch_failure_is_swallowed_and_logged() {
    let engine = capturing_engine();
    engine.set_failing(true);
    let log = test_log();
    let output = SpeechOutput::new(Some(engine), log.clone());

    output.speak("hello", &SpeakOptions::default());

    assert!(log
        .snapshot()
        .iter()
        .any(|entry| entry.level == LogLevel::Error
            && entry.message.contains("speech dispatch failed")));
}

#[test]
fn test_listening_session_delivers_one_transcript() {
    let engine = Arc::new(ScriptedRecognition::immediate(ScriptedOutcome::Transcript(
        "I think it's B".to_string(),
    )));
    let input = SpeechInput::new(Some(engine), test_log());
    let recorder = EventRecorder::new();

    let on_start = recorder.clone();
    input.on_start(move || on_start.push("start"));
    let on_result = recorder.clone();
    input.on_result(move |transcript| on_result.push(format!("result:{transcript}")));
    let on_end = recorder.clone();
    input.on_end(move || on_end.push("end"));

    assert!(input.start_listening());

    assert_eq!(
        recorder.events(),
        vec!["start", "result:I think it's B", "end"]
    );
    assert!(!input.is_listening());
    assert_eq!(input.transcript().as_deref(), Some("I think it's B"));
}

#[test]
fn test_second_start_rejected_while_listening() {
    let engine = Arc::new(ScriptedRecognition::held(ScriptedOutcome::Transcript(
        "bird".to_string(),
    )));
    let input = SpeechInput::new(Some(engine.clone()), test_log());

    assert!(input.start_listening());
    assert!(input.is_listening());

    // Second start is a guarded no-op; the engine never sees it
    assert!(!input.start_listening());
    assert_eq!(engine.start_count(), 1);

    // After the session ends a new one may begin
    input.stop_listening();
    assert!(!input.is_listening());
    assert!(input.start_listening());
    assert_eq!(engine.start_count(), 2);
}

#[test]
fn test_stop_finalizes_with_result() {
    let engine = Arc::new(ScriptedRecognition::held(ScriptedOutcome::Transcript(
        "fish".to_string(),
    )));
    let input = SpeechInput::new(Some(engine), test_log());
    let recorder = EventRecorder::new();
    let on_result = recorder.clone();
    input.on_result(move |transcript| on_result.push(format!("result:{transcript}")));

    assert!(input.start_listening());
    input.stop_listening();

    assert_eq!(recorder.events(), vec!["result:fish"]);
    assert_eq!(input.transcript().as_deref(), Some("fish"));
    assert!(!input.is_listening());
}

#[test]
fn test_abort_discards_partial_result() {
    let engine = Arc::new(ScriptedRecognition::held(ScriptedOutcome::Transcript(
        "fish".to_string(),
    )));
    let input = SpeechInput::new(Some(engine), test_log());
    let recorder = EventRecorder::new();
    let on_result = recorder.clone();
    input.on_result(move |transcript| on_result.push(format!("result:{transcript}")));
    let on_end = recorder.clone();
    input.on_end(move || on_end.push("end"));

    assert!(input.start_listening());
    input.abort_listening();

    assert_eq!(recorder.events(), vec!["end"]);
    assert!(input.transcript().is_none());
    assert!(!input.is_listening());
}

#[test]
fn test_capture_failure_reports_human_readable_reason() {
    let engine = Arc::new(ScriptedRecognition::immediate(ScriptedOutcome::Failure(
        RecognitionFailure::NoSpeech,
    )));
    let input = SpeechInput::new(Some(engine), test_log());
    let recorder = EventRecorder::new();
    let on_error = recorder.clone();
    input.on_error(move |reason| on_error.push(format!("error:{reason}")));

    assert!(input.start_listening());

    assert_eq!(
        recorder.events(),
        vec!["error:No speech was detected. Please try again."]
    );
    assert!(!input.is_listening());
}

#[test]
fn test_unsupported_host_fails_fast() {
    let input = SpeechInput::new(None, test_log());
    let recorder = EventRecorder::new();
    let on_error = recorder.clone();
    input.on_error(move |reason| on_error.push(reason.to_string()));

    assert!(!input.is_supported());
    assert!(!input.start_listening());

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].contains("not supported"));
}

#[test]
fn test_stop_and_abort_idle_are_noops() {
    let engine = Arc::new(ScriptedRecognition::held(ScriptedOutcome::Transcript(
        "cat".to_string(),
    )));
    let input = SpeechInput::new(Some(engine.clone()), test_log());

    input.stop_listening();
    input.abort_listening();
    assert_eq!(engine.start_count(), 0);
}

#[test]
fn test_session_config_language() {
    let input = SpeechInput::new(None, test_log()).with_config(SessionConfig {
        language: "en-GB".to_string(),
        continuous: true,
    });
    assert_eq!(input.config().language, "en-GB");
    assert!(input.config().continuous);
}

#[test]
fn test_matcher_spec_cases() {
    let options = ["Cat", "Dog", "Bird", "Fish"];

    assert_eq!(match_transcript("I think it's B", &options), Some(1));
    assert_eq!(match_transcript("I choose bird", &options), Some(2));
    assert_eq!(match_transcript("maybe", &options), None);
}

#[test]
fn test_detector_with_voice_engines() {
    let log = test_log();
    let detector = CapabilityDetector::new(log)
        .with_synthesis(capturing_engine())
        .with_recognition(Arc::new(ScriptedRecognition::immediate(
            ScriptedOutcome::Transcript(String::new()),
        )))
        .with_storage(Arc::new(MemoryStore::default()))
        .with_touch_points(2);

    let report = detector.run_all_checks();
    assert!(report.speech_synthesis);
    assert!(report.speech_recognition);
    assert!(report.local_storage);
    assert!(report.touch_support);
}

#[test]
fn test_failing_probe_leaves_no_key_behind() {
    // Store that rejects writes but records every key it ever saw
    #[derive(Default)]
    struct RejectingStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for RejectingStore {
        fn set(&self, _key: &str, _value: &str) -> quizvoice::Result<()> {
            Err(quizvoice::Error::Storage("quota exceeded".to_string()))
        }

        fn get(&self, key: &str) -> quizvoice::Result<Option<String>> {
            self.inner.get(key)
        }

        fn remove(&self, key: &str) -> quizvoice::Result<()> {
            self.inner.remove(key)
        }
    }

    let store = Arc::new(RejectingStore::default());
    let detector = CapabilityDetector::new(test_log()).with_storage(store.clone());

    assert!(!detector.check_local_storage());
    assert!(store.inner.is_empty());
}

#[test]
fn test_voice_refresh_reselects() {
    let engine = Arc::new(quizvoice::voice::CapturingSynthesis::with_voices(vec![
        voice("Daniel", "en-GB"),
    ]));
    let mut output = SpeechOutput::new(Some(engine), test_log());
    assert_eq!(output.selected_voice().unwrap().name, "Daniel");

    // Catalog unchanged; refresh keeps the fallback selection stable
    output.refresh_voices();
    assert_eq!(output.selected_voice().unwrap().name, "Daniel");
}
