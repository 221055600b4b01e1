//! Quiz flow integration tests
//!
//! Covers the backend wire types, achievement tracking across sessions, and
//! the shared diagnostic log.

use std::sync::Arc;

use quizvoice::voice::match_transcript;
use quizvoice::{
    Achievement, AchievementTracker, DiagnosticLog, KeyValueStore, LogLevel, MemoryStore, Profile,
    Question, QuizSession, QuizStats, Rarity,
};

mod common;

use common::test_log;

#[test]
fn test_profile_deserializes_backend_shape() {
    let profile: Profile = serde_json::from_str(
        r#"{
            "id": "p-42",
            "name": "Maya",
            "age": 8,
            "interests": ["animals", "space"]
        }"#,
    )
    .unwrap();

    assert_eq!(profile.id, "p-42");
    assert_eq!(profile.name, "Maya");
    assert_eq!(profile.age, 8);
    assert_eq!(profile.interests, vec!["animals", "space"]);
}

#[test]
fn test_profile_interests_default_empty() {
    let profile: Profile =
        serde_json::from_str(r#"{"id": "p-1", "name": "Sam", "age": 7}"#).unwrap();
    assert!(profile.interests.is_empty());
}

#[test]
fn test_question_deserializes_backend_shape() {
    let question: Question = serde_json::from_str(
        r#"{
            "question": "Which animal sleeps the most?",
            "options": ["Cat", "Dog", "Koala", "Horse"],
            "correct_answer": 2,
            "explanation": "Koalas sleep up to 22 hours a day!"
        }"#,
    )
    .unwrap();

    assert_eq!(question.options.len(), 4);
    assert_eq!(question.correct_answer, 2);
    assert!(question.explanation.contains("Koalas"));
}

#[test]
fn test_session_defaults_for_fresh_quiz() {
    let session: QuizSession = serde_json::from_str(
        r#"{
            "id": "s-7",
            "questions": [
                {
                    "question": "What do bees make?",
                    "options": ["Honey", "Milk", "Bread", "Juice"],
                    "correct_answer": 0,
                    "explanation": "Bees turn nectar into honey."
                }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(session.id, "s-7");
    assert_eq!(session.current_question, 0);
    assert_eq!(session.score, 0);
    assert!(session.topic.is_empty());
}

#[test]
fn test_spoken_answers_resolve_against_question_options() {
    let question: Question = serde_json::from_str(
        r#"{
            "question": "Which animal can fly?",
            "options": ["Cat", "Dog", "Bird", "Fish"],
            "correct_answer": 2,
            "explanation": "Birds have wings."
        }"#,
    )
    .unwrap();

    let resolved = match_transcript("I choose bird", &question.options).unwrap();
    assert_eq!(resolved, question.correct_answer);
}

#[test]
fn test_achievements_accumulate_across_quizzes() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::default());
    let log = test_log();

    // First session: one finished quiz
    let mut tracker = AchievementTracker::new(store.clone(), log.clone());
    let first = tracker.update(&QuizStats {
        questions_correct: 3,
        questions_answered: 4,
        best_streak: 2,
        topics_completed: 1,
        quizzes_completed: 1,
        perfect_quizzes: 0,
    });
    assert_eq!(unlocked_ids(&first), vec!["first_quiz"]);

    // Later session restores from the store and keeps earlier unlocks
    let mut tracker = AchievementTracker::new(store, log);
    let later = tracker.update(&QuizStats {
        questions_correct: 12,
        questions_answered: 20,
        best_streak: 5,
        topics_completed: 3,
        quizzes_completed: 5,
        perfect_quizzes: 1,
    });

    let ids = unlocked_ids(&later);
    assert!(!ids.contains(&"first_quiz"), "already unlocked earlier");
    assert!(ids.contains(&"perfect_score"));
    assert!(ids.contains(&"streak_master"));
    assert!(ids.contains(&"topic_explorer"));
    assert!(ids.contains(&"learning_champion"));
    assert_eq!(tracker.unlocked_count(), 5);
}

#[test]
fn test_achievement_progress_never_regresses() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::default());
    let mut tracker = AchievementTracker::new(store, test_log());

    tracker.update(&QuizStats {
        questions_correct: 30,
        ..QuizStats::default()
    });
    tracker.update(&QuizStats {
        questions_correct: 10,
        ..QuizStats::default()
    });

    let seeker = tracker
        .achievements()
        .iter()
        .find(|a| a.id == "knowledge_seeker")
        .unwrap();
    assert_eq!(seeker.progress, 30);
    assert!(!seeker.unlocked);
}

#[test]
fn test_achievement_catalog() {
    let tracker = AchievementTracker::new(Arc::new(MemoryStore::default()), test_log());

    assert_eq!(tracker.achievements().len(), 6);
    assert_eq!(tracker.unlocked_count(), 0);

    let seeker = tracker
        .achievements()
        .iter()
        .find(|a| a.id == "knowledge_seeker")
        .unwrap();
    assert_eq!(seeker.rarity, Rarity::Legendary);
    assert_eq!(seeker.max_progress, 50);
}

#[test]
fn test_achievement_cache_is_plain_json() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::default());
    let mut tracker = AchievementTracker::new(store.clone(), test_log());
    tracker.update(&QuizStats::default());

    let cached = store.get("quiz_achievements").unwrap().unwrap();
    let parsed: Vec<Achievement> = serde_json::from_str(&cached).unwrap();
    assert_eq!(parsed.len(), 6);
}

#[test]
fn test_diagnostic_log_shared_across_components() {
    let log = DiagnosticLog::new();
    let mut tracker = AchievementTracker::new(Arc::new(MemoryStore::default()), log.clone());

    tracker.update(&QuizStats {
        quizzes_completed: 1,
        ..QuizStats::default()
    });

    assert!(log
        .snapshot()
        .iter()
        .any(|entry| entry.category == "ACHIEVEMENT"
            && entry.level == LogLevel::Info
            && entry.message.contains("first_quiz")));
}

#[test]
fn test_diagnostic_log_stays_bounded_over_long_sessions() {
    let log = DiagnosticLog::new();
    for i in 0..500 {
        log.voice_event(&format!("utterance {i}"));
    }

    assert_eq!(log.len(), log.capacity());
    let entries = log.snapshot();
    assert_eq!(entries.first().unwrap().message, "utterance 400");
    assert_eq!(entries.last().unwrap().message, "utterance 499");
}

fn unlocked_ids(unlocked: &[Achievement]) -> Vec<&str> {
    unlocked.iter().map(|a| a.id.as_str()).collect()
}
