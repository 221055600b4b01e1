//! Achievement tracking
//!
//! Gamification layer: six fixed achievements unlocked by quiz progress.
//! State is cached as JSON in the host key-value store so progress survives
//! reloads; a missing or failing store only costs the cache, never the
//! session.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::capability::KeyValueStore;
use crate::diagnostics::DiagnosticLog;

/// Storage key for cached achievement state
const CACHE_KEY: &str = "quiz_achievements";

/// Category for achievement log entries
const CATEGORY: &str = "ACHIEVEMENT";

/// How rare an achievement is, for display emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// One achievement with its unlock progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// What to do to unlock it
    pub description: String,
    /// Display rarity
    pub rarity: Rarity,
    /// Progress toward the unlock threshold
    pub progress: u32,
    /// Unlock threshold
    pub max_progress: u32,
    /// Whether the achievement has been earned
    pub unlocked: bool,
}

/// Counters the tracker evaluates achievements against
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizStats {
    /// Questions answered correctly, lifetime
    pub questions_correct: u32,
    /// Questions answered, lifetime
    pub questions_answered: u32,
    /// Longest run of consecutive correct answers
    pub best_streak: u32,
    /// Distinct topics with a completed quiz
    pub topics_completed: u32,
    /// Quizzes finished
    pub quizzes_completed: u32,
    /// Quizzes finished with a perfect score
    pub perfect_quizzes: u32,
}

/// Tracks achievement progress and caches it in the key-value store
pub struct AchievementTracker {
    store: Arc<dyn KeyValueStore>,
    achievements: Vec<Achievement>,
    log: DiagnosticLog,
}

impl AchievementTracker {
    /// Create a tracker, restoring cached state when present
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, log: DiagnosticLog) -> Self {
        let achievements = load_cached(store.as_ref()).unwrap_or_else(default_achievements);
        Self {
            store,
            achievements,
            log,
        }
    }

    /// Re-evaluate all achievements against the given counters
    ///
    /// Returns the achievements that flipped to unlocked in this call and
    /// writes the updated state back to the cache.
    pub fn update(&mut self, stats: &QuizStats) -> Vec<Achievement> {
        let mut newly_unlocked = Vec::new();

        for achievement in &mut self.achievements {
            let progress = match achievement.id.as_str() {
                "first_quiz" => stats.quizzes_completed.min(1),
                "perfect_score" => stats.perfect_quizzes.min(1),
                "streak_master" => stats.best_streak.min(3),
                "topic_explorer" => stats.topics_completed.min(3),
                "learning_champion" => stats.quizzes_completed.min(5),
                "knowledge_seeker" => stats.questions_correct.min(50),
                _ => achievement.progress,
            };

            achievement.progress = progress.max(achievement.progress);
            let unlocked = achievement.progress >= achievement.max_progress;

            if unlocked && !achievement.unlocked {
                achievement.unlocked = true;
                self.log.info(
                    CATEGORY,
                    &format!("unlocked: {} ({})", achievement.name, achievement.id),
                );
                newly_unlocked.push(achievement.clone());
            }
        }

        self.save();
        newly_unlocked
    }

    /// All achievements with current progress
    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Number of earned achievements
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    fn save(&self) {
        let json = match serde_json::to_string(&self.achievements) {
            Ok(json) => json,
            Err(e) => {
                self.log.warn(CATEGORY, &format!("failed to encode cache: {e}"));
                return;
            }
        };
        if let Err(e) = self.store.set(CACHE_KEY, &json) {
            self.log.warn(CATEGORY, &format!("failed to write cache: {e}"));
        }
    }
}

fn load_cached(store: &dyn KeyValueStore) -> Option<Vec<Achievement>> {
    let json = store.get(CACHE_KEY).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

fn default_achievements() -> Vec<Achievement> {
    let achievement = |id: &str, name: &str, description: &str, rarity, max_progress| {
        Achievement {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            rarity,
            progress: 0,
            max_progress,
            unlocked: false,
        }
    };

    vec![
        achievement(
            "first_quiz",
            "Quiz Explorer",
            "Complete your first quiz!",
            Rarity::Common,
            1,
        ),
        achievement(
            "perfect_score",
            "Perfect Star",
            "Get 100% on a quiz!",
            Rarity::Epic,
            1,
        ),
        achievement(
            "streak_master",
            "Streak Master",
            "Answer 3 questions correctly in a row!",
            Rarity::Rare,
            3,
        ),
        achievement(
            "topic_explorer",
            "Topic Explorer",
            "Complete quizzes on 3 different topics!",
            Rarity::Rare,
            3,
        ),
        achievement(
            "learning_champion",
            "Learning Champion",
            "Complete 5 quizzes!",
            Rarity::Epic,
            5,
        ),
        achievement(
            "knowledge_seeker",
            "Knowledge Seeker",
            "Answer 50 questions correctly!",
            Rarity::Legendary,
            50,
        ),
    ]
}
