//! Quiz backend client
//!
//! Typed wrapper over the external quiz-generation service. Quiz content is
//! owned by the backend; this crate only consumes the text fields (questions,
//! options, explanations, scores) to turn them into spoken output.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A child's quiz profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Server-assigned identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Age in years, used to tune question difficulty
    pub age: u8,
    /// Topics the child likes
    #[serde(default)]
    pub interests: Vec<String>,
}

/// One multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Question text
    pub question: String,
    /// Labeled options, typically four (A through D)
    pub options: Vec<String>,
    /// Index of the correct option
    pub correct_answer: usize,
    /// Kid-friendly explanation, spoken as feedback
    pub explanation: String,
}

/// State of one quiz run
#[derive(Debug, Clone, Deserialize)]
pub struct QuizSession {
    /// Server-assigned session identifier
    pub id: String,
    /// Quiz topic
    #[serde(default)]
    pub topic: String,
    /// All questions in order
    pub questions: Vec<Question>,
    /// Index of the next unanswered question
    #[serde(default)]
    pub current_question: usize,
    /// Correct answers so far
    #[serde(default)]
    pub score: u32,
}

/// Result of submitting one answer
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    /// Whether the submitted answer was correct
    pub is_correct: bool,
    /// Explanation to speak as feedback
    pub explanation: String,
    /// Score after this answer
    pub current_score: u32,
    /// Whether this was the last question
    pub is_quiz_complete: bool,
    /// Final score, present only when the quiz completed
    pub final_score: Option<u32>,
    /// Question count, present only when the quiz completed
    pub total_questions: Option<u32>,
}

#[derive(Deserialize)]
struct ProfileResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    profile: Option<Profile>,
}

#[derive(Deserialize)]
struct QuizPayload {
    questions: Vec<Question>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    session_id: String,
    quiz: Option<QuizPayload>,
}

#[derive(Deserialize)]
struct AnswerResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    is_correct: bool,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    current_score: u32,
    #[serde(default)]
    is_quiz_complete: bool,
    #[serde(default)]
    final_score: Option<u32>,
    #[serde(default)]
    total_questions: Option<u32>,
}

#[derive(Deserialize)]
struct SessionResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    session: Option<QuizSession>,
}

/// HTTP client for the quiz backend
pub struct QuizClient {
    client: reqwest::Client,
    base_url: String,
}

impl QuizClient {
    /// Create a client for a backend base URL (e.g. `http://localhost:5000`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a profile for a child
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it
    pub async fn create_profile(
        &self,
        name: &str,
        age: u8,
        interests: &[String],
    ) -> Result<Profile> {
        #[derive(Serialize)]
        struct ProfileRequest<'a> {
            name: &'a str,
            age: u8,
            interests: &'a [String],
        }

        let response = self
            .client
            .post(format!("{}/api/profile", self.base_url))
            .json(&ProfileRequest { name, age, interests })
            .send()
            .await?;
        let response = check_status(response, "create profile").await?;

        let body: ProfileResponse = response.json().await?;
        if !body.success {
            return Err(api_error("create profile", body.error));
        }
        body.profile
            .ok_or_else(|| Error::Api("create profile returned no profile".to_string()))
    }

    /// Generate a quiz on a topic for a profile
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it
    pub async fn generate_quiz(&self, profile_id: &str, topic: &str) -> Result<QuizSession> {
        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            profile_id: &'a str,
            topic: &'a str,
        }

        tracing::debug!(topic, "requesting quiz generation");

        let response = self
            .client
            .post(format!("{}/api/quiz/generate", self.base_url))
            .json(&GenerateRequest { profile_id, topic })
            .send()
            .await?;
        let response = check_status(response, "generate quiz").await?;

        let body: GenerateResponse = response.json().await?;
        if !body.success {
            return Err(api_error("generate quiz", body.error));
        }
        let quiz = body
            .quiz
            .ok_or_else(|| Error::Api("generate quiz returned no questions".to_string()))?;

        tracing::info!(
            session_id = %body.session_id,
            questions = quiz.questions.len(),
            "quiz generated"
        );

        Ok(QuizSession {
            id: body.session_id,
            topic: topic.to_string(),
            questions: quiz.questions,
            current_question: 0,
            score: 0,
        })
    }

    /// Submit the answer index for the current question of a session
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it
    pub async fn submit_answer(
        &self,
        session_id: &str,
        answer_index: usize,
    ) -> Result<AnswerOutcome> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            session_id: &'a str,
            answer_index: usize,
        }

        let response = self
            .client
            .post(format!("{}/api/quiz/answer", self.base_url))
            .json(&AnswerRequest { session_id, answer_index })
            .send()
            .await?;
        let response = check_status(response, "submit answer").await?;

        let body: AnswerResponse = response.json().await?;
        if !body.success {
            return Err(api_error("submit answer", body.error));
        }

        Ok(AnswerOutcome {
            is_correct: body.is_correct,
            explanation: body.explanation,
            current_score: body.current_score,
            is_quiz_complete: body.is_quiz_complete,
            final_score: body.final_score,
            total_questions: body.total_questions,
        })
    }

    /// Fetch the current state of a session
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the session does not exist
    pub async fn get_session(&self, session_id: &str) -> Result<QuizSession> {
        let response = self
            .client
            .get(format!("{}/api/quiz/session/{session_id}", self.base_url))
            .send()
            .await?;
        let response = check_status(response, "get session").await?;

        let body: SessionResponse = response.json().await?;
        if !body.success {
            return Err(api_error("get session", body.error));
        }
        body.session
            .ok_or_else(|| Error::Api("get session returned no session".to_string()))
    }

    /// Base URL this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Map a non-2xx response to an API error carrying status and body
async fn check_status(response: reqwest::Response, endpoint: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::error!(endpoint, status = %status, body = %body, "quiz API error");
    Err(Error::Api(format!("{endpoint} failed with status {status}: {body}")))
}

fn api_error(endpoint: &str, error: Option<String>) -> Error {
    Error::Api(format!(
        "{endpoint} failed: {}",
        error.unwrap_or_else(|| "unknown backend error".to_string())
    ))
}
