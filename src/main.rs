use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizvoice::voice::{match_transcript, ConsoleSynthesis, Emotion, SpeakOptions, SpeechOutput};
use quizvoice::{
    AchievementTracker, CapabilityDetector, Config, DiagnosticLog, KeyValueStore, MemoryStore,
    QuizClient, QuizStats, SynthesisEngine,
};

/// Voice interaction engine for a children's quiz application
#[derive(Parser)]
#[command(name = "quizvoice", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiz backend URL
    #[arg(long, env = "QUIZVOICE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report host capability support as JSON
    Check,
    /// Speak a line of text through the console voice
    Speak {
        /// Text to speak
        #[arg(default_value = "Hello! Ready for a quiz adventure?")]
        text: String,

        /// Emotion tag: excited, encouraging, gentle, celebration
        #[arg(short, long)]
        emotion: Option<Emotion>,
    },
    /// Resolve a spoken transcript against answer options
    Match {
        /// Transcript to resolve
        transcript: String,

        /// Answer options, in order (repeat for each choice)
        #[arg(required = true)]
        options: Vec<String>,
    },
    /// Play a quiz against the backend from the terminal
    Play {
        /// Quiz topic
        #[arg(short, long, default_value = "animals")]
        topic: String,

        /// Player name
        #[arg(short, long, default_value = "Explorer")]
        name: String,

        /// Player age
        #[arg(short, long, default_value = "8")]
        age: u8,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    match cli.command {
        Command::Check => check(),
        Command::Speak { text, emotion } => {
            speak(&config, &text, emotion);
            Ok(())
        }
        Command::Match { transcript, options } => {
            resolve(&transcript, &options);
            Ok(())
        }
        Command::Play { topic, name, age } => play(&config, &topic, &name, age).await,
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "quizvoice=info",
        1 => "quizvoice=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn check() -> anyhow::Result<()> {
    let log = DiagnosticLog::new();
    let detector = CapabilityDetector::new(log)
        .with_synthesis(Arc::new(ConsoleSynthesis::new()))
        .with_storage(Arc::new(MemoryStore::default()));

    let report = detector.run_all_checks();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn speak(config: &Config, text: &str, emotion: Option<Emotion>) {
    let log = DiagnosticLog::new();
    let engine: Arc<dyn SynthesisEngine> = Arc::new(ConsoleSynthesis::new());
    let mut output = SpeechOutput::new(Some(engine), log);

    if let Some(name) = &config.voice.preferred_voice {
        output.set_voice(name);
    }

    let options = emotion.map_or(
        SpeakOptions {
            rate: Some(config.voice.rate),
            pitch: Some(config.voice.pitch),
            emotion: None,
        },
        SpeakOptions::with_emotion,
    );
    output.speak(text, &options);
}

fn resolve(transcript: &str, options: &[String]) {
    match match_transcript(transcript, options) {
        Some(index) => {
            println!("matched option {}: {}", option_letter(index), options[index]);
        }
        None => println!("no match - ask again or pick an answer manually"),
    }
}

#[allow(clippy::cast_possible_truncation)]
async fn play(config: &Config, topic: &str, name: &str, age: u8) -> anyhow::Result<()> {
    let log = DiagnosticLog::new();
    let engine: Arc<dyn SynthesisEngine> = Arc::new(ConsoleSynthesis::new());
    let mut voice = SpeechOutput::new(config.voice.enabled.then_some(engine), log.clone());
    if let Some(preferred) = &config.voice.preferred_voice {
        voice.set_voice(preferred);
    }

    let client = QuizClient::new(&config.api.base_url);
    let profile = client
        .create_profile(name, age, std::slice::from_ref(&topic.to_string()))
        .await?;
    let session = client.generate_quiz(&profile.id, topic).await?;
    let total = session.questions.len() as u32;

    voice.speak(
        &format!("Welcome {name}! Let's learn about {topic}!"),
        &SpeakOptions::with_emotion(Emotion::Excited),
    );

    let mut correct = 0u32;
    let mut streak = 0u32;
    let mut best_streak = 0u32;

    for (number, question) in session.questions.iter().enumerate() {
        let options_text = question
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}: {option}", option_letter(i)))
            .collect::<Vec<_>>()
            .join(". ");
        voice.speak(
            &format!(
                "Question {}: {} Your options are: {options_text}",
                number + 1,
                question.question
            ),
            &SpeakOptions::default(),
        );

        let index = loop {
            let reply: String = dialoguer::Input::new()
                .with_prompt("Your answer (letter or words)")
                .interact_text()?;
            if let Some(index) = match_transcript(&reply, &question.options) {
                break index;
            }
            voice.speak(
                "I didn't understand that answer. Please try again or say a letter.",
                &SpeakOptions::default(),
            );
        };
        voice.speak(
            &format!("You chose {}: {}", option_letter(index), question.options[index]),
            &SpeakOptions::default(),
        );

        let outcome = client.submit_answer(&session.id, index).await?;
        if outcome.is_correct {
            correct += 1;
            streak += 1;
            best_streak = best_streak.max(streak);
            voice.speak_correct_answer(&outcome.explanation);
        } else {
            streak = 0;
            voice.speak_incorrect_answer(&outcome.explanation);
        }

        if outcome.is_quiz_complete {
            let final_score = outcome.final_score.unwrap_or(outcome.current_score);
            let total_questions = outcome.total_questions.unwrap_or(total);
            voice.speak_quiz_complete(final_score, total_questions);
        }
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
    let mut tracker = AchievementTracker::new(store, log);
    let stats = QuizStats {
        questions_correct: correct,
        questions_answered: total,
        best_streak,
        topics_completed: 1,
        quizzes_completed: 1,
        perfect_quizzes: u32::from(correct == total && total > 0),
    };
    for achievement in tracker.update(&stats) {
        println!(
            "Achievement unlocked: {} - {}",
            achievement.name, achievement.description
        );
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn option_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}
