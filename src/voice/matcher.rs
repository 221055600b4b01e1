//! Spoken-answer resolution
//!
//! Maps a free-form transcript to one of the labeled quiz options. This is a
//! deliberate heuristic, not a language classifier: a letter rule runs first
//! (say "B" or "option B"), then a full-text containment scan. There is no
//! confidence score; an unresolved transcript is a normal outcome and the
//! caller should re-prompt or fall back to manual selection.

/// Letter tokens checked by the first rule, in option order A through D
const LETTER_TOKENS: [(&str, &str); 4] = [
    ("a", "option a"),
    ("b", "option b"),
    ("c", "option c"),
    ("d", "option d"),
];

/// Resolve a transcript against labeled options
///
/// Rules, first match wins:
///
/// 1. A standalone letter word ("a" through "d") or the phrase
///    "option a".."option d" picks that option. The bare-letter check
///    false-positives on any transcript containing the letter as a word
///    (the article "a" being the common offender); this is a known
///    weakness of the shipped behavior, kept as-is.
/// 2. Otherwise every option's full text is scanned for containment in the
///    transcript; the last matching option wins because the scan does not
///    short-circuit.
///
/// Returns `None` when no rule fires.
#[must_use]
pub fn match_transcript<S: AsRef<str>>(transcript: &str, options: &[S]) -> Option<usize> {
    let spoken = transcript.to_lowercase();

    for (index, (letter, option_phrase)) in
        LETTER_TOKENS.iter().enumerate().take(options.len())
    {
        if contains_word(&spoken, letter) || spoken.contains(option_phrase) {
            return Some(index);
        }
    }

    let mut matched = None;
    for (index, option) in options.iter().enumerate() {
        if spoken.contains(&option.as_ref().to_lowercase()) {
            matched = Some(index);
        }
    }
    matched
}

/// Whether `word` appears as a standalone alphanumeric token
fn contains_word(spoken: &str, word: &str) -> bool {
    spoken
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}
