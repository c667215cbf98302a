//! Prompt composition for the summarizer.

use std::borrow::Cow;

/// The summarization instruction sent as the system message, without the file's
/// surrounding whitespace.
pub const SYSTEM_PROMPT: &str = include_str!("./prompts/system_0.txt").trim_ascii();

/// User-message prefix when the caller did not supply a custom prompt.
pub const DEFAULT_USER_PROMPT: &str = "Generate a summary for the following transcript and topic.";

const TOPIC_LABEL: &str = "Topic: ";
const TRANSCRIPT_LABEL: &str = "\nTranscript: ";

/// Composes the user message: `template`, then the topic line, then the transcript line.
///
/// No escaping is applied; both `topic` and `transcript` appear verbatim.
pub fn compile(template: &str, transcript: &str, topic: &str) -> String {
    format!("{template}{TOPIC_LABEL}{topic}{TRANSCRIPT_LABEL}{transcript}")
}

/// Shortens `transcript` from the end until the compiled prompt fits in `max_chars`.
///
/// The template and topic are kept whole. A cut lands on the last whitespace before the
/// limit when there is one, so words are not split.
pub fn fit_transcript<'a>(
    template: &str,
    topic: &str,
    transcript: &'a str,
    max_chars: usize,
) -> Cow<'a, str> {
    let overhead = template.chars().count()
        + TOPIC_LABEL.len()
        + topic.chars().count()
        + TRANSCRIPT_LABEL.len();
    let available = max_chars.saturating_sub(overhead);

    let Some((cut, _)) = transcript.char_indices().nth(available) else {
        return Cow::Borrowed(transcript);
    };

    let kept = &transcript[..cut];
    let kept = match kept.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => kept[..idx].trim_end(),
        _ => kept,
    };

    tracing::warn!(
        original_chars = transcript.chars().count(),
        kept_chars = kept.chars().count(),
        "Truncated transcript to fit the prompt budget"
    );

    Cow::Owned(kept.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_custom_prompt() {
        assert_eq!(
            compile("Answer strictly: ", "chop onions", "cooking"),
            "Answer strictly: Topic: cooking\nTranscript: chop onions"
        );
    }

    #[test]
    fn compiles_default_prompt_with_multiple_topics() {
        let prompt = compile(DEFAULT_USER_PROMPT, "we braise", "cooking, french cuisine");
        assert_eq!(
            prompt,
            "Generate a summary for the following transcript and topic.Topic: cooking, french cuisine\nTranscript: we braise"
        );
    }

    #[test]
    fn topic_precedes_transcript_for_any_content() {
        let cases = [
            ("", "", ""),
            ("T: ", "", "topic"),
            ("", "transcript", ""),
            ("x", "Topic: fake\nTranscript: nested", "Transcript: odd"),
            ("pre", "emoji 🍳 text", "ünïcödé"),
        ];

        for (template, transcript, topic) in cases {
            let prompt = compile(template, transcript, topic);
            let topic_at = prompt
                .find(&format!("Topic: {topic}\n"))
                .expect("topic line present");
            let transcript_at = prompt
                .rfind(transcript)
                .expect("transcript present");
            assert!(topic_at <= transcript_at, "{prompt:?}");
            assert!(prompt.starts_with(template));
            assert!(prompt.ends_with(transcript));
        }
    }

    #[test]
    fn system_prompt_has_no_trailing_newline() {
        assert!(!SYSTEM_PROMPT.is_empty());
        assert_eq!(SYSTEM_PROMPT, SYSTEM_PROMPT.trim());
        assert!(SYSTEM_PROMPT.ends_with("transcript\"."));
    }

    #[test]
    fn compilation_is_deterministic() {
        let a = compile("Summarize: ", "some transcript", "rust");
        let b = compile("Summarize: ", "some transcript", "rust");
        assert_eq!(a, b);
    }

    #[test]
    fn fit_keeps_short_transcripts_borrowed() {
        let fitted = fit_transcript("p", "t", "short transcript", 1_000);
        assert!(matches!(fitted, Cow::Borrowed("short transcript")));
    }

    #[test]
    fn fit_truncates_from_the_end_on_word_boundary() {
        let template = "Summarize: ";
        let topic = "knives";
        let transcript = "alpha beta gamma delta epsilon";
        let overhead = compile(template, "", topic).chars().count();

        let fitted = fit_transcript(template, topic, transcript, overhead + 13);
        assert_eq!(fitted, "alpha beta");

        let prompt = compile(template, &fitted, topic);
        assert!(prompt.chars().count() <= overhead + 13);
        assert!(prompt.starts_with("Summarize: Topic: knives\nTranscript: "));
    }

    #[test]
    fn fit_respects_char_boundaries() {
        let transcript = "ééééééééé";
        let overhead = compile("", "", "").chars().count();

        let fitted = fit_transcript("", "", transcript, overhead + 4);
        assert_eq!(fitted, "éééé");
    }

    #[test]
    fn fit_with_no_room_left_yields_empty_transcript() {
        let fitted = fit_transcript("a long template", "topic", "words here", 3);
        assert_eq!(fitted, "");
    }
}
