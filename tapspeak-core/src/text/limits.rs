//! Character-budget validation against each provider's request limits.
//!
//! Lengths are counted in Unicode scalar values. Vertex additionally enforces
//! a per-sentence cap beneath its per-request cap, so text bound for that
//! backend gets a second, sentence-level check.

use crate::text::segment::DelimiterMode;
use crate::tts::error::TtsError;
use crate::tts::types::ProviderKind;

/// Maximum characters a single synthesis request may carry. Not
/// user-configurable.
pub const fn character_limit(kind: ProviderKind) -> usize {
    match kind {
        ProviderKind::OpenAi => 4096,
        ProviderKind::ElevenLabs => 5000,
        ProviderKind::Vertex => 500,
    }
}

pub fn is_within_limit(text: &str, kind: ProviderKind) -> bool {
    text.chars().count() <= character_limit(kind)
}

/// How limit checks are applied for a given delimiter mode.
///
/// Segment-level checks only make sense when segments are natural
/// request-sized units (lines or sentences). Under the combined delimiter the
/// text is typically sent as one request, so whole-text length governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    PerSegment,
    WholeText,
}

impl DelimiterMode {
    pub fn validation_mode(self) -> ValidationMode {
        match self {
            DelimiterMode::Newline | DelimiterMode::Period => ValidationMode::PerSegment,
            DelimiterMode::PeriodNewline => ValidationMode::WholeText,
        }
    }
}

/// Outcome of the vertex sentence sub-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceReport {
    pub is_valid: bool,
    pub invalid_sentence_count: usize,
    pub max_sentence_length: usize,
}

/// Splits `text` into sentence candidates on `.`/`。` and flags any sentence
/// longer than the vertex per-sentence cap.
pub fn validate_sentence_sub_limits(text: &str) -> SentenceReport {
    let limit = character_limit(ProviderKind::Vertex);
    let mut invalid_sentence_count = 0;
    let mut max_sentence_length = 0;

    for candidate in text.split(['.', '。']) {
        let sentence = candidate.trim();
        if sentence.is_empty() {
            continue;
        }
        let length = sentence.chars().count();
        max_sentence_length = max_sentence_length.max(length);
        if length > limit {
            invalid_sentence_count += 1;
        }
    }

    SentenceReport {
        is_valid: invalid_sentence_count == 0,
        invalid_sentence_count,
        max_sentence_length,
    }
}

/// Pre-flight check run before any network call; failures never reach a
/// provider.
pub fn check_speakable(
    text: &str,
    kind: ProviderKind,
    delimiter: DelimiterMode,
) -> Result<(), TtsError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TtsError::Validation("no text to speak".to_string()));
    }

    let limit = character_limit(kind);
    let length = trimmed.chars().count();
    if length > limit {
        return Err(TtsError::Validation(format!(
            "text is {length} characters, exceeding the {kind} limit of {limit} by {}",
            length - limit
        )));
    }

    if kind == ProviderKind::Vertex && delimiter.validation_mode() == ValidationMode::PerSegment {
        let report = validate_sentence_sub_limits(trimmed);
        if !report.is_valid {
            return Err(TtsError::Validation(format!(
                "{} sentence(s) exceed the vertex per-sentence limit of {limit} \
                 (longest is {} characters)",
                report.invalid_sentence_count, report.max_sentence_length
            )));
        }
    }

    Ok(())
}
