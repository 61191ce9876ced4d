//! Splits input text into addressable segments, preserving delimiters.
//!
//! Concatenating the returned segments always reconstructs the input exactly,
//! and no segment is ever empty. Pure and deterministic, so callers are free
//! to re-segment on every edit.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Controls where segment boundaries fall.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DelimiterMode {
    /// Runs of newlines become their own segments.
    Newline,
    /// Each `.` or `。` becomes its own one-character segment.
    Period,
    /// Runs of `.`, `。`, space, or newline become their own segments.
    #[default]
    PeriodNewline,
}

pub fn segment(text: &str, mode: DelimiterMode) -> Vec<&str> {
    match mode {
        DelimiterMode::Newline => split_runs(text, |c| c == '\n'),
        DelimiterMode::Period => split_each(text, |c| c == '.' || c == '。'),
        DelimiterMode::PeriodNewline => {
            split_runs(text, |c| matches!(c, '.' | '。' | ' ' | '\n'))
        }
    }
}

/// Alternates between text runs and delimiter runs, keeping both.
fn split_runs(text: &str, is_delimiter: impl Fn(char) -> bool) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_delimiter: Option<bool> = None;

    for (index, c) in text.char_indices() {
        let delimiter = is_delimiter(c);
        match in_delimiter {
            None => in_delimiter = Some(delimiter),
            Some(previous) if previous != delimiter => {
                segments.push(&text[start..index]);
                start = index;
                in_delimiter = Some(delimiter);
            }
            Some(_) => {}
        }
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}

/// Emits every delimiter character as its own segment, runs not collapsed.
fn split_each(text: &str, is_delimiter: impl Fn(char) -> bool) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for (index, c) in text.char_indices() {
        if is_delimiter(c) {
            if index > start {
                segments.push(&text[start..index]);
            }
            let end = index + c.len_utf8();
            segments.push(&text[index..end]);
            start = end;
        }
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn newline_mode_keeps_newline_runs() {
        assert_eq!(
            segment("a\n\nb", DelimiterMode::Newline),
            vec!["a", "\n\n", "b"]
        );
    }

    #[test]
    fn period_mode_emits_each_delimiter() {
        assert_eq!(
            segment("Hello. World.", DelimiterMode::Period),
            vec!["Hello", ".", " World", "."]
        );
    }

    #[test]
    fn period_mode_handles_fullwidth_stop() {
        assert_eq!(
            segment("こんにちは。世界", DelimiterMode::Period),
            vec!["こんにちは", "。", "世界"]
        );
    }

    #[test]
    fn period_newline_mode_collapses_delimiter_runs() {
        assert_eq!(
            segment("Hi. Bye\n", DelimiterMode::PeriodNewline),
            vec!["Hi", ". ", "Bye", "\n"]
        );
    }

    #[rstest]
    #[case("")]
    #[case("plain text with no delimiters")]
    #[case("Hello. World.")]
    #[case("a\n\nb\nc")]
    #[case("。。leading and trailing。。")]
    #[case("   ")]
    #[case("mixed. \n。 runs\n\n.end")]
    fn concatenation_reconstructs_input(#[case] text: &str) {
        for mode in [
            DelimiterMode::Newline,
            DelimiterMode::Period,
            DelimiterMode::PeriodNewline,
        ] {
            let segments = segment(text, mode);
            assert_eq!(segments.concat(), text, "mode {mode}");
            assert!(
                segments.iter().all(|s| !s.is_empty()),
                "empty segment in mode {mode}"
            );
        }
    }

    #[test]
    fn mode_round_trips_through_serde() {
        let json = serde_json::to_string(&DelimiterMode::PeriodNewline).unwrap();
        assert_eq!(json, "\"period_newline\"");
        let parsed: DelimiterMode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, DelimiterMode::PeriodNewline);
    }
}
