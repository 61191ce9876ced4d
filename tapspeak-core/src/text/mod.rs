pub mod limits;
pub mod segment;

pub use limits::{character_limit, is_within_limit, validate_sentence_sub_limits, SentenceReport};
pub use segment::{segment, DelimiterMode};
