pub mod parsing;
pub mod similarity;

pub use parsing::{is_account_handle, is_reply_text, ACCOUNT_MARKER, DEFAULT_MIN_REPLY_LENGTH};
pub use similarity::{matching_blocks, similarity, MatchingBlock};
