use lazy_static::lazy_static;
use regex::Regex;

/// Every account handle starts with this character.
pub const ACCOUNT_MARKER: char = '@';

pub const DEFAULT_MIN_REPLY_LENGTH: usize = 10;

lazy_static! {
    static ref BARE_MENTION: Regex = Regex::new(r"^@\S+$").unwrap();
}

/// Check whether a rendered text is worth keeping as a reply.
///
/// The text is trimmed first. Length is counted in characters, not bytes, so
/// replies in non-Latin scripts are not penalized.
pub fn is_reply_text(text: &str, min_length: usize) -> bool {
    let text = text.trim();
    !text.is_empty() && text.chars().count() >= min_length && !BARE_MENTION.is_match(text)
}

/// Check whether a rendered text denotes an account handle, e.g. `@someone`.
pub fn is_account_handle(text: &str) -> bool {
    text.starts_with(ACCOUNT_MARKER)
}
