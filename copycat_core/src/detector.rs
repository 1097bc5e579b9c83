use itertools::iproduct;
use std::collections::BTreeMap;

use copycat_util::similarity;

use crate::model::MatchEntry;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Find follower replies scoring strictly above `threshold` against any main user reply.
///
/// Matches keep discovery order: follower, then follower reply, then main reply.
/// Followers without a match are left out.
pub fn detect(
    main_replies: &[String],
    all_replies: &BTreeMap<String, Vec<String>>,
    threshold: f64,
) -> BTreeMap<String, Vec<MatchEntry>> {
    let mut similar_replies: BTreeMap<String, Vec<MatchEntry>> = BTreeMap::new();

    for (follower, replies) in all_replies {
        for (reply, main_reply) in iproduct!(replies, main_replies) {
            let score = similarity(main_reply, reply);
            if score > threshold {
                similar_replies.entry(follower.clone()).or_default().push(MatchEntry {
                    main_user_reply: main_reply.clone(),
                    follower_reply: reply.clone(),
                    similarity_score: score,
                });
            }
        }
    }

    similar_replies
}
