use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Everything collected about one account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<BTreeSet<String>>,
    /// Present for accounts analyzed as the main user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_user_replies: Option<Vec<String>>,
    /// follower -> matches, recomputed on every run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_replies: Option<BTreeMap<String, Vec<MatchEntry>>>,
    /// Present for accounts scraped as followers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<String>>,
    /// Keys this program does not know about, kept as they were.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl AccountRecord {
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Followers => self.followers.is_some(),
            Field::MainUserReplies => self.main_user_replies.is_some(),
            Field::SimilarReplies => self.similar_replies.is_some(),
            Field::Replies => self.replies.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub main_user_reply: String,
    pub follower_reply: String,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Followers,
    MainUserReplies,
    SimilarReplies,
    Replies,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            Field::Followers => "followers",
            Field::MainUserReplies => "main_user_replies",
            Field::SimilarReplies => "similar_replies",
            Field::Replies => "replies",
        };
        write!(f, "{}", key)
    }
}
