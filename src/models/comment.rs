use serde::{Deserialize, Serialize};

use super::publication::Author;

/// A comment on a publication. Replies nest one level per entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author: Author,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub text: String,
    /// Present when replying to an existing comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_replies_nest() {
        let json = r#"{
            "id": 1,
            "text": "lovely light",
            "author": {"userId": 2, "username": "noa"},
            "createdAt": "2026-07-01T10:00:00Z",
            "replies": [
                {"id": 2, "text": "agreed", "author": {"userId": 3, "username": "kim"}, "replies": []}
            ]
        }"#;
        let comment: Comment = serde_json::from_str(json).expect("parse comment");
        assert_eq!(comment.replies.len(), 1);
        assert_eq!(comment.replies[0].author.username, "kim");
    }
}
