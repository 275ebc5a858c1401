use serde::{Deserialize, Serialize};

use super::user::PublicUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    CommentOnPost,
    ReplyToComment,
    HeartOnPost,
    ContentModerated,
    Welcome,
    NewFollower,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub recipient: PublicUser,
    /// Who performed the action that produced this notification.
    pub actor: PublicUser,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Id of the related post or user.
    pub reference_id: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub read: bool,
}
