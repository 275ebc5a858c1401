//! Notification endpoints: paged listing, unread badge count, read marks.

use anyhow::Result;

use crate::models::{Notification, Page, PageRequest};

use super::client::ApiClient;

impl ApiClient {
    pub async fn notifications(&self, page: &PageRequest) -> Result<Page<Notification>> {
        self.get_json("/notifications", &page.to_query()).await
    }

    /// Count of unread notifications, for the navigation badge.
    pub async fn unread_notification_count(&self) -> Result<i64> {
        self.get_json("/notifications/unread-count", &[]).await
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<()> {
        self.patch_empty(&format!("/notifications/{}/read", id))
            .await
    }
}
