//! User endpoints: profiles, follow graph, saved posts.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};

use crate::models::{Page, PageRequest, PublicUser, Publication, UpdateUser, UserDetails};

use super::client::{ApiClient, ImageUpload};

/// Page size when probing the follow list for a single user.
/// Matches the largest page the follow endpoints serve.
const FOLLOW_PROBE_PAGE_SIZE: u32 = 100;

impl ApiClient {
    /// Public profile by username.
    pub async fn user_by_username(&self, username: &str) -> Result<PublicUser> {
        self.get_json(&format!("/user/{}", username), &[]).await
    }

    /// Full profile by id, including follow counters.
    pub async fn user_details(&self, id: i64) -> Result<UserDetails> {
        self.get_json(&format!("/user/i/{}", id), &[]).await
    }

    /// Update a profile: JSON `data` part plus an optional `watermark` image.
    pub async fn update_user(
        &self,
        id: i64,
        patch: &UpdateUser,
        watermark: Option<&ImageUpload>,
    ) -> Result<UserDetails> {
        let url = self.url(&format!("/user/{}", id));
        let payload = serde_json::to_vec(patch).context("Failed to serialize user patch")?;

        let response = self
            .execute(
                |client| {
                    let mut form = Form::new().part(
                        "data",
                        Part::bytes(payload.clone()).mime_str("application/json")?,
                    );
                    if let Some(image) = watermark {
                        form = form.part(
                            "watermark",
                            Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
                        );
                    }
                    Ok(client.patch(&url).multipart(form))
                },
                true,
            )
            .await?;

        response
            .json()
            .await
            .context("Failed to parse user update response")
    }

    pub async fn upload_avatar(&self, image: &ImageUpload) -> Result<UserDetails> {
        let url = self.url("/user/avatar");
        let response = self
            .execute(
                |client| {
                    let form = Form::new().part(
                        "image",
                        Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
                    );
                    Ok(client.post(&url).multipart(form))
                },
                true,
            )
            .await?;

        response
            .json()
            .await
            .context("Failed to parse avatar upload response")
    }

    /// Follow or unfollow a user.
    pub async fn toggle_follow(&self, user_id: i64) -> Result<()> {
        self.post_empty(&format!("/user/{}/follow", user_id)).await
    }

    pub async fn following(&self, user_id: i64, page: &PageRequest) -> Result<Page<PublicUser>> {
        self.get_json(&format!("/user/{}/following", user_id), &page.to_query())
            .await
    }

    pub async fn followers(&self, user_id: i64, page: &PageRequest) -> Result<Page<PublicUser>> {
        self.get_json(&format!("/user/{}/followers", user_id), &page.to_query())
            .await
    }

    /// Client-side check: does `user_id` follow `target_user_id`?
    /// Scans the first follow-list page, which the server caps at 100.
    pub async fn is_following(&self, user_id: i64, target_user_id: i64) -> Result<bool> {
        let page = self
            .following(user_id, &PageRequest::new(0, FOLLOW_PROBE_PAGE_SIZE))
            .await?;
        Ok(page.content.iter().any(|u| u.user_id == target_user_id))
    }

    /// Save or unsave a publication for the current user.
    pub async fn toggle_save(&self, publication_id: i64) -> Result<()> {
        self.post_empty(&format!("/user/save/{}", publication_id))
            .await
    }

    pub async fn saved_publications(&self, page: &PageRequest) -> Result<Page<Publication>> {
        self.get_json("/user/saved", &page.to_query()).await
    }

    /// Toggle the account between its two roles (viewer/creator).
    pub async fn switch_role(&self) -> Result<()> {
        self.patch_empty("/user/switch-role").await
    }
}
