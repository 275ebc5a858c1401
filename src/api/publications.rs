//! Publication endpoints: listings, CRUD, and the heart toggle.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::models::{
    CreatePublication, Page, PageRequest, Publication, PublicationPatch, PublicationType,
};

use super::client::{ApiClient, ImageUpload};

#[derive(Debug, Deserialize)]
struct PublicationCreated {
    id: i64,
}

impl ApiClient {
    fn listing_query(
        page: &PageRequest,
        pub_type: Option<PublicationType>,
    ) -> Vec<(String, String)> {
        let mut query = page.to_query();
        if let Some(pub_type) = pub_type {
            query.push(("pubType".to_string(), pub_type.as_str().to_string()));
        }
        query
    }

    /// Global feed.
    pub async fn publications(
        &self,
        page: &PageRequest,
        pub_type: Option<PublicationType>,
    ) -> Result<Page<Publication>> {
        self.get_json("/publication", &Self::listing_query(page, pub_type))
            .await
    }

    /// Posts from followed authors only.
    pub async fn following_feed(
        &self,
        page: &PageRequest,
        pub_type: Option<PublicationType>,
    ) -> Result<Page<Publication>> {
        self.get_json("/publication/following", &Self::listing_query(page, pub_type))
            .await
    }

    pub async fn publications_by_user(
        &self,
        user_id: i64,
        page: &PageRequest,
        pub_type: Option<PublicationType>,
    ) -> Result<Page<Publication>> {
        self.get_json(
            &format!("/publication/user/{}", user_id),
            &Self::listing_query(page, pub_type),
        )
        .await
    }

    pub async fn publications_by_tag(
        &self,
        tag: &str,
        page: &PageRequest,
        pub_type: Option<PublicationType>,
    ) -> Result<Page<Publication>> {
        self.get_json(
            &format!("/publication/tag/{}", tag),
            &Self::listing_query(page, pub_type),
        )
        .await
    }

    pub async fn publication(&self, id: i64) -> Result<Publication> {
        self.get_json(&format!("/publication/{}", id), &[]).await
    }

    /// Create a publication: JSON `data` part plus optional `images` parts.
    ///
    /// The creation response only carries a summary, so the full record is
    /// fetched afterwards.
    pub async fn create_publication(
        &self,
        draft: &CreatePublication,
        images: &[ImageUpload],
    ) -> Result<Publication> {
        let url = self.url("/publication");
        let payload = serde_json::to_vec(draft).context("Failed to serialize publication draft")?;

        let response = self
            .execute(
                |client| {
                    let mut form = Form::new().part(
                        "data",
                        Part::bytes(payload.clone()).mime_str("application/json")?,
                    );
                    for image in images {
                        let mut part = Part::bytes(image.bytes.clone())
                            .file_name(image.file_name.clone());
                        if let Some(ref mime) = image.mime {
                            part = part.mime_str(mime)?;
                        }
                        form = form.part("images", part);
                    }
                    Ok(client.post(&url).multipart(form))
                },
                true,
            )
            .await?;

        let created: PublicationCreated = response
            .json()
            .await
            .context("Failed to parse publication creation response")?;
        debug!(id = created.id, "Publication created");

        self.publication(created.id).await
    }

    pub async fn update_publication(
        &self,
        id: i64,
        patch: &PublicationPatch,
    ) -> Result<Publication> {
        self.patch_json(&format!("/publication/{}", id), patch).await
    }

    pub async fn delete_publication(&self, id: i64) -> Result<()> {
        self.delete(&format!("/publication/{}", id)).await
    }

    /// Give or take back a heart on a publication.
    pub async fn toggle_heart(&self, id: i64) -> Result<()> {
        self.post_empty(&format!("/publication/{}/heart", id)).await
    }

    pub async fn delete_tag(&self, id: i64) -> Result<()> {
        self.delete(&format!("/tag/{}", id)).await
    }
}
