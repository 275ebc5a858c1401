//! Comment endpoints, scoped under their publication.

use anyhow::Result;

use crate::models::{Comment, CreateComment};

use super::client::ApiClient;

impl ApiClient {
    pub async fn comments(&self, publication_id: i64) -> Result<Vec<Comment>> {
        self.get_json(&format!("/publication/{}/comment", publication_id), &[])
            .await
    }

    pub async fn create_comment(
        &self,
        publication_id: i64,
        comment: &CreateComment,
    ) -> Result<Comment> {
        self.post_json(&format!("/publication/{}/comment", publication_id), comment)
            .await
    }

    pub async fn delete_comment(&self, publication_id: i64, comment_id: i64) -> Result<()> {
        self.delete(&format!(
            "/publication/{}/comment/{}",
            publication_id, comment_id
        ))
        .await
    }
}
