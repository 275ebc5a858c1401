use serde::{Deserialize, Serialize};

/// Kind of creative work a publication carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationType {
    Photography,
    Illustration,
    Text,
}

impl PublicationType {
    /// Wire value used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::Photography => "PHOTOGRAPHY",
            PublicationType::Illustration => "ILLUSTRATION",
            PublicationType::Text => "TEXT",
        }
    }
}

impl std::fmt::Display for PublicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized author snapshot embedded in publications and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Geotag attached to a publication, keyed by OpenStreetMap id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub osm_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub author: Author,
    #[serde(default)]
    pub hearts_count: i64,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub liked_by_me: Option<bool>,
    #[serde(default)]
    pub saved_by_me: Option<bool>,
    #[serde(default)]
    pub moderated: Option<bool>,
    #[serde(default)]
    pub content_warning: bool,
    #[serde(default)]
    pub machine_generated: bool,
    #[serde(default)]
    pub manually_verified: Option<bool>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub place: Option<Place>,
    pub pub_type: PublicationType,
}

/// Payload for creating a publication. Sent as the JSON part of a multipart
/// request; image bytes travel in sibling parts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content_warning: bool,
    pub machine_generated: bool,
    pub pub_type: PublicationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osm_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osm_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_clean_image: Option<bool>,
}

/// Partial update for an existing publication.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_warning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_generated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
