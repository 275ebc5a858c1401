use serde::{Deserialize, Serialize};

/// Default page size for feed listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of a server-side paginated collection.
///
/// Mirrors the server's page envelope: `content` holds the items in
/// server-provided order, `last` signals the final page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> Page<T> {
    /// An empty final page. Used to normalize "no such tag" into a valid
    /// zero-item result rather than an error.
    pub fn empty(size: u32) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size,
            number: 0,
            first: true,
            last: true,
        }
    }

    pub fn has_more(&self) -> bool {
        !self.last
    }
}

/// Pagination parameters for listing requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<String>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    /// Query parameters in the form the API expects: `page`, `size`, and a
    /// repeated `sort` parameter per sort entry.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        for sort in &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        params
    }
}
