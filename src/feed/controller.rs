use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Page, PageRequest, Publication, DEFAULT_PAGE_SIZE};

use super::filter::{FeedFilter, FeedRoute};

#[derive(Debug, Default)]
struct FeedState {
    filter: FeedFilter,
    items: Vec<Publication>,
    /// Page index of the last successfully fetched page.
    page: u32,
    has_more: bool,
    loading: bool,
    /// Bumped on every filter change; responses from an older generation
    /// are discarded instead of populating state for the new filter.
    generation: u64,
    last_error: Option<String>,
}

/// Point-in-time copy of the feed state for rendering.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub items: Vec<Publication>,
    pub has_more: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// Paginated, filterable feed of publications.
///
/// One controller instance backs one feed view. State lives behind a mutex
/// that is never held across an await, so interleaved async calls (load-more
/// during a refresh, filter changes racing an in-flight fetch) stay safe.
pub struct FeedController {
    api: ApiClient,
    page_size: u32,
    state: Mutex<FeedState>,
}

impl FeedController {
    pub fn new(api: ApiClient, filter: FeedFilter) -> Self {
        Self {
            api,
            page_size: DEFAULT_PAGE_SIZE,
            state: Mutex::new(FeedState {
                filter,
                has_more: true,
                ..Default::default()
            }),
        }
    }

    /// Override the fixed page length (feeds use 10, notification-style
    /// listings 20).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.lock();
        FeedSnapshot {
            items: state.items.clone(),
            has_more: state.has_more,
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }

    pub fn filter(&self) -> FeedFilter {
        self.lock().filter.clone()
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Switch to a new filter. Prior items are discarded synchronously,
    /// before the page-0 fetch resolves, so no stale content from an
    /// unrelated filter is ever observable. Setting the current filter again
    /// is a no-op.
    pub async fn set_filter(&self, filter: FeedFilter) -> Result<()> {
        {
            let mut state = self.lock();
            if state.filter == filter {
                return Ok(());
            }
            state.filter = filter;
            state.generation = state.generation.wrapping_add(1);
            state.items.clear();
            state.page = 0;
            state.has_more = true;
            state.last_error = None;
        }
        self.fetch_page(0, true).await
    }

    /// Fetch the next page and append it. No-op while a fetch is in flight
    /// or when the server already signalled the last page.
    pub async fn load_more(&self) -> Result<()> {
        let next_page = {
            let state = self.lock();
            if state.loading || !state.has_more {
                return Ok(());
            }
            state.page + 1
        };
        self.fetch_page(next_page, false).await
    }

    /// Re-fetch page 0, replacing all items.
    pub async fn refresh(&self) -> Result<()> {
        self.fetch_page(0, true).await
    }

    async fn fetch_page(&self, page_index: u32, replace: bool) -> Result<()> {
        let (generation, filter) = {
            let mut state = self.lock();
            state.loading = true;
            (state.generation, state.filter.clone())
        };

        let route = filter.route();
        let mut request = PageRequest::new(page_index, self.page_size);
        if let Some(ref sort) = filter.sort {
            request = request.sorted_by(sort.clone());
        }

        let result = self.fetch_route(&route, &filter, &request).await;

        // A nonexistent tag is a tag with no posts, not a failure.
        let result = match result {
            Err(e) if matches!(route, FeedRoute::Tag(_)) && is_not_found(&e) => {
                debug!(?route, "Tag not found, normalizing to empty page");
                Ok(Page::empty(self.page_size))
            }
            other => other,
        };

        let mut state = self.lock();
        if state.generation != generation {
            // A filter change superseded this request; the newer fetch owns
            // the loading flag and the item collection.
            debug!(page_index, "Discarding superseded page response");
            return Ok(());
        }
        state.loading = false;

        match result {
            Ok(page) => {
                if replace || page_index == 0 {
                    state.items = page.content;
                } else {
                    state.items.extend(page.content);
                }
                state.page = page_index;
                state.has_more = !page.last;
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_route(
        &self,
        route: &FeedRoute,
        filter: &FeedFilter,
        request: &PageRequest,
    ) -> Result<Page<Publication>> {
        match route {
            FeedRoute::Tag(tag) => {
                self.api
                    .publications_by_tag(tag, request, filter.pub_type)
                    .await
            }
            FeedRoute::Saved => self.api.saved_publications(request).await,
            FeedRoute::Following => self.api.following_feed(request, filter.pub_type).await,
            FeedRoute::User(user_id) => {
                self.api
                    .publications_by_user(*user_id, request, filter.pub_type)
                    .await
            }
            FeedRoute::Global => self.api.publications(request, filter.pub_type).await,
        }
    }
}

fn is_not_found(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<ApiError>(), Some(ApiError::NotFound(_)))
}
