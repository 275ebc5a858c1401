use crate::models::PublicationType;

/// Selects which backing listing a paginated feed view queries.
///
/// Fields combine freely; `route()` resolves the single listing to use at a
/// fixed precedence when several are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub pub_type: Option<PublicationType>,
    pub user_id: Option<i64>,
    pub only_following: bool,
    pub only_saved: bool,
    pub tag: Option<String>,
    pub sort: Option<String>,
}

/// The resolved backing listing for a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRoute {
    Tag(String),
    Saved,
    Following,
    User(i64),
    Global,
}

impl FeedFilter {
    /// Resolve the backing listing. Precedence when several selectors are
    /// set: tag > saved > following > user > global.
    pub fn route(&self) -> FeedRoute {
        if let Some(ref tag) = self.tag {
            FeedRoute::Tag(tag.clone())
        } else if self.only_saved {
            FeedRoute::Saved
        } else if self.only_following {
            FeedRoute::Following
        } else if let Some(user_id) = self.user_id {
            FeedRoute::User(user_id)
        } else {
            FeedRoute::Global
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_routes_to_global() {
        assert_eq!(FeedFilter::default().route(), FeedRoute::Global);
    }

    #[test]
    fn test_route_precedence() {
        let everything = FeedFilter {
            pub_type: Some(PublicationType::Photography),
            user_id: Some(7),
            only_following: true,
            only_saved: true,
            tag: Some("ink".to_string()),
            sort: None,
        };
        assert_eq!(everything.route(), FeedRoute::Tag("ink".to_string()));

        let no_tag = FeedFilter {
            tag: None,
            ..everything.clone()
        };
        assert_eq!(no_tag.route(), FeedRoute::Saved);

        let no_saved = FeedFilter {
            only_saved: false,
            ..no_tag.clone()
        };
        assert_eq!(no_saved.route(), FeedRoute::Following);

        let no_following = FeedFilter {
            only_following: false,
            ..no_saved.clone()
        };
        assert_eq!(no_following.route(), FeedRoute::User(7));
    }
}
