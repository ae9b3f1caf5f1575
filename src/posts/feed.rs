//! Feed filtering and search.

use crate::types::{CategoryFilter, Post};

/// What the feed is currently showing.
#[derive(Clone, Debug, Default)]
pub struct FeedQuery {
    pub category: CategoryFilter,
    /// Free-text search; blank matches everything.
    pub search: String,
}

impl FeedQuery {
    pub fn is_filtered(&self) -> bool {
        self.category != CategoryFilter::All || !self.search.trim().is_empty()
    }

    pub fn matches(&self, post: &Post) -> bool {
        if !self.category.matches(post.category) {
            return false;
        }

        // Blank means no search; otherwise the text is matched as typed.
        if self.search.trim().is_empty() {
            return true;
        }
        let query = self.search.to_lowercase();
        post.activity.to_lowercase().contains(&query)
            || post.user_name.to_lowercase().contains(&query)
            || post.category.as_str().contains(&query)
    }
}

/// Apply `query` to `posts`, keeping their order.
pub fn filter_posts<'a>(posts: &'a [Post], query: &FeedQuery) -> Vec<&'a Post> {
    posts.iter().filter(|p| query.matches(p)).collect()
}
