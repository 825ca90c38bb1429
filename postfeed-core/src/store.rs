use crate::error::CoreError;
use crate::types::{FeedFilter, Post};
use std::future::Future;

/// Persistence operations the feed and submission services rely on.
///
/// Futures are `Send` so services built on a store can run inside
/// multi-threaded request handlers.
pub trait PostStore: Send + Sync + 'static {
    /// Inserts a new post. Fails instead of overwriting when the id is taken.
    fn create_post(&self, post: &Post) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Organic posts only, highest score first, windowed by `offset`/`limit`.
    fn get_ranked_posts(
        &self,
        offset: u64,
        limit: u64,
        filter: &FeedFilter,
    ) -> impl Future<Output = Result<Vec<Post>, CoreError>> + Send;

    /// Up to `count` promoted posts. May return fewer.
    fn get_promoted_posts(
        &self,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Post>, CoreError>> + Send;

    /// Number of organic posts matching `filter`, ignoring pagination.
    fn get_total_posts_count(
        &self,
        filter: &FeedFilter,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;
}
