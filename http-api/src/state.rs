use feed_service::{FeedAssembler, FeedSettings, SubmissionService};
use postfeed_core::{AppConfig, CoreError, OsRandom, PostStore};
use std::sync::Arc;
use std::time::Duration;

/// Shared by every handler. Built once at startup; nothing in it mutates.
pub struct AppState<S> {
    pub feed: FeedAssembler<S, OsRandom>,
    pub submissions: SubmissionService<S, OsRandom>,
    pub request_timeout: Duration,
}

impl<S: PostStore> AppState<S> {
    /// Fails on a config that `AppConfig::validate` rejects, so a hand-built
    /// config cannot slip past the checks a loaded one gets.
    pub fn new(store: Arc<S>, config: &AppConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let settings = FeedSettings::from_config(config)?;
        Ok(Self {
            feed: FeedAssembler::new(store.clone(), OsRandom, settings),
            submissions: SubmissionService::new(store, OsRandom, config.author.clone()),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        })
    }

    pub fn items_per_page(&self) -> u64 {
        self.feed.settings().items_per_page
    }
}
