use crate::pagination::{page_number, total_pages};
use crate::placement::{apply_placements, plan_placements};
use postfeed_core::{
    AdPositionMap, AppConfig, CoreError, ErrorExt, FeedPage, FeedRequest, Post, PostStore,
    RandomSource,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-process feed settings, taken from configuration once at startup.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub ads_enabled: bool,
    pub min_organic_count_for_ads: usize,
    pub ad_positions: AdPositionMap,
    pub items_per_page: u64,
}

impl FeedSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        Ok(Self {
            ads_enabled: config.ads.enabled,
            min_organic_count_for_ads: config.ads.min_organic_count,
            ad_positions: config.ads.position_map()?,
            items_per_page: config.feed.items_per_page,
        })
    }
}

pub struct FeedAssembler<S, R> {
    store: Arc<S>,
    rng: R,
    settings: FeedSettings,
}

impl<S, R> FeedAssembler<S, R>
where
    S: PostStore,
    R: RandomSource,
{
    pub fn new(store: Arc<S>, rng: R, settings: FeedSettings) -> Self {
        Self {
            store,
            rng,
            settings,
        }
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Builds one feed page: ranked organic posts, promoted posts where the
    /// position map allows, and pagination metadata.
    ///
    /// Ranked-post and count failures fail the request. A failed promoted
    /// fetch only costs the ads.
    pub async fn assemble(&self, request: &FeedRequest) -> Result<FeedPage, CoreError> {
        let organic = self
            .store
            .get_ranked_posts(request.offset, request.limit, &request.filter)
            .await?;

        let wants_ads = self.settings.ads_enabled
            && !self.settings.ad_positions.is_empty()
            && organic.len() >= self.settings.min_organic_count_for_ads;

        let (promoted, total_count) = tokio::join!(
            self.fetch_promoted(wants_ads),
            self.store.get_total_posts_count(&request.filter)
        );
        let total_count = total_count?;

        let plan = match plan_placements(
            &organic,
            promoted.len(),
            &self.settings.ad_positions,
            &self.rng,
        ) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Skipping promoted posts, placement failed: {}", e);
                Vec::new()
            }
        };
        debug!(
            "Placing {} promoted posts into {} organic posts",
            plan.len(),
            organic.len()
        );
        let posts = apply_placements(organic, &promoted, &plan)?;

        Ok(FeedPage {
            posts,
            page: page_number(request.offset, self.settings.items_per_page),
            total_pages: total_pages(total_count, request.limit),
        })
    }

    async fn fetch_promoted(&self, wanted: bool) -> Vec<Post> {
        if !wanted {
            return Vec::new();
        }

        match self
            .store
            .get_promoted_posts(self.settings.ad_positions.len())
            .await
        {
            Ok(promoted) => promoted,
            Err(e) => {
                e.log_warn();
                warn!("Promoted posts unavailable, serving feed without ads");
                Vec::new()
            }
        }
    }
}
