//! Fakes shared by the unit tests in this crate.

use postfeed_core::{CoreError, DatabaseError, FeedFilter, Post, PostStore, RandomSource};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn post(id: &str, score: i64) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {id}"),
        author: "t2_user123".to_string(),
        link: Some(format!("https://example.com/post{id}")),
        content: None,
        subreddit: "testsubreddit".to_string(),
        score,
        promoted: false,
        nsfw: false,
        created_utc: 1_700_000_000,
    }
}

/// `n` organic posts in ranked order: ids and scores run `n` down to `1`.
pub fn organic_posts(n: usize) -> Vec<Post> {
    (1..=n as i64).rev().map(|score| post(&score.to_string(), score)).collect()
}

pub fn promoted_post(id: &str) -> Post {
    Post {
        title: format!("Promoted {id}"),
        author: "t2_promoted".to_string(),
        subreddit: "testpromoted".to_string(),
        promoted: true,
        ..post(id, 0)
    }
}

/// Replays fixed draws for `gen_index`; byte requests are served from a counter.
pub struct SequenceRandom {
    draws: Mutex<VecDeque<usize>>,
    counter: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(draws: Vec<usize>) -> Self {
        Self {
            draws: Mutex::new(draws.into()),
            counter: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError> {
        for byte in dest.iter_mut() {
            *byte = self.counter.fetch_add(1, Ordering::Relaxed) as u8;
        }
        Ok(())
    }

    fn gen_index(&self, upper: usize) -> Result<usize, CoreError> {
        let next = self
            .draws
            .lock()
            .unwrap()
            .pop_front()
            .expect("SequenceRandom ran out of draws");
        assert!(next < upper, "draw {next} out of range 0..{upper}");
        Ok(next)
    }
}

pub struct FailingRandom;

impl RandomSource for FailingRandom {
    fn fill_bytes(&self, _dest: &mut [u8]) -> Result<(), CoreError> {
        Err(CoreError::Randomness {
            reason: "entropy source unavailable".to_string(),
        })
    }
}

#[derive(Default)]
pub struct Calls {
    pub ranked: AtomicUsize,
    pub promoted: AtomicUsize,
    pub count: AtomicUsize,
    pub create: AtomicUsize,
}

/// In-memory store with switchable failures for each collaborator call.
#[derive(Default)]
pub struct FakeStore {
    pub ranked: Vec<Post>,
    pub promoted: Vec<Post>,
    pub total: u64,
    pub fail_ranked: bool,
    pub fail_promoted: bool,
    pub fail_count: bool,
    pub fail_create: bool,
    pub created: Mutex<Vec<Post>>,
    pub last_filter: Mutex<Option<FeedFilter>>,
    pub last_promoted_count: Mutex<Option<usize>>,
    pub calls: Calls,
}

fn query_failed(query: &str) -> CoreError {
    CoreError::Database(DatabaseError::QueryFailed {
        query: query.to_string(),
    })
}

impl PostStore for FakeStore {
    async fn create_post(&self, post: &Post) -> Result<(), CoreError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(query_failed("insert post"));
        }
        let mut created = self.created.lock().unwrap();
        if created.iter().any(|p| p.id == post.id) {
            return Err(CoreError::Database(DatabaseError::ConstraintViolation {
                constraint: "posts.id".to_string(),
            }));
        }
        created.push(post.clone());
        Ok(())
    }

    async fn get_ranked_posts(
        &self,
        offset: u64,
        limit: u64,
        filter: &FeedFilter,
    ) -> Result<Vec<Post>, CoreError> {
        self.calls.ranked.fetch_add(1, Ordering::SeqCst);
        *self.last_filter.lock().unwrap() = Some(filter.clone());
        if self.fail_ranked {
            return Err(query_failed("ranked posts"));
        }
        Ok(self
            .ranked
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_promoted_posts(&self, count: usize) -> Result<Vec<Post>, CoreError> {
        self.calls.promoted.fetch_add(1, Ordering::SeqCst);
        *self.last_promoted_count.lock().unwrap() = Some(count);
        if self.fail_promoted {
            return Err(query_failed("promoted posts"));
        }
        Ok(self.promoted.iter().take(count).cloned().collect())
    }

    async fn get_total_posts_count(&self, _filter: &FeedFilter) -> Result<u64, CoreError> {
        self.calls.count.fetch_add(1, Ordering::SeqCst);
        if self.fail_count {
            return Err(query_failed("count posts"));
        }
        Ok(self.total)
    }
}
