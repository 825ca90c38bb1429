use chrono::Utc;
use postfeed_core::{AuthorConfig, CoreError, NewPost, Post, PostStore, RandomSource};
use std::sync::Arc;
use tracing::info;
use uuid::Builder;

/// Characters an anonymized author suffix is drawn from.
pub const AUTHOR_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub struct SubmissionService<S, R> {
    store: Arc<S>,
    rng: R,
    author: AuthorConfig,
}

impl<S, R> SubmissionService<S, R>
where
    S: PostStore,
    R: RandomSource,
{
    pub fn new(store: Arc<S>, rng: R, author: AuthorConfig) -> Self {
        Self { store, rng, author }
    }

    /// Assigns identity and author to an already validated post and stores it.
    /// Storage errors come back unchanged.
    pub async fn submit(&self, new_post: NewPost) -> Result<Post, CoreError> {
        let post = self.prepare(new_post)?;
        self.store.create_post(&post).await?;

        info!("Created post {} by {}", post.id, post.author);
        Ok(post)
    }

    pub fn prepare(&self, new_post: NewPost) -> Result<Post, CoreError> {
        let id = generate_post_id(&self.rng)?;
        let author = generate_author(&self.author.prefix, self.author.id_length, &self.rng)?;

        Ok(Post {
            id,
            title: new_post.title,
            author,
            link: new_post.link,
            content: new_post.content,
            subreddit: new_post.subreddit,
            score: 0,
            promoted: false,
            nsfw: new_post.nsfw,
            created_utc: Utc::now().timestamp(),
        })
    }
}

/// Random (v4) UUID built from bytes of `rng`.
pub fn generate_post_id<R: RandomSource + ?Sized>(rng: &R) -> Result<String, CoreError> {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes)?;
    Ok(Builder::from_random_bytes(bytes).into_uuid().to_string())
}

pub fn generate_author<R: RandomSource + ?Sized>(
    prefix: &str,
    length: usize,
    rng: &R,
) -> Result<String, CoreError> {
    let mut author = String::with_capacity(prefix.len() + length);
    author.push_str(prefix);
    for _ in 0..length {
        let index = rng.gen_index(AUTHOR_ALPHABET.len())?;
        author.push(AUTHOR_ALPHABET[index] as char);
    }
    Ok(author)
}
