use postfeed_core::{CoreError, DatabaseConfig, DatabaseError, FeedFilter, Post, PostStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};


const POST_COLUMNS: &str =
    "SELECT id, title, author, link, content, subreddit, score, promoted, nsfw, created_utc FROM posts";

#[derive(Debug, FromRow)]
struct PostRow {
    id: String,
    title: String,
    author: String,
    link: Option<String>,
    content: Option<String>,
    subreddit: String,
    score: i64,
    promoted: bool,
    nsfw: bool,
    created_utc: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            link: row.link,
            content: row.content,
            subreddit: row.subreddit,
            score: row.score,
            promoted: row.promoted,
            nsfw: row.nsfw,
            created_utc: row.created_utc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database at `config.url` and applies migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, CoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        info!("Connected to database at {}", config.url);
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Private in-memory database. A single pinned connection keeps the data alive.
    pub async fn in_memory() -> Result<Self, CoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> Result<(), CoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::MigrationFailed {
                migration: e.to_string(),
            })?;
        debug!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &FeedFilter) {
    if let Some(subreddit) = &filter.subreddit {
        builder.push(" AND subreddit = ").push_bind(subreddit.clone());
    }
    if let Some(author) = &filter.author {
        builder.push(" AND author = ").push_bind(author.clone());
    }
    if let Some(nsfw) = filter.nsfw {
        builder.push(" AND nsfw = ").push_bind(nsfw);
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn map_insert_error(error: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return DatabaseError::ConstraintViolation {
                constraint: "posts.id".to_string(),
            };
        }
    }
    DatabaseError::Sql(error)
}

impl PostStore for Database {
    async fn create_post(&self, post: &Post) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO posts (id, title, author, link, content, subreddit, score, promoted, nsfw, created_utc)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.author)
        .bind(&post.link)
        .bind(&post.content)
        .bind(&post.subreddit)
        .bind(post.score)
        .bind(post.promoted)
        .bind(post.nsfw)
        .bind(post.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert post {}: {}", post.id, e);
            map_insert_error(e)
        })?;

        debug!("Inserted post {}", post.id);
        Ok(())
    }

    async fn get_ranked_posts(
        &self,
        offset: u64,
        limit: u64,
        filter: &FeedFilter,
    ) -> Result<Vec<Post>, CoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
        builder.push(" WHERE promoted = 0");
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY score DESC, created_utc DESC, id ASC LIMIT ")
            .push_bind(to_sql_int(limit))
            .push(" OFFSET ")
            .push_bind(to_sql_int(offset));

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch ranked posts: {}", e);
                DatabaseError::Sql(e)
            })?;

        debug!(
            "Fetched {} ranked posts (offset {}, limit {})",
            rows.len(),
            offset,
            limit
        );
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn get_promoted_posts(&self, count: usize) -> Result<Vec<Post>, CoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(POST_COLUMNS);
        builder
            .push(" WHERE promoted = 1 ORDER BY score DESC, id ASC LIMIT ")
            .push_bind(to_sql_int(count as u64));

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch promoted posts: {}", e);
                DatabaseError::Sql(e)
            })?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn get_total_posts_count(&self, filter: &FeedFilter) -> Result<u64, CoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts WHERE promoted = 0");
        push_filter(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to count posts: {}", e);
                DatabaseError::Sql(e)
            })?;

        let count = u64::try_from(count).map_err(|_| DatabaseError::QueryFailed {
            query: "count posts".to_string(),
        })?;
        Ok(count)
    }
}
