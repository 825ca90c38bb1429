use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("storage: {0}")]
    Database(#[from] DatabaseError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("rejected post: {0}")]
    Validation(#[from] ValidationError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("randomness source failed: {reason}")]
    Randomness { reason: String },

    #[error("gave up after {seconds}s")]
    Timeout { seconds: u64 },
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("could not open database: {reason}")]
    ConnectionFailed { reason: String },

    #[error("could not apply migrations: {migration}")]
    MigrationFailed { migration: String },

    #[error("query `{query}` failed")]
    QueryFailed { query: String },

    #[error("{constraint} already taken")]
    ConstraintViolation { constraint: String },

    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no config file at {path}")]
    FileNotFound { path: String },

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bad value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("{reason}")]
    ValidationFailed { reason: String },

    #[error("malformed TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reasons a submitted post is refused. The display text goes to the client as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("invalid link")]
    InvalidLink { link: String },

    #[error("a post cannot have both a link and content populated")]
    LinkAndContent,
}
