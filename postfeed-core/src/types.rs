use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub subreddit: String,
    pub score: i64,
    pub promoted: bool,
    pub nsfw: bool,
    pub created_utc: i64,
}

/// Client-supplied part of a post, before an id and author are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub nsfw: bool,
}

/// Closed set of predicates the storage layer knows how to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    pub subreddit: Option<String>,
    pub author: Option<String>,
    pub nsfw: Option<bool>,
}

impl FeedFilter {
    /// Picks the recognized keys out of raw query parameters.
    /// Unknown keys are ignored, as is an `nsfw` value that isn't a boolean.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| {
            params
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            subreddit: non_empty("subreddit"),
            author: non_empty("author"),
            nsfw: params.get("nsfw").and_then(|value| value.trim().parse().ok()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subreddit.is_none() && self.author.is_none() && self.nsfw.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedRequest {
    pub offset: u64,
    pub limit: u64,
    pub filter: FeedFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub page: u64,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filter_from_params() {
        let filter = FeedFilter::from_params(&params(&[
            ("subreddit", "rust"),
            ("author", "  "),
            ("nsfw", "true"),
            ("offset", "10"),
            ("sort", "new"),
        ]));

        assert_eq!(
            filter,
            FeedFilter {
                subreddit: Some("rust".to_string()),
                author: None,
                nsfw: Some(true),
            }
        );
    }

    #[test]
    fn test_filter_ignores_malformed_nsfw() {
        let filter = FeedFilter::from_params(&params(&[("nsfw", "sometimes")]));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_feed_page_wire_format() {
        let page = FeedPage {
            posts: vec![Post {
                id: "1".to_string(),
                title: "Hello".to_string(),
                author: "t2_abc".to_string(),
                link: None,
                content: Some("body".to_string()),
                subreddit: "rust".to_string(),
                score: 3,
                promoted: false,
                nsfw: false,
                created_utc: 1_700_000_000,
            }],
            page: 1,
            total_pages: 4,
        };

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["page"], json!(1));
        assert_eq!(value["totalPages"], json!(4));
        assert!(value["posts"][0].get("link").is_none());
        assert_eq!(value["posts"][0]["content"], json!("body"));
    }

    #[test]
    fn test_new_post_defaults_optional_fields() {
        let new_post: NewPost = serde_json::from_str(r#"{"title": "Hello"}"#).unwrap();
        assert_eq!(new_post.title, "Hello");
        assert_eq!(new_post.link, None);
        assert_eq!(new_post.subreddit, "");
        assert!(!new_post.nsfw);
    }
}
