use crate::error::ValidationError;
use crate::types::NewPost;
use url::Url;

impl NewPost {
    /// Trims the title and link. Blank link/content count as absent.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.link = self
            .link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());
        self.content = self.content.filter(|content| !content.trim().is_empty());
        self
    }

    /// Structural checks a post must pass before it is submitted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if let Some(link) = &self.link {
            if !is_web_url(link) {
                return Err(ValidationError::InvalidLink { link: link.clone() });
            }
        }
        if self.link.is_some() && self.content.is_some() {
            return Err(ValidationError::LinkAndContent);
        }
        Ok(())
    }
}

fn is_web_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
