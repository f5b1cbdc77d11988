use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::validation::{ValidationError, TITLE_MAX_CHARS};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    /// Host part of the bookmarked URL, used for display and favicons.
    pub fn hostname(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(String::from))
    }
}

/// Form / API body for a bookmark that doesn't exist yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
}

impl NewBookmark {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Checks title first, then url, and reports only the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title_len = self.title.chars().count();
        if title_len == 0 {
            return Err(ValidationError::TitleRequired);
        }
        if title_len > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong);
        }

        match Url::parse(&self.url) {
            Ok(url)
                if matches!(url.scheme(), "http" | "https")
                    && url.host_str().is_some_and(|host| !host.is_empty()) =>
            {
                Ok(())
            }
            _ => Err(ValidationError::InvalidUrl),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn accepts_valid_input() {
        assert_eq!(NewBookmark::new("Example", "https://example.com").validate(), Ok(()));
        assert_eq!(
            NewBookmark::new("x".repeat(100), "http://localhost:8080/a?b=c").validate(),
            Ok(())
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            NewBookmark::new("", "https://example.com").validate(),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            NewBookmark::new("x".repeat(101), "https://example.com").validate(),
            Err(ValidationError::TitleTooLong)
        );
        assert_eq!(
            NewBookmark::new("Example", "not a url").validate(),
            Err(ValidationError::InvalidUrl)
        );
        assert_eq!(
            NewBookmark::new("Example", "mailto:someone@example.com").validate(),
            Err(ValidationError::InvalidUrl)
        );
        // Parses and has a host, but would run script when clicked
        assert_eq!(
            NewBookmark::new("Example", "javascript://example.com/%0Aalert(document.cookie)")
                .validate(),
            Err(ValidationError::InvalidUrl)
        );
        assert_eq!(
            NewBookmark::new("Example", "ftp://example.com/file").validate(),
            Err(ValidationError::InvalidUrl)
        );
    }

    #[test]
    fn title_length_counts_characters() {
        // 100 multi-byte characters is still within the limit
        assert_eq!(
            NewBookmark::new("é".repeat(100), "https://example.com").validate(),
            Ok(())
        );
    }

    #[test]
    fn hostname() {
        let bookmark = Bookmark {
            id: String::from("1"),
            title: String::from("Example"),
            url: String::from("https://example.com/some/path"),
            user_id: String::from("u"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        assert_eq!(bookmark.hostname().as_deref(), Some("example.com"));
    }
}
