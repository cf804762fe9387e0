use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visibility of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "post_type", rename_all = "UPPERCASE")]
pub enum PostType {
    Public,
    Private,
}

/// Lifecycle of a post. Only inactive posts may be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "post_status", rename_all = "UPPERCASE")]
pub enum PostStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub post_type: PostType,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Public and active posts are readable without credentials.
    pub fn is_public_active(&self) -> bool {
        self.post_type == PostType::Public && self.status == PostStatus::Active
    }

    pub fn is_inactive(&self) -> bool {
        self.status == PostStatus::Inactive
    }

    pub(crate) fn apply(&mut self, changes: &PostChanges, now: DateTime<Utc>) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(content) = &changes.content {
            self.content = content.clone();
        }
        if let Some(post_type) = changes.post_type {
            self.post_type = post_type;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub post_type: PostType,
    pub status: PostStatus,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub post_type: Option<PostType>,
    pub status: Option<PostStatus>,
}

/// Which posts a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    PublicActive,
    All,
}

impl Visibility {
    pub fn admits(&self, post: &Post) -> bool {
        match self {
            Visibility::PublicActive => post.is_public_active(),
            Visibility::All => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostFilter {
    pub visibility: Visibility,
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
}

impl PostFilter {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        if !self.visibility.admits(post) {
            return false;
        }
        match &self.title {
            Some(term) => post.title.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(post_type: PostType, status: PostStatus, title: &str) -> Post {
        Post {
            id: 1,
            title: title.into(),
            content: "body".into(),
            author_id: 1,
            post_type,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_public_active_is_world_readable() {
        assert!(post(PostType::Public, PostStatus::Active, "t").is_public_active());
        assert!(!post(PostType::Public, PostStatus::Inactive, "t").is_public_active());
        assert!(!post(PostType::Private, PostStatus::Active, "t").is_public_active());
        assert!(!post(PostType::Private, PostStatus::Inactive, "t").is_public_active());
    }

    #[test]
    fn filter_title_match_ignores_case() {
        let filter = PostFilter::new(Visibility::All).with_title("RUST");
        assert!(filter.matches(&post(PostType::Private, PostStatus::Inactive, "Learning rust")));
        assert!(!filter.matches(&post(PostType::Public, PostStatus::Active, "Go basics")));
    }

    #[test]
    fn public_filter_rejects_hidden_posts() {
        let filter = PostFilter::new(Visibility::PublicActive).with_title("rust");
        assert!(!filter.matches(&post(PostType::Private, PostStatus::Active, "rust")));
        assert!(filter.matches(&post(PostType::Public, PostStatus::Active, "rust")));
    }

    #[test]
    fn apply_only_touches_provided_fields() {
        let mut p = post(PostType::Public, PostStatus::Active, "Old title");
        let changes = PostChanges {
            status: Some(PostStatus::Inactive),
            ..Default::default()
        };
        p.apply(&changes, Utc::now());
        assert_eq!(p.title, "Old title");
        assert_eq!(p.post_type, PostType::Public);
        assert_eq!(p.status, PostStatus::Inactive);
    }

    #[test]
    fn enums_serialize_uppercase() {
        let p = post(PostType::Private, PostStatus::Inactive, "t");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "PRIVATE");
        assert_eq!(json["status"], "INACTIVE");
        assert_eq!(json["authorId"], 1);
    }
}
