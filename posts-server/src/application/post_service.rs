use std::sync::Arc;

use serde::Serialize;
use tracing::{instrument, warn};

use crate::application::access_policy::PostAccessPolicy;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges, PostFilter, Visibility};

#[derive(Debug, Serialize)]
pub struct DeletedPost {
    pub message: &'static str,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    policy: PostAccessPolicy,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        policy: PostAccessPolicy,
    ) -> Self {
        Self {
            posts,
            users,
            policy,
        }
    }

    /// Public and active posts.
    pub async fn list_public(&self) -> Result<Vec<Post>, DomainError> {
        self.posts
            .list(&PostFilter::new(Visibility::PublicActive))
            .await
    }

    /// Every post. Callers must already be authenticated.
    pub async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        self.posts.list(&PostFilter::new(Visibility::All)).await
    }

    #[instrument(skip(self, token))]
    pub async fn search(&self, title: &str, token: Option<&str>) -> Result<Vec<Post>, DomainError> {
        let visibility = self.policy.listing_visibility(token);
        self.posts
            .list(&PostFilter::new(visibility).with_title(title))
            .await
    }

    #[instrument(skip(self, token))]
    pub async fn get_post(&self, id: i64, token: Option<&str>) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))?;
        self.policy.authorize_read(&post, token)?;
        Ok(post)
    }

    #[instrument(skip(self, post), fields(author_id = post.author_id))]
    pub async fn create_post(&self, post: NewPost) -> Result<Post, DomainError> {
        if self.users.find_by_id(post.author_id).await?.is_none() {
            return Err(DomainError::AuthorNotFound(post.author_id));
        }
        self.posts.create(post).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, DomainError> {
        self.posts
            .update(id, &changes)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<DeletedPost, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))?;

        if !post.is_inactive() {
            warn!(post_id = id, "refusing to delete active post");
            return Err(DomainError::InvalidState(
                "Only inactive posts can be deleted. Please deactivate the post first.",
            ));
        }

        if !self.posts.delete(id).await? {
            return Err(DomainError::PostNotFound(id));
        }

        Ok(DeletedPost {
            message: "Post deleted successfully",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{InMemoryPostRepository, InMemoryUserRepository};
    use crate::domain::post::{PostStatus, PostType};
    use crate::domain::user::{NewUser, UserProfile};
    use crate::infrastructure::security::JwtKeys;

    struct Fixture {
        service: PostService,
        author_id: i64,
        token: String,
    }

    async fn fixture() -> Fixture {
        let keys = JwtKeys::new("svc-secret", 3600);
        let users = Arc::new(InMemoryUserRepository::new());
        let author = users
            .create(NewUser::new("A".into(), "a@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let token = keys.generate_token(&UserProfile::from(author.clone())).unwrap();
        let service = PostService::new(
            Arc::new(InMemoryPostRepository::new()),
            users,
            PostAccessPolicy::new(keys),
        );
        Fixture {
            service,
            author_id: author.id,
            token,
        }
    }

    fn new_post(author_id: i64, title: &str, post_type: PostType, status: PostStatus) -> NewPost {
        NewPost {
            title: title.into(),
            content: "Some content".into(),
            author_id,
            post_type,
            status,
        }
    }

    #[tokio::test]
    async fn create_requires_existing_author() {
        let f = fixture().await;
        let err = f
            .service
            .create_post(new_post(99, "Orphan", PostType::Public, PostStatus::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AuthorNotFound(99)));
    }

    #[tokio::test]
    async fn created_post_reads_back_identically() {
        let f = fixture().await;
        let created = f
            .service
            .create_post(new_post(f.author_id, "Hidden", PostType::Private, PostStatus::Inactive))
            .await
            .unwrap();

        let fetched = f.service.get_post(created.id, Some(&f.token)).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_post_is_not_found_even_anonymously() {
        let f = fixture().await;
        assert!(matches!(
            f.service.get_post(404, None).await,
            Err(DomainError::PostNotFound(404))
        ));
    }

    #[tokio::test]
    async fn search_scope_depends_on_token() {
        let f = fixture().await;
        for (title, t, s) in [
            ("Rust public", PostType::Public, PostStatus::Active),
            ("Rust private", PostType::Private, PostStatus::Active),
            ("Rust archived", PostType::Public, PostStatus::Inactive),
            ("Go public", PostType::Public, PostStatus::Active),
        ] {
            f.service
                .create_post(new_post(f.author_id, title, t, s))
                .await
                .unwrap();
        }

        let anon = f.service.search("rust", None).await.unwrap();
        let bad = f.service.search("rust", Some("invalid.token")).await.unwrap();
        let authed = f.service.search("RUST", Some(&f.token)).await.unwrap();

        assert_eq!(anon.len(), 1);
        assert_eq!(anon[0].title, "Rust public");
        assert_eq!(bad, anon);
        assert_eq!(authed.len(), 3);
    }

    #[tokio::test]
    async fn update_applies_partial_changes() {
        let f = fixture().await;
        let created = f
            .service
            .create_post(new_post(f.author_id, "Draft", PostType::Public, PostStatus::Active))
            .await
            .unwrap();

        let updated = f
            .service
            .update_post(
                created.id,
                PostChanges {
                    title: Some("Final".into()),
                    post_type: Some(PostType::Private),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.post_type, PostType::Private);
        assert_eq!(updated.status, PostStatus::Active);
        assert!(updated.updated_at >= created.updated_at);

        assert!(matches!(
            f.service.update_post(999, PostChanges::default()).await,
            Err(DomainError::PostNotFound(999))
        ));
    }

    #[tokio::test]
    async fn only_inactive_posts_are_deletable() {
        let f = fixture().await;
        let active = f
            .service
            .create_post(new_post(f.author_id, "Active", PostType::Public, PostStatus::Active))
            .await
            .unwrap();
        let inactive = f
            .service
            .create_post(new_post(f.author_id, "Inactive", PostType::Public, PostStatus::Inactive))
            .await
            .unwrap();

        assert!(matches!(
            f.service.delete_post(active.id).await,
            Err(DomainError::InvalidState(_))
        ));
        let deleted = f.service.delete_post(inactive.id).await.unwrap();
        assert_eq!(deleted.message, "Post deleted successfully");
        assert!(matches!(
            f.service.delete_post(inactive.id).await,
            Err(DomainError::PostNotFound(_))
        ));
        assert_eq!(f.service.list_all().await.unwrap().len(), 1);
    }
}
