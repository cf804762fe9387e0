//! Read access rules for posts.
//!
//! Two separate decisions live here and are deliberately not merged:
//!
//! * [`PostAccessPolicy::authorize_read`] gates a single post. Hidden posts
//!   (private or inactive) need a valid token, and a bad token is rejected.
//! * [`PostAccessPolicy::listing_visibility`] filters listings. A missing or
//!   bad token narrows the result to public active posts and never errors.

use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::post::{Post, Visibility};
use crate::infrastructure::security::JwtKeys;

#[derive(Clone)]
pub struct PostAccessPolicy {
    keys: JwtKeys,
}

impl PostAccessPolicy {
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys }
    }

    pub fn authorize_read(&self, post: &Post, token: Option<&str>) -> Result<(), DomainError> {
        if post.is_public_active() {
            return Ok(());
        }

        let token = token.ok_or(DomainError::Unauthorized(
            "Authentication required to access private or inactive posts",
        ))?;
        self.keys
            .verify_token(token)
            .map(|claims| debug!(post_id = post.id, user_id = claims.id, "hidden post read"))
            .map_err(|_| DomainError::Unauthorized("Invalid or expired token"))
    }

    pub fn listing_visibility(&self, token: Option<&str>) -> Visibility {
        match token.map(|t| self.keys.verify_token(t)) {
            Some(Ok(_)) => Visibility::All,
            Some(Err(err)) => {
                debug!(error = %err, "ignoring invalid token on listing");
                Visibility::PublicActive
            }
            None => Visibility::PublicActive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::{PostStatus, PostType};
    use crate::domain::user::UserProfile;
    use chrono::Utc;

    fn policy() -> (PostAccessPolicy, String) {
        let keys = JwtKeys::new("policy-secret", 3600);
        let token = keys
            .generate_token(&UserProfile {
                id: 1,
                name: "A".into(),
                email: "a@example.com".into(),
            })
            .unwrap();
        (PostAccessPolicy::new(keys), token)
    }

    fn post(post_type: PostType, status: PostStatus) -> Post {
        Post {
            id: 3,
            title: "title".into(),
            content: "content".into(),
            author_id: 1,
            post_type,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn public_active_ignores_token() {
        let (policy, token) = policy();
        let p = post(PostType::Public, PostStatus::Active);
        assert!(policy.authorize_read(&p, None).is_ok());
        assert!(policy.authorize_read(&p, Some(&token)).is_ok());
        assert!(policy.authorize_read(&p, Some("garbage")).is_ok());
    }

    #[test]
    fn hidden_posts_are_gated() {
        let (policy, token) = policy();
        let hidden = [
            post(PostType::Private, PostStatus::Active),
            post(PostType::Public, PostStatus::Inactive),
            post(PostType::Private, PostStatus::Inactive),
        ];

        for p in &hidden {
            assert!(matches!(
                policy.authorize_read(p, None),
                Err(DomainError::Unauthorized(_))
            ));
            assert!(matches!(
                policy.authorize_read(p, Some("invalid.token")),
                Err(DomainError::Unauthorized(_))
            ));
            assert!(policy.authorize_read(p, Some(&token)).is_ok());
        }
    }

    #[test]
    fn token_from_foreign_secret_does_not_open_hidden_post() {
        let (policy, _) = policy();
        let foreign = JwtKeys::new("other", 3600)
            .generate_token(&UserProfile {
                id: 1,
                name: "A".into(),
                email: "a@example.com".into(),
            })
            .unwrap();
        let p = post(PostType::Private, PostStatus::Active);
        assert!(policy.authorize_read(&p, Some(&foreign)).is_err());
    }

    #[test]
    fn listing_degrades_to_public_view() {
        let (policy, token) = policy();
        assert_eq!(policy.listing_visibility(None), Visibility::PublicActive);
        assert_eq!(
            policy.listing_visibility(Some("invalid.token")),
            Visibility::PublicActive
        );
        assert_eq!(policy.listing_visibility(Some(&token)), Visibility::All);
    }
}
