//! In-process stores with the same contract as the PostgreSQL repositories.
//! Used by `STORAGE=memory` runs and by the test suites.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges, PostFilter};
use crate::domain::user::{NewUser, User};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.users.write().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(user.email));
        }

        let created = User {
            id: table.next_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        table.rows.insert(created.id, created.clone());

        info!(user_id = created.id, email = %created.email, "user created");
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.users.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Table<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut table = self.posts.write().await;
        let now = Utc::now();
        let created = Post {
            id: table.next_id(),
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            post_type: post.post_type,
            status: post.status,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());

        info!(post_id = created.id, author_id = created.author_id, "post created");
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        let table = self.posts.read().await;
        Ok(table
            .rows
            .values()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: &PostChanges) -> Result<Option<Post>, DomainError> {
        let mut table = self.posts.write().await;
        let Some(post) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        post.apply(changes, Utc::now());

        info!(post_id = id, "post updated");
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let removed = self.posts.write().await.rows.remove(&id).is_some();
        if removed {
            info!(post_id = id, "post deleted");
        }
        Ok(removed)
    }
}
