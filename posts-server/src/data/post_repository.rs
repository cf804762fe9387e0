use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges, PostFilter, Visibility};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// Posts matching `filter`, oldest first.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError>;
    async fn update(&self, id: i64, changes: &PostChanges) -> Result<Option<Post>, DomainError>;
    /// Returns `false` when no post had this id.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE metacharacters so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, author_id, type, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, author_id, type, status, created_at, updated_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id)
        .bind(post.post_type)
        .bind(post.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = created.id, author_id = created.author_id, "post created");
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author_id, type, status, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        let include_hidden = filter.visibility == Visibility::All;
        let pattern = filter.title.as_deref().map(like_pattern);

        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author_id, type, status, created_at, updated_at
            FROM posts
            WHERE ($1 OR (type = 'PUBLIC' AND status = 'ACTIVE'))
              AND ($2::text IS NULL OR title ILIKE $2 ESCAPE '\')
            ORDER BY id ASC
            "#,
        )
        .bind(include_hidden)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while listing posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(&self, id: i64, changes: &PostChanges) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                type = COALESCE($3, type),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, title, content, author_id, type, status, created_at, updated_at
            "#,
        )
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .bind(changes.post_type)
        .bind(changes.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        info!(post_id = id, "post deleted");
        Ok(true)
    }
}
