use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::post::{NewPost, PostChanges, PostStatus, PostType};

// ======================= AUTH =======================

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
}

// ======================= POSTS =======================

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 3, message = "title must be longer than or equal to 3 characters"))]
    pub title: String,
    #[validate(length(min = 3, message = "content must be longer than or equal to 3 characters"))]
    pub content: String,
    pub author_id: i64,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub status: PostStatus,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        NewPost {
            title: req.title,
            content: req.content,
            author_id: req.author_id,
            post_type: req.post_type,
            status: req.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, message = "title must be longer than or equal to 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 3, message = "content must be longer than or equal to 3 characters"))]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub status: Option<PostStatus>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        PostChanges {
            title: req.title,
            content: req.content,
            post_type: req.post_type,
            status: req.status,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchPostsQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "Search term cannot be empty"))]
    pub title: String,
}
