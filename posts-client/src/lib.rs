//! HTTP client for the posts API.

mod error;
mod http_client;
pub mod models;

pub use error::ClientError;
pub use http_client::PostsClient;
pub use models::{Claims, Health, NewPost, Post, PostStatus, PostType, PostUpdate, UserProfile};
