pub mod access_policy;
pub mod auth_service;
pub mod post_service;
