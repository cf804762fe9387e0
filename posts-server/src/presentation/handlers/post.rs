use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use tracing::info;
use validator::Validate;

use super::request_id;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreatePostRequest, SearchPostsQuery, UpdatePostRequest};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::utils::{AuthenticatedUser, BearerToken};

/// `/all` and `/search` are registered ahead of `/{id}` so they are not
/// captured as identifiers.
pub fn scope() -> Scope {
    web::scope("/posts")
        .service(list_public)
        .service(list_all)
        .service(search)
        .service(get_post)
        .service(create_post)
        .service(update_post)
        .service(delete_post)
}

#[get("")]
async fn list_public(posts: web::Data<PostService>) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(posts.list_public().await?))
}

#[get("/all", wrap = "JwtAuthMiddleware")]
async fn list_all(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let all = posts.list_all().await?;

    info!(request_id = %request_id(&req), user_id = user.0.id, count = all.len(), "all posts listed");
    Ok(HttpResponse::Ok().json(all))
}

#[get("/search")]
async fn search(
    token: BearerToken,
    posts: web::Data<PostService>,
    query: web::Query<SearchPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    query.validate()?;
    let found = posts.search(&query.title, token.as_deref()).await?;
    Ok(HttpResponse::Ok().json(found))
}

#[get("/{id}")]
async fn get_post(
    token: BearerToken,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner(), token.as_deref()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("", wrap = "JwtAuthMiddleware")]
async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let post = posts.create_post(payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.0.id,
        post_id = post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[put("/{id}", wrap = "JwtAuthMiddleware")]
async fn update_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let post = posts
        .update_post(path.into_inner(), payload.into_inner().into())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.0.id,
        post_id = post.id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/{id}", wrap = "JwtAuthMiddleware")]
async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let deleted = posts.delete_post(post_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.0.id,
        post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(deleted))
}
