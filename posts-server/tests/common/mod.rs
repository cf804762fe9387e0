#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, Error, test};
use serde_json::{Value, json};

use posts_server::infrastructure::security::JwtKeys;
use posts_server::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use posts_server::server::{self, AppState};

pub const SECRET: &str = "integration-test-secret";

pub fn keys() -> JwtKeys {
    JwtKeys::new(SECRET, 3600)
}

pub async fn test_app() -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(server::configure(AppState::in_memory(keys()))),
    )
    .await
}

/// Sends `req` and returns the status with the parsed JSON body (`Null` when empty).
pub async fn send<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    (status, body)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

pub async fn signup<S>(app: &S, name: &str, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({ "name": name, "email": email, "password": password })),
    )
    .await
}

pub async fn signin<S>(app: &S, email: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri("/auth/signin")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await
}

/// Signs a fresh user up and in; returns its id and access token.
pub async fn register<S>(app: &S, name: &str, email: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let (status, user) = signup(app, name, email, "password").await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {user}");
    let (status, session) = signin(app, email, "password").await;
    assert_eq!(status, StatusCode::CREATED, "signin failed: {session}");

    (
        user["id"].as_i64().expect("user id"),
        session["accessToken"].as_str().expect("access token").to_string(),
    )
}

pub async fn create_post<S>(
    app: &S,
    token: &str,
    author_id: i64,
    title: &str,
    post_type: &str,
    status: &str,
) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let (code, post) = send(
        app,
        test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(token))
            .set_json(json!({
                "title": title,
                "content": "Post content",
                "authorId": author_id,
                "type": post_type,
                "status": status,
            })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "create failed: {post}");
    post
}

pub fn ids(posts: &Value) -> Vec<i64> {
    posts
        .as_array()
        .expect("array of posts")
        .iter()
        .map(|p| p["id"].as_i64().expect("post id"))
        .collect()
}
