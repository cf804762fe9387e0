use actix_web::{HttpRequest, HttpResponse, Scope, get, post, web};
use tracing::info;
use validator::Validate;

use super::request_id;
use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{SignInRequest, SignInResponse, SignUpRequest};
use crate::presentation::middleware::JwtAuthMiddleware;
use crate::presentation::utils::AuthenticatedUser;

pub fn scope() -> Scope {
    web::scope("/auth")
        .service(signup)
        .service(signin)
        .service(me)
}

#[post("/signup")]
async fn signup(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<SignUpRequest>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let SignUpRequest {
        name,
        email,
        password,
    } = payload.into_inner();

    let profile = service.signup(name, email, password).await?;

    info!(request_id = %request_id(&req), user_id = profile.id, "signup succeeded");
    Ok(HttpResponse::Created().json(profile))
}

#[post("/signin")]
async fn signin(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<SignInRequest>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let access_token = service.signin(&payload.email, &payload.password).await?;

    info!(request_id = %request_id(&req), "signin succeeded");
    Ok(HttpResponse::Created().json(SignInResponse { access_token }))
}

#[get("/me", wrap = "JwtAuthMiddleware")]
async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}
