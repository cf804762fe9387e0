use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::application::access_policy::PostAccessPolicy;
use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::data::memory::{InMemoryPostRepository, InMemoryUserRepository};
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::data::user_repository::{PostgresUserRepository, UserRepository};
use crate::infrastructure::config::{AppConfig, StorageBackend};
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::presentation::utils::{json_config, path_config, query_config};

/// Everything the handlers need, built once per process.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub started_at: handlers::health::StartedAt,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        keys: JwtKeys,
    ) -> Self {
        let policy = PostAccessPolicy::new(keys.clone());
        Self {
            auth: AuthService::new(Arc::clone(&users), keys),
            posts: PostService::new(posts, users, policy),
            started_at: handlers::health::StartedAt::now(),
        }
    }

    pub fn in_memory(keys: JwtKeys) -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            keys,
        )
    }

    /// Wires the stores selected by `config.storage`.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt_secret, config.jwt_expires_in_secs);

        match config.storage {
            StorageBackend::Memory => {
                info!("using in-memory storage");
                Ok(Self::in_memory(keys))
            }
            StorageBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
                let pool = create_pool(url, config.database_max_connections).await?;
                if config.run_migrations {
                    run_migrations(&pool).await?;
                }
                Ok(Self::new(
                    Arc::new(PostgresUserRepository::new(pool.clone())),
                    Arc::new(PostgresPostRepository::new(pool)),
                    keys,
                ))
            }
        }
    }
}

/// Registers routes, shared state and extractor error handling.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.auth))
            .app_data(web::Data::new(state.posts))
            .app_data(web::Data::new(state.started_at))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(handlers::health::health)
            .service(handlers::auth::scope())
            .service(handlers::post::scope());
    }
}

pub fn run(config: &AppConfig, state: AppState, listener: TcpListener) -> anyhow::Result<Server> {
    let cors_origins = config.cors_origins.clone();
    info!(address = %listener.local_addr()?, "HTTP server starting");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&cors_origins))
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .configure(configure(state.clone()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
