use std::time::Instant;

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Process start, for the uptime figure.
#[derive(Debug, Clone, Copy)]
pub struct StartedAt(pub Instant);

impl StartedAt {
    pub fn now() -> Self {
        Self(Instant::now())
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64,
}

impl HealthResponse {
    fn at(now: DateTime<Utc>, started: StartedAt) -> Self {
        Self {
            status: "ok",
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime: started.0.elapsed().as_secs_f64(),
        }
    }
}

#[get("/health")]
pub async fn health(started: web::Data<StartedAt>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::at(Utc::now(), **started))
}
