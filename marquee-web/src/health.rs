//! The health check used by load balancers and orchestration.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

/// Handles the health check route.
pub fn service(config: &mut web::ServiceConfig) {
    config.service(health);
}

/// The health check body.
#[derive(Debug, Serialize)]
struct Health {
    /// Always true. The check only shows the server can answer requests, and
    /// does not contact any upstream.
    ok: bool,
}

/// Used by the load balancer to indicate that the server can respond to
/// requests.
#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(Health { ok: true })
}
