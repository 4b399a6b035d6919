use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};

use crate::domain::error::HostError;
use crate::domain::manifest::MiniAppManifest;
use crate::infrastructure::config::HostConfig;

pub const SERVICE_NAME: &str = "baseburn-host";

/// Register every route on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(manifest).service(hosted_manifest).service(health);
}

#[get("/.well-known")]
async fn manifest(config: web::Data<HostConfig>) -> Result<HttpResponse, HostError> {
    let manifest = MiniAppManifest::from_config(&config);
    if !manifest.account_association.is_complete() {
        tracing::warn!("Serving manifest without a complete account association");
    }
    Ok(HttpResponse::Ok().json(serde_json::to_value(&manifest)?))
}

#[get("/.well-known/farcaster.json")]
async fn hosted_manifest(config: web::Data<HostConfig>) -> Result<HttpResponse, HostError> {
    if !HostConfig::is_valid_http_url(&config.hosted_manifest_url) {
        return Err(HostError::Config("No hosted manifest URL configured".to_string()));
    }
    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, config.hosted_manifest_url.as_str()))
        .finish())
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, HostError> {
    Err(HostError::NotFound(req.path().to_string()))
}
