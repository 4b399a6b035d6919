use actix_web::{web, App, HttpServer};

use baseburn_host::api;
use baseburn_host::infrastructure::config::HostConfig;
use baseburn_host::infrastructure::logger::Logger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = HostConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    Logger::init(&config.log_level, &config.log_dir);
    tracing::info!("🚀 Starting BaseBurn host...");

    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        if config.is_production() {
            tracing::error!("❌ Configuration validation failed: {}", validation_errors.join(", "));
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Configuration validation failed: {}", validation_errors.join(", ")),
            ));
        }
        for problem in &validation_errors {
            tracing::warn!("⚠️ {}", problem);
        }
    } else {
        tracing::info!("✅ Configuration validation passed");
    }

    let port = config.port;
    let config = web::Data::new(config);

    tracing::info!("🌐 Listening on 0.0.0.0:{}", port);
    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .app_data(config.clone())
            .configure(api::configure)
            .default_service(web::route().to(api::not_found))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
