use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use dotenvy::dotenv;
use serde_json::json;
use sqlx::MySqlPool;

mod api;
mod config;
mod db;
mod docs;
mod domain;
mod error;
mod model;
mod repo;
mod routes;
mod utils;

use config::Config;
use db::init_db;
use utils::clock;

use crate::docs::ApiDoc;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Hospital Management System API",
        "docs": "/swagger-ui/"
    }))
}

#[get("/health")]
async fn health(pool: Data<MySqlPool>) -> impl Responder {
    let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => "connected",
        Err(e) => {
            warn!(error = %e, "Health check could not reach the database");
            "disconnected"
        }
    };

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "database": database
    }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url).await?;

    if config.run_migrations {
        db::run_migrations(&pool).await?;
        info!("Database migrations applied");
    }

    if config.seed_sample_doctors {
        let pool_for_seed = pool.clone();
        actix_web::rt::spawn(async move {
            match db::seed_doctors(&pool_for_seed, &db::sample_doctors(), clock::now()).await {
                Ok(0) => info!("Doctors table already populated, skipping seed"),
                Ok(n) => info!(count = n, "Seeded sample doctors"),
                Err(e) => error!(error = ?e, "Failed to seed sample doctors"),
            }
        });
    }

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .service(health)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
