// src/main.rs - blog platform backend: users, posts and categories over a document store
mod config;
mod dtos;
mod handlers;
mod models;
mod repositories;
mod store;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};

use crate::config::{AppConfig, StoreBackend};
use crate::store::{DocumentStore, MemoryStore, PgStore};

/// Shared by every handler. The store is the only state; it is built once
/// here and injected.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

async fn connect_store(backend: StoreBackend) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match backend {
        StoreBackend::Postgres => {
            let store = PgStore::new(config::get_pg_pool()?);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let app_config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let store = match connect_store(app_config.store_backend).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to connect to {:?} store: {:#}", app_config.store_backend, e);
            std::process::exit(1);
        }
    };
    info!("Document store: {:?}", app_config.store_backend);

    let state = web::Data::new(AppState::new(store));
    let allowed_origins = app_config.allowed_origins.clone();

    let bind_address = format!("0.0.0.0:{}", app_config.port);
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allow_any_header()
            .max_age(3600);

        if allowed_origins.is_empty() {
            cors = cors.allow_any_origin();
        }
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
