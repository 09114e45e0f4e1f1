use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::{error, info, warn};

mod config;
mod error;
mod models;
mod routes;
mod stats;
mod store;

use config::Config;
use store::{MemoryStore, MySqlStore, Store};

async fn open_store(config: &Config) -> error::AppResult<Arc<dyn Store>> {
    match &config.database_url {
        Some(database_url) => {
            let store = MySqlStore::connect(database_url, config.max_connections).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL is not set; data is kept in memory and lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let store = open_store(&config).await.map_err(|e| {
        error!("Failed to open the data store: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let store = web::Data::from(store);

    info!(
        "Server running at http://{} ({} store)",
        config.server_address,
        store.store_type()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Hello, this is the Sprintboard API.") }))
            .configure(routes::configure)
    })
    .bind(&config.server_address)?
    .run()
    .await
}
