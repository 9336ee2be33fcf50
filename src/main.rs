use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dealer_reviews::api::{routes, AppState};
use dealer_reviews::cloud::CloudFunctions;
use dealer_reviews::config::Config;
use dealer_reviews::db::Database;
use dealer_reviews::remote::RemoteClient;
use dealer_reviews::sentiment::SentimentClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    // Initialize the database
    let db = Database::open(&config.database_path).map_err(io_error)?;
    db.create_schema().await.map_err(io_error)?;

    let remote = RemoteClient::new(config.request_timeout).map_err(io_error)?;
    let cloud = CloudFunctions::new(remote, config.endpoints.clone());
    let classifier =
        SentimentClient::new(config.sentiment.clone(), config.request_timeout).map_err(io_error)?;
    let state = web::Data::new(AppState::new(db, cloud, classifier));

    info!("listening on http://{}", &config.bind_addr);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(&config.bind_addr)?
        .run()
        .await
}

fn io_error<E>(err: E) -> std::io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    error!("Startup failed: {}", err);
    std::io::Error::other(err)
}
