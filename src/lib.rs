use std::sync::Arc;

use actix_web::web::{self, Data, FormConfig, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpServer, ResponseError};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod analytics;
pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod qr;
pub mod seed;
pub mod session;
pub mod shell;
pub mod typedid;
pub mod user;

pub use config::Config;
pub use error::Error;

use crate::database::{Database, MongoDatabase};

/// Registers every endpoint. The shell's catch-all comes last so that it
/// only sees GETs nothing else claimed.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(FormConfig::default().error_handler(|err, _req| {
        // format form errors with custom format
        Error::InvalidForm(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(session::endpoints::login)
    .service(session::endpoints::logout)
    .service(session::endpoints::get_current_user)
    .service(user::endpoints::create_user)
    .service(user::endpoints::get_users)
    .service(user::endpoints::get_user_by_id)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::update_campaign)
    .service(campaign::endpoints::archive_campaign)
    .service(analytics::endpoints::get_summary)
    .service(analytics::endpoints::get_campaign_stats)
    .service(qr::endpoints::get_qr_codes)
    .service(qr::endpoints::get_qr_code)
    .service(qr::endpoints::scan_campaign)
    .service(shell::endpoints::render_page);
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.redacted_mongodb_uri());
    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let db = MongoDatabase::initialize(client.database(&config.database_name)).await?;

    user::manager::ensure_admin(&db, &config).await?;
    if config.seed_sample_data {
        seed::seed(&db).await?;
    }

    let db: Arc<dyn Database> = Arc::new(db);
    let bind_address = config.bind_address.clone();
    let config = Data::new(config);

    info!("listening on {}", bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(Data::from(Arc::clone(&db)))
            .app_data(config.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
            .default_service(web::to(|| async { Error::PathNotFound.error_response() }))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
