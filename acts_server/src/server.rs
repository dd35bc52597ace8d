use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use acts_engine::{
    marketplace::MarketplaceClient,
    CertificateSyncApi,
    HealthcheckApi,
    JsonFileCredentials,
    OrderValidationApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    jobs::start_scheduler,
    routes::{
        health,
        root,
        Credentials,
        HealthcheckStatusRoute,
        UpdateAcceptanceCertificatesRoute,
        ValidatedOrdersRoute,
        ValidationStatusRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.pool_size)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let client = MarketplaceClient::new(config.marketplace.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let credentials: Arc<Credentials> = Arc::new(JsonFileCredentials::new(&config.tokens_path));
    let _scheduler = if config.scheduler.enabled { start_scheduler(config.clone()) } else { Vec::new() };
    let srv = create_server_instance(&config, db.clone(), client, credentials)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    db.close().await;
    result
}

pub fn create_server_instance(
    config: &ServerConfig,
    db: SqliteDatabase,
    client: MarketplaceClient,
    credentials: Arc<Credentials>,
) -> Result<Server, ServerError> {
    info!("💻️ Serving acceptance certificates from {}", db.url());
    let srv = HttpServer::new(move || {
        let sync_api = CertificateSyncApi::new(db.clone(), client.clone());
        let validation_api = OrderValidationApi::new(db.clone());
        let healthcheck_api = HealthcheckApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("acts::access_log"))
            .app_data(web::Data::new(sync_api))
            .app_data(web::Data::new(validation_api))
            .app_data(web::Data::new(healthcheck_api))
            .app_data(web::Data::from(credentials.clone()))
            .service(root)
            .service(health)
            .service(UpdateAcceptanceCertificatesRoute::<SqliteDatabase, MarketplaceClient>::new())
            .service(HealthcheckStatusRoute::<SqliteDatabase>::new())
            .service(ValidationStatusRoute::<SqliteDatabase>::new())
            .service(ValidatedOrdersRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
