use std::sync::Arc;

use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use acts_engine::db_types::AccountCredential;
use log::debug;

use crate::routes::Credentials;

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    send(TestRequest::get().uri(path), configure).await
}

pub async fn post_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    send(TestRequest::post().uri(path), configure).await
}

async fn send(req: TestRequest, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub fn credentials(names: &[&str]) -> web::Data<Credentials> {
    let accounts: Vec<AccountCredential> =
        names.iter().map(|n| AccountCredential::new(*n, format!("token-{n}"))).collect();
    let accounts: Arc<Credentials> = Arc::new(accounts);
    web::Data::from(accounts)
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Invalid JSON response '{body}'. {e}"))
}
