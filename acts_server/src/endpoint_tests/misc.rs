use actix_web::{http::StatusCode, web::ServiceConfig};

use super::helpers::{get_request, json};
use crate::routes::{health, root};

fn configure(cfg: &mut ServiceConfig) {
    cfg.service(root).service(health);
}

#[actix_web::test]
async fn health_endpoint() {
    let (status, body) = get_request("/health", configure).await.expect("Request failed");
    assert!(status.is_success());
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn root_banner() {
    let (status, body) = get_request("/", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({"message": "Acceptance Certificates API is running!"}));
}
