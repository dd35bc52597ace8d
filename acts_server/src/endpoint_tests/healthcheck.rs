use actix_web::{http::StatusCode, web, web::ServiceConfig};
use acts_engine::{db_types::HealthcheckEntry, HealthcheckApi};
use chrono::{TimeZone, Utc};

use super::{
    helpers::{get_request, json},
    mocks::{storage_failure, MockHealthcheckStore},
};
use crate::routes::HealthcheckStatusRoute;

#[actix_web::test]
async fn statuses_are_wrapped_in_a_data_response() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/healthcheck/status", configure_two_runs).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["status"], 200);
    let data = body["data"].as_array().expect("data should be a list");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], 2);
    assert_eq!(data[0]["upstream_api_failed"], true);
    assert_eq!(data[1]["pipeline_succeeded"], true);
}

#[actix_web::test]
async fn storage_failures_are_hidden() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/healthcheck/status", configure_broken_store).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({"error": "A database error occurred"}));
}

fn configure_two_runs(cfg: &mut ServiceConfig) {
    let mut store = MockHealthcheckStore::new();
    store.expect_fetch_healthcheck_statuses().times(1).returning(|| {
        Ok(vec![
            HealthcheckEntry {
                id: 2,
                checked_at: Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
                pipeline_succeeded: false,
                parser_failed: false,
                upstream_api_failed: true,
            },
            HealthcheckEntry {
                id: 1,
                checked_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
                pipeline_succeeded: true,
                parser_failed: false,
                upstream_api_failed: false,
            },
        ])
    });
    cfg.service(HealthcheckStatusRoute::<MockHealthcheckStore>::new())
        .app_data(web::Data::new(HealthcheckApi::new(store)));
}

fn configure_broken_store(cfg: &mut ServiceConfig) {
    let mut store = MockHealthcheckStore::new();
    store.expect_fetch_healthcheck_statuses().returning(|| Err(storage_failure("fetch_healthcheck_statuses")));
    cfg.service(HealthcheckStatusRoute::<MockHealthcheckStore>::new())
        .app_data(web::Data::new(HealthcheckApi::new(store)));
}
