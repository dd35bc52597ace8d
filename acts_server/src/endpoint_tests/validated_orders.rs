use actix_web::{http::StatusCode, web, web::ServiceConfig};
use acts_engine::{
    db_types::{CandidateDocument, SetComparison, ValidatedOrder},
    OrderValidationApi,
};
use chrono::NaiveDate;

use super::{
    helpers::{credentials, get_request, json},
    mocks::{storage_failure, MockOrderStore},
};
use crate::routes::{ValidatedOrdersRoute, ValidationStatusRoute};

fn confirmed_order() -> ValidatedOrder {
    ValidatedOrder {
        order_id: 1001,
        supply_id: Some("WB-GI-42".into()),
        sticker: Some("6001".into()),
        inner_order_status: "delivered".into(),
        document: Some("act-income-mp-42.zip".into()),
        account: Some("shop-a".into()),
        document_date: NaiveDate::from_ymd_opt(2024, 3, 1),
    }
}

#[actix_web::test]
async fn report_is_a_plain_list() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/validated_order?account=shop-a&page=1&page_size=10", configure_report)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    let orders = body.as_array().expect("response should be a list");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order_id"], 1001);
    assert_eq!(orders[0]["supply_id"], "WB-GI-42");
    assert_eq!(orders[0]["document_date"], "2024-03-01");
}

#[actix_web::test]
async fn future_begin_date_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request("/validated_order?begin_date=2999-01-01", configure_untouched_store).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().is_some());
}

#[actix_web::test]
async fn zero_page_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let (status, _) = get_request("/validated_order?page=0", configure_untouched_store).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn report_storage_failure_is_a_500() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/validated_order", configure_broken_report).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({"error": "A database error occurred"}));
}

#[actix_web::test]
async fn status_reconciles_every_candidate() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/validated_order/status", configure_status).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    let results = body.as_array().expect("response should be a list");
    assert_eq!(results.len(), 2);
    let shop_a = results.iter().find(|r| r["account_id"] == "shop-a").expect("shop-a missing");
    assert_eq!(shop_a["supply_id"], "WB-GI-42");
    assert_eq!(shop_a["is_consistent"], true);
    let shop_b = results.iter().find(|r| r["account_id"] == "shop-b").expect("shop-b missing");
    assert_eq!(shop_b["only_in_internal_orders"], 1);
    assert_eq!(shop_b["is_consistent"], false);
}

fn configure_report(cfg: &mut ServiceConfig) {
    let mut store = MockOrderStore::new();
    store
        .expect_search_validated_orders()
        .withf(|filter| filter.account.as_deref() == Some("shop-a") && filter.pagination.page_size == 10)
        .times(1)
        .returning(|_| Ok(vec![confirmed_order()]));
    cfg.service(ValidatedOrdersRoute::<MockOrderStore>::new()).app_data(web::Data::new(OrderValidationApi::new(store)));
}

fn configure_untouched_store(cfg: &mut ServiceConfig) {
    let mut store = MockOrderStore::new();
    store.expect_search_validated_orders().never();
    cfg.service(ValidatedOrdersRoute::<MockOrderStore>::new()).app_data(web::Data::new(OrderValidationApi::new(store)));
}

fn configure_broken_report(cfg: &mut ServiceConfig) {
    let mut store = MockOrderStore::new();
    store.expect_search_validated_orders().returning(|_| Err(storage_failure("search_validated_orders")));
    cfg.service(ValidatedOrdersRoute::<MockOrderStore>::new()).app_data(web::Data::new(OrderValidationApi::new(store)));
}

fn configure_status(cfg: &mut ServiceConfig) {
    let mut store = MockOrderStore::new();
    store.expect_fetch_reconciliation_candidates().times(2).returning(|_, account| {
        let document_number = if account == "shop-a" { "42" } else { "43" };
        Ok(vec![CandidateDocument {
            document_number: document_number.into(),
            document_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }])
    });
    store.expect_compare_order_sets().times(2).returning(|target| {
        let missing = if target.account == "shop-a" { 0 } else { 1 };
        Ok(SetComparison { matching_count: 2, only_in_certificates: 0, only_in_internal_orders: missing })
    });
    cfg.service(ValidationStatusRoute::<MockOrderStore>::new())
        .app_data(web::Data::new(OrderValidationApi::new(store)))
        .app_data(credentials(&["shop-a", "shop-b"]));
}
