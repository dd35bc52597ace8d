use std::io::{Cursor, Write};

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use acts_engine::{
    marketplace::{DocumentDescriptor, DocumentListing, DownloadOutcome},
    CertificateSyncApi,
};
use rust_xlsxwriter::Workbook;
use zip::{write::SimpleFileOptions, ZipWriter};

use super::{
    helpers::{credentials, json, post_request},
    mocks::{storage_failure, MockOrderStore, MockSource},
};
use crate::routes::UpdateAcceptanceCertificatesRoute;

const TRIGGER: &str = "/handle_trigger/update_acceptance_certificates";

fn no_documents_source() -> MockSource {
    let mut source = MockSource::new();
    source.expect_list_documents().returning(|_, _| Ok(DocumentListing::Documents(vec![])));
    source.expect_download_all().never();
    source
}

#[actix_web::test]
async fn trigger_reports_database_updated() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request(TRIGGER, configure_quiet_day).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({"status": 201, "message": "database updated"}));
}

#[actix_web::test]
async fn trigger_requires_post() {
    let _ = env_logger::try_init().ok();
    let (status, _) = super::helpers::get_request(TRIGGER, configure_quiet_day).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn trigger_storage_failure_is_a_500() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request(TRIGGER, configure_failing_store).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({"error": "A database error occurred"}));
}

#[actix_web::test]
async fn trigger_stores_the_downloaded_lines() {
    let _ = env_logger::try_init().ok();
    let (status, _) = post_request(TRIGGER, configure_one_certificate).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

fn configure_one_certificate(cfg: &mut ServiceConfig) {
    let mut source = MockSource::new();
    source.expect_list_documents().times(1).returning(|_, _| Ok(DocumentListing::Documents(vec![sample_descriptor()])));
    source.expect_download_all().times(1).returning(|_, _| Ok(DownloadOutcome::Payload(sample_payload())));
    let mut store = MockOrderStore::new();
    store
        .expect_insert_certificates()
        .withf(|records| {
            records.len() == 2 &&
                records.iter().all(|r| r.account_id == "shop-a" && r.document_number == "42") &&
                records[0].order_id == "1001" &&
                records[1].sticker_id == "6002"
        })
        .times(1)
        .returning(|records| Ok(records.len() as u64));
    let api = CertificateSyncApi::new(store, source);
    cfg.service(UpdateAcceptanceCertificatesRoute::<MockOrderStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(credentials(&["shop-a"]));
}

fn configure_quiet_day(cfg: &mut ServiceConfig) {
    let mut store = MockOrderStore::new();
    store.expect_insert_certificates().never();
    let api = CertificateSyncApi::new(store, no_documents_source());
    cfg.service(UpdateAcceptanceCertificatesRoute::<MockOrderStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(credentials(&["shop-a", "shop-b"]));
}

fn configure_failing_store(cfg: &mut ServiceConfig) {
    let mut source = MockSource::new();
    source.expect_list_documents().returning(|_, _| Ok(DocumentListing::Documents(vec![sample_descriptor()])));
    source.expect_download_all().returning(|_, _| Ok(DownloadOutcome::Payload(sample_payload())));
    let mut store = MockOrderStore::new();
    store.expect_insert_certificates().returning(|_| Err(storage_failure("insert_certificates")));
    let api = CertificateSyncApi::new(store, source);
    cfg.service(UpdateAcceptanceCertificatesRoute::<MockOrderStore, MockSource>::new())
        .app_data(web::Data::new(api))
        .app_data(credentials(&["shop-a"]));
}

fn sample_descriptor() -> DocumentDescriptor {
    DocumentDescriptor {
        service_name: "act-income-mp-42".into(),
        name: "Акт приемки 42.xlsx".into(),
        creation_time: None,
        supply_id: "42".into(),
    }
}

/// A zipped `act-income-mp-42.xlsx` with two certificate lines, base64 encoded the way the marketplace sends it.
fn sample_payload() -> String {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(2, 3, "01.03.2024 г.").unwrap();
    for (i, order) in [1001.0, 1002.0].iter().enumerate() {
        let row = 12 + i as u32;
        sheet.write_number(row, 1, *order).unwrap();
        sheet.write_number(row, 3, *order + 5000.0).unwrap();
        sheet.write_number(row, 4, 1.0).unwrap();
    }
    sheet.write_string(14, 3, "Итого").unwrap();
    let xlsx = workbook.save_to_buffer().unwrap();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("act-income-mp-42.xlsx", SimpleFileOptions::default()).unwrap();
    writer.write_all(&xlsx).unwrap();
    base64::encode(writer.finish().unwrap().into_inner())
}
