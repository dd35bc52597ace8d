#![allow(dead_code)]

use std::io::{Cursor, Write};

use acts_engine::{
    db_types::{AccountCredential, CertificateRecord, NewCertificate},
    marketplace::{DateWindow, DocumentDescriptor, DocumentListing, DownloadOutcome, MarketplaceError, DocumentSource},
    SqliteDatabase,
};
use chrono::NaiveDate;
use log::*;
use mockall::mock;
use rust_xlsxwriter::Workbook;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use zip::{write::SimpleFileOptions, ZipWriter};

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/acts_test_{}.db", dir.display(), rand::random::<u64>())
}

/// Creates a fresh, migrated database at `url`.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    if let Err(e) = Sqlite::drop_database(url).await {
        debug!("Database {url} was not dropped: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(url, 2).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    info!("🚀️ Test database {url} is ready");
    db
}

pub async fn fresh_db() -> SqliteDatabase {
    prepare_test_env(&random_db_path()).await
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn certificate(order_id: i64, document_number: &str, account: &str, date: NaiveDate, ingested: NaiveDate) -> NewCertificate {
    NewCertificate {
        order_id: order_id.to_string(),
        sticker_id: format!("{}", order_id + 900_000),
        unit_count: Some(1),
        document_filename: format!("act-income-mp-{document_number}.zip"),
        document_number: document_number.to_string(),
        document_date: Some(date),
        account_id: account.to_string(),
        ingested_date: ingested,
    }
}

/// Every stored line of one certificate document, in insertion order.
pub async fn stored_lines(db: &SqliteDatabase, account: &str, document_number: &str) -> Vec<CertificateRecord> {
    sqlx::query_as("SELECT * FROM acceptance_certificates WHERE account = $1 AND document_number = $2 ORDER BY id")
        .bind(account)
        .bind(document_number)
        .fetch_all(db.pool())
        .await
        .expect("Error fetching certificate lines")
}

/// Assigns orders to a supply in the order management tables.
pub async fn add_supply_orders(db: &SqliteDatabase, supply_id: &str, account: &str, orders: &[i64]) {
    for order in orders {
        sqlx::query("INSERT INTO supplies_and_orders (id, supply_id, account) VALUES ($1, $2, $3)")
            .bind(order)
            .bind(supply_id)
            .bind(account)
            .execute(db.pool())
            .await
            .expect("Error inserting supply order");
    }
}

/// Appends a status snapshot. `created_at` is `YYYY-MM-DD HH:MM:SS`.
pub async fn add_status(db: &SqliteDatabase, order_id: i64, supply_id: &str, status: &str, created_at: &str) {
    sqlx::query("INSERT INTO order_status_log (order_id, supply_id, status, created_at) VALUES ($1, $2, $3, $4)")
        .bind(order_id)
        .bind(supply_id)
        .bind(status)
        .bind(created_at)
        .execute(db.pool())
        .await
        .expect("Error inserting order status");
}

/// A certificate spreadsheet laid out like the marketplace's: the date in D3 and line items from row 13.
pub fn act_workbook(date: &str, rows: &[(i64, i64, i64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Акт приемки товаров").unwrap();
    sheet.write_string(2, 3, date).unwrap();
    for (i, (order, sticker, count)) in rows.iter().enumerate() {
        let row = 12 + i as u32;
        sheet.write_number(row, 0, (i + 1) as f64).unwrap();
        sheet.write_number(row, 1, *order as f64).unwrap();
        sheet.write_number(row, 3, *sticker as f64).unwrap();
        sheet.write_number(row, 4, *count as f64).unwrap();
    }
    sheet.write_string(12 + rows.len() as u32, 3, "Итого").unwrap();
    workbook.save_to_buffer().unwrap()
}

pub fn zip_of(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A base64 download payload holding a single certificate spreadsheet.
pub fn act_payload(document_number: &str, date: &str, rows: &[(i64, i64, i64)]) -> String {
    let name = format!("act-income-mp-{document_number}.xlsx");
    base64::encode(zip_of(&[(name.as_str(), act_workbook(date, rows))]))
}

pub fn descriptor(document_number: &str) -> DocumentDescriptor {
    DocumentDescriptor {
        service_name: format!("act-income-mp-{document_number}"),
        name: document_number.to_string(),
        creation_time: None,
        supply_id: document_number.to_string(),
    }
}

pub fn accounts(names: &[&str]) -> Vec<AccountCredential> {
    names.iter().map(|n| AccountCredential::new(*n, format!("token-{n}"))).collect()
}

mock! {
    pub Source {}
    impl DocumentSource for Source {
        async fn list_documents(&self, credential: &AccountCredential, window: &DateWindow) -> Result<DocumentListing, MarketplaceError>;
        async fn download_all(&self, credential: &AccountCredential, documents: &[DocumentDescriptor]) -> Result<DownloadOutcome, MarketplaceError>;
    }
}
