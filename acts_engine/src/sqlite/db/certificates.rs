use chrono::NaiveDate;
use log::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::db_types::{CandidateDocument, NewCertificate, CERTIFICATE_UNIT};

/// Keeps each statement well below SQLite's bound-parameter limit (9 parameters per row).
const INSERT_CHUNK_SIZE: usize = 100;

/// Inserts the certificate lines, skipping any whose natural key already exists. This is not atomic by itself;
/// pass a transaction (`&mut tx`) as the connection to make the whole batch atomic.
///
/// Returns the number of rows actually inserted.
pub async fn insert_certificates(records: &[NewCertificate], conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for chunk in records.chunks(INSERT_CHUNK_SIZE) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO acceptance_certificates (order_number, unit, sticker, quantity, document, document_number, \
             date, account, created_at) ",
        );
        builder.push_values(chunk, |mut row, record| {
            row.push_bind(record.order_id.as_str())
                .push_bind(CERTIFICATE_UNIT)
                .push_bind(record.sticker_id.as_str())
                .push_bind(record.unit_count)
                .push_bind(record.document_filename.as_str())
                .push_bind(record.document_number.as_str())
                .push_bind(record.document_date)
                .push_bind(record.account_id.as_str())
                .push_bind(record.ingested_date);
        });
        builder.push(" ON CONFLICT (order_number, document_number, account) DO NOTHING");
        let result = builder.build().execute(&mut *conn).await?;
        inserted += result.rows_affected();
    }
    trace!("🗃️ {inserted} of {} certificate lines were new", records.len());
    Ok(inserted)
}

pub async fn fetch_reconciliation_candidates(
    date: NaiveDate,
    account: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<CandidateDocument>, sqlx::Error> {
    let candidates = sqlx::query_as(
        r#"
            SELECT DISTINCT document_number, date AS document_date
            FROM acceptance_certificates
            WHERE date = $1 AND account = $2
            ORDER BY document_number
        "#,
    )
    .bind(date)
    .bind(account)
    .fetch_all(conn)
    .await?;
    Ok(candidates)
}

pub async fn has_certificates_ingested_on(date: NaiveDate, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM acceptance_certificates WHERE created_at = $1)")
        .bind(date)
        .fetch_one(conn)
        .await?;
    Ok(exists)
}
