use sqlx::SqliteConnection;

use crate::db_types::{HealthcheckEntry, NewHealthcheckEntry};

pub async fn insert_healthcheck(
    entry: &NewHealthcheckEntry,
    conn: &mut SqliteConnection,
) -> Result<HealthcheckEntry, sqlx::Error> {
    let (pipeline_succeeded, parser_failed, upstream_api_failed) = entry.flags();
    let entry = sqlx::query_as(
        r#"
            INSERT INTO healthcheck_status (checked_at, pipeline_succeeded, parser_failed, upstream_api_failed)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(entry.checked_at)
    .bind(pipeline_succeeded)
    .bind(parser_failed)
    .bind(upstream_api_failed)
    .fetch_one(conn)
    .await?;
    Ok(entry)
}

pub async fn fetch_healthcheck_statuses(conn: &mut SqliteConnection) -> Result<Vec<HealthcheckEntry>, sqlx::Error> {
    let entries = sqlx::query_as("SELECT * FROM healthcheck_status ORDER BY checked_at DESC, id DESC")
        .fetch_all(conn)
        .await?;
    Ok(entries)
}
