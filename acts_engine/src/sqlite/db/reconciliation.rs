use log::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::LATEST_STATUS_CTE;
use crate::{
    db_types::{ReconciliationTarget, SetComparison, ValidatedOrder, TERMINAL_ORDER_STATUSES},
    traits::ValidatedOrderFilter,
};

/// Counts the intersection and both differences of the certificate's orders (A) and the supply's live orders (B).
pub async fn compare_order_sets(
    target: &ReconciliationTarget,
    conn: &mut SqliteConnection,
) -> Result<SetComparison, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("WITH ");
    builder.push(LATEST_STATUS_CTE);
    builder.push(
        r#",
    certificate_orders AS (
        SELECT order_number AS value
        FROM acceptance_certificates
        WHERE account = "#,
    );
    builder.push_bind(target.account.as_str());
    builder.push(" AND document_number = ");
    builder.push_bind(target.document_number.as_str());
    builder.push(" AND date = ");
    builder.push_bind(target.document_date);
    builder.push(
        r#"
    ),
    service_orders AS (
        SELECT CAST(sao.id AS TEXT) AS value
        FROM supplies_and_orders sao
        LEFT JOIN latest_status ls ON ls.order_id = sao.id
        WHERE sao.supply_id = "#,
    );
    builder.push_bind(target.supply_id.as_str());
    builder.push(" AND (ls.status IS NULL OR ls.status NOT IN (");
    let mut statuses = builder.separated(", ");
    for status in TERMINAL_ORDER_STATUSES {
        statuses.push_bind(status);
    }
    statuses.push_unseparated("))");
    builder.push(
        r#"
    )
    SELECT
        (SELECT COUNT(*) FROM (
            SELECT value FROM certificate_orders INTERSECT SELECT value FROM service_orders
        )) AS matching_count,
        (SELECT COUNT(*) FROM (
            SELECT value FROM certificate_orders EXCEPT SELECT value FROM service_orders
        )) AS only_in_certificates,
        (SELECT COUNT(*) FROM (
            SELECT value FROM service_orders EXCEPT SELECT value FROM certificate_orders
        )) AS only_in_internal_orders
    "#,
    );
    trace!("🗃️ Executing query: {}", builder.sql());
    let comparison = builder.build_query_as::<SetComparison>().fetch_one(conn).await?;
    Ok(comparison)
}

/// Fetches the validated order report according to the criteria in `filter`, ordered by order id.
pub async fn search_validated_orders(
    filter: &ValidatedOrderFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<ValidatedOrder>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("WITH ");
    builder.push(LATEST_STATUS_CTE);
    builder.push(
        r#"
    SELECT
        ls.order_id,
        ls.supply_id,
        ac.sticker,
        ls.status AS inner_order_status,
        ac.document,
        ac.account,
        ac.date AS document_date
    FROM latest_status ls
    LEFT JOIN acceptance_certificates ac ON CAST(ls.order_id AS TEXT) = ac.order_number
    "#,
    );
    let has_filter = filter.begin_date.is_some() ||
        filter.end_date.is_some() ||
        filter.order_id.is_some() ||
        filter.supply_id.is_some() ||
        filter.account.is_some();
    if has_filter {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(begin) = filter.begin_date {
        where_clause.push("ac.date >= ");
        where_clause.push_bind_unseparated(begin);
    }
    if let Some(end) = filter.end_date {
        where_clause.push("ac.date <= ");
        where_clause.push_bind_unseparated(end);
    }
    if let Some(order_id) = filter.order_id {
        where_clause.push("ls.order_id = ");
        where_clause.push_bind_unseparated(order_id);
    }
    if let Some(supply_id) = &filter.supply_id {
        where_clause.push("ls.supply_id = ");
        where_clause.push_bind_unseparated(supply_id.as_str());
    }
    if let Some(account) = &filter.account {
        where_clause.push("ac.account = ");
        where_clause.push_bind_unseparated(account.as_str());
    }
    builder.push(" ORDER BY ls.order_id ASC, ac.id ASC LIMIT ");
    builder.push_bind(filter.pagination.limit());
    builder.push(" OFFSET ");
    builder.push_bind(filter.pagination.offset());
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<ValidatedOrder>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_validated_orders: {}", orders.len());
    Ok(orders)
}
