use std::fmt::Display;

use acts_common::Secret;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Every internal supply identifier carries this prefix, followed by the certificate's document number.
pub const SUPPLY_ID_PREFIX: &str = "WB-GI-";
/// Certificates are stored against the name of the archive they were downloaded as.
pub const DOCUMENT_FILENAME_PREFIX: &str = "act-income-mp-";
/// The unit of measure printed on every certificate line.
pub const CERTIFICATE_UNIT: &str = "шт.";

/// Order statuses after which an order no longer belongs to a supply.
pub const TERMINAL_ORDER_STATUSES: [&str; 5] = ["cancel", "canceled", "canceled_by_client", "declined_by_client", "defect"];

//--------------------------------------   AccountCredential   ------------------------------------------------------

/// One seller account and the API token used to act on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCredential {
    pub account_id: String,
    pub token: Secret<String>,
}

impl AccountCredential {
    pub fn new<A: Into<String>, T: Into<String>>(account_id: A, token: T) -> Self {
        Self { account_id: account_id.into(), token: Secret::new(token.into()) }
    }
}

impl Display for AccountCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.account_id)
    }
}

//--------------------------------------   Supply identifiers   -----------------------------------------------------

/// Builds the internal supply id for a certificate document number, e.g. `12345` becomes `WB-GI-12345`.
pub fn supply_id_for_document(document_number: &str) -> String {
    format!("{SUPPLY_ID_PREFIX}{document_number}")
}

/// The document number is the last `-` separated segment of a supply id.
pub fn document_number_from_supply_id(supply_id: &str) -> &str {
    supply_id.rsplit('-').next().unwrap_or(supply_id)
}

pub fn document_filename_for(document_number: &str) -> String {
    format!("{DOCUMENT_FILENAME_PREFIX}{document_number}.zip")
}

//--------------------------------------   Certificates   -----------------------------------------------------------

/// A certificate line item that has not been stored yet.
///
/// The natural key is `(order_id, document_number, account_id)`. Inserting a second record with the same key is a
/// no-op; stored records are never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCertificate {
    pub order_id: String,
    pub sticker_id: String,
    pub unit_count: Option<i64>,
    pub document_filename: String,
    pub document_number: String,
    pub document_date: Option<NaiveDate>,
    pub account_id: String,
    pub ingested_date: NaiveDate,
}

impl NewCertificate {
    pub fn natural_key(&self) -> (&str, &str, &str) {
        (self.order_id.as_str(), self.document_number.as_str(), self.account_id.as_str())
    }
}

/// A stored certificate line item.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: i64,
    #[sqlx(rename = "order_number")]
    pub order_id: String,
    pub unit: String,
    #[sqlx(rename = "sticker")]
    pub sticker_id: String,
    #[sqlx(rename = "quantity")]
    pub unit_count: Option<i64>,
    #[sqlx(rename = "document")]
    pub document_filename: String,
    pub document_number: String,
    #[sqlx(rename = "date")]
    pub document_date: Option<NaiveDate>,
    #[sqlx(rename = "account")]
    pub account_id: String,
    #[sqlx(rename = "created_at")]
    pub ingested_date: NaiveDate,
}

//--------------------------------------   Reconciliation   ---------------------------------------------------------

/// A certificate document that was issued on the day being reconciled.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub document_number: String,
    pub document_date: NaiveDate,
}

/// One (account, certificate, supply) triple to reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationTarget {
    pub account: String,
    pub document_number: String,
    pub document_date: NaiveDate,
    pub supply_id: String,
}

impl ReconciliationTarget {
    pub fn new(account: &str, candidate: CandidateDocument) -> Self {
        let supply_id = supply_id_for_document(&candidate.document_number);
        Self {
            account: account.to_string(),
            document_number: candidate.document_number,
            document_date: candidate.document_date,
            supply_id,
        }
    }
}

/// The raw set sizes returned by the reconciliation query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct SetComparison {
    pub matching_count: i64,
    pub only_in_certificates: i64,
    pub only_in_internal_orders: i64,
}

/// The outcome of comparing one certificate against the internal orders in its supply. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub account_id: String,
    pub document_number: String,
    pub supply_id: String,
    pub matching_count: i64,
    pub only_in_certificates: i64,
    pub only_in_internal_orders: i64,
    pub is_consistent: bool,
}

impl ReconciliationResult {
    pub fn new(target: &ReconciliationTarget, counts: SetComparison) -> Self {
        Self {
            account_id: target.account.clone(),
            document_number: target.document_number.clone(),
            supply_id: target.supply_id.clone(),
            matching_count: counts.matching_count,
            only_in_certificates: counts.only_in_certificates,
            only_in_internal_orders: counts.only_in_internal_orders,
            is_consistent: counts.only_in_certificates == 0 && counts.only_in_internal_orders == 0,
        }
    }
}

//--------------------------------------   Validated orders   -------------------------------------------------------

/// An internal order's current status, with the certificate line that confirms it, if there is one.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ValidatedOrder {
    pub order_id: i64,
    pub supply_id: Option<String>,
    pub sticker: Option<String>,
    pub inner_order_status: String,
    pub document: Option<String>,
    pub account: Option<String>,
    pub document_date: Option<NaiveDate>,
}

//--------------------------------------   Healthcheck   ------------------------------------------------------------

/// The three ways a scheduled healthcheck can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthOutcome {
    Success,
    UpstreamApiFailure,
    InnerMethodFailure,
}

impl Display for HealthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthOutcome::Success => write!(f, "Success"),
            HealthOutcome::UpstreamApiFailure => write!(f, "UpstreamApiFailure"),
            HealthOutcome::InnerMethodFailure => write!(f, "InnerMethodFailure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHealthcheckEntry {
    pub checked_at: DateTime<Utc>,
    pub outcome: HealthOutcome,
}

impl NewHealthcheckEntry {
    pub fn new(checked_at: DateTime<Utc>, outcome: HealthOutcome) -> Self {
        Self { checked_at, outcome }
    }

    /// `(pipeline_succeeded, parser_failed, upstream_api_failed)`
    pub fn flags(&self) -> (bool, bool, bool) {
        match self.outcome {
            HealthOutcome::Success => (true, false, false),
            HealthOutcome::UpstreamApiFailure => (false, false, true),
            HealthOutcome::InnerMethodFailure => (false, true, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct HealthcheckEntry {
    pub id: i64,
    pub checked_at: DateTime<Utc>,
    pub pipeline_succeeded: bool,
    pub parser_failed: bool,
    pub upstream_api_failed: bool,
}

impl HealthcheckEntry {
    pub fn outcome(&self) -> HealthOutcome {
        match (self.pipeline_succeeded, self.parser_failed, self.upstream_api_failed) {
            (true, _, _) => HealthOutcome::Success,
            (_, _, true) => HealthOutcome::UpstreamApiFailure,
            _ => HealthOutcome::InnerMethodFailure,
        }
    }
}
