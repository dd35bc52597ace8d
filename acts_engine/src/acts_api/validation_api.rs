use std::fmt::Debug;

use chrono::{Days, NaiveDate};
use log::*;

use crate::{
    acts_api::errors::ValidationApiError,
    db_types::{AccountCredential, ReconciliationResult, ReconciliationTarget, ValidatedOrder},
    traits::{CertificateManagement, ReconciliationManagement, ValidatedOrderFilter},
};

/// `OrderValidationApi` reconciles stored certificates against the internal supply and order tables.
pub struct OrderValidationApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderValidationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderValidationApi ({:?})", self.db)
    }
}

impl<B> OrderValidationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderValidationApi<B>
where B: CertificateManagement
{
    /// Lists every certificate issued on `date` for the given accounts, paired with its internal supply id.
    ///
    /// An account whose lookup fails is logged and contributes no targets.
    pub async fn get_document_number_and_supply_id(
        &self,
        accounts: &[AccountCredential],
        date: NaiveDate,
    ) -> Vec<ReconciliationTarget> {
        let mut targets = Vec::new();
        for credential in accounts {
            let account = credential.account_id.as_str();
            match self.db.fetch_reconciliation_candidates(date, account).await {
                Ok(candidates) => {
                    debug!("🔄️ {account}: {} certificates dated {date}", candidates.len());
                    targets.extend(candidates.into_iter().map(|c| ReconciliationTarget::new(account, c)));
                },
                Err(e) => error!("🔄️ {account}: could not list the certificates dated {date}. {e}"),
            }
        }
        targets
    }
}

impl<B> OrderValidationApi<B>
where B: CertificateManagement + ReconciliationManagement
{
    /// Reconciles the certificates dated the day before `run_date`.
    pub async fn validate_orders(&self, accounts: &[AccountCredential], run_date: NaiveDate) -> Vec<ReconciliationResult> {
        let date = run_date.checked_sub_days(Days::new(1)).unwrap_or(run_date);
        self.validate_orders_on(accounts, date).await
    }

    /// Reconciles every certificate dated `date`. A target that cannot be compared is logged and left out of the
    /// results.
    pub async fn validate_orders_on(&self, accounts: &[AccountCredential], date: NaiveDate) -> Vec<ReconciliationResult> {
        let targets = self.get_document_number_and_supply_id(accounts, date).await;
        info!("🔄️ Reconciling {} certificates dated {date}", targets.len());
        let mut results = Vec::with_capacity(targets.len());
        for target in &targets {
            match self.validate(target).await {
                Ok(result) => {
                    if result.is_consistent {
                        debug!("🔄️ {} / {} is consistent ({} orders)", target.account, target.supply_id, result.matching_count);
                    } else {
                        warn!(
                            "🔄️ {} / {} does not match. {} orders are only on the certificate, {} only in the supply",
                            target.account, target.supply_id, result.only_in_certificates, result.only_in_internal_orders
                        );
                    }
                    results.push(result);
                },
                Err(e) => error!("🔄️ {} / {} could not be reconciled. {e}", target.account, target.supply_id),
            }
        }
        results
    }

    pub async fn validate(&self, target: &ReconciliationTarget) -> Result<ReconciliationResult, ValidationApiError> {
        let counts = self.db.compare_order_sets(target).await?;
        Ok(ReconciliationResult::new(target, counts))
    }
}

impl<B> OrderValidationApi<B>
where B: ReconciliationManagement
{
    /// The validated order report. A window that starts after `today` is rejected.
    pub async fn validated_orders(
        &self,
        filter: &ValidatedOrderFilter,
        today: NaiveDate,
    ) -> Result<Vec<ValidatedOrder>, ValidationApiError> {
        if let Some(begin) = filter.begin_date.filter(|begin| *begin > today) {
            return Err(ValidationApiError::InvalidQuery(format!(
                "begin_date ({begin}) cannot be later than today ({today})"
            )));
        }
        let orders = self.db.search_validated_orders(filter).await?;
        Ok(orders)
    }
}
