use crate::{
    db_types::{ReconciliationTarget, SetComparison, ValidatedOrder},
    traits::{StorageError, ValidatedOrderFilter},
};

#[allow(async_fn_in_trait)]
pub trait ReconciliationManagement {
    /// Compares the orders on a certificate with the orders tracked internally for its supply.
    ///
    /// * Set A is the order numbers on the certificate `(account, document_number, document_date)`.
    /// * Set B is the orders assigned to `supply_id`, excluding orders whose most recent status is terminal. The
    ///   most recent status is the one with the latest `created_at`; ties go to the highest row id. Orders without any
    ///   status are included.
    ///
    /// Returns `|A ∩ B|`, `|A \ B|` and `|B \ A|`.
    async fn compare_order_sets(&self, target: &ReconciliationTarget) -> Result<SetComparison, StorageError>;

    /// Internal orders with their current status, joined to their certificate line where one exists.
    async fn search_validated_orders(&self, filter: &ValidatedOrderFilter) -> Result<Vec<ValidatedOrder>, StorageError>;
}
