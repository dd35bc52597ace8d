use crate::{
    db_types::{HealthcheckEntry, NewHealthcheckEntry},
    traits::StorageError,
};

#[allow(async_fn_in_trait)]
pub trait HealthcheckManagement {
    /// Appends a healthcheck run to the log.
    async fn record_healthcheck(&self, entry: &NewHealthcheckEntry) -> Result<HealthcheckEntry, StorageError>;

    /// The healthcheck log, newest first.
    async fn fetch_healthcheck_statuses(&self) -> Result<Vec<HealthcheckEntry>, StorageError>;
}
