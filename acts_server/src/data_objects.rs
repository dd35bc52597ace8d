use std::fmt::Display;

use acts_engine::traits::{Pagination, ValidatedOrderFilter, DEFAULT_PAGE_SIZE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

pub const BANNER: &str = "Acceptance Certificates API is running!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub message: String,
}

impl Default for Banner {
    fn default() -> Self {
        Self { message: BANNER.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub status: u16,
    pub message: String,
}

impl JsonResponse {
    pub fn new<S: Display>(status: u16, message: S) -> Self {
        Self { status, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub status: u16,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: 200, data }
    }
}

/// Query parameters for `/validated_order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatedOrderQuery {
    pub begin_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub order_id: Option<i64>,
    pub supply_id: Option<String>,
    pub account: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl TryFrom<ValidatedOrderQuery> for ValidatedOrderFilter {
    type Error = ServerError;

    fn try_from(query: ValidatedOrderQuery) -> Result<Self, Self::Error> {
        let page = query.page.unwrap_or(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 || page_size == 0 {
            return Err(ServerError::InvalidRequestQuery("page and page_size must be at least 1".to_string()));
        }
        Ok(ValidatedOrderFilter {
            begin_date: query.begin_date,
            end_date: query.end_date,
            order_id: query.order_id,
            supply_id: query.supply_id,
            account: query.account,
            pagination: Pagination::new(page, page_size),
        })
    }
}
