//! Revenue repository

use crate::client::HttpClient;
use crate::error::ApiResult;
use crate::models::{RevenueQuery, RevenueReport, RevenueResponse};

/// Revenue aggregation endpoint
#[derive(Clone)]
pub struct RevenueRepository {
    client: HttpClient,
}

impl RevenueRepository {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch revenue for the range and normalize the response
    pub async fn fetch(&self, query: &RevenueQuery) -> ApiResult<RevenueReport> {
        let response: RevenueResponse = self
            .client
            .get_with_query("/bookings/revenue", &query.params())
            .await?;
        Ok(RevenueReport::from(response))
    }
}
