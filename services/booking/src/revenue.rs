//! Revenue report view for administrators

use api::ApiState;
use api::models::{RevenueQuery, RevenueReport};
use api::sequencing::Latest;
use tracing::debug;

use crate::dashboard::DateRange;
use crate::error::{WorkflowError, WorkflowResult};

pub struct RevenueView {
    state: ApiState,
    report: Latest<RevenueReport>,
}

impl RevenueView {
    pub fn new(state: ApiState) -> Self {
        Self {
            state,
            report: Latest::new(),
        }
    }

    /// Fetch revenue for the range; a newer fetch wins over a slower older one
    pub async fn fetch(&self, range: &DateRange) -> WorkflowResult<RevenueReport> {
        if !self.state.session.snapshot().is_admin() {
            return Err(WorkflowError::Forbidden);
        }

        let ticket = self.report.begin();
        let query = RevenueQuery::new(range.start, range.end);
        let report = self.state.revenue.fetch(&query).await?;
        debug!(
            "Revenue for {:?}..{:?}: {} over {} entries",
            range.start,
            range.end,
            report.total,
            report.entries.len()
        );

        Ok(self.report.settle(ticket, report))
    }
}
