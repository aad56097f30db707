//! Revenue models
//!
//! The revenue endpoint answers either with a bare total or with a series of
//! per-day amounts. Both shapes are normalized into [`RevenueReport`] here so
//! callers never branch on the wire shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::datetime;

/// Date range for a revenue request; both ends optional and inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevenueQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RevenueQuery {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Query parameters; the start covers the whole first day and the end the
    /// whole last day
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start {
            params.push(("startDate", format!("{}T00:00:00", start.format("%Y-%m-%d"))));
        }
        if let Some(end) = self.end {
            params.push(("endDate", format!("{}T23:59:59", end.format("%Y-%m-%d"))));
        }
        params
    }
}

/// One dated amount of a revenue series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    #[serde(with = "datetime::date")]
    pub date: NaiveDate,
    pub revenue: f64,
}

/// Raw response of the revenue endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RevenueResponse {
    Total(f64),
    Series(Vec<RevenuePoint>),
}

/// Amount in a normalized report; undated for a bare total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueEntry {
    pub date: Option<NaiveDate>,
    pub revenue: f64,
}

/// Normalized revenue report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub total: f64,
    pub entries: Vec<RevenueEntry>,
}

impl From<RevenueResponse> for RevenueReport {
    fn from(response: RevenueResponse) -> Self {
        match response {
            RevenueResponse::Total(total) => RevenueReport {
                total,
                entries: vec![RevenueEntry {
                    date: None,
                    revenue: total,
                }],
            },
            RevenueResponse::Series(points) => RevenueReport {
                total: points.iter().map(|p| p.revenue).sum(),
                entries: points
                    .into_iter()
                    .map(|p| RevenueEntry {
                        date: Some(p.date),
                        revenue: p.revenue,
                    })
                    .collect(),
            },
        }
    }
}
