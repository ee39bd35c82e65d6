use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use uuid::Uuid;

use crate::ServiceError;

/// Per-site rollup within one client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    pub site_name: Arc<str>,
    pub guard_count: u32,
    pub total_net: i64,
}

/// Per-client rollup; `total_net` is the exact sum of its sites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub client_id: Option<Uuid>,
    pub client_name: Arc<str>,
    pub guard_count: u32,
    pub total_net: i64,
    pub sites: Arc<[SiteSummary]>,
}

/// One `(client, site)` key of the period-over-period comparison.  Sites seen
/// in only one of the two periods report zero for the other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub client_id: Option<Uuid>,
    pub client_name: Arc<str>,
    pub site_name: Arc<str>,
    pub current_amount: i64,
    pub previous_amount: i64,
    pub difference: i64,
}

#[automock]
#[async_trait]
pub trait ReportService {
    /// Current-period pay lines grouped by client and site.
    async fn client_summaries(&self) -> Result<Arc<[ClientSummary]>, ServiceError>;

    /// Billing delta over the union of `(client, site)` keys of the current
    /// and previous period.
    async fn period_comparison(&self) -> Result<Arc<[ComparisonRow]>, ServiceError>;
}
