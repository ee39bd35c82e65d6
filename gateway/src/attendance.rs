use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// One day of captured attendance.  Produced by the mobile capture flow and
/// immutable from the engine's point of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordEntity {
    pub employee_db_id: Uuid,
    pub date: Date,
    pub status: Arc<str>,
    #[serde(default)]
    pub fine_amount: f64,
    #[serde(default)]
    pub late_deduction: f64,
    #[serde(default)]
    pub overtime_minutes: u32,
    #[serde(default)]
    pub overtime_in: Option<Arc<str>>,
    #[serde(default)]
    pub overtime_out: Option<Arc<str>>,
}

#[automock]
#[async_trait]
pub trait AttendanceGateway {
    async fn find_by_date_range(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Arc<[AttendanceRecordEntity]>, crate::GatewayError>;
}
