use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Employee master data as the backend serves it.  `status` is a free-form
/// string on the wire ("Active", "active", "Terminated", ...); the engine
/// decides eligibility, not the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeEntity {
    pub db_id: Uuid,
    pub employee_id: Arc<str>,
    pub full_name: Arc<str>,
    pub status: Arc<str>,
    #[serde(default)]
    pub total_salary: f64,
    #[serde(default)]
    pub basic_salary: f64,
    #[serde(default)]
    pub salary: f64,
}

#[automock]
#[async_trait]
pub trait EmployeeGateway {
    async fn find_all(&self, limit: u32) -> Result<Arc<[EmployeeEntity]>, crate::GatewayError>;
}
