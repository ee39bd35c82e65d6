use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The one active client/site posting of an employee.  Employees without a
/// posting simply have no row here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAssignmentEntity {
    pub employee_db_id: Uuid,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub client_name: Option<Arc<str>>,
    #[serde(default)]
    pub site_name: Option<Arc<str>>,
}

#[automock]
#[async_trait]
pub trait AssignmentGateway {
    async fn find_active(&self) -> Result<Arc<[ClientAssignmentEntity]>, crate::GatewayError>;
}
