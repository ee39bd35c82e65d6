use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEntity {
    pub id: Uuid,
    pub name: Arc<str>,
}

#[automock]
#[async_trait]
pub trait ClientGateway {
    async fn find_all(&self) -> Result<Arc<[ClientEntity]>, crate::GatewayError>;
}
