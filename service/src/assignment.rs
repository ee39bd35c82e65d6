use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use gateway::assignment::ClientAssignmentEntity;
use gateway::client::ClientEntity;
use guardpay_utils::derive_from_reference;

/// Display buckets for guards without an active posting.
pub const UNASSIGNED_CLIENT: &str = "Unassigned";
pub const UNASSIGNED_SITE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: Uuid,
    pub name: Arc<str>,
}

impl From<&ClientEntity> for Client {
    fn from(entity: &ClientEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
        }
    }
}
derive_from_reference!(ClientEntity, Client);

/// The active posting of one guard, with client/site names already resolved
/// so missing data never leaks past this point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClientAssignment {
    pub employee_db_id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: Arc<str>,
    pub site_name: Arc<str>,
}

impl ClientAssignment {
    /// Resolves names against the client master list.  The client table is
    /// authoritative for the name; the assignment row only carries a
    /// denormalized copy which may be stale or missing.
    pub fn from_entity(
        entity: &ClientAssignmentEntity,
        client_names: &HashMap<Uuid, Arc<str>>,
    ) -> Self {
        let client_name = entity
            .client_id
            .and_then(|id| client_names.get(&id).cloned())
            .or_else(|| entity.client_name.clone())
            .unwrap_or_else(|| {
                debug!(
                    "Assignment of employee {} has no resolvable client, grouping as {}",
                    entity.employee_db_id, UNASSIGNED_CLIENT
                );
                UNASSIGNED_CLIENT.into()
            });
        let site_name = entity
            .site_name
            .clone()
            .filter(|site| !site.is_empty())
            .unwrap_or_else(|| UNASSIGNED_SITE.into());
        Self {
            employee_db_id: entity.employee_db_id,
            client_id: entity.client_id,
            client_name,
            site_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_table_name_is_authoritative() {
        let client_id = Uuid::new_v4();
        let names: HashMap<Uuid, Arc<str>> =
            [(client_id, Arc::from("Acme Mills"))].into_iter().collect();
        let entity = ClientAssignmentEntity {
            employee_db_id: Uuid::new_v4(),
            client_id: Some(client_id),
            client_name: Some("Acme (old)".into()),
            site_name: Some("Gate 3".into()),
        };
        let assignment = ClientAssignment::from_entity(&entity, &names);
        assert_eq!(assignment.client_name.as_ref(), "Acme Mills");
        assert_eq!(assignment.site_name.as_ref(), "Gate 3");
    }

    #[test]
    fn test_missing_pieces_fall_back_to_display_buckets() {
        let entity = ClientAssignmentEntity {
            employee_db_id: Uuid::new_v4(),
            client_id: None,
            client_name: None,
            site_name: Some("".into()),
        };
        let assignment = ClientAssignment::from_entity(&entity, &HashMap::new());
        assert_eq!(assignment.client_name.as_ref(), UNASSIGNED_CLIENT);
        assert_eq!(assignment.site_name.as_ref(), UNASSIGNED_SITE);
    }
}
