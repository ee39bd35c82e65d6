use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// Persisted manual corrections for one employee in one pay period, keyed by
/// `(employee_db_id, from, to)`.  A `None` field means "use the computed
/// baseline".  Rows are only ever overwritten, never deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetEntryEntity {
    pub employee_db_id: Uuid,
    pub from: Date,
    pub to: Date,
    #[serde(default)]
    pub pre_days: Option<f64>,
    #[serde(default)]
    pub cur_days: Option<f64>,
    #[serde(default)]
    pub ot_rate: Option<f64>,
    #[serde(default)]
    pub allow_other: Option<f64>,
    #[serde(default)]
    pub eobi: Option<f64>,
    #[serde(default)]
    pub fine_adv_extra: Option<f64>,
    #[serde(default)]
    pub bank_cash: Option<Arc<str>>,
    #[serde(default)]
    pub remarks: Option<Arc<str>>,
}

/// Partial upsert body.  One field edit produces one single-entry batch with
/// exactly one populated field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetEntryPatch {
    pub employee_db_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ot_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_other: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eobi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_adv_extra: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_cash: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<Arc<str>>,
}

impl SheetEntryPatch {
    pub fn for_employee(employee_db_id: Uuid) -> Self {
        Self {
            employee_db_id,
            ..Self::default()
        }
    }
}

impl Default for SheetEntryEntity {
    fn default() -> Self {
        Self {
            employee_db_id: Uuid::nil(),
            from: Date::MIN,
            to: Date::MIN,
            pre_days: None,
            cur_days: None,
            ot_rate: None,
            allow_other: None,
            eobi: None,
            fine_adv_extra: None,
            bank_cash: None,
            remarks: None,
        }
    }
}

#[automock]
#[async_trait]
pub trait SheetEntryGateway {
    async fn find_by_period(
        &self,
        from: Date,
        to: Date,
    ) -> Result<Arc<[SheetEntryEntity]>, crate::GatewayError>;

    /// The sole override write path.
    async fn upsert(
        &self,
        from: Date,
        to: Date,
        entries: &[SheetEntryPatch],
    ) -> Result<(), crate::GatewayError>;
}
