use std::sync::Arc;

use gateway::sheet_entry::{SheetEntryEntity, SheetEntryPatch};
use guardpay_utils::derive_from_reference;
use serde::Serialize;
use uuid::Uuid;

use crate::attendance::AttendanceTotals;

/// Flat per-day overtime rate applied when no override exists.
pub const DEFAULT_OT_RATE: f64 = 700.0;
/// Payout channel applied when no override exists.
pub const DEFAULT_BANK_CASH: &str = "MMBL";

/// One layer of manual corrections for one employee.  The same shape is used
/// for the persisted sheet entry and for the unsaved session edits; `None`
/// means the layer does not touch that field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideSet {
    pub pre_days: Option<f64>,
    pub cur_days: Option<f64>,
    pub ot_rate: Option<f64>,
    pub allow_other: Option<f64>,
    pub eobi: Option<f64>,
    pub fine_adv_extra: Option<f64>,
    pub bank_cash: Option<Arc<str>>,
    pub remarks: Option<Arc<str>>,
}

impl OverrideSet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Folds a single-field edit into this layer.  Later edits to the same
    /// field overwrite earlier ones, there is no merge.
    pub fn apply(&mut self, edit: &OverrideEdit) {
        match edit {
            OverrideEdit::PreDays(value) => self.pre_days = Some(*value),
            OverrideEdit::CurDays(value) => self.cur_days = Some(*value),
            OverrideEdit::OtRate(value) => self.ot_rate = Some(*value),
            OverrideEdit::AllowOther(value) => self.allow_other = Some(*value),
            OverrideEdit::Eobi(value) => self.eobi = Some(*value),
            OverrideEdit::FineAdvExtra(value) => self.fine_adv_extra = Some(*value),
            OverrideEdit::BankCash(value) => self.bank_cash = Some(value.clone()),
            OverrideEdit::Remarks(value) => self.remarks = Some(value.clone()),
        }
    }
}

impl From<&SheetEntryEntity> for OverrideSet {
    fn from(entity: &SheetEntryEntity) -> Self {
        Self {
            pre_days: entity.pre_days,
            cur_days: entity.cur_days,
            ot_rate: entity.ot_rate,
            allow_other: entity.allow_other,
            eobi: entity.eobi,
            fine_adv_extra: entity.fine_adv_extra,
            bank_cash: entity.bank_cash.clone(),
            remarks: entity.remarks.clone(),
        }
    }
}
derive_from_reference!(SheetEntryEntity, OverrideSet);

/// A single manual correction to one field of one employee's sheet row.
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideEdit {
    PreDays(f64),
    CurDays(f64),
    OtRate(f64),
    AllowOther(f64),
    Eobi(f64),
    FineAdvExtra(f64),
    BankCash(Arc<str>),
    Remarks(Arc<str>),
}

impl OverrideEdit {
    /// The single-entry upsert batch sent to the backend for this edit.
    pub fn as_patch(&self, employee_db_id: Uuid) -> SheetEntryPatch {
        let mut patch = SheetEntryPatch::for_employee(employee_db_id);
        match self {
            Self::PreDays(value) => patch.pre_days = Some(*value),
            Self::CurDays(value) => patch.cur_days = Some(*value),
            Self::OtRate(value) => patch.ot_rate = Some(*value),
            Self::AllowOther(value) => patch.allow_other = Some(*value),
            Self::Eobi(value) => patch.eobi = Some(*value),
            Self::FineAdvExtra(value) => patch.fine_adv_extra = Some(*value),
            Self::BankCash(value) => patch.bank_cash = Some(value.clone()),
            Self::Remarks(value) => patch.remarks = Some(value.clone()),
        }
        patch
    }
}

/// The three-tier coalescing chain: an unsaved session edit always wins, a
/// persisted sheet entry wins over the computed baseline.
pub fn resolve<T: Clone>(session: Option<&T>, persisted: Option<&T>, baseline: T) -> T {
    session.or(persisted).cloned().unwrap_or(baseline)
}

/// Effective values after running [`resolve`] on every overridable field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectiveOverrides {
    pub pre_days: f64,
    pub cur_days: f64,
    pub ot_rate: f64,
    pub allow_other: f64,
    pub eobi: f64,
    pub fine_adv_extra: f64,
    pub bank_cash: Arc<str>,
    pub remarks: Option<Arc<str>>,
}

impl EffectiveOverrides {
    pub fn resolve(
        baseline: &AttendanceTotals,
        persisted: Option<&OverrideSet>,
        session: Option<&OverrideSet>,
    ) -> Self {
        let field =
            |layer: Option<&OverrideSet>, pick: fn(&OverrideSet) -> Option<f64>| -> Option<f64> {
                layer.and_then(pick)
            };
        let numeric = |pick: fn(&OverrideSet) -> Option<f64>, baseline_value: f64| {
            resolve(
                field(session, pick).as_ref(),
                field(persisted, pick).as_ref(),
                baseline_value,
            )
        };
        Self {
            pre_days: numeric(|o| o.pre_days, baseline.pre_days as f64),
            cur_days: numeric(|o| o.cur_days, baseline.cur_days as f64),
            ot_rate: numeric(|o| o.ot_rate, DEFAULT_OT_RATE),
            allow_other: numeric(|o| o.allow_other, 0.0),
            eobi: numeric(|o| o.eobi, 0.0),
            fine_adv_extra: numeric(|o| o.fine_adv_extra, 0.0),
            bank_cash: resolve(
                session.and_then(|o| o.bank_cash.as_ref()),
                persisted.and_then(|o| o.bank_cash.as_ref()),
                DEFAULT_BANK_CASH.into(),
            ),
            remarks: session
                .and_then(|o| o.remarks.clone())
                .or_else(|| persisted.and_then(|o| o.remarks.clone())),
        }
    }
}
