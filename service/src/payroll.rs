use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use guardpay_utils::{PayPeriodPair, ReferenceMonth};

use crate::assignment::{Client, ClientAssignment, UNASSIGNED_CLIENT, UNASSIGNED_SITE};
use crate::attendance::{AttendanceRecord, AttendanceTotals};
use crate::employee::Employee;
use crate::overrides::{EffectiveOverrides, OverrideEdit, OverrideSet};
use crate::ServiceError;

/// Which of the two loaded pay periods a query refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodSelector {
    Current,
    Previous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        }
    }
}

/// Everything one payroll run derives from, as one explicit value object.
/// Lines are never stored: they are recomputed from the snapshot on every
/// query, so a snapshot plus its session edits fully determines every number
/// shown.
#[derive(Clone, Debug, PartialEq)]
pub struct PayrollSnapshot {
    pub periods: PayPeriodPair,
    /// First day of the reference calendar month, the pre/cur split point.
    pub split_date: Date,
    /// Same split for the previous period's reference month.
    pub previous_split_date: Date,
    /// Already filtered to payroll-eligible employees.
    pub employees: Arc<[Employee]>,
    pub attendance_current: Arc<[AttendanceRecord]>,
    pub attendance_previous: Arc<[AttendanceRecord]>,
    pub assignments: HashMap<Uuid, ClientAssignment>,
    pub clients: Arc<[Client]>,
    /// Persisted sheet-entry overrides, keyed by employee db id.
    pub overrides_current: HashMap<Uuid, OverrideSet>,
    pub overrides_previous: HashMap<Uuid, OverrideSet>,
    /// Unsaved edits made since the last load.  Cleared on every reload.
    pub session_edits: HashMap<Uuid, OverrideSet>,
}

impl PayrollSnapshot {
    pub fn has_employee(&self, employee_db_id: Uuid) -> bool {
        self.employees
            .iter()
            .any(|employee| employee.db_id == employee_db_id)
    }

    /// Folds one edit into the session layer.  Last write per field wins.
    pub fn merge_session_edit(&mut self, employee_db_id: Uuid, edit: &OverrideEdit) {
        self.session_edits
            .entry(employee_db_id)
            .or_default()
            .apply(edit);
    }

    pub fn clear_session_edits(&mut self) {
        self.session_edits.clear();
    }
}

/// One employee's fully reconciled pay line.  Derived, never stored, never
/// patched in place.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PayrollLine {
    pub employee: Arc<Employee>,
    pub client_id: Option<Uuid>,
    pub client_name: Arc<str>,
    pub site_name: Arc<str>,
    pub working_days: u32,
    pub attendance: AttendanceTotals,
    /// Resolved override values feeding the money fields below.
    pub effective: EffectiveOverrides,
    pub total_paid_days: f64,
    /// Rounded for display; the unrounded quotient feeds the computation.
    /// `None` when `working_days` is zero, which is an upstream defect the
    /// line surfaces instead of papering over.
    pub per_day_salary: Option<i64>,
    pub overtime_pay: i64,
    pub gross_salary: Option<i64>,
    /// Fines and late deductions only; eobi and fine/advance extras are
    /// subtracted from net but reported separately.
    pub deductions: i64,
    pub net_salary: Option<i64>,
}

impl PayrollLine {
    pub fn compute(
        employee: Arc<Employee>,
        attendance: AttendanceTotals,
        effective: EffectiveOverrides,
        assignment: Option<&ClientAssignment>,
        working_days: u32,
    ) -> Self {
        let total_paid_days =
            effective.pre_days + effective.cur_days + attendance.leave_days as f64;
        // Flat rate per OT day; the captured minutes never enter the money.
        let overtime_exact = attendance.ot_days as f64 * effective.ot_rate;

        let (per_day_salary, gross_salary, net_salary) = if working_days == 0 {
            (None, None, None)
        } else {
            let per_day = employee.total_salary / working_days as f64;
            let gross_base = total_paid_days * per_day;
            let additions = gross_base + overtime_exact + effective.allow_other;
            let net = additions
                - attendance.total_fines
                - effective.eobi
                - effective.fine_adv_extra;
            (
                Some(per_day.round() as i64),
                Some(additions.round() as i64),
                Some(net.round() as i64),
            )
        };

        Self {
            employee,
            client_id: assignment.and_then(|a| a.client_id),
            client_name: assignment
                .map(|a| a.client_name.clone())
                .unwrap_or_else(|| UNASSIGNED_CLIENT.into()),
            site_name: assignment
                .map(|a| a.site_name.clone())
                .unwrap_or_else(|| UNASSIGNED_SITE.into()),
            working_days,
            total_paid_days,
            per_day_salary,
            overtime_pay: overtime_exact.round() as i64,
            gross_salary,
            deductions: attendance.total_fines.round() as i64,
            net_salary,
            attendance,
            effective,
        }
    }
}

#[automock]
#[async_trait]
pub trait PayrollService {
    /// Full-state reset: drops every session edit and refetches all source
    /// datasets for the given reference month before anything is computed.
    async fn load_month(&self, month: ReferenceMonth) -> Result<(), ServiceError>;

    /// Recomputes the pay lines of the selected period from the current
    /// snapshot.
    async fn lines(&self, period: PeriodSelector) -> Result<Arc<[PayrollLine]>, ServiceError>;

    /// Applies the edit optimistically to the session layer, returns the
    /// recomputed current-period lines, and persists the edit as a
    /// single-entry upsert.  If persistence fails the whole local override
    /// state is discarded, the snapshot reloaded, and
    /// [`ServiceError::OverrideDiscarded`] returned.
    async fn apply_override(
        &self,
        employee_db_id: Uuid,
        edit: OverrideEdit,
    ) -> Result<Arc<[PayrollLine]>, ServiceError>;

    /// Marks a line paid/unpaid.  Does not influence any computed amount.
    async fn mark_payment(
        &self,
        employee_id: &str,
        status: PaymentStatus,
    ) -> Result<(), ServiceError>;
}
