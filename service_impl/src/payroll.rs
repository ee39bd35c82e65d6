use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gateway::assignment::AssignmentGateway;
use gateway::attendance::AttendanceGateway;
use gateway::client::ClientGateway;
use gateway::employee::EmployeeGateway;
use gateway::payment_status::PaymentStatusGateway;
use gateway::sheet_entry::SheetEntryGateway;
use guardpay_utils::{PayPeriodPair, ReferenceMonth};
use service::assignment::{Client, ClientAssignment};
use service::attendance::{AttendanceRecord, AttendanceTotals};
use service::employee::Employee;
use service::overrides::{EffectiveOverrides, OverrideEdit, OverrideSet};
use service::payroll::{PaymentStatus, PayrollLine, PayrollSnapshot, PeriodSelector};
use service::ServiceError;

/// Upper bound passed to the employee listing; the roster is far below this.
const EMPLOYEE_FETCH_LIMIT: u32 = 1000;

pub trait IteratorExt {
    fn collect_to_hash_map_by<K, F>(self, f: F) -> HashMap<K, Vec<Self::Item>>
    where
        Self: Iterator + Sized,
        K: Clone + Eq + std::hash::Hash,
        F: Fn(&Self::Item) -> K,
    {
        self.fold(HashMap::new(), |mut map, item| {
            let key = f(&item);
            map.entry(key).or_insert_with(Vec::new).push(item);
            map
        })
    }
}
impl<T> IteratorExt for T where T: Iterator {}

#[test]
pub fn test_grouping_keeps_every_row_under_its_key() {
    let rows = vec![("gate-1", 1000), ("dock", 750), ("gate-1", 250)];
    let by_site = rows.iter().collect_to_hash_map_by(|row| row.0);
    assert_eq!(by_site.len(), 2);
    let gate_total: i32 = by_site.get("gate-1").unwrap().iter().map(|row| row.1).sum();
    assert_eq!(gate_total, 1250);
    assert_eq!(by_site.get("dock").unwrap().len(), 1);
}

/// Where the engine stands with respect to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    /// Snapshot mirrors the last successful fetch, no unsaved edits.
    Clean,
    /// At least one session edit has been applied locally.  The edits stay
    /// authoritative until the next full reload even after their upserts
    /// succeed.
    Dirty,
    /// A persist failed; the engine is discarding local state and reloading.
    Reconciling,
}

#[derive(Debug)]
pub struct EngineState {
    pub month: ReferenceMonth,
    pub snapshot: PayrollSnapshot,
    pub sync: SyncState,
}

/// Derives the pay lines of one period from the snapshot.  Pure: no gateway,
/// no state, same input gives the bit-identical output.  Every call starts
/// from the raw rows again; lines are never incrementally patched.
pub fn compute_lines(snapshot: &PayrollSnapshot, period: PeriodSelector) -> Arc<[PayrollLine]> {
    let (pay_period, split_date, attendance, overrides, session_edits) = match period {
        PeriodSelector::Current => (
            snapshot.periods.current,
            snapshot.split_date,
            &snapshot.attendance_current,
            &snapshot.overrides_current,
            Some(&snapshot.session_edits),
        ),
        // The previous period is a pure server-side replay: session edits
        // only ever target the current sheet.
        PeriodSelector::Previous => (
            snapshot.periods.previous,
            snapshot.previous_split_date,
            &snapshot.attendance_previous,
            &snapshot.overrides_previous,
            None,
        ),
    };
    let working_days = pay_period.working_days();
    let by_employee = attendance
        .iter()
        .filter(|record| pay_period.contains(record.date))
        .collect_to_hash_map_by(|record| record.employee_db_id);

    snapshot
        .employees
        .iter()
        .map(|employee| {
            let records = by_employee
                .get(&employee.db_id)
                .map(|records| records.as_slice())
                .unwrap_or(&[]);
            let totals = AttendanceTotals::from_records(records.iter().copied(), split_date);
            let effective = EffectiveOverrides::resolve(
                &totals,
                overrides.get(&employee.db_id),
                session_edits.and_then(|edits| edits.get(&employee.db_id)),
            );
            PayrollLine::compute(
                Arc::new(employee.clone()),
                totals,
                effective,
                snapshot.assignments.get(&employee.db_id),
                working_days,
            )
        })
        .collect()
}

pub trait PayrollServiceDeps {
    type EmployeeGateway: EmployeeGateway + Sync + Send;
    type AttendanceGateway: AttendanceGateway + Sync + Send;
    type AssignmentGateway: AssignmentGateway + Sync + Send;
    type ClientGateway: ClientGateway + Sync + Send;
    type SheetEntryGateway: SheetEntryGateway + Sync + Send;
    type PaymentStatusGateway: PaymentStatusGateway + Sync + Send;
}

/// The stateful engine facade.  Not generated with `gen_service_impl!`
/// because it carries the snapshot state next to its dependencies.
pub struct PayrollServiceImpl<Deps: PayrollServiceDeps> {
    pub employee_gateway: Arc<Deps::EmployeeGateway>,
    pub attendance_gateway: Arc<Deps::AttendanceGateway>,
    pub assignment_gateway: Arc<Deps::AssignmentGateway>,
    pub client_gateway: Arc<Deps::ClientGateway>,
    pub sheet_entry_gateway: Arc<Deps::SheetEntryGateway>,
    pub payment_status_gateway: Arc<Deps::PaymentStatusGateway>,
    pub state: RwLock<Option<EngineState>>,
}

impl<Deps: PayrollServiceDeps> PayrollServiceImpl<Deps> {
    pub fn new(
        employee_gateway: Arc<Deps::EmployeeGateway>,
        attendance_gateway: Arc<Deps::AttendanceGateway>,
        assignment_gateway: Arc<Deps::AssignmentGateway>,
        client_gateway: Arc<Deps::ClientGateway>,
        sheet_entry_gateway: Arc<Deps::SheetEntryGateway>,
        payment_status_gateway: Arc<Deps::PaymentStatusGateway>,
    ) -> Self {
        Self {
            employee_gateway,
            attendance_gateway,
            assignment_gateway,
            client_gateway,
            sheet_entry_gateway,
            payment_status_gateway,
            state: RwLock::new(None),
        }
    }

    /// One full fetch of everything a payroll run needs.  All datasets are
    /// loaded together so a snapshot is always internally consistent.
    async fn fetch_state(&self, month: ReferenceMonth) -> Result<EngineState, ServiceError> {
        let periods = PayPeriodPair::for_month(month);
        let (employees, attendance_current, attendance_previous, assignments, clients, sheets_current, sheets_previous) = tokio::join!(
            self.employee_gateway.find_all(EMPLOYEE_FETCH_LIMIT),
            self.attendance_gateway.find_by_date_range(
                periods.current.from_date(),
                periods.current.to_date(),
            ),
            self.attendance_gateway.find_by_date_range(
                periods.previous.from_date(),
                periods.previous.to_date(),
            ),
            self.assignment_gateway.find_active(),
            self.client_gateway.find_all(),
            self.sheet_entry_gateway.find_by_period(
                periods.current.from_date(),
                periods.current.to_date(),
            ),
            self.sheet_entry_gateway.find_by_period(
                periods.previous.from_date(),
                periods.previous.to_date(),
            ),
        );

        let employees: Arc<[Employee]> = employees?
            .iter()
            .map(Employee::from)
            .filter(|employee| employee.status.is_payroll_eligible())
            .collect();
        let attendance_current: Arc<[AttendanceRecord]> = attendance_current?
            .iter()
            .map(AttendanceRecord::from)
            .collect();
        let attendance_previous: Arc<[AttendanceRecord]> = attendance_previous?
            .iter()
            .map(AttendanceRecord::from)
            .collect();
        let clients: Arc<[Client]> = clients?.iter().map(Client::from).collect();
        let client_names: HashMap<Uuid, Arc<str>> = clients
            .iter()
            .map(|client| (client.id, client.name.clone()))
            .collect();
        let assignments: HashMap<Uuid, ClientAssignment> = assignments?
            .iter()
            .map(|entity| {
                (
                    entity.employee_db_id,
                    ClientAssignment::from_entity(entity, &client_names),
                )
            })
            .collect();
        let overrides_current: HashMap<Uuid, OverrideSet> = sheets_current?
            .iter()
            .map(|entity| (entity.employee_db_id, OverrideSet::from(entity)))
            .collect();
        let overrides_previous: HashMap<Uuid, OverrideSet> = sheets_previous?
            .iter()
            .map(|entity| (entity.employee_db_id, OverrideSet::from(entity)))
            .collect();

        let unassigned = employees
            .iter()
            .filter(|employee| !assignments.contains_key(&employee.db_id))
            .count();
        if unassigned > 0 {
            debug!(
                "{} eligible employees have no active assignment and bill as unassigned",
                unassigned
            );
        }
        info!(
            "Loaded payroll snapshot for {}: {} eligible employees, {} clients",
            month,
            employees.len(),
            clients.len()
        );

        Ok(EngineState {
            month,
            snapshot: PayrollSnapshot {
                periods,
                split_date: month.first_day(),
                previous_split_date: month.previous().first_day(),
                employees,
                attendance_current,
                attendance_previous,
                assignments,
                clients,
                overrides_current,
                overrides_previous,
                session_edits: HashMap::new(),
            },
            sync: SyncState::Clean,
        })
    }
}

#[async_trait]
impl<Deps: PayrollServiceDeps> service::payroll::PayrollService for PayrollServiceImpl<Deps> {
    async fn load_month(&self, month: ReferenceMonth) -> Result<(), ServiceError> {
        let fresh = self.fetch_state(month).await?;
        *self.state.write().await = Some(fresh);
        Ok(())
    }

    async fn lines(&self, period: PeriodSelector) -> Result<Arc<[PayrollLine]>, ServiceError> {
        let guard = self.state.read().await;
        let state = guard.as_ref().ok_or(ServiceError::NoPeriodLoaded)?;
        Ok(compute_lines(&state.snapshot, period))
    }

    async fn apply_override(
        &self,
        employee_db_id: Uuid,
        edit: OverrideEdit,
    ) -> Result<Arc<[PayrollLine]>, ServiceError> {
        // Optimistic local apply: the caller sees the edited numbers before
        // the backend has confirmed anything.  The lock is released before
        // the upsert so other edits are not serialized behind the backend.
        let (lines, period, month) = {
            let mut guard = self.state.write().await;
            let state = guard.as_mut().ok_or(ServiceError::NoPeriodLoaded)?;
            if !state.snapshot.has_employee(employee_db_id) {
                return Err(ServiceError::UnknownEmployee(employee_db_id));
            }
            state.snapshot.merge_session_edit(employee_db_id, &edit);
            state.sync = SyncState::Dirty;
            let lines = compute_lines(&state.snapshot, PeriodSelector::Current);
            (lines, state.snapshot.periods.current, state.month)
        };

        let patch = edit.as_patch(employee_db_id);
        match self
            .sheet_entry_gateway
            .upsert(period.from_date(), period.to_date(), &[patch])
            .await
        {
            Ok(()) => Ok(lines),
            Err(error) => {
                // No per-field rollback: every session edit is discarded and
                // the whole snapshot rebuilt from the backend.
                warn!(
                    %error,
                    "Sheet entry upsert failed, discarding session edits and reloading"
                );
                let mut guard = self.state.write().await;
                // A load_month that ran meanwhile already replaced the state
                // and dropped every session edit with it.
                let same_month = matches!(guard.as_ref(), Some(state) if state.month == month);
                if same_month {
                    if let Some(state) = guard.as_mut() {
                        state.sync = SyncState::Reconciling;
                        state.snapshot.clear_session_edits();
                    }
                    let fresh = self.fetch_state(month).await?;
                    *guard = Some(fresh);
                }
                Err(ServiceError::OverrideDiscarded(error))
            }
        }
    }

    async fn mark_payment(
        &self,
        employee_id: &str,
        status: PaymentStatus,
    ) -> Result<(), ServiceError> {
        let month = {
            let guard = self.state.read().await;
            let state = guard.as_ref().ok_or(ServiceError::NoPeriodLoaded)?;
            state.month
        };
        self.payment_status_gateway
            .upsert_status(month.first_day(), employee_id, status.as_str())
            .await?;
        Ok(())
    }
}
