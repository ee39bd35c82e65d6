use std::collections::HashMap;
use std::sync::Arc;

use time::macros::date;
use time::{Date, Month};
use uuid::Uuid;

use guardpay_utils::{PayPeriodPair, ReferenceMonth};
use service::assignment::ClientAssignment;
use service::attendance::{AttendanceRecord, AttendanceStatus};
use service::employee::{Employee, EmploymentStatus};
use service::overrides::OverrideSet;
use service::payroll::{PayrollSnapshot, PeriodSelector};

use crate::payroll::compute_lines;

fn test_month() -> ReferenceMonth {
    // Current period 2025-04-26 .. 2025-05-25 (30 working days),
    // previous period 2025-03-26 .. 2025-04-25 (31 working days).
    ReferenceMonth::new(2025, Month::May)
}

fn employee(db_id: Uuid, salary: f64) -> Employee {
    Employee {
        db_id,
        employee_id: "G-0007".into(),
        full_name: "Test Guard".into(),
        total_salary: salary,
        status: EmploymentStatus::Active,
    }
}

fn record(db_id: Uuid, day: Date, status: &str) -> AttendanceRecord {
    AttendanceRecord {
        employee_db_id: db_id,
        date: day,
        status: AttendanceStatus::parse(status),
        fine_amount: 0.0,
        late_deduction: 0.0,
        overtime_minutes: 0,
        overtime_in: None,
        overtime_out: None,
    }
}

fn snapshot(
    employees: Vec<Employee>,
    attendance_current: Vec<AttendanceRecord>,
    attendance_previous: Vec<AttendanceRecord>,
) -> PayrollSnapshot {
    let month = test_month();
    PayrollSnapshot {
        periods: PayPeriodPair::for_month(month),
        split_date: month.first_day(),
        previous_split_date: month.previous().first_day(),
        employees: employees.into(),
        attendance_current: attendance_current.into(),
        attendance_previous: attendance_previous.into(),
        assignments: HashMap::new(),
        clients: Arc::new([]),
        overrides_current: HashMap::new(),
        overrides_previous: HashMap::new(),
        session_edits: HashMap::new(),
    }
}

#[test]
fn test_pipeline_counts_and_money() {
    let id = Uuid::new_v4();
    let attendance = vec![
        record(id, date!(2025 - 04 - 26), "present"),
        record(id, date!(2025 - 04 - 27), "present"),
        record(id, date!(2025 - 04 - 28), "present"),
        record(id, date!(2025 - 05 - 02), "present"),
        record(id, date!(2025 - 05 - 03), "late"),
        record(id, date!(2025 - 05 - 04), "leave"),
        record(id, date!(2025 - 05 - 05), "absent"),
    ];
    let snapshot = snapshot(vec![employee(id, 30000.0)], attendance, vec![]);
    let lines = compute_lines(&snapshot, PeriodSelector::Current);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.working_days, 30);
    assert_eq!(line.attendance.present_days, 5);
    assert_eq!(line.attendance.pre_days, 3);
    assert_eq!(line.attendance.cur_days, 2);
    assert_eq!(line.attendance.late_days, 1);
    assert_eq!(line.attendance.leave_days, 1);
    assert_eq!(line.attendance.absent_days, 1);
    // 3 + 2 + 1 leave paid days at 1000/day.
    assert_eq!(line.total_paid_days, 6.0);
    assert_eq!(line.per_day_salary, Some(1000));
    assert_eq!(line.gross_salary, Some(6000));
    assert_eq!(line.net_salary, Some(6000));
}

#[test]
fn test_records_outside_period_are_ignored() {
    let id = Uuid::new_v4();
    let attendance = vec![
        record(id, date!(2025 - 04 - 25), "present"),
        record(id, date!(2025 - 05 - 26), "present"),
        record(id, date!(2025 - 05 - 02), "present"),
    ];
    let snapshot = snapshot(vec![employee(id, 30000.0)], attendance, vec![]);
    let lines = compute_lines(&snapshot, PeriodSelector::Current);
    assert_eq!(lines[0].attendance.present_days, 1);
}

#[test]
fn test_session_edits_never_touch_the_previous_period() {
    let id = Uuid::new_v4();
    let current = vec![record(id, date!(2025 - 05 - 02), "present")];
    let previous = vec![record(id, date!(2025 - 04 - 02), "present")];
    let mut snapshot = snapshot(vec![employee(id, 31000.0)], current, previous);
    snapshot.session_edits.insert(
        id,
        OverrideSet {
            eobi: Some(500.0),
            ..OverrideSet::default()
        },
    );

    let current_line = &compute_lines(&snapshot, PeriodSelector::Current)[0];
    let previous_line = &compute_lines(&snapshot, PeriodSelector::Previous)[0];
    assert_eq!(current_line.effective.eobi, 500.0);
    assert_eq!(previous_line.effective.eobi, 0.0);
    // Previous period: 31 working days, 1 paid day at 1000/day.
    assert_eq!(previous_line.working_days, 31);
    assert_eq!(previous_line.net_salary, Some(1000));
}

#[test]
fn test_persisted_override_replaces_attendance_baseline() {
    let id = Uuid::new_v4();
    let attendance = vec![
        record(id, date!(2025 - 05 - 02), "present"),
        record(id, date!(2025 - 05 - 03), "present"),
    ];
    let mut snapshot = snapshot(vec![employee(id, 30000.0)], attendance, vec![]);
    snapshot.overrides_current.insert(
        id,
        OverrideSet {
            pre_days: Some(10.0),
            cur_days: Some(15.0),
            ..OverrideSet::default()
        },
    );
    let line = &compute_lines(&snapshot, PeriodSelector::Current)[0];
    // The raw counters stay untouched; only the effective values move.
    assert_eq!(line.attendance.cur_days, 2);
    assert_eq!(line.effective.pre_days, 10.0);
    assert_eq!(line.effective.cur_days, 15.0);
    assert_eq!(line.total_paid_days, 25.0);
    assert_eq!(line.net_salary, Some(25000));
}

#[test]
fn test_employee_without_attendance_still_gets_a_line() {
    let with_rows = Uuid::new_v4();
    let without_rows = Uuid::new_v4();
    let attendance = vec![record(with_rows, date!(2025 - 05 - 02), "present")];
    let snapshot = snapshot(
        vec![employee(with_rows, 30000.0), employee(without_rows, 24000.0)],
        attendance,
        vec![],
    );
    let lines = compute_lines(&snapshot, PeriodSelector::Current);
    assert_eq!(lines.len(), 2);
    let empty_line = lines
        .iter()
        .find(|line| line.employee.db_id == without_rows)
        .unwrap();
    assert_eq!(empty_line.total_paid_days, 0.0);
    assert_eq!(empty_line.net_salary, Some(0));
}

#[test]
fn test_bad_data_on_one_employee_does_not_block_the_rest() {
    let odd = Uuid::new_v4();
    let fine = Uuid::new_v4();
    let attendance = vec![
        record(odd, date!(2025 - 05 - 02), "???"),
        record(odd, date!(2025 - 05 - 03), "wfh"),
        record(fine, date!(2025 - 05 - 02), "present"),
    ];
    let snapshot = snapshot(
        vec![employee(odd, 0.0), employee(fine, 30000.0)],
        attendance,
        vec![],
    );
    let lines = compute_lines(&snapshot, PeriodSelector::Current);
    assert_eq!(lines.len(), 2);
    let fine_line = lines
        .iter()
        .find(|line| line.employee.db_id == fine)
        .unwrap();
    assert_eq!(fine_line.net_salary, Some(1000));
}

#[test]
fn test_split_invariant_holds_for_every_line() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let attendance = vec![
        record(first, date!(2025 - 04 - 27), "present"),
        record(first, date!(2025 - 05 - 01), "late"),
        record(first, date!(2025 - 05 - 10), "present"),
        record(second, date!(2025 - 04 - 30), "late"),
        record(second, date!(2025 - 05 - 25), "present"),
        record(second, date!(2025 - 05 - 11), "leave"),
    ];
    let snapshot = snapshot(
        vec![employee(first, 30000.0), employee(second, 27000.0)],
        attendance,
        vec![],
    );
    for line in compute_lines(&snapshot, PeriodSelector::Current).iter() {
        assert_eq!(
            line.attendance.pre_days + line.attendance.cur_days,
            line.attendance.present_days
        );
    }
}

#[test]
fn test_assignment_flows_into_the_line() {
    let id = Uuid::new_v4();
    let client_id = Uuid::new_v4();
    let mut snapshot = snapshot(vec![employee(id, 30000.0)], vec![], vec![]);
    snapshot.assignments.insert(
        id,
        ClientAssignment {
            employee_db_id: id,
            client_id: Some(client_id),
            client_name: "Acme Mills".into(),
            site_name: "Gate 3".into(),
        },
    );
    let line = &compute_lines(&snapshot, PeriodSelector::Current)[0];
    assert_eq!(line.client_id, Some(client_id));
    assert_eq!(line.client_name.as_ref(), "Acme Mills");
    assert_eq!(line.site_name.as_ref(), "Gate 3");
}

#[test]
fn test_recomputation_is_idempotent() {
    let id = Uuid::new_v4();
    let attendance = vec![
        record(id, date!(2025 - 04 - 28), "present"),
        record(id, date!(2025 - 05 - 06), "present"),
    ];
    let snapshot = snapshot(vec![employee(id, 28117.0)], attendance, vec![]);
    let first = compute_lines(&snapshot, PeriodSelector::Current);
    let second = compute_lines(&snapshot, PeriodSelector::Current);
    assert_eq!(first[0].net_salary, second[0].net_salary);
    assert_eq!(first[0], second[0]);
}
