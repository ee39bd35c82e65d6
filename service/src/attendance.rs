use std::sync::Arc;

use serde::Serialize;
use time::Date;
use uuid::Uuid;

use gateway::attendance::AttendanceRecordEntity;
use guardpay_utils::derive_from_reference;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Leave,
    Other(Arc<str>),
}

impl AttendanceStatus {
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "present" => Self::Present,
            "late" => Self::Late,
            "absent" => Self::Absent,
            "leave" => Self::Leave,
            _ => Self::Other(status.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub employee_db_id: Uuid,
    pub date: Date,
    pub status: AttendanceStatus,
    pub fine_amount: f64,
    pub late_deduction: f64,
    pub overtime_minutes: u32,
    pub overtime_in: Option<Arc<str>>,
    pub overtime_out: Option<Arc<str>>,
}

impl AttendanceRecord {
    /// Overtime is paid as a flat per-day rate.  A day only counts when both
    /// the in and the out stamp were captured; the minutes are display-only.
    pub fn is_overtime_day(&self) -> bool {
        let stamped = |stamp: &Option<Arc<str>>| {
            stamp.as_deref().is_some_and(|value| !value.is_empty())
        };
        stamped(&self.overtime_in) && stamped(&self.overtime_out)
    }
}

impl From<&AttendanceRecordEntity> for AttendanceRecord {
    fn from(entity: &AttendanceRecordEntity) -> Self {
        Self {
            employee_db_id: entity.employee_db_id,
            date: entity.date,
            status: AttendanceStatus::parse(&entity.status),
            fine_amount: entity.fine_amount,
            late_deduction: entity.late_deduction,
            overtime_minutes: entity.overtime_minutes,
            overtime_in: entity.overtime_in.clone(),
            overtime_out: entity.overtime_out.clone(),
        }
    }
}
derive_from_reference!(AttendanceRecordEntity, AttendanceRecord);

/// Period-level counters for one employee, reduced from the raw daily rows in
/// a single pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AttendanceTotals {
    pub present_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub late_days: u32,
    /// Present days dated before the calendar month start of the reference
    /// month.  The split is the calendar boundary, not the pay period
    /// boundary: a 26th-to-25th period always straddles two calendar months
    /// and the sheet shows both buckets separately.
    pub pre_days: u32,
    /// Present days on or after the calendar month start.
    pub cur_days: u32,
    pub total_fines: f64,
    pub overtime_minutes: u32,
    pub ot_days: u32,
}

impl AttendanceTotals {
    pub fn from_records<'a, I>(records: I, split_date: Date) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        records.into_iter().fold(Self::default(), |mut totals, record| {
            match record.status {
                AttendanceStatus::Present | AttendanceStatus::Late => {
                    totals.present_days += 1;
                    if record.date < split_date {
                        totals.pre_days += 1;
                    } else {
                        totals.cur_days += 1;
                    }
                    if record.status == AttendanceStatus::Late {
                        totals.late_days += 1;
                    }
                }
                AttendanceStatus::Absent => totals.absent_days += 1,
                AttendanceStatus::Leave => totals.leave_days += 1,
                // Unknown statuses do not count towards any day bucket.
                AttendanceStatus::Other(_) => {}
            }
            // Fines apply regardless of the day's status.
            totals.total_fines += record.fine_amount + record.late_deduction;
            totals.overtime_minutes += record.overtime_minutes;
            if record.is_overtime_day() {
                totals.ot_days += 1;
            }
            totals
        })
    }
}
