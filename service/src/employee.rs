use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use gateway::employee::EmployeeEntity;
use guardpay_utils::derive_from_reference;

/// Employment states as the backend reports them.  The backend is not
/// consistent about casing ("Active" and "active" both occur), so parsing is
/// case-insensitive for the known states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum EmploymentStatus {
    Active,
    Suspended,
    Inactive,
    Other(Arc<str>),
}

impl EmploymentStatus {
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "suspended" => Self::Suspended,
            "inactive" => Self::Inactive,
            _ => Self::Other(status.into()),
        }
    }

    /// Active, suspended and inactive guards all still get a pay line.
    /// Terminated and other unknown states are excluded from the run.
    pub fn is_payroll_eligible(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Employee {
    pub db_id: Uuid,
    pub employee_id: Arc<str>,
    pub full_name: Arc<str>,
    /// Effective monthly salary after the fallback chain, see
    /// [`effective_salary`].
    pub total_salary: f64,
    pub status: EmploymentStatus,
}

/// The master data has three salary columns of different vintage.  The total
/// is authoritative when set; older rows only carry one of the other two.
pub fn effective_salary(entity: &EmployeeEntity) -> f64 {
    match [entity.total_salary, entity.basic_salary, entity.salary]
        .into_iter()
        .find(|salary| *salary != 0.0)
    {
        Some(salary) => {
            if entity.total_salary == 0.0 {
                debug!(
                    "Employee {} has no total salary, falling back to {}",
                    entity.employee_id, salary
                );
            }
            salary
        }
        None => {
            warn!("Employee {} has no salary in any column", entity.employee_id);
            0.0
        }
    }
}

impl From<&EmployeeEntity> for Employee {
    fn from(entity: &EmployeeEntity) -> Self {
        Self {
            db_id: entity.db_id,
            employee_id: entity.employee_id.clone(),
            full_name: entity.full_name.clone(),
            total_salary: effective_salary(entity),
            status: EmploymentStatus::parse(&entity.status),
        }
    }
}
derive_from_reference!(EmployeeEntity, Employee);

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(status: &str, total: f64, basic: f64, salary: f64) -> EmployeeEntity {
        EmployeeEntity {
            db_id: Uuid::new_v4(),
            employee_id: "G-0042".into(),
            full_name: "Test Guard".into(),
            status: status.into(),
            total_salary: total,
            basic_salary: basic,
            salary,
        }
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!(EmploymentStatus::parse("Active"), EmploymentStatus::Active);
        assert_eq!(EmploymentStatus::parse("active"), EmploymentStatus::Active);
        assert_eq!(
            EmploymentStatus::parse("SUSPENDED"),
            EmploymentStatus::Suspended
        );
        assert_eq!(
            EmploymentStatus::parse("Terminated"),
            EmploymentStatus::Other("Terminated".into())
        );
    }

    #[test]
    fn test_eligibility() {
        assert!(EmploymentStatus::Active.is_payroll_eligible());
        assert!(EmploymentStatus::Suspended.is_payroll_eligible());
        assert!(EmploymentStatus::Inactive.is_payroll_eligible());
        assert!(!EmploymentStatus::Other("Terminated".into()).is_payroll_eligible());
    }

    #[test]
    fn test_salary_fallback_chain() {
        assert_eq!(effective_salary(&entity("Active", 30000.0, 25000.0, 20000.0)), 30000.0);
        assert_eq!(effective_salary(&entity("Active", 0.0, 25000.0, 20000.0)), 25000.0);
        assert_eq!(effective_salary(&entity("Active", 0.0, 0.0, 20000.0)), 20000.0);
        assert_eq!(effective_salary(&entity("Active", 0.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_conversion_applies_fallback() {
        let employee = Employee::from(&entity("active", 0.0, 28000.0, 0.0));
        assert_eq!(employee.total_salary, 28000.0);
        assert_eq!(employee.status, EmploymentStatus::Active);
    }
}
