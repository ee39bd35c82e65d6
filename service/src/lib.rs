use thiserror::Error;
use uuid::Uuid;

pub mod assignment;
pub mod attendance;
pub mod employee;
pub mod overrides;
pub mod payroll;
pub mod report;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] gateway::GatewayError),

    #[error("Invalid reference month: {0}")]
    Period(#[from] guardpay_utils::PayPeriodError),

    #[error("No pay period loaded")]
    NoPeriodLoaded,

    #[error("Unknown employee: {0}")]
    UnknownEmployee(Uuid),

    /// The optimistic local edit could not be persisted.  All session state
    /// was discarded and the snapshot reloaded from the backend before this
    /// error was returned.
    #[error("Override discarded after failed persistence: {0}")]
    OverrideDiscarded(gateway::GatewayError),
}
