use std::sync::Arc;

use thiserror::Error;

pub mod assignment;
pub mod attendance;
pub mod client;
pub mod employee;
pub mod payment_status;
pub mod sheet_entry;

/// Error raised by the REST backend owning the payroll source data.  The
/// engine never sees transport details beyond this.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend request error: {0}")]
    RequestError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Backend rejected the request: {0}")]
    Rejected(Arc<str>),
}
