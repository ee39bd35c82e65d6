use async_trait::async_trait;
use mockall::automock;
use time::Date;

/// Marks a pay line as paid/unpaid.  Orthogonal to the computation: the
/// engine never reads this back into a net amount.
#[automock]
#[async_trait]
pub trait PaymentStatusGateway {
    async fn upsert_status(
        &self,
        month: Date,
        employee_id: &str,
        status: &str,
    ) -> Result<(), crate::GatewayError>;
}
