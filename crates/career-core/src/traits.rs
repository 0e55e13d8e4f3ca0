use async_trait::async_trait;
use crate::{CareerResult, UserFinancialData};

/// Source of per-user financial profiles.
///
/// The base URL is supplied per call because each analysis request may name
/// its own upstream service.
#[async_trait]
pub trait FinancialDataSource: Send + Sync {
    async fn fetch_financial_data(
        &self,
        base_url: &str,
        user_id: &str,
    ) -> CareerResult<UserFinancialData>;
}
