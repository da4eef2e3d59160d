use crate::domain::model::{
    BonusImpactRequest, BonusImpactResult, HealthStatus, OptimizationResult, OptimizeRequest,
};
use crate::render::summary::EmailSummary;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
}

/// The remote optimization backend. Treated as opaque: only the JSON shapes
/// are known here.
#[async_trait]
pub trait OptimizerApi: Send + Sync {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizationResult>;
    async fn bonus_impact(&self, request: &BonusImpactRequest) -> Result<BonusImpactResult>;
    async fn health(&self) -> Result<HealthStatus>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns `Ok(false)` when the provider refused the message.
    async fn send_summary(&self, summary: &EmailSummary) -> Result<bool>;
}
