use crate::domain::model::{
    BonusImpactRequest, BonusImpactResponse, BonusImpactResult, HealthStatus, OptimizationResult,
    OptimizeRequest,
};
use crate::domain::ports::{ConfigProvider, OptimizerApi};
use crate::utils::error::{DebtClearError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client for the optimization backend.
#[derive(Debug, Clone)]
pub struct OptimizerClient {
    base_url: String,
    client: Client,
}

impl OptimizerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.backend_url(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("Backend response status: {}", status);
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DebtClearError::ApiStatusError {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl OptimizerApi for OptimizerClient {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizationResult> {
        let url = self.url("/optimize");
        tracing::debug!(
            "POST {} with {} debts, budget £{:.2}",
            url,
            request.debts.len(),
            request.monthly_budget
        );

        let response = self.client.post(&url).json(request).send().await?;
        let result: OptimizationResult = Self::check_status(response).await?.json().await?;

        if !result.success {
            return Err(DebtClearError::BackendError {
                message: result
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        tracing::debug!(
            "Optimizer recommended '{}' with {} explanations",
            result.recommended,
            result.explanations.len()
        );
        Ok(result)
    }

    async fn bonus_impact(&self, request: &BonusImpactRequest) -> Result<BonusImpactResult> {
        let url = self.url("/calculate-bonus-impact");
        tracing::debug!("POST {} with extra payment £{:.2}", url, request.extra_payment);

        let response = self.client.post(&url).json(request).send().await?;
        let body: BonusImpactResponse = Self::check_status(response).await?.json().await?;

        match (body.success, body.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(DebtClearError::BackendError {
                message: "Response did not include a result".to_string(),
            }),
            (false, _) => Err(DebtClearError::BackendError {
                message: body.error.unwrap_or_else(|| "Unknown error".to_string()),
            }),
        }
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.url("/health")).send().await?;
        let status: HealthStatus = Self::check_status(response).await?.json().await?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Debt, DebtType};
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;

    fn client_for(server: &MockServer) -> OptimizerClient {
        OptimizerClient::new(server.base_url(), Duration::from_secs(5)).unwrap()
    }

    fn request() -> OptimizeRequest {
        OptimizeRequest {
            debts: vec![Debt::new("Visa", DebtType::CreditCard, dec!(1500), dec!(45))],
            monthly_budget: dec!(300),
        }
    }

    #[tokio::test]
    async fn test_optimize_posts_camel_case_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/optimize")
                .json_body_partial(r#"{"monthlyBudget": 300.0}"#);
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "recommended": "hybrid",
                "strategies": {
                    "avalanche": {"months_to_freedom": 6, "total_interest": 80.0, "timeline": []},
                    "snowball": {"months_to_freedom": 6, "total_interest": 80.0, "timeline": []},
                    "hybrid": {"months_to_freedom": 6, "total_interest": 80.0, "timeline": []}
                },
                "explanations": []
            }));
        });

        let result = client_for(&server).optimize(&request()).await.unwrap();

        mock.assert();
        assert_eq!(result.strategies.hybrid.months_to_freedom, 6);
    }

    #[tokio::test]
    async fn test_optimize_maps_success_false_to_backend_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/optimize");
            then.status(200)
                .json_body(serde_json::json!({"success": false, "error": "bad debts"}));
        });

        let err = client_for(&server).optimize(&request()).await.unwrap_err();
        assert!(matches!(err, DebtClearError::BackendError { ref message } if message == "bad debts"));
    }

    #[tokio::test]
    async fn test_optimize_maps_http_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/optimize");
            then.status(500).body("internal");
        });

        let err = client_for(&server).optimize(&request()).await.unwrap_err();
        assert!(matches!(err, DebtClearError::ApiStatusError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200)
                .json_body(serde_json::json!({"status": "healthy", "ai": "ready"}));
        });

        let health = client_for(&server).health().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.ai, "ready");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = OptimizerClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/optimize"), "http://localhost:8000/optimize");
    }
}
