use crate::core::busy::BusyFlag;
use crate::domain::form::DebtForm;
use crate::domain::model::{BonusImpactResult, HealthStatus, OptimizationResult, OptimizeRequest};
use crate::domain::ports::{Mailer, OptimizerApi, Storage};
use crate::render::chart::ChartSeries;
use crate::render::pdf::{pdf_filename, render_pdf, PlanDocument};
use crate::render::summary::EmailSummary;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A successful submission: what was sent and what came back.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub request: OptimizeRequest,
    pub result: OptimizationResult,
    pub chart: ChartSeries,
}

pub struct PlanEngine<O: OptimizerApi, S: Storage> {
    optimizer: O,
    storage: S,
    mailer: Option<Arc<dyn Mailer>>,
    busy: BusyFlag,
}

impl<O: OptimizerApi, S: Storage> PlanEngine<O, S> {
    pub fn new(optimizer: O, storage: S) -> Self {
        Self {
            optimizer,
            storage,
            mailer: None,
            busy: BusyFlag::new(),
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn busy_flag(&self) -> &BusyFlag {
        &self.busy
    }

    pub async fn check_backend(&self) -> Result<HealthStatus> {
        let health = self.optimizer.health().await?;
        if health.is_healthy() {
            tracing::info!("✅ Optimizer is {} (ai: {})", health.status, health.ai);
        } else {
            tracing::warn!("⚠️ Optimizer reported status '{}'", health.status);
        }
        Ok(health)
    }

    pub async fn submit(&self, form: &DebtForm) -> Result<PlanOutcome> {
        let request = form.to_request()?;
        let _guard = self.busy.try_acquire("optimize")?;

        tracing::info!(
            "🚀 Optimizing {} debts with a £{:.2} monthly budget",
            request.debts.len(),
            request.monthly_budget
        );
        let result = self.optimizer.optimize(&request).await?;
        let chart = ChartSeries::from_result(&result);

        let recommended = result.recommended_strategy();
        tracing::info!(
            "✅ Recommended {}: debt free in {} months, £{:.2} interest",
            result.recommended_kind().short_label(),
            recommended.months_to_freedom,
            recommended.total_interest
        );

        Ok(PlanOutcome {
            request,
            result,
            chart,
        })
    }

    pub async fn bonus_impact(
        &self,
        form: &DebtForm,
        extra_payment: Decimal,
    ) -> Result<BonusImpactResult> {
        let request = form.to_bonus_request(extra_payment)?;
        let _guard = self.busy.try_acquire("bonus impact")?;

        tracing::info!("💰 Calculating impact of a £{:.2} extra payment", extra_payment);
        let impact = self.optimizer.bonus_impact(&request).await?;
        tracing::info!(
            "✅ Extra payment saves {} months and £{:.2}",
            impact.savings.months,
            impact.savings.interest
        );
        Ok(impact)
    }

    /// Builds the whole document before anything is written, so a failed
    /// render never leaves a partial file behind.
    pub async fn export_pdf(&self, outcome: &PlanOutcome, today: NaiveDate) -> Result<String> {
        let _guard = self.busy.try_acquire("PDF export")?;

        let pdf = render_pdf(&PlanDocument {
            debts: &outcome.request.debts,
            monthly_budget: outcome.request.monthly_budget,
            result: &outcome.result,
            generated_on: today,
        })?;
        let path = self
            .storage
            .write_file(&pdf_filename(today), &pdf.bytes)
            .await?;

        tracing::info!("📄 PDF saved to {} ({} pages)", path, pdf.pages);
        Ok(path)
    }

    pub async fn export_chart_csv(&self, outcome: &PlanOutcome, today: NaiveDate) -> Result<String> {
        let csv = outcome.chart.to_csv()?;
        let filename = format!("DebtClear-AI-Chart-{}.csv", today.format("%Y-%m-%d"));
        let path = self.storage.write_file(&filename, csv.as_bytes()).await?;
        tracing::info!("📈 Chart data ({} months) saved to {}", outcome.chart.len(), path);
        Ok(path)
    }

    pub async fn export_json(&self, outcome: &PlanOutcome, today: NaiveDate) -> Result<String> {
        let json = serde_json::to_string_pretty(&outcome.result)?;
        let filename = format!("DebtClear-AI-Result-{}.json", today.format("%Y-%m-%d"));
        let path = self.storage.write_file(&filename, json.as_bytes()).await?;
        tracing::info!("🗂️ Raw result saved to {}", path);
        Ok(path)
    }

    pub async fn email_summary(
        &self,
        outcome: &PlanOutcome,
        name: &str,
        email: &str,
        today: NaiveDate,
    ) -> Result<bool> {
        let mailer = validate_required_field("email", &self.mailer)?;
        let summary = EmailSummary::from_result(name, email, &outcome.result, today)?;
        let _guard = self.busy.try_acquire("email")?;

        let sent = mailer.send_summary(&summary).await?;
        if !sent {
            tracing::error!("❌ Plan summary was not delivered to {}", summary.to_email);
        }
        Ok(sent)
    }
}
