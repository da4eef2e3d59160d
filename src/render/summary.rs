use crate::domain::model::OptimizationResult;
use crate::render::format_currency;
use crate::utils::error::Result;
use crate::utils::validation::{validate_email, validate_non_empty_string};
use chrono::{Months, NaiveDate};
use serde::Serialize;

/// What gets emailed to the user after a successful optimization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailSummary {
    pub to_name: String,
    pub to_email: String,
    pub months: u32,
    pub strategy: String,
    pub interest: String,
    pub savings: String,
    pub explanation: String,
    pub target_date: String,
}

impl EmailSummary {
    pub fn from_result(
        name: &str,
        email: &str,
        result: &OptimizationResult,
        today: NaiveDate,
    ) -> Result<Self> {
        validate_non_empty_string("name", name)?;
        validate_email("email", email)?;

        let kind = result.recommended_kind();
        let strategy = result.strategies.get(kind);

        Ok(Self {
            to_name: name.trim().to_string(),
            to_email: email.trim().to_string(),
            months: strategy.months_to_freedom,
            strategy: kind.label().to_string(),
            interest: format_currency(strategy.total_interest),
            savings: format_currency(result.interest_savings()),
            explanation: explanation_text(result),
            target_date: target_date(today, strategy.months_to_freedom),
        })
    }
}

/// Month and year the user becomes debt free, e.g. `March 2028`.
pub fn target_date(today: NaiveDate, months: u32) -> String {
    today
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
        .format("%B %Y")
        .to_string()
}

pub fn explanation_text(result: &OptimizationResult) -> String {
    let parts: Vec<String> = result
        .sorted_explanations()
        .into_iter()
        .map(|e| format!("#{} {}: {}", e.rank, e.debt_name, e.explanation.trim()))
        .collect();

    if parts.is_empty() {
        "No detailed explanation was provided for this plan.".to_string()
    } else {
        parts.join("\n\n")
    }
}
