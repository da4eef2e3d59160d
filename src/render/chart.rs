use crate::domain::model::{OptimizationResult, Scenario, StrategyKind, TimelinePoint};
use crate::utils::error::{DebtClearError, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// One month of a chart, with one value per strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartRow {
    pub month: u32,
    pub avalanche: Decimal,
    pub snowball: Decimal,
    pub hybrid: Decimal,
}

impl ChartRow {
    pub fn get(&self, kind: StrategyKind) -> Decimal {
        match kind {
            StrategyKind::Avalanche => self.avalanche,
            StrategyKind::Snowball => self.snowball,
            StrategyKind::Hybrid => self.hybrid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub balance: Vec<ChartRow>,
    pub interest: Vec<ChartRow>,
}

#[derive(Debug, Serialize)]
struct ChartCsvRecord {
    month: u32,
    avalanche_balance: Decimal,
    snowball_balance: Decimal,
    hybrid_balance: Decimal,
    avalanche_interest: Decimal,
    snowball_interest: Decimal,
    hybrid_interest: Decimal,
}

impl ChartSeries {
    pub fn from_result(result: &OptimizationResult) -> Self {
        Self {
            balance: build_rows(result, |p| p.remaining_balance),
            interest: build_rows(result, |p| p.interest_this_month),
        }
    }

    pub fn len(&self) -> usize {
        self.balance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balance.is_empty()
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for (balance, interest) in self.balance.iter().zip(&self.interest) {
            writer.serialize(ChartCsvRecord {
                month: balance.month,
                avalanche_balance: balance.avalanche,
                snowball_balance: balance.snowball,
                hybrid_balance: balance.hybrid,
                avalanche_interest: interest.avalanche,
                snowball_interest: interest.snowball,
                hybrid_interest: interest.hybrid,
            })?;
        }
        let bytes = writer.into_inner().map_err(|e| DebtClearError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| DebtClearError::validation(e.to_string()))
    }
}

/// One row per month up to the longest strategy timeline. A strategy whose
/// timeline ends early contributes zero for the remaining months.
fn build_rows(
    result: &OptimizationResult,
    value: impl Fn(&TimelinePoint) -> Decimal,
) -> Vec<ChartRow> {
    let strategies = &result.strategies;
    let longest = strategies
        .iter()
        .map(|(_, s)| s.timeline.len())
        .max()
        .unwrap_or(0);

    let at = |kind: StrategyKind, i: usize| {
        strategies
            .get(kind)
            .timeline
            .get(i)
            .map(&value)
            .unwrap_or(Decimal::ZERO)
    };

    (0..longest)
        .map(|i| ChartRow {
            month: i as u32 + 1,
            avalanche: at(StrategyKind::Avalanche, i),
            snowball: at(StrategyKind::Snowball, i),
            hybrid: at(StrategyKind::Hybrid, i),
        })
        .collect()
}

/// Features ranked by average attribution weight, highest first.
pub fn feature_importance_ranking(result: &OptimizationResult) -> Vec<(String, f64)> {
    let mut ranking: Vec<(String, f64)> = result
        .feature_importance
        .iter()
        .map(|(name, weight)| (name.clone(), *weight))
        .collect();
    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranking
}

pub fn scenario_rows(result: &OptimizationResult) -> &[Scenario] {
    result.budget_scenarios.as_deref().unwrap_or(&[])
}
