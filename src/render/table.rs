use crate::domain::model::{BonusImpactResult, OptimizationResult, ScheduleMonth, StrategyKind};
use crate::render::chart::{feature_importance_ranking, scenario_rows};
use crate::render::format_currency;
use rust_decimal::Decimal;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub kind: StrategyKind,
    pub months: u32,
    pub total_interest: Decimal,
    pub interest_saved: Decimal,
    pub recommended: bool,
}

/// Avalanche, Snowball, Hybrid in that order. Savings are measured against
/// the costliest strategy.
pub fn comparison_rows(result: &OptimizationResult) -> Vec<ComparisonRow> {
    let worst = result.worst_interest();
    let recommended = result.recommended_kind();

    result
        .strategies
        .iter()
        .map(|(kind, s)| ComparisonRow {
            kind,
            months: s.months_to_freedom,
            total_interest: s.total_interest,
            interest_saved: (worst - s.total_interest).max(Decimal::ZERO),
            recommended: kind == recommended,
        })
        .collect()
}

/// Payment schedule of the recommended strategy; empty when the backend
/// did not send one.
pub fn schedule_rows(result: &OptimizationResult) -> &[ScheduleMonth] {
    result
        .recommended_strategy()
        .payment_schedule
        .as_deref()
        .unwrap_or(&[])
}

pub fn render_comparison(result: &OptimizationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<38}{:>8}{:>16}{:>14}",
        "Strategy", "Months", "Interest", "Saved"
    );
    let _ = writeln!(out, "{}", "-".repeat(76));
    for row in comparison_rows(result) {
        let marker = if row.recommended { " ★" } else { "" };
        let _ = writeln!(
            out,
            "{:<38}{:>8}{:>16}{:>14}",
            format!("{}{}", row.kind.label(), marker),
            row.months,
            format_currency(row.total_interest),
            format_currency(row.interest_saved)
        );
    }
    out
}

pub fn render_explanations(result: &OptimizationResult) -> String {
    let mut out = String::new();
    for explanation in result.sorted_explanations() {
        let _ = writeln!(out, "#{} {}", explanation.rank, explanation.debt_name);
        let _ = writeln!(out, "   {}", explanation.explanation.trim());
        if !explanation.shap_values.is_empty() {
            let weights: Vec<String> = explanation
                .shap_values
                .iter()
                .map(|(feature, weight)| format!("{}: {:+.3}", feature, weight))
                .collect();
            let _ = writeln!(out, "   [{}]", weights.join(", "));
        }
    }

    let ranking = feature_importance_ranking(result);
    if !ranking.is_empty() {
        let _ = writeln!(out, "\nWhat mattered most:");
        for (feature, weight) in ranking {
            let _ = writeln!(out, "  {:<28}{:>6.1}%", feature, weight * 100.0);
        }
    }
    out
}

pub fn render_schedule(result: &OptimizationResult) -> String {
    let mut out = String::new();
    for month in schedule_rows(result) {
        let _ = writeln!(
            out,
            "Month {:>3}  paid {:>12}",
            month.month,
            format_currency(month.total_paid)
        );
        for payment in &month.payments {
            let _ = writeln!(
                out,
                "    {:<24}{:>12}  (left {})",
                payment.debt_name,
                format_currency(payment.amount),
                format_currency(payment.remaining_balance)
            );
        }
    }
    out
}

pub fn render_scenarios(result: &OptimizationResult) -> String {
    let mut out = String::new();
    for scenario in scenario_rows(result) {
        let label = scenario
            .label
            .clone()
            .unwrap_or_else(|| format!("{}/month", format_currency(scenario.monthly_budget)));
        let _ = writeln!(
            out,
            "{:<24}{:>4} months{:>16} interest",
            label,
            scenario.months_to_freedom,
            format_currency(scenario.total_interest)
        );
    }
    out
}

pub fn render_bonus_impact(extra_payment: Decimal, impact: &BonusImpactResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "One-off payment of {}", format_currency(extra_payment));
    let _ = writeln!(
        out,
        "  Without: {:>4} months, {} interest",
        impact.original.months_to_freedom,
        format_currency(impact.original.total_interest)
    );
    let _ = writeln!(
        out,
        "  With:    {:>4} months, {} interest",
        impact.accelerated.months_to_freedom,
        format_currency(impact.accelerated.total_interest)
    );
    let _ = writeln!(
        out,
        "  Saves {} months and {}",
        impact.savings.months,
        format_currency(impact.savings.interest)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        BonusSavings, DebtPayment, Explanation, PayoffSummary, StrategyResult, Strategies,
    };
    use rust_decimal_macros::dec;

    fn result() -> OptimizationResult {
        OptimizationResult {
            success: true,
            recommended: "avalanche".into(),
            strategies: Strategies {
                avalanche: StrategyResult {
                    months_to_freedom: 10,
                    total_interest: dec!(300),
                    payment_schedule: Some(vec![ScheduleMonth {
                        month: 1,
                        total_paid: dec!(250),
                        payments: vec![DebtPayment {
                            debt_name: "Card".into(),
                            amount: dec!(250),
                            remaining_balance: dec!(750),
                        }],
                    }]),
                    ..Default::default()
                },
                snowball: StrategyResult { months_to_freedom: 11, total_interest: dec!(420), ..Default::default() },
                hybrid: StrategyResult { months_to_freedom: 10, total_interest: dec!(330), ..Default::default() },
            },
            explanations: vec![Explanation {
                debt_name: "Card".into(),
                rank: 1,
                explanation: "Highest APR.".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_comparison_rows_mark_recommended_and_savings() {
        let rows = comparison_rows(&result());
        assert_eq!(rows.len(), 3);
        assert!(rows[0].recommended);
        assert_eq!(rows[0].interest_saved, dec!(120));
        assert_eq!(rows[1].interest_saved, Decimal::ZERO);
        assert!(!rows[2].recommended);
    }

    #[test]
    fn test_schedule_follows_recommended_strategy() {
        let mut result = result();
        assert_eq!(schedule_rows(&result).len(), 1);
        assert!(render_schedule(&result).contains("Card"));
        result.recommended = "snowball".into();
        assert!(schedule_rows(&result).is_empty());
    }

    #[test]
    fn test_render_comparison_lists_all_strategies() {
        let text = render_comparison(&result());
        assert!(text.contains("Avalanche (Highest Interest First) ★"));
        assert!(text.contains("Snowball"));
        assert!(text.contains("£420.00"));
    }

    #[test]
    fn test_render_explanations() {
        let text = render_explanations(&result());
        assert!(text.contains("#1 Card"));
        assert!(text.contains("Highest APR."));
    }

    #[test]
    fn test_render_bonus_impact() {
        let impact = BonusImpactResult {
            original: PayoffSummary { months_to_freedom: 14, total_interest: dec!(630) },
            accelerated: PayoffSummary { months_to_freedom: 11, total_interest: dec!(480.25) },
            savings: BonusSavings { months: 3, interest: dec!(149.75) },
        };
        let text = render_bonus_impact(dec!(1500), &impact);
        assert!(text.contains("One-off payment of £1,500.00"));
        assert!(text.contains("Saves 3 months and £149.75"));
    }
}
