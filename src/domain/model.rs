use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Known debt categories. Each one carries a default APR used to pre-fill
/// the form when the user picks a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    #[default]
    CreditCard,
    StoreCard,
    Overdraft,
    PersonalLoan,
    CarFinance,
    StudentLoan,
    #[serde(rename = "bnpl")]
    BuyNowPayLater,
    Payday,
    Other,
}

impl DebtType {
    pub const ALL: [DebtType; 9] = [
        DebtType::CreditCard,
        DebtType::StoreCard,
        DebtType::Overdraft,
        DebtType::PersonalLoan,
        DebtType::CarFinance,
        DebtType::StudentLoan,
        DebtType::BuyNowPayLater,
        DebtType::Payday,
        DebtType::Other,
    ];

    pub fn default_apr(self) -> Decimal {
        match self {
            DebtType::CreditCard => dec!(22.9),
            DebtType::StoreCard => dec!(29.9),
            DebtType::Overdraft => dec!(39.9),
            DebtType::PersonalLoan => dec!(9.9),
            DebtType::CarFinance => dec!(8.9),
            DebtType::StudentLoan => dec!(6.25),
            DebtType::BuyNowPayLater => Decimal::ZERO,
            DebtType::Payday => dec!(292),
            DebtType::Other => Decimal::ZERO,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DebtType::CreditCard => "Credit Card",
            DebtType::StoreCard => "Store Card",
            DebtType::Overdraft => "Overdraft",
            DebtType::PersonalLoan => "Personal Loan",
            DebtType::CarFinance => "Car Finance",
            DebtType::StudentLoan => "Student Loan",
            DebtType::BuyNowPayLater => "Buy Now Pay Later",
            DebtType::Payday => "Payday Loan",
            DebtType::Other => "Other",
        }
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub name: String,
    #[serde(rename = "type", default)]
    pub debt_type: DebtType,
    pub balance: Decimal,
    pub apr: Decimal,
    pub min_payment: Decimal,
}

impl Debt {
    pub fn new(
        name: impl Into<String>,
        debt_type: DebtType,
        balance: Decimal,
        min_payment: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            debt_type,
            balance,
            apr: debt_type.default_apr(),
            min_payment,
        }
    }

    pub fn with_apr(mut self, apr: Decimal) -> Self {
        self.apr = apr;
        self
    }

    pub fn is_payable(&self) -> bool {
        self.balance > Decimal::ZERO && self.apr > Decimal::ZERO
    }
}

impl Default for Debt {
    fn default() -> Self {
        Self::new("", DebtType::default(), Decimal::ZERO, Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub debts: Vec<Debt>,
    pub monthly_budget: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusImpactRequest {
    pub debts: Vec<Debt>,
    pub monthly_budget: Decimal,
    pub extra_payment: Decimal,
}

/// The three strategies the optimizer always returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Avalanche,
    Snowball,
    Hybrid,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Avalanche,
        StrategyKind::Snowball,
        StrategyKind::Hybrid,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StrategyKind::Avalanche => "avalanche",
            StrategyKind::Snowball => "snowball",
            StrategyKind::Hybrid => "hybrid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Avalanche => "Avalanche (Highest Interest First)",
            StrategyKind::Snowball => "Snowball (Smallest Balance First)",
            StrategyKind::Hybrid => "AI Hybrid (Recommended)",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            StrategyKind::Avalanche => "Avalanche",
            StrategyKind::Snowball => "Snowball",
            StrategyKind::Hybrid => "AI Hybrid",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key.trim()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month: u32,
    #[serde(default)]
    pub remaining_balance: Decimal,
    #[serde(default)]
    pub interest_this_month: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtPayment {
    #[serde(default, alias = "name")]
    pub debt_name: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub remaining_balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMonth {
    pub month: u32,
    #[serde(default)]
    pub total_paid: Decimal,
    #[serde(default)]
    pub payments: Vec<DebtPayment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    #[serde(default)]
    pub months_to_freedom: u32,
    #[serde(default)]
    pub total_interest: Decimal,
    #[serde(default)]
    pub priority_order: Vec<usize>,
    #[serde(default)]
    pub timeline: Vec<TimelinePoint>,
    #[serde(default)]
    pub payment_schedule: Option<Vec<ScheduleMonth>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategies {
    #[serde(default)]
    pub avalanche: StrategyResult,
    #[serde(default)]
    pub snowball: StrategyResult,
    #[serde(default)]
    pub hybrid: StrategyResult,
}

impl Strategies {
    pub fn get(&self, kind: StrategyKind) -> &StrategyResult {
        match kind {
            StrategyKind::Avalanche => &self.avalanche,
            StrategyKind::Snowball => &self.snowball,
            StrategyKind::Hybrid => &self.hybrid,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StrategyKind, &StrategyResult)> {
        StrategyKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub debt_name: String,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub shap_values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, alias = "monthlyBudget", alias = "budget")]
    pub monthly_budget: Decimal,
    #[serde(default)]
    pub months_to_freedom: u32,
    #[serde(default)]
    pub total_interest: Decimal,
}

/// Body of a `/optimize` response. `success: false` responses only carry
/// `error`, so every other field defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub success: bool,
    #[serde(default)]
    pub strategies: Strategies,
    #[serde(default)]
    pub recommended: String,
    #[serde(default)]
    pub explanations: Vec<Explanation>,
    #[serde(default)]
    pub feature_importance: BTreeMap<String, f64>,
    #[serde(default)]
    pub budget_scenarios: Option<Vec<Scenario>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OptimizationResult {
    /// Falls back to Hybrid when the server names an unknown strategy.
    pub fn recommended_kind(&self) -> StrategyKind {
        StrategyKind::from_key(&self.recommended).unwrap_or(StrategyKind::Hybrid)
    }

    pub fn recommended_strategy(&self) -> &StrategyResult {
        self.strategies.get(self.recommended_kind())
    }

    /// Interest of the costliest strategy, the baseline savings are measured against.
    pub fn worst_interest(&self) -> Decimal {
        self.strategies
            .iter()
            .map(|(_, s)| s.total_interest)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Interest saved by the recommended strategy against the costliest one.
    pub fn interest_savings(&self) -> Decimal {
        (self.worst_interest() - self.recommended_strategy().total_interest).max(Decimal::ZERO)
    }

    pub fn sorted_explanations(&self) -> Vec<&Explanation> {
        let mut explanations: Vec<&Explanation> = self.explanations.iter().collect();
        explanations.sort_by_key(|e| e.rank);
        explanations
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoffSummary {
    #[serde(default)]
    pub months_to_freedom: u32,
    #[serde(default)]
    pub total_interest: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusSavings {
    #[serde(default, alias = "months_saved")]
    pub months: i64,
    #[serde(default, alias = "interest_saved")]
    pub interest: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusImpactResult {
    #[serde(default)]
    pub original: PayoffSummary,
    #[serde(default)]
    pub accelerated: PayoffSummary,
    #[serde(default)]
    pub savings: BonusSavings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BonusImpactResponse {
    pub success: bool,
    #[serde(default)]
    pub result: Option<BonusImpactResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ai: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debt_serializes_with_wire_names() {
        let debt = Debt::new("Visa", DebtType::CreditCard, dec!(1200), dec!(35));
        let json = serde_json::to_value(&debt).unwrap();
        assert_eq!(json["type"], "credit_card");
        assert_eq!(json["minPayment"], 35.0);
        assert_eq!(json["balance"], 1200.0);
        assert_eq!(json["apr"], 22.9);

        let custom = Debt::new("Loan", DebtType::PersonalLoan, dec!(5000), dec!(150)).with_apr(dec!(7.4));
        assert_eq!(serde_json::to_value(&custom).unwrap()["apr"], 7.4);
    }

    #[test]
    fn test_optimize_response_tolerates_missing_fields() {
        let body = serde_json::json!({
            "success": true,
            "recommended": "hybrid",
            "strategies": {
                "avalanche": {"months_to_freedom": 20, "total_interest": 900.5, "timeline": []},
                "snowball": {"months_to_freedom": 22, "total_interest": 1100.0, "timeline": []},
                "hybrid": {"months_to_freedom": 21, "total_interest": 950.0, "timeline": []}
            },
            "explanations": []
        });
        let result: OptimizationResult = serde_json::from_value(body).unwrap();
        assert!(result.budget_scenarios.is_none());
        assert!(result.strategies.hybrid.payment_schedule.is_none());
        assert_eq!(result.recommended_kind(), StrategyKind::Hybrid);
        assert_eq!(result.strategies.avalanche.total_interest, dec!(900.5));
        assert_eq!(result.interest_savings(), dec!(150));
    }

    #[test]
    fn test_failure_response_parses() {
        let body = serde_json::json!({"success": false, "error": "division by zero"});
        let result: OptimizationResult = serde_json::from_value(body).unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("division by zero"));
    }

    #[test]
    fn test_unknown_recommendation_falls_back_to_hybrid() {
        let result = OptimizationResult {
            recommended: "mystery".to_string(),
            ..Default::default()
        };
        assert_eq!(result.recommended_kind(), StrategyKind::Hybrid);
    }

    #[test]
    fn test_explanations_sorted_by_rank() {
        let result = OptimizationResult {
            explanations: vec![
                Explanation { debt_name: "B".into(), rank: 2, ..Default::default() },
                Explanation { debt_name: "A".into(), rank: 1, ..Default::default() },
            ],
            ..Default::default()
        };
        let names: Vec<&str> = result
            .sorted_explanations()
            .iter()
            .map(|e| e.debt_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
