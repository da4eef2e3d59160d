use crate::domain::model::{BonusImpactRequest, Debt, DebtType, OptimizeRequest};
use crate::utils::error::{DebtClearError, Result};
use rust_decimal::Decimal;

/// A single field edit coming from the user.
#[derive(Debug, Clone, PartialEq)]
pub enum DebtField {
    Name(String),
    Balance(Decimal),
    Apr(Decimal),
    MinPayment(Decimal),
}

/// Debts and budget as the user is entering them. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct DebtForm {
    debts: Vec<Debt>,
    monthly_budget: Decimal,
}

impl DebtForm {
    pub fn new() -> Self {
        Self {
            debts: vec![Debt::default()],
            monthly_budget: Decimal::ZERO,
        }
    }

    pub fn from_parts(debts: Vec<Debt>, monthly_budget: Decimal) -> Self {
        Self {
            debts,
            monthly_budget,
        }
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn monthly_budget(&self) -> Decimal {
        self.monthly_budget
    }

    pub fn set_budget(&mut self, amount: Decimal) {
        self.monthly_budget = amount;
    }

    pub fn add_debt(&mut self) -> usize {
        self.debts.push(Debt::default());
        self.debts.len() - 1
    }

    pub fn push_debt(&mut self, debt: Debt) -> usize {
        self.debts.push(debt);
        self.debts.len() - 1
    }

    /// The form always keeps at least one row.
    pub fn remove_debt(&mut self, index: usize) -> Option<Debt> {
        if index >= self.debts.len() || self.debts.len() == 1 {
            return None;
        }
        Some(self.debts.remove(index))
    }

    pub fn update_debt(&mut self, index: usize, field: DebtField) -> Result<()> {
        let debt = self.debt_mut(index)?;
        match field {
            DebtField::Name(name) => debt.name = name,
            DebtField::Balance(v) => debt.balance = v.max(Decimal::ZERO),
            DebtField::Apr(v) => debt.apr = v.max(Decimal::ZERO),
            DebtField::MinPayment(v) => debt.min_payment = v.max(Decimal::ZERO),
        }
        Ok(())
    }

    /// Changing the type overwrites the APR with that type's default.
    pub fn select_type(&mut self, index: usize, debt_type: DebtType) -> Result<()> {
        let debt = self.debt_mut(index)?;
        debt.debt_type = debt_type;
        debt.apr = debt_type.default_apr();
        tracing::debug!(
            "Debt #{} set to {} (APR {:.2}%)",
            index + 1,
            debt_type.label(),
            debt.apr
        );
        Ok(())
    }

    fn debt_mut(&mut self, index: usize) -> Result<&mut Debt> {
        let len = self.debts.len();
        self.debts.get_mut(index).ok_or_else(|| {
            DebtClearError::validation(format!(
                "Debt #{} does not exist ({} entered)",
                index + 1,
                len
            ))
        })
    }

    pub fn submittable_debts(&self) -> Vec<Debt> {
        self.debts
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_payable())
            .map(|(i, d)| {
                let mut debt = d.clone();
                if debt.name.trim().is_empty() {
                    debt.name = format!("Debt {}", i + 1);
                } else {
                    debt.name = debt.name.trim().to_string();
                }
                debt
            })
            .collect()
    }

    pub fn total_balance(&self) -> Decimal {
        self.debts.iter().map(|d| d.balance.max(Decimal::ZERO)).sum()
    }

    pub fn total_min_payments(&self) -> Decimal {
        self.submittable_debts().iter().map(|d| d.min_payment).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.submittable_debts().is_empty() {
            return Err(DebtClearError::validation(
                "Please add at least one debt with a balance and APR",
            ));
        }
        if self.monthly_budget <= Decimal::ZERO {
            return Err(DebtClearError::validation(
                "Please enter a monthly budget greater than zero",
            ));
        }

        let minimums = self.total_min_payments();
        if self.monthly_budget < minimums {
            tracing::warn!(
                "⚠️ Monthly budget £{:.2} is below the minimum payments total £{:.2}",
                self.monthly_budget,
                minimums
            );
        }
        Ok(())
    }

    pub fn to_request(&self) -> Result<OptimizeRequest> {
        self.validate()?;
        Ok(OptimizeRequest {
            debts: self.submittable_debts(),
            monthly_budget: self.monthly_budget,
        })
    }

    pub fn to_bonus_request(&self, extra_payment: Decimal) -> Result<BonusImpactRequest> {
        if extra_payment <= Decimal::ZERO {
            return Err(DebtClearError::validation(
                "Please enter an extra payment greater than zero",
            ));
        }
        let request = self.to_request()?;
        Ok(BonusImpactRequest {
            debts: request.debts,
            monthly_budget: request.monthly_budget,
            extra_payment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn filled_form() -> DebtForm {
        let mut form = DebtForm::new();
        form.update_debt(0, DebtField::Name("Visa".into())).unwrap();
        form.update_debt(0, DebtField::Balance(dec!(2500))).unwrap();
        form.update_debt(0, DebtField::MinPayment(dec!(60))).unwrap();
        form.set_budget(dec!(400));
        form
    }

    #[test]
    fn test_rejects_when_no_debt_has_balance() {
        let mut form = DebtForm::new();
        form.set_budget(dec!(300));
        let err = form.validate().unwrap_err();
        assert!(err.to_string().contains("at least one debt"));
    }

    #[test]
    fn test_rejects_zero_apr_debts() {
        let mut form = filled_form();
        form.select_type(0, DebtType::BuyNowPayLater).unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_budget() {
        let mut form = filled_form();
        form.set_budget(Decimal::ZERO);
        assert!(form.validate().is_err());
        form.set_budget(dec!(-50));
        assert!(form.validate().is_err());
        form.set_budget(dec!(50));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_select_type_fills_default_apr() {
        let mut form = filled_form();
        for debt_type in DebtType::ALL {
            form.select_type(0, debt_type).unwrap();
            assert_eq!(form.debts()[0].apr, debt_type.default_apr());
        }
        form.select_type(0, DebtType::StoreCard).unwrap();
        assert_eq!(form.debts()[0].apr, dec!(29.9));
    }

    #[test]
    fn test_manual_apr_edit_survives_until_type_changes() {
        let mut form = filled_form();
        form.update_debt(0, DebtField::Apr(dec!(18.5))).unwrap();
        assert_eq!(form.debts()[0].apr, dec!(18.5));
        form.select_type(0, DebtType::PersonalLoan).unwrap();
        assert_eq!(form.debts()[0].apr, dec!(9.9));
    }

    #[test]
    fn test_submission_filters_and_names_debts() {
        let mut form = filled_form();
        let idx = form.add_debt();
        form.update_debt(idx, DebtField::Balance(dec!(800))).unwrap();
        form.add_debt();

        let request = form.to_request().unwrap();
        assert_eq!(request.debts.len(), 2);
        assert_eq!(request.debts[0].name, "Visa");
        assert_eq!(request.debts[1].name, "Debt 2");
        assert_eq!(request.monthly_budget, dec!(400));
    }

    #[test]
    fn test_remove_keeps_last_row() {
        let mut form = DebtForm::new();
        assert!(form.remove_debt(0).is_none());
        form.add_debt();
        assert!(form.remove_debt(1).is_some());
        assert_eq!(form.debts().len(), 1);
    }

    #[test]
    fn test_update_out_of_range_is_an_error() {
        let mut form = DebtForm::new();
        assert!(form.update_debt(3, DebtField::Apr(dec!(5))).is_err());
    }

    #[test]
    fn test_bonus_request_requires_positive_extra() {
        let form = filled_form();
        assert!(form.to_bonus_request(Decimal::ZERO).is_err());
        let request = form.to_bonus_request(dec!(1000)).unwrap();
        assert_eq!(request.extra_payment, dec!(1000));
    }

    #[test]
    fn test_budget_below_minimums_is_only_a_warning() {
        let mut form = filled_form();
        let idx = form.add_debt();
        form.update_debt(idx, DebtField::Balance(dec!(4000))).unwrap();
        form.update_debt(idx, DebtField::MinPayment(dec!(120))).unwrap();
        form.set_budget(dec!(100));

        assert_eq!(form.total_min_payments(), dec!(180));
        assert!(form.monthly_budget() < form.total_min_payments());
        assert!(form.validate().is_ok());
        assert_eq!(form.to_request().unwrap().monthly_budget, dec!(100));
    }

    #[test]
    fn test_total_balance_ignores_negative_rows() {
        let mut form = filled_form();
        form.push_debt(Debt::new("Refund", DebtType::Other, dec!(-40), Decimal::ZERO));
        form.add_debt();
        assert_eq!(form.total_balance(), dec!(2500));
    }
}
