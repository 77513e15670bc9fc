use std::str::FromStr;

use rust_decimal::Decimal;

use crate::api::{ApiError, ApiResult};
use crate::models::{BudgetInput, DailyExpense, ExpenseInput, MonthlyBudget};

/// Parse a user-typed amount. Accepts `$` and thousands separators.
pub(crate) fn parse_amount(raw: &str) -> ApiResult<Decimal> {
    let cleaned = raw.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ApiError::Validation("Amount is required".into()));
    }
    let amount = Decimal::from_str(cleaned)
        .map_err(|_| ApiError::Validation(format!("Amount must be a number: {raw}")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ApiError::Validation("Amount cannot be negative".into()));
    }
    Ok(amount)
}

/// Raw field values of the monthly budget form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BudgetForm {
    pub(crate) category: String,
    pub(crate) amount: String,
    pub(crate) month: String,
}

impl BudgetForm {
    pub(crate) fn new(
        category: impl Into<String>,
        amount: impl Into<String>,
        month: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
            month: month.into(),
        }
    }

    /// Prefill for editing an existing budget.
    pub(crate) fn from_budget(budget: &MonthlyBudget) -> Self {
        Self::new(
            budget.category.clone(),
            format!("{:.2}", budget.amount),
            budget.month.clone(),
        )
    }

    pub(crate) fn parse(&self) -> ApiResult<BudgetInput> {
        let amount = parse_amount(&self.amount)?;
        Ok(BudgetInput::new(
            self.category.trim(),
            amount,
            self.month.trim(),
        ))
    }
}

/// Raw field values of the daily expense form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExpenseForm {
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) category: String,
    pub(crate) date: String,
}

impl ExpenseForm {
    pub(crate) fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
        }
    }

    pub(crate) fn from_expense(expense: &DailyExpense) -> Self {
        Self::new(
            expense.description.clone(),
            format!("{:.2}", expense.amount),
            expense.category.clone(),
            expense.date.clone(),
        )
    }

    pub(crate) fn parse(&self) -> ApiResult<ExpenseInput> {
        let amount = parse_amount(&self.amount)?;
        Ok(ExpenseInput::new(
            self.description.trim(),
            amount,
            self.category.trim(),
            self.date.trim(),
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500").unwrap(), dec!(500));
        assert_eq!(parse_amount(" 12.5 ").unwrap(), dec!(12.5));
        assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        for raw in ["", "   ", "abc", "12..5", "-3"] {
            let err = parse_amount(raw).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{raw}: {err:?}");
        }
    }

    #[test]
    fn test_budget_form_posts_parsed_amount() {
        let input = BudgetForm::new(" Food ", "500.00", "2024-05").parse().unwrap();
        assert_eq!(input, BudgetInput::new("Food", dec!(500.00), "2024-05"));
    }

    #[test]
    fn test_expense_form_round_trips_existing_record() {
        let expense = DailyExpense {
            id: "7".into(),
            description: "Lunch".into(),
            amount: dec!(12.5),
            category: "Food".into(),
            date: "2024-05-02".into(),
        };
        let form = ExpenseForm::from_expense(&expense);
        assert_eq!(form.amount, "12.50");
        assert_eq!(form.parse().unwrap(), expense.to_input());
    }
}
