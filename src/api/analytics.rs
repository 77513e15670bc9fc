use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{DailyExpense, MonthlyBudget};

/// Month-to-date overview served by `GET /api/analytics/summary`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct AnalyticsSummary {
    pub(crate) total_budget: Decimal,
    pub(crate) total_expenses: Decimal,
    pub(crate) remaining: Decimal,
    /// Percent of the budget left over, one decimal place.
    pub(crate) savings_rate: Decimal,
    #[serde(default)]
    pub(crate) category_breakdown: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub(crate) budget_progress: Vec<BudgetProgress>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct BudgetProgress {
    pub(crate) category: String,
    pub(crate) budgeted: Decimal,
    pub(crate) spent: Decimal,
    #[serde(default)]
    pub(crate) percentage: Decimal,
}

impl AnalyticsSummary {
    /// Summarise one month of budgets and expenses.
    pub(crate) fn compute(budgets: &[MonthlyBudget], expenses: &[DailyExpense]) -> Self {
        let total_budget: Decimal = budgets.iter().map(|b| b.amount).sum();
        let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
        let remaining = total_budget - total_expenses;

        let mut category_breakdown = BTreeMap::new();
        for expense in expenses {
            *category_breakdown
                .entry(expense.category_label().to_string())
                .or_insert(Decimal::ZERO) += expense.amount;
        }

        let budget_progress = budgets
            .iter()
            .map(|budget| {
                let spent: Decimal = expenses
                    .iter()
                    .filter(|e| e.category == budget.category)
                    .map(|e| e.amount)
                    .sum();
                BudgetProgress {
                    category: budget.category.clone(),
                    budgeted: budget.amount,
                    spent,
                    percentage: percent_of(spent, budget.amount),
                }
            })
            .collect();

        Self {
            total_budget,
            total_expenses,
            remaining,
            savings_rate: percent_of(remaining, total_budget),
            category_breakdown,
            budget_progress,
        }
    }
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(1)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    fn budget(category: &str, amount: Decimal) -> MonthlyBudget {
        MonthlyBudget {
            id: category.into(),
            category: category.into(),
            amount,
            month: "2024-05".into(),
        }
    }

    fn expense(category: &str, amount: Decimal) -> DailyExpense {
        DailyExpense {
            id: format!("{category}-{amount}"),
            description: "x".into(),
            amount,
            category: category.into(),
            date: "2024-05-10".into(),
        }
    }

    #[test]
    fn test_summary_totals_and_savings_rate() {
        let summary = AnalyticsSummary::compute(
            &[budget("Food", dec!(300)), budget("Rent", dec!(700))],
            &[expense("Food", dec!(120)), expense("Rent", dec!(700))],
        );
        assert_eq!(summary.total_budget, dec!(1000));
        assert_eq!(summary.total_expenses, dec!(820));
        assert_eq!(summary.remaining, dec!(180));
        assert_eq!(summary.savings_rate, dec!(18.0));
    }

    #[test]
    fn test_summary_without_budget_has_zero_rate() {
        let summary = AnalyticsSummary::compute(&[], &[expense("Food", dec!(10))]);
        assert_eq!(summary.savings_rate, Decimal::ZERO);
        assert_eq!(summary.remaining, dec!(-10));
    }

    #[test]
    fn test_breakdown_groups_empty_category_as_other() {
        let summary = AnalyticsSummary::compute(
            &[],
            &[
                expense("", dec!(3)),
                expense("Food", dec!(4)),
                expense("", dec!(5)),
            ],
        );
        assert_eq!(summary.category_breakdown.get("Other"), Some(&dec!(8)));
        assert_eq!(summary.category_breakdown.get("Food"), Some(&dec!(4)));
    }

    #[test]
    fn test_budget_progress_per_category() {
        let summary = AnalyticsSummary::compute(
            &[budget("Food", dec!(200))],
            &[
                expense("Food", dec!(50)),
                expense("Food", dec!(25)),
                expense("Fun", dec!(99)),
            ],
        );
        let food = &summary.budget_progress[0];
        assert_eq!(food.spent, dec!(75));
        assert_eq!(food.percentage, dec!(37.5));
    }

    #[test]
    fn test_reads_service_payload() {
        let json = r#"{
            "total_budget": 500.0, "total_expenses": 120.0, "remaining": 380.0,
            "savings_rate": 76.0,
            "category_breakdown": {"Food": 120.0},
            "budget_progress": [{"category": "Food", "budgeted": 500.0, "spent": 120.0, "percentage": 0}]
        }"#;
        let summary: AnalyticsSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.remaining, dec!(380));
        assert_eq!(summary.budget_progress.len(), 1);
        assert_eq!(summary.category_breakdown["Food"], dec!(120));
    }
}
