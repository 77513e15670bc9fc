use rust_decimal::Decimal;

use super::notify::Level;
use crate::models::{DailyExpense, MonthlyBudget};

/// Totals over the visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) total_budget: Decimal,
    pub(crate) total_expenses: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) tone: Level,
}

impl Default for Summary {
    fn default() -> Self {
        Self::compute([].iter(), [].iter())
    }
}

impl Summary {
    pub(crate) fn compute<'a>(
        budgets: impl Iterator<Item = &'a MonthlyBudget>,
        expenses: impl Iterator<Item = &'a DailyExpense>,
    ) -> Self {
        let total_budget: Decimal = budgets.map(|b| b.amount).sum();
        let total_expenses: Decimal = expenses.map(|e| e.amount).sum();
        let remaining = total_budget - total_expenses;
        Self {
            total_budget,
            total_expenses,
            remaining,
            tone: tone_for(remaining, total_budget),
        }
    }
}

/// Negative is danger; more than a fifth of the budget left is success.
pub(crate) fn tone_for(remaining: Decimal, total_budget: Decimal) -> Level {
    if remaining < Decimal::ZERO {
        Level::Danger
    } else if remaining > total_budget * Decimal::new(2, 1) {
        Level::Success
    } else {
        Level::Warning
    }
}

/// Category breakdown fed to the chart: parallel labels and values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ChartData {
    pub(crate) labels: Vec<String>,
    pub(crate) data: Vec<Decimal>,
}

impl ChartData {
    /// Group by category label, keeping first-seen order.
    pub(crate) fn from_expenses(expenses: &[DailyExpense]) -> Self {
        let mut chart = Self::default();
        for expense in expenses {
            let label = expense.category_label();
            match chart.labels.iter().position(|l| l == label) {
                Some(idx) => chart.data[idx] += expense.amount,
                None => {
                    chart.labels.push(label.to_string());
                    chart.data.push(expense.amount);
                }
            }
        }
        chart
    }

    pub(crate) fn total(&self) -> Decimal {
        self.data.iter().sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub(crate) fn slices(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }
}
