use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub category: String,
    pub amount: Decimal,
    /// Format: "YYYY-MM"
    pub month: String,
}

impl MonthlyBudget {
    #[cfg(test)]
    pub fn to_input(&self) -> BudgetInput {
        BudgetInput {
            category: self.category.clone(),
            amount: self.amount,
            month: self.month.clone(),
        }
    }
}

/// Request body for creating or replacing a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub category: String,
    pub amount: Decimal,
    pub month: String,
}

impl BudgetInput {
    pub fn new(category: impl Into<String>, amount: Decimal, month: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount,
            month: month.into(),
        }
    }
}
