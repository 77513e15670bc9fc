use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label used when an expense carries no category.
pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpense {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    /// Format: "YYYY-MM-DD"
    pub date: String,
}

impl DailyExpense {
    /// Category used for grouping; empty categories fall into "Other".
    pub fn category_label(&self) -> &str {
        if self.category.is_empty() {
            FALLBACK_CATEGORY
        } else {
            &self.category
        }
    }

    #[cfg(test)]
    pub fn to_input(&self) -> ExpenseInput {
        ExpenseInput {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            date: self.date.clone(),
        }
    }
}

/// Request body for creating or replacing an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: String,
}

impl ExpenseInput {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date: date.into(),
        }
    }
}
