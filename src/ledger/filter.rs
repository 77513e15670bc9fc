use crate::models::{DailyExpense, MonthlyBudget};

/// Search text plus month/year tokens. Empty fields match everything.
///
/// Month and year are matched by plain substring containment against the
/// record's date token; no date normalization happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Filter {
    pub(crate) search: String,
    pub(crate) month: String,
    pub(crate) year: String,
}

impl Filter {
    pub(crate) fn new(
        search: impl Into<String>,
        month: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into(),
            month: month.into(),
            year: year.into(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.search.is_empty() && self.month.is_empty() && self.year.is_empty()
    }

    fn matches_text(&self, fields: &[&str]) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        fields.iter().any(|f| f.to_lowercase().contains(&needle))
    }

    fn matches_date(&self, token: &str) -> bool {
        (self.month.is_empty() || token.contains(&self.month))
            && (self.year.is_empty() || token.contains(&self.year))
    }

    pub(crate) fn matches_budget(&self, budget: &MonthlyBudget) -> bool {
        self.matches_text(&[&budget.category]) && self.matches_date(&budget.month)
    }

    pub(crate) fn matches_expense(&self, expense: &DailyExpense) -> bool {
        self.matches_text(&[&expense.description, &expense.category])
            && self.matches_date(&expense.date)
    }

    /// Short description for the status line, e.g. `"food" 2024-05`.
    pub(crate) fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("\"{}\"", self.search));
        }
        if !self.month.is_empty() {
            parts.push(format!("month {}", self.month));
        }
        if !self.year.is_empty() {
            parts.push(format!("year {}", self.year));
        }
        parts.join(" ")
    }
}

/// Number of rows left visible by the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VisibleCounts {
    pub(crate) budgets: usize,
    pub(crate) expenses: usize,
}

/// Counter text shown above each list.
pub(crate) fn count_label(n: usize) -> String {
    format!("{n} items")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn budget(category: &str, month: &str) -> MonthlyBudget {
        MonthlyBudget {
            id: "1".into(),
            category: category.into(),
            amount: dec!(1),
            month: month.into(),
        }
    }

    fn expense(description: &str, category: &str, date: &str) -> DailyExpense {
        DailyExpense {
            id: "1".into(),
            description: description.into(),
            amount: dec!(1),
            category: category.into(),
            date: date.into(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert!(filter.matches_budget(&budget("", "")));
        assert!(filter.matches_expense(&expense("", "", "")));
    }

    #[test]
    fn test_search_is_case_insensitive_on_primary_text() {
        let filter = Filter::new("FOO", "", "");
        assert!(filter.matches_budget(&budget("Food", "2024-05")));
        assert!(!filter.matches_budget(&budget("Rent", "2024-05")));
        assert!(filter.matches_expense(&expense("Seafood dinner", "Dining", "2024-05-01")));
        assert!(filter.matches_expense(&expense("Lunch", "food", "2024-05-01")));
        assert!(!filter.matches_expense(&expense("Bus", "Transport", "2024-05-01")));
    }

    #[test]
    fn test_month_and_year_are_substring_matches() {
        let filter = Filter::new("", "2024-05", "");
        assert!(filter.matches_budget(&budget("Food", "2024-05")));
        assert!(!filter.matches_budget(&budget("Food", "2024-06")));
        assert!(filter.matches_expense(&expense("x", "y", "2024-05-31")));

        let filter = Filter::new("", "", "2023");
        assert!(filter.matches_budget(&budget("Food", "2023-12")));
        assert!(!filter.matches_expense(&expense("x", "y", "2024-01-01")));
    }

    #[test]
    fn test_all_conditions_must_hold() {
        let filter = Filter::new("food", "05", "2024");
        assert!(filter.matches_budget(&budget("Food", "2024-05")));
        assert!(!filter.matches_budget(&budget("Food", "2023-05")));
        assert!(!filter.matches_budget(&budget("Rent", "2024-05")));
    }

    #[test]
    fn test_describe_and_count_label() {
        assert_eq!(Filter::new("tea", "2024-05", "").describe(), "\"tea\" month 2024-05");
        assert_eq!(count_label(3), "3 items");
        assert_eq!(count_label(0), "0 items");
    }
}
