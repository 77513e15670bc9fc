use std::path::Path;

use chrono::Local;
use tracing::{error, info};

use super::{Ack, AnalyticsSummary, ApiError, ApiResult, LedgerApi};
use crate::db::Database;
use crate::models::{BudgetInput, DailyExpense, ExpenseInput, MonthlyBudget, FALLBACK_CATEGORY};

/// Serves the REST contract straight from the local store for one user,
/// applying the same validation and ownership rules as the budget service.
pub(crate) struct LocalApi {
    db: Database,
    user_id: i64,
    label: String,
}

impl LocalApi {
    pub(crate) fn new(db: Database, user_id: i64, path: &Path) -> Self {
        Self {
            db,
            user_id,
            label: format!("local:{}", path.display()),
        }
    }

    fn store_failure(err: anyhow::Error, message: &str) -> ApiError {
        error!(error = %format!("{err:#}"), "{message}");
        ApiError::server(500, message)
    }
}

/// Ids are numeric row ids; anything else cannot name a record.
fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse().ok()
}

fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn normalize_budget(input: &BudgetInput) -> ApiResult<BudgetInput> {
    if input.category.trim().is_empty() {
        return Err(ApiError::server(400, "Amount and category are required"));
    }
    let mut input = input.clone();
    if input.month.trim().is_empty() {
        input.month = current_month();
    }
    Ok(input)
}

fn normalize_expense(input: &ExpenseInput) -> ApiResult<ExpenseInput> {
    if input.description.trim().is_empty() {
        return Err(ApiError::server(400, "Amount and description are required"));
    }
    let mut input = input.clone();
    if input.category.trim().is_empty() {
        input.category = FALLBACK_CATEGORY.to_string();
    }
    if input.date.trim().is_empty() {
        input.date = today();
    }
    Ok(input)
}

impl LedgerApi for LocalApi {
    fn list_budgets(&self) -> ApiResult<Vec<MonthlyBudget>> {
        self.db
            .get_budgets(self.user_id, None)
            .map_err(|e| Self::store_failure(e, "Failed to load budgets"))
    }

    fn create_budget(&self, input: &BudgetInput) -> ApiResult<MonthlyBudget> {
        let input = normalize_budget(input)?;
        let budget = self
            .db
            .insert_budget(self.user_id, &input)
            .map_err(|e| Self::store_failure(e, "Failed to create budget"))?;
        info!(user_id = self.user_id, id = %budget.id, category = %budget.category, amount = %budget.amount, "created monthly budget");
        Ok(budget)
    }

    fn update_budget(&self, id: &str, input: &BudgetInput) -> ApiResult<MonthlyBudget> {
        let input = normalize_budget(input)?;
        let Some(row_id) = parse_id(id) else {
            return Err(ApiError::server(404, "Budget not found"));
        };
        let updated = self
            .db
            .update_budget(self.user_id, row_id, &input)
            .map_err(|e| Self::store_failure(e, "Failed to update budget"))?
            .ok_or_else(|| ApiError::server(404, "Budget not found"))?;
        info!(user_id = self.user_id, id = %updated.id, "updated monthly budget");
        Ok(updated)
    }

    fn delete_budget(&self, id: &str) -> ApiResult<Ack> {
        let Some(row_id) = parse_id(id) else {
            return Err(ApiError::server(404, "Budget not found"));
        };
        let deleted = self
            .db
            .delete_budget(self.user_id, row_id)
            .map_err(|e| Self::store_failure(e, "Failed to delete budget"))?;
        if !deleted {
            return Err(ApiError::server(404, "Budget not found"));
        }
        info!(user_id = self.user_id, id, "deleted monthly budget");
        Ok(Ack {
            message: "Budget deleted successfully".into(),
        })
    }

    fn list_expenses(&self) -> ApiResult<Vec<DailyExpense>> {
        self.db
            .get_expenses(self.user_id, None)
            .map_err(|e| Self::store_failure(e, "Failed to load expenses"))
    }

    fn create_expense(&self, input: &ExpenseInput) -> ApiResult<DailyExpense> {
        let input = normalize_expense(input)?;
        let expense = self
            .db
            .insert_expense(self.user_id, &input)
            .map_err(|e| Self::store_failure(e, "Failed to create expense"))?;
        info!(user_id = self.user_id, id = %expense.id, description = %expense.description, amount = %expense.amount, "created daily expense");
        Ok(expense)
    }

    fn update_expense(&self, id: &str, input: &ExpenseInput) -> ApiResult<DailyExpense> {
        let input = normalize_expense(input)?;
        let Some(row_id) = parse_id(id) else {
            return Err(ApiError::server(404, "Expense not found"));
        };
        let updated = self
            .db
            .update_expense(self.user_id, row_id, &input)
            .map_err(|e| Self::store_failure(e, "Failed to update expense"))?
            .ok_or_else(|| ApiError::server(404, "Expense not found"))?;
        info!(user_id = self.user_id, id = %updated.id, "updated daily expense");
        Ok(updated)
    }

    fn delete_expense(&self, id: &str) -> ApiResult<Ack> {
        let Some(row_id) = parse_id(id) else {
            return Err(ApiError::server(404, "Expense not found"));
        };
        let deleted = self
            .db
            .delete_expense(self.user_id, row_id)
            .map_err(|e| Self::store_failure(e, "Failed to delete expense"))?;
        if !deleted {
            return Err(ApiError::server(404, "Expense not found"));
        }
        info!(user_id = self.user_id, id, "deleted daily expense");
        Ok(Ack {
            message: "Expense deleted successfully".into(),
        })
    }

    fn analytics_summary(&self) -> ApiResult<AnalyticsSummary> {
        let month = current_month();
        let budgets = self
            .db
            .get_budgets(self.user_id, Some(month.as_str()))
            .map_err(|e| Self::store_failure(e, "Internal server error"))?;
        let expenses = self
            .db
            .get_expenses(self.user_id, Some(month.as_str()))
            .map_err(|e| Self::store_failure(e, "Internal server error"))?;
        Ok(AnalyticsSummary::compute(&budgets, &expenses))
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
