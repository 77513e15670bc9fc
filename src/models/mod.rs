mod budget;
mod expense;
mod user;

pub use budget::{BudgetInput, MonthlyBudget};
pub use expense::{DailyExpense, ExpenseInput, FALLBACK_CATEGORY};
pub use user::{hash_password, User};
