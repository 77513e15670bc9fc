mod bootstrap;
mod schema;

pub(crate) use bootstrap::SeedUser;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh store - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// Names of the provisioned collections present in the store.
    pub(crate) fn collections(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name IN ('users', 'monthly_budgets', 'daily_expenses')
             ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn indexes(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'index' AND tbl_name = ?1 AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let rows = stmt.query_map(params![table], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Users ─────────────────────────────────────────────────

    #[cfg(test)]
    pub(crate) fn insert_user(&self, user: &User) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (username, password, created_at) VALUES (?1, ?2, ?3)",
            params![user.username, user.password, user.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn find_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, username, password, created_at FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: Some(row.get(0)?),
                        username: row.get(1)?,
                        password: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    pub(crate) fn user_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    // ── Monthly budgets ───────────────────────────────────────

    pub(crate) fn get_budgets(&self, user_id: i64, month: Option<&str>) -> Result<Vec<MonthlyBudget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, amount, month FROM monthly_budgets
             WHERE user_id = ?1 AND (?2 IS NULL OR month = ?2)
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id, month], budget_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<MonthlyBudget>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, category, amount, month FROM monthly_budgets WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                budget_from_row,
            )
            .optional()?)
    }

    pub(crate) fn insert_budget(&self, user_id: i64, input: &BudgetInput) -> Result<MonthlyBudget> {
        self.conn.execute(
            "INSERT INTO monthly_budgets (user_id, category, amount, month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                input.category,
                input.amount.to_string(),
                input.month,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(MonthlyBudget {
            id: self.conn.last_insert_rowid().to_string(),
            category: input.category.clone(),
            amount: input.amount,
            month: input.month.clone(),
        })
    }

    /// Returns `None` when no budget with this id belongs to the user.
    pub(crate) fn update_budget(
        &self,
        user_id: i64,
        id: i64,
        input: &BudgetInput,
    ) -> Result<Option<MonthlyBudget>> {
        let changed = self.conn.execute(
            "UPDATE monthly_budgets SET category = ?1, amount = ?2, month = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                input.category,
                input.amount.to_string(),
                input.month,
                chrono::Utc::now().to_rfc3339(),
                id,
                user_id,
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_budget(user_id, id)
    }

    pub(crate) fn delete_budget(&self, user_id: i64, id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM monthly_budgets WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    // ── Daily expenses ────────────────────────────────────────

    /// Expenses for a user, optionally restricted to dates starting with `month`.
    pub(crate) fn get_expenses(&self, user_id: i64, month: Option<&str>) -> Result<Vec<DailyExpense>> {
        let pattern = month.map(|m| format!("{m}%"));
        let mut stmt = self.conn.prepare(
            "SELECT id, description, amount, category, date FROM daily_expenses
             WHERE user_id = ?1 AND (?2 IS NULL OR date LIKE ?2)
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id, pattern], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<DailyExpense>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, description, amount, category, date FROM daily_expenses
                 WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                expense_from_row,
            )
            .optional()?)
    }

    pub(crate) fn insert_expense(&self, user_id: i64, input: &ExpenseInput) -> Result<DailyExpense> {
        self.conn.execute(
            "INSERT INTO daily_expenses (user_id, description, amount, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                input.description,
                input.amount.to_string(),
                input.category,
                input.date,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(DailyExpense {
            id: self.conn.last_insert_rowid().to_string(),
            description: input.description.clone(),
            amount: input.amount,
            category: input.category.clone(),
            date: input.date.clone(),
        })
    }

    /// Returns `None` when no expense with this id belongs to the user.
    pub(crate) fn update_expense(
        &self,
        user_id: i64,
        id: i64,
        input: &ExpenseInput,
    ) -> Result<Option<DailyExpense>> {
        let changed = self.conn.execute(
            "UPDATE daily_expenses
             SET description = ?1, amount = ?2, category = ?3, date = ?4, updated_at = ?5
             WHERE id = ?6 AND user_id = ?7",
            params![
                input.description,
                input.amount.to_string(),
                input.category,
                input.date,
                chrono::Utc::now().to_rfc3339(),
                id,
                user_id,
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_expense(user_id, id)
    }

    pub(crate) fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM daily_expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<MonthlyBudget> {
    let id: i64 = row.get(0)?;
    let amount_str: String = row.get(2)?;
    Ok(MonthlyBudget {
        id: id.to_string(),
        category: row.get(1)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        month: row.get(3)?,
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<DailyExpense> {
    let id: i64 = row.get(0)?;
    let amount_str: String = row.get(2)?;
    Ok(DailyExpense {
        id: id.to_string(),
        description: row.get(1)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        category: row.get(3)?,
        date: row.get(4)?,
    })
}

#[cfg(test)]
mod tests;
