mod filter;
mod forms;
mod notify;
mod summary;

pub(crate) use filter::{count_label, Filter, VisibleCounts};
pub(crate) use forms::{BudgetForm, ExpenseForm};
pub(crate) use notify::{Level, Notifier};
pub(crate) use summary::{ChartData, Summary};

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::api::{Ack, ApiError, ApiResult, LedgerApi};
use crate::models::{DailyExpense, MonthlyBudget};

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Kind {
    Budget,
    Expense,
}

impl Kind {
    pub(crate) fn noun(self) -> &'static str {
        match self {
            Kind::Budget => "budget",
            Kind::Expense => "expense",
        }
    }
}

/// A record picked for deletion, tagged with its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Selection {
    pub(crate) kind: Kind,
    pub(crate) id: String,
}

impl Selection {
    pub(crate) fn budget(id: impl Into<String>) -> Self {
        Self {
            kind: Kind::Budget,
            id: id.into(),
        }
    }

    pub(crate) fn expense(id: impl Into<String>) -> Self {
        Self {
            kind: Kind::Expense,
            id: id.into(),
        }
    }
}

/// A deletion waiting for the user to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingDelete {
    One(Selection),
    Many(Vec<Selection>),
}

impl PendingDelete {
    pub(crate) fn prompt(&self) -> String {
        match self {
            PendingDelete::One(sel) => {
                format!("Are you sure you want to delete this {}?", sel.kind.noun())
            }
            PendingDelete::Many(items) => format!(
                "Are you sure you want to delete {} selected items?",
                items.len()
            ),
        }
    }
}

/// Client-side state for one user's budgets and expenses.
///
/// `budgets` and `expenses` mirror the backend and are the only source for
/// every derived view. The summary covers rows visible under `filter`; the
/// chart always covers the whole expense mirror.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    pub(crate) budgets: Vec<MonthlyBudget>,
    pub(crate) expenses: Vec<DailyExpense>,
    pub(crate) filter: Filter,
    pub(crate) visible: VisibleCounts,
    pub(crate) summary: Summary,
    pub(crate) chart: ChartData,
    pub(crate) bulk_mode: bool,
    pub(crate) selection: Vec<Selection>,
    pub(crate) notices: Notifier,
    pending: Option<PendingDelete>,
    submitting: HashSet<Kind>,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // ── Loading ───────────────────────────────────────────────

    /// Replace the mirror with the backend's current collections.
    ///
    /// On failure the mirror is left untouched.
    pub(crate) fn load_all(&mut self, api: &dyn LedgerApi) -> ApiResult<()> {
        let loaded = api
            .list_budgets()
            .and_then(|budgets| Ok((budgets, api.list_expenses()?)));
        match loaded {
            Ok((budgets, expenses)) => {
                info!(budgets = budgets.len(), expenses = expenses.len(), "loaded ledger");
                self.budgets = budgets;
                self.expenses = expenses;
                self.selection
                    .retain(|sel| contains(&self.budgets, &self.expenses, sel));
                self.refresh_views();
                Ok(())
            }
            Err(err) => {
                self.report(&err, "Failed to load data");
                Err(err)
            }
        }
    }

    // ── Create / update ───────────────────────────────────────

    pub(crate) fn create_budget(
        &mut self,
        api: &dyn LedgerApi,
        form: &BudgetForm,
    ) -> ApiResult<MonthlyBudget> {
        let result = self.guarded(Kind::Budget, || api.create_budget(&form.parse()?));
        match result {
            Ok(budget) => {
                info!(id = %budget.id, category = %budget.category, "monthly budget added");
                self.budgets.push(budget.clone());
                self.notices
                    .push(Level::Success, "Monthly budget added successfully!");
                self.refresh_summary();
                Ok(budget)
            }
            Err(err) => {
                self.report(&err, "Failed to add monthly budget");
                Err(err)
            }
        }
    }

    pub(crate) fn create_expense(
        &mut self,
        api: &dyn LedgerApi,
        form: &ExpenseForm,
    ) -> ApiResult<DailyExpense> {
        let result = self.guarded(Kind::Expense, || api.create_expense(&form.parse()?));
        match result {
            Ok(expense) => {
                info!(id = %expense.id, description = %expense.description, "daily expense added");
                self.expenses.push(expense.clone());
                self.notices
                    .push(Level::Success, "Daily expense added successfully!");
                self.refresh_summary();
                self.refresh_chart();
                Ok(expense)
            }
            Err(err) => {
                self.report(&err, "Failed to add daily expense");
                Err(err)
            }
        }
    }

    /// Replace a budget in place; its position in the list is kept.
    pub(crate) fn update_budget(
        &mut self,
        api: &dyn LedgerApi,
        id: &str,
        form: &BudgetForm,
    ) -> ApiResult<MonthlyBudget> {
        let result = form.parse().and_then(|input| api.update_budget(id, &input));
        match result {
            Ok(budget) => {
                info!(id, "budget updated");
                match self.budgets.iter_mut().find(|b| b.id == id) {
                    Some(slot) => *slot = budget.clone(),
                    None => self.budgets.push(budget.clone()),
                }
                self.notices.push(Level::Success, "Budget updated successfully!");
                self.refresh_summary();
                Ok(budget)
            }
            Err(err) => {
                self.report(&err, "Failed to update budget");
                Err(err)
            }
        }
    }

    pub(crate) fn update_expense(
        &mut self,
        api: &dyn LedgerApi,
        id: &str,
        form: &ExpenseForm,
    ) -> ApiResult<DailyExpense> {
        let result = form.parse().and_then(|input| api.update_expense(id, &input));
        match result {
            Ok(expense) => {
                info!(id, "expense updated");
                match self.expenses.iter_mut().find(|e| e.id == id) {
                    Some(slot) => *slot = expense.clone(),
                    None => self.expenses.push(expense.clone()),
                }
                self.notices.push(Level::Success, "Expense updated successfully!");
                self.refresh_summary();
                self.refresh_chart();
                Ok(expense)
            }
            Err(err) => {
                self.report(&err, "Failed to update expense");
                Err(err)
            }
        }
    }

    // ── Deletion ──────────────────────────────────────────────

    /// Stage a single deletion and return the confirmation prompt.
    pub(crate) fn request_delete(&mut self, target: Selection) -> String {
        let pending = PendingDelete::One(target);
        let prompt = pending.prompt();
        self.pending = Some(pending);
        prompt
    }

    /// Stage the current selection. With nothing selected a warning is
    /// raised and no prompt is returned.
    pub(crate) fn request_bulk_delete(&mut self) -> Option<String> {
        if self.selection.is_empty() {
            self.notices.push(Level::Warning, "Please select items to delete");
            return None;
        }
        let pending = PendingDelete::Many(self.selection.clone());
        let prompt = pending.prompt();
        self.pending = Some(pending);
        Some(prompt)
    }

    pub(crate) fn pending(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    pub(crate) fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            debug!("deletion cancelled");
        }
    }

    /// Run the staged deletion. Returns one result per targeted record.
    pub(crate) fn confirm_pending(&mut self, api: &dyn LedgerApi) -> Vec<ApiResult<Ack>> {
        match self.pending.take() {
            None => Vec::new(),
            Some(PendingDelete::One(target)) => vec![self.delete(api, &target)],
            Some(PendingDelete::Many(targets)) => {
                let results = targets
                    .iter()
                    .map(|target| self.delete(api, target))
                    .collect();
                self.selection.clear();
                results
            }
        }
    }

    fn delete(&mut self, api: &dyn LedgerApi, target: &Selection) -> ApiResult<Ack> {
        let result = match target.kind {
            Kind::Budget => api.delete_budget(&target.id),
            Kind::Expense => api.delete_expense(&target.id),
        };
        match &result {
            Ok(_) => {
                info!(kind = target.kind.noun(), id = %target.id, "deleted");
                match target.kind {
                    Kind::Budget => {
                        self.budgets.retain(|b| b.id != target.id);
                        self.notices.push(Level::Success, "Budget deleted successfully!");
                    }
                    Kind::Expense => {
                        self.expenses.retain(|e| e.id != target.id);
                        self.notices.push(Level::Success, "Expense deleted successfully!");
                        self.refresh_chart();
                    }
                }
                self.selection.retain(|sel| sel != target);
                self.refresh_summary();
            }
            Err(err) => {
                let fallback = format!("Failed to delete {}", target.kind.noun());
                self.report(err, &fallback);
            }
        }
        result
    }

    // ── Bulk selection ────────────────────────────────────────

    pub(crate) fn set_bulk_mode(&mut self, on: bool) {
        self.bulk_mode = on;
        if !on {
            self.selection.clear();
        }
    }

    /// Flip a record's membership in the bulk selection. Returns whether it is
    /// now selected.
    pub(crate) fn toggle_selected(&mut self, target: Selection) -> bool {
        if let Some(pos) = self.selection.iter().position(|sel| *sel == target) {
            self.selection.remove(pos);
            false
        } else {
            self.selection.push(target);
            true
        }
    }

    pub(crate) fn is_selected(&self, kind: Kind, id: &str) -> bool {
        self.selection.iter().any(|sel| sel.kind == kind && sel.id == id)
    }

    // ── Derived views ─────────────────────────────────────────

    /// Apply a new filter and recount the visible rows.
    pub(crate) fn filter_items(
        &mut self,
        search: &str,
        month: &str,
        year: &str,
    ) -> VisibleCounts {
        self.filter = Filter::new(search, month, year);
        self.refresh_summary();
        self.visible
    }

    pub(crate) fn visible_budgets(&self) -> impl Iterator<Item = &MonthlyBudget> {
        self.budgets.iter().filter(|b| self.filter.matches_budget(b))
    }

    pub(crate) fn visible_expenses(&self) -> impl Iterator<Item = &DailyExpense> {
        self.expenses.iter().filter(|e| self.filter.matches_expense(e))
    }

    /// Recompute totals and counters over the visible rows.
    pub(crate) fn refresh_summary(&mut self) {
        self.summary = Summary::compute(self.visible_budgets(), self.visible_expenses());
        self.visible = VisibleCounts {
            budgets: self.visible_budgets().count(),
            expenses: self.visible_expenses().count(),
        };
        debug!(
            remaining = %self.summary.remaining,
            budgets = self.visible.budgets,
            expenses = self.visible.expenses,
            "summary refreshed"
        );
    }

    /// Rebuild the category breakdown from the full expense mirror.
    pub(crate) fn refresh_chart(&mut self) {
        self.chart = ChartData::from_expenses(&self.expenses);
        debug!(slices = self.chart.labels.len(), "chart refreshed");
    }

    fn refresh_views(&mut self) {
        self.refresh_summary();
        self.refresh_chart();
    }

    // ── Notifications ─────────────────────────────────────────

    pub(crate) fn expire_notices(&mut self, now: Instant) {
        self.notices.expire(now);
    }

    /// Run `f` unless a submission from the same form is already in flight.
    fn guarded<T>(&mut self, kind: Kind, f: impl FnOnce() -> ApiResult<T>) -> ApiResult<T> {
        if !self.submitting.insert(kind) {
            return Err(ApiError::Busy);
        }
        let result = f();
        self.submitting.remove(&kind);
        result
    }

    /// Surface an error as a notification. Server messages win over the
    /// fallback; network failures ask the user to retry.
    fn report(&mut self, err: &ApiError, fallback: &str) {
        warn!(error = %err, detail = ?err.detail(), "{fallback}");
        let message = match err {
            ApiError::Busy => return,
            ApiError::Network(_) => format!("{fallback}. Please try again."),
            ApiError::Validation(_) | ApiError::Server { .. } => err
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        };
        self.notices.push(Level::Danger, message);
    }
}

fn contains(budgets: &[MonthlyBudget], expenses: &[DailyExpense], sel: &Selection) -> bool {
    match sel.kind {
        Kind::Budget => budgets.iter().any(|b| b.id == sel.id),
        Kind::Expense => expenses.iter().any(|e| e.id == sel.id),
    }
}
