use tracing::warn;

use super::theme::{self, Palette};
use super::util::clamp_cursor;
use crate::api::{AnalyticsSummary, LedgerApi};
use crate::ledger::{Kind, Ledger, Selection};
use crate::models::{DailyExpense, MonthlyBudget};
use crate::prefs::PrefsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Budgets,
    Expenses,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Budgets, Self::Expenses]
    }

    /// Collection listed on this screen, if any.
    pub(crate) fn kind(self) -> Option<Kind> {
        match self {
            Self::Dashboard => None,
            Self::Budgets => Some(Kind::Budget),
            Self::Expenses => Some(Kind::Expense),
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Budgets => write!(f, "Budgets"),
            Self::Expenses => write!(f, "Expenses"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) backend_label: String,

    pub(crate) ledger: Ledger,
    pub(crate) analytics: Option<AnalyticsSummary>,
    pub(crate) prefs: PrefsStore,

    // Lists
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Confirmation
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(prefs: PrefsStore, backend_label: String) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            backend_label,

            ledger: Ledger::new(),
            analytics: None,
            prefs,

            budget_index: 0,
            budget_scroll: 0,
            expense_index: 0,
            expense_scroll: 0,

            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn palette(&self) -> &'static Palette {
        theme::palette(self.prefs.prefs.dark_mode)
    }

    /// Full reload of both collections plus the month-to-date analytics.
    pub(crate) fn reload(&mut self, api: &dyn LedgerApi) {
        if self.ledger.load_all(api).is_ok() {
            self.set_status(format!(
                "Loaded {} budgets, {} expenses from {}",
                self.ledger.budgets.len(),
                self.ledger.expenses.len(),
                self.backend_label
            ));
        }
        self.refresh_analytics(api);
        self.clamp_cursors();
    }

    pub(crate) fn refresh_analytics(&mut self, api: &dyn LedgerApi) {
        self.analytics = match api.analytics_summary() {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "analytics summary unavailable");
                None
            }
        };
    }

    /// Re-run the filter with the current search text, keeping month/year.
    pub(crate) fn apply_search(&mut self) {
        let month = self.ledger.filter.month.clone();
        let year = self.ledger.filter.year.clone();
        self.ledger.filter_items(&self.search_input, &month, &year);
        self.clamp_cursors();
    }

    pub(crate) fn set_month_filter(&mut self, month: &str) {
        let year = self.ledger.filter.year.clone();
        self.ledger.filter_items(&self.search_input, month, &year);
        self.clamp_cursors();
    }

    pub(crate) fn set_year_filter(&mut self, year: &str) {
        let month = self.ledger.filter.month.clone();
        self.ledger.filter_items(&self.search_input, &month, year);
        self.clamp_cursors();
    }

    pub(crate) fn clear_filters(&mut self) {
        self.search_input.clear();
        self.ledger.filter_items("", "", "");
        self.clamp_cursors();
    }

    pub(crate) fn visible_budgets(&self) -> Vec<&MonthlyBudget> {
        self.ledger.visible_budgets().collect()
    }

    pub(crate) fn visible_expenses(&self) -> Vec<&DailyExpense> {
        self.ledger.visible_expenses().collect()
    }

    pub(crate) fn selected_budget(&self) -> Option<&MonthlyBudget> {
        self.ledger.visible_budgets().nth(self.budget_index)
    }

    pub(crate) fn selected_expense(&self) -> Option<&DailyExpense> {
        self.ledger.visible_expenses().nth(self.expense_index)
    }

    /// The record under the cursor on the current screen.
    pub(crate) fn selected_target(&self) -> Option<Selection> {
        match self.screen.kind()? {
            Kind::Budget => self.selected_budget().map(|b| Selection::budget(b.id.clone())),
            Kind::Expense => self
                .selected_expense()
                .map(|e| Selection::expense(e.id.clone())),
        }
    }

    pub(crate) fn clamp_cursors(&mut self) {
        let budgets = self.ledger.visible.budgets;
        let expenses = self.ledger.visible.expenses;
        clamp_cursor(&mut self.budget_index, &mut self.budget_scroll, budgets);
        clamp_cursor(&mut self.expense_index, &mut self.expense_scroll, expenses);
    }

    pub(crate) fn begin_confirm(&mut self, prompt: String) {
        self.confirm_message = prompt;
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn end_confirm(&mut self) {
        self.confirm_message.clear();
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
