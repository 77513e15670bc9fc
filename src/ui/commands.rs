use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Local;

use super::app::{App, Screen};
use super::util::{current_month, format_amount, is_date_token, is_month_token, shift_month};
use crate::api::LedgerApi;
use crate::ledger::{count_label, BudgetForm, ExpenseForm};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &dyn LedgerApi) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "budget",
        "Add budget (e.g. :budget Food 500 2024-05)",
        cmd_budget,
        r
    );
    register_command!(
        "expense",
        "Add expense (e.g. :expense Lunch 12.50 @Food 2024-05-02)",
        cmd_expense,
        r
    );
    register_command!(
        "edit",
        "Edit selected row (e.g. :edit amount=450 category=Rent)",
        cmd_edit,
        r
    );
    register_command!("delete", "Delete selected row", cmd_delete, r);
    register_command!("select", "Toggle selection of the current row", cmd_select, r);
    register_command!("bulk", "Toggle bulk select mode", cmd_bulk, r);
    register_command!(
        "delete-selected",
        "Delete all selected rows",
        cmd_delete_selected,
        r
    );
    register_command!("search", "Filter by text (e.g. :search coffee)", cmd_search, r);
    register_command!("s", "Filter by text (e.g. :s coffee)", cmd_search, r);
    register_command!("month", "Filter by month (e.g. :month 2024-05)", cmd_month, r);
    register_command!("m", "Filter by month (e.g. :m 05 for May of any year)", cmd_month, r);
    register_command!("year", "Filter by year (e.g. :year 2024)", cmd_year, r);
    register_command!("y", "Filter by year (e.g. :y 2024)", cmd_year, r);
    register_command!("clear-filters", "Clear search, month and year", cmd_clear_filters, r);
    register_command!("next-month", "Filter to the next month", cmd_next_month, r);
    register_command!("prev-month", "Filter to the previous month", cmd_prev_month, r);
    register_command!("dark", "Toggle dark mode", cmd_dark, r);
    register_command!("reload", "Reload budgets and expenses", cmd_reload, r);
    register_command!("dismiss", "Dismiss the latest notification", cmd_dismiss, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, api: &dyn LedgerApi) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, api)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Argument parsing ─────────────────────────────────────────

/// `<category...> <amount> [YYYY-MM]`. The month defaults to the current one.
pub(crate) fn parse_budget_args(args: &str) -> Option<BudgetForm> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    let month = match tokens.last() {
        Some(t) if is_month_token(t) => {
            let m = t.to_string();
            tokens.pop();
            m
        }
        _ => current_month(),
    };
    let amount = tokens.pop()?;
    if tokens.is_empty() {
        return None;
    }
    Some(BudgetForm::new(tokens.join(" "), amount, month))
}

/// `<description...> <amount> [@category] [YYYY-MM-DD]`, trailing parts in
/// any order. The date defaults to today.
pub(crate) fn parse_expense_args(args: &str) -> Option<ExpenseForm> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    let mut category = String::new();
    let mut date = None;
    while let Some(last) = tokens.last().copied() {
        if let Some(cat) = last.strip_prefix('@') {
            category = cat.replace('_', " ");
        } else if is_date_token(last) && date.is_none() {
            date = Some(last.to_string());
        } else {
            break;
        }
        tokens.pop();
    }
    let amount = tokens.pop()?;
    if tokens.is_empty() {
        return None;
    }
    let date = date.unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
    Some(ExpenseForm::new(tokens.join(" "), amount, category, date))
}

const EDIT_FIELDS: [&str; 5] = ["category", "amount", "month", "description", "date"];

/// `key=value` pairs. A value runs until the next recognised `key=`, so it
/// may contain spaces.
pub(crate) fn parse_edit_args(args: &str) -> Result<Vec<(String, String)>, String> {
    let mut fields: Vec<(String, String)> = Vec::new();
    for token in args.split_whitespace() {
        let keyed = token
            .split_once('=')
            .filter(|(key, _)| EDIT_FIELDS.contains(key));
        if let Some((key, value)) = keyed {
            fields.push((key.to_string(), value.to_string()));
            continue;
        }
        match fields.last_mut() {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(token);
            }
            None => {
                return Err(format!(
                    "Expected field=value, got '{token}'. Fields: {}",
                    EDIT_FIELDS.join(", ")
                ))
            }
        }
    }
    Ok(fields)
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_budgets(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, api: &dyn LedgerApi) -> anyhow::Result<()> {
    let Some(form) = parse_budget_args(args) else {
        app.set_status("Usage: :budget <category> <amount> [YYYY-MM]");
        return Ok(());
    };
    if let Ok(budget) = app.ledger.create_budget(api, &form) {
        app.screen = Screen::Budgets;
        app.set_status(format!(
            "Budget added: {} {} for {}",
            budget.category,
            format_amount(budget.amount),
            budget.month
        ));
        app.refresh_analytics(api);
    }
    app.clamp_cursors();
    Ok(())
}

fn cmd_expense(args: &str, app: &mut App, api: &dyn LedgerApi) -> anyhow::Result<()> {
    let Some(form) = parse_expense_args(args) else {
        app.set_status("Usage: :expense <description> <amount> [@category] [YYYY-MM-DD]");
        return Ok(());
    };
    if let Ok(expense) = app.ledger.create_expense(api, &form) {
        app.screen = Screen::Expenses;
        app.set_status(format!(
            "Expense added: {} {} on {}",
            expense.description,
            format_amount(expense.amount),
            expense.date
        ));
        app.refresh_analytics(api);
    }
    app.clamp_cursors();
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, api: &dyn LedgerApi) -> anyhow::Result<()> {
    let fields = match parse_edit_args(args) {
        Ok(fields) if !fields.is_empty() => fields,
        Ok(_) => {
            app.set_status("Usage: :edit <field>=<value> ...");
            return Ok(());
        }
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };

    match app.screen {
        Screen::Budgets => {
            let Some(budget) = app.selected_budget().cloned() else {
                app.set_status("No budget selected");
                return Ok(());
            };
            let mut form = BudgetForm::from_budget(&budget);
            for (key, value) in fields {
                match key.as_str() {
                    "category" => form.category = value,
                    "amount" => form.amount = value,
                    "month" => form.month = value,
                    other => {
                        app.set_status(format!("Budgets have no '{other}' field"));
                        return Ok(());
                    }
                }
            }
            if app.ledger.update_budget(api, &budget.id, &form).is_ok() {
                app.set_status(format!("Updated budget: {}", form.category));
                app.refresh_analytics(api);
            }
        }
        Screen::Expenses => {
            let Some(expense) = app.selected_expense().cloned() else {
                app.set_status("No expense selected");
                return Ok(());
            };
            let mut form = ExpenseForm::from_expense(&expense);
            for (key, value) in fields {
                match key.as_str() {
                    "description" => form.description = value,
                    "amount" => form.amount = value,
                    "category" => form.category = value,
                    "date" => form.date = value,
                    other => {
                        app.set_status(format!("Expenses have no '{other}' field"));
                        return Ok(());
                    }
                }
            }
            if app.ledger.update_expense(api, &expense.id, &form).is_ok() {
                app.set_status(format!("Updated expense: {}", form.description));
                app.refresh_analytics(api);
            }
        }
        Screen::Dashboard => app.set_status("Navigate to Budgets or Expenses first"),
    }
    app.clamp_cursors();
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    let Some(target) = app.selected_target() else {
        app.set_status("Nothing selected to delete");
        return Ok(());
    };
    let prompt = app.ledger.request_delete(target);
    app.begin_confirm(prompt);
    Ok(())
}

fn cmd_select(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    let Some(target) = app.selected_target() else {
        app.set_status("Navigate to Budgets or Expenses first");
        return Ok(());
    };
    if !app.ledger.bulk_mode {
        app.ledger.set_bulk_mode(true);
    }
    app.ledger.toggle_selected(target);
    app.set_status(format!("{} selected", app.ledger.selection.len()));
    Ok(())
}

fn cmd_bulk(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    let on = !app.ledger.bulk_mode;
    app.ledger.set_bulk_mode(on);
    app.set_status(if on {
        "Bulk select on: Space selects rows, :delete-selected removes them"
    } else {
        "Bulk select off"
    });
    Ok(())
}

fn cmd_delete_selected(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    if let Some(prompt) = app.ledger.request_bulk_delete() {
        app.begin_confirm(prompt);
    }
    Ok(())
}

/// Execute the staged deletion after the user said yes.
pub(crate) fn confirm_pending(app: &mut App, api: &dyn LedgerApi) {
    if app.ledger.pending().is_none() {
        app.end_confirm();
        return;
    }
    let results = app.ledger.confirm_pending(api);
    let deleted = results.iter().filter(|r| r.is_ok()).count();
    app.end_confirm();
    if results.len() > 1 {
        app.set_status(format!("Deleted {deleted} of {} items", results.len()));
    } else if deleted == 1 {
        app.set_status("Deleted");
    }
    if deleted > 0 {
        app.refresh_analytics(api);
    }
    app.clamp_cursors();
}

pub(crate) fn cancel_pending(app: &mut App) {
    app.ledger.cancel_pending();
    app.end_confirm();
    app.set_status("Cancelled");
}

fn cmd_search(args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.apply_search();
    report_visible(app);
    Ok(())
}

/// Month and year are matched as plain substrings of each row's date, so
/// `:month 05` covers May of every year.
fn cmd_month(args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.set_month_filter(args);
    if args.is_empty() {
        app.set_status("Month filter cleared");
    } else {
        report_visible(app);
    }
    Ok(())
}

fn cmd_year(args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.set_year_filter(args);
    if args.is_empty() {
        app.set_status("Year filter cleared");
    } else {
        report_visible(app);
    }
    Ok(())
}

fn cmd_clear_filters(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.clear_filters();
    app.set_status("Filters cleared");
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    advance_month(app, 1);
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    advance_month(app, -1);
    Ok(())
}

fn advance_month(app: &mut App, delta: i32) {
    let base = if is_month_token(&app.ledger.filter.month) {
        app.ledger.filter.month.clone()
    } else {
        current_month()
    };
    if let Some(month) = shift_month(&base, delta) {
        app.set_month_filter(&month);
        report_visible(app);
    }
}

fn cmd_dark(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    match app.prefs.toggle_dark_mode() {
        Ok(true) => app.set_status("Dark mode on"),
        Ok(false) => app.set_status("Dark mode off"),
        Err(e) => app.set_status(format!("Could not save preference: {e:#}")),
    }
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App, api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.reload(api);
    Ok(())
}

fn cmd_dismiss(_args: &str, app: &mut App, _api: &dyn LedgerApi) -> anyhow::Result<()> {
    app.ledger.notices.dismiss_latest();
    Ok(())
}

fn report_visible(app: &mut App) {
    let filter = app.ledger.filter.describe();
    let counts = app.ledger.visible;
    app.set_status(format!(
        "Budgets: {} | Expenses: {}{}",
        count_label(counts.budgets),
        count_label(counts.expenses),
        if filter.is_empty() {
            String::new()
        } else {
            format!(" | {filter}")
        }
    ));
}

