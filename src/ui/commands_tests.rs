#![allow(clippy::unwrap_used)]

use std::path::Path;

use rust_decimal_macros::dec;

use super::app::{App, InputMode, Screen};
use super::commands::*;
use crate::api::{LedgerApi, LocalApi};
use crate::db::{Database, SeedUser};
use crate::ledger::Level;
use crate::prefs::PrefsStore;

struct Fixture {
    _tmp: tempfile::TempDir,
    api: LocalApi,
    app: App,
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let mut db = Database::open_in_memory().unwrap();
    db.bootstrap(&SeedUser::default()).unwrap();
    let user_id = db.find_user("demo").unwrap().unwrap().id.unwrap();
    let api = LocalApi::new(db, user_id, Path::new(":memory:"));
    let prefs = PrefsStore::load(&tmp.path().join("prefs.json")).unwrap();
    let app = App::new(prefs, api.describe());
    Fixture {
        _tmp: tmp,
        api,
        app,
    }
}

fn run(fx: &mut Fixture, input: &str) {
    handle_command(input, &mut fx.app, &fx.api).unwrap();
}

// ── parsing ───────────────────────────────────────────────────

#[test]
fn test_parse_budget_args() {
    let form = parse_budget_args("Food & Dining 500 2024-05").unwrap();
    assert_eq!(form.category, "Food & Dining");
    assert_eq!(form.amount, "500");
    assert_eq!(form.month, "2024-05");

    let form = parse_budget_args("Rent 900").unwrap();
    assert_eq!(form.month.len(), 7);

    assert!(parse_budget_args("500").is_none());
    assert!(parse_budget_args("").is_none());
}

#[test]
fn test_parse_expense_args() {
    let form = parse_expense_args("Team lunch 42.10 @Eating_Out 2024-05-02").unwrap();
    assert_eq!(form.description, "Team lunch");
    assert_eq!(form.amount, "42.10");
    assert_eq!(form.category, "Eating Out");
    assert_eq!(form.date, "2024-05-02");

    let form = parse_expense_args("Coffee 3 2024-05-03 @Food").unwrap();
    assert_eq!(form.category, "Food");
    assert_eq!(form.date, "2024-05-03");

    let form = parse_expense_args("Bus 2.75").unwrap();
    assert_eq!(form.category, "");
    assert_eq!(form.date.len(), 10);

    assert!(parse_expense_args("@Food 2024-05-02").is_none());
}

#[test]
fn test_parse_edit_args() {
    let fields = parse_edit_args("amount=450 description=Big team lunch").unwrap();
    assert_eq!(
        fields,
        vec![
            ("amount".to_string(), "450".to_string()),
            ("description".to_string(), "Big team lunch".to_string()),
        ]
    );
    assert!(parse_edit_args("oops").is_err());
    assert!(parse_edit_args("").unwrap().is_empty());
}

// ── commands ──────────────────────────────────────────────────

#[test]
fn test_unknown_command_suggests() {
    let mut fx = fixture();
    run(&mut fx, "budgts");
    assert!(fx.app.status_message.contains("Did you mean :budgets?"));
}

#[test]
fn test_add_budget_and_expense() {
    let mut fx = fixture();
    run(&mut fx, "budget Food 500 2024-05");
    assert_eq!(fx.app.screen, Screen::Budgets);
    assert!(fx.app.status_message.contains("$500.00"));

    run(&mut fx, "expense Lunch 120 @Food 2024-05-02");
    assert_eq!(fx.app.screen, Screen::Expenses);
    assert_eq!(fx.app.ledger.summary.remaining, dec!(380));
    assert_eq!(fx.api.list_expenses().unwrap().len(), 1);
}

#[test]
fn test_bad_amount_raises_notice() {
    let mut fx = fixture();
    run(&mut fx, "budget Food lots");
    let notice = fx.app.ledger.notices.latest().unwrap();
    assert_eq!(notice.level, Level::Danger);
    assert!(fx.app.ledger.budgets.is_empty());
}

#[test]
fn test_edit_selected_budget() {
    let mut fx = fixture();
    run(&mut fx, "budget Food 500 2024-05");
    run(&mut fx, "edit amount=650 category=Groceries");
    let stored = fx.api.list_budgets().unwrap();
    assert_eq!(stored[0].category, "Groceries");
    assert_eq!(stored[0].amount, dec!(650));
    assert_eq!(fx.app.ledger.budgets, stored);
}

#[test]
fn test_edit_rejects_foreign_field() {
    let mut fx = fixture();
    run(&mut fx, "budget Food 500 2024-05");
    run(&mut fx, "edit date=2024-05-01");
    assert!(fx.app.status_message.contains("no 'date' field"));
}

#[test]
fn test_delete_flow_with_confirm_and_cancel() {
    let mut fx = fixture();
    run(&mut fx, "expense Tea 3 @Food 2024-05-01");

    run(&mut fx, "delete");
    assert_eq!(fx.app.input_mode, InputMode::Confirm);
    assert_eq!(
        fx.app.confirm_message,
        "Are you sure you want to delete this expense?"
    );
    cancel_pending(&mut fx.app);
    assert_eq!(fx.app.input_mode, InputMode::Normal);
    assert_eq!(fx.app.ledger.expenses.len(), 1);

    run(&mut fx, "delete");
    confirm_pending(&mut fx.app, &fx.api);
    assert!(fx.app.ledger.expenses.is_empty());
    assert!(fx.api.list_expenses().unwrap().is_empty());
}

#[test]
fn test_bulk_delete_across_screens() {
    let mut fx = fixture();
    run(&mut fx, "budget Food 500 2024-05");
    run(&mut fx, "select");
    run(&mut fx, "expense Tea 3 @Food 2024-05-01");
    run(&mut fx, "select");
    assert_eq!(fx.app.ledger.selection.len(), 2);

    run(&mut fx, "delete-selected");
    assert_eq!(
        fx.app.confirm_message,
        "Are you sure you want to delete 2 selected items?"
    );
    confirm_pending(&mut fx.app, &fx.api);
    assert_eq!(fx.app.status_message, "Deleted 2 of 2 items");
    assert!(fx.app.ledger.budgets.is_empty());
    assert!(fx.app.ledger.expenses.is_empty());
}

#[test]
fn test_delete_selected_without_selection() {
    let mut fx = fixture();
    run(&mut fx, "delete-selected");
    assert_eq!(fx.app.input_mode, InputMode::Normal);
    assert_eq!(
        fx.app.ledger.notices.latest().unwrap().message,
        "Please select items to delete"
    );
}

#[test]
fn test_month_and_year_filters() {
    let mut fx = fixture();
    run(&mut fx, "budget Food 500 2024-05");
    run(&mut fx, "budget Rent 900 2024-06");

    run(&mut fx, "month 2024-05");
    assert_eq!(fx.app.ledger.visible.budgets, 1);
    assert!(fx.app.status_message.contains("1 items"));

    run(&mut fx, "next-month");
    assert_eq!(fx.app.ledger.filter.month, "2024-06");
    assert_eq!(fx.app.selected_budget().unwrap().category, "Rent");

    run(&mut fx, "month");
    assert_eq!(fx.app.status_message, "Month filter cleared");
    assert_eq!(fx.app.ledger.visible.budgets, 2);

    run(&mut fx, "clear-filters");
    run(&mut fx, "year 2023");
    assert_eq!(fx.app.ledger.visible.budgets, 0);
    run(&mut fx, "year");
    assert_eq!(fx.app.ledger.visible.budgets, 2);
}

#[test]
fn test_month_number_matches_every_year() {
    let mut fx = fixture();
    run(&mut fx, "expense Old receipt 12 @Food 2019-05-10");
    run(&mut fx, "expense Lunch 8 @Food 2024-05-02");
    run(&mut fx, "expense Taxi 30 @Transport 2024-06-01");

    run(&mut fx, "month 05");
    assert_eq!(fx.app.ledger.filter.month, "05");
    assert_eq!(fx.app.ledger.visible.expenses, 2);
    assert_eq!(fx.app.ledger.summary.total_expenses, dec!(20));

    run(&mut fx, "year 19");
    assert_eq!(fx.app.ledger.filter.year, "19");
    assert_eq!(fx.app.ledger.visible.expenses, 1);
    assert_eq!(fx.app.selected_expense().unwrap().description, "Old receipt");

    run(&mut fx, "clear-filters");
    run(&mut fx, "month 2024");
    assert_eq!(fx.app.ledger.visible.expenses, 2);
}

#[test]
fn test_search_command() {
    let mut fx = fixture();
    run(&mut fx, "expense Seafood dinner 40 @Dining 2024-05-01");
    run(&mut fx, "expense Bus 2 @Transport 2024-05-01");
    run(&mut fx, "search food");
    assert_eq!(fx.app.ledger.visible.expenses, 1);
    assert_eq!(fx.app.ledger.summary.total_expenses, dec!(40));
    assert_eq!(fx.app.ledger.chart.total(), dec!(42));
}

#[test]
fn test_dark_mode_toggle_persists() {
    let mut fx = fixture();
    assert!(!fx.app.prefs.prefs.dark_mode);
    run(&mut fx, "dark");
    assert!(fx.app.prefs.prefs.dark_mode);
    assert_eq!(fx.app.status_message, "Dark mode on");
    let reloaded = PrefsStore::load(&fx._tmp.path().join("prefs.json")).unwrap();
    assert!(reloaded.prefs.dark_mode);
}

#[test]
fn test_quit() {
    let mut fx = fixture();
    run(&mut fx, "q");
    assert!(!fx.app.running);
}
