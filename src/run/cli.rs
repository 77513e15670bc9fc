use anyhow::Result;

use crate::api;
use crate::config::Config;
use crate::db::{Database, SeedUser};
use crate::ledger::{count_label, Filter};
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    match args[0].as_str() {
        "bootstrap" => cli_bootstrap(config),
        "summary" | "s" => cli_summary(config),
        "budgets" => cli_budgets(&args[1..], config),
        "expenses" => cli_expenses(&args[1..], config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budget-planner {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Budget Planner: monthly budgets and daily expenses in the terminal");
    println!();
    println!("Usage: budget-planner [options] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  bootstrap                     Provision the local store and seed user");
    println!("  summary                       Print this month's analytics summary");
    println!("  budgets [month]               List monthly budgets (e.g. 2024-05, 05)");
    println!("  expenses [month]              List daily expenses (e.g. 2024-05, 05)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --api <url>                   Use a remote budget service");
    println!("  --local                       Force the local store");
    println!("  --db <path>                   Local store location");
    println!("  --user <name>                 Local user (default: demo)");
}

fn cli_bootstrap(config: &Config) -> Result<()> {
    let mut db = Database::open(&config.db_path)?;
    let report = db.bootstrap(&SeedUser::default())?;

    println!("Store: {}", config.db_path.display());
    println!("{}", "─".repeat(40));
    for name in &report.collections {
        let indexes = db.indexes(name)?;
        if indexes.is_empty() {
            println!("  {name}");
        } else {
            println!("  {name:<18} {}", indexes.join(", "));
        }
    }
    let seed = SeedUser::default();
    let created = db
        .find_user(&seed.username)?
        .map(|user| user.created_at)
        .unwrap_or_default();
    if report.seed_inserted {
        println!("Seed user '{}' created {created}", seed.username);
    } else {
        println!("Seed user '{}' already present (created {created})", seed.username);
    }
    println!("Users: {}", db.user_count()?);
    Ok(())
}

fn cli_summary(config: &Config) -> Result<()> {
    let api = api::connect(config)?;
    let summary = api.analytics_summary()?;

    println!("Budget Planner ({})", api.describe());
    println!("{}", "─".repeat(40));
    println!("  Total Budget:   {}", format_amount(summary.total_budget));
    println!("  Total Expenses: {}", format_amount(summary.total_expenses));
    println!("  Remaining:      {}", format_amount(summary.remaining));
    println!("  Savings Rate:   {}%", summary.savings_rate);

    if !summary.category_breakdown.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &summary.category_breakdown {
            println!("  {name:<24} {}", format_amount(*amount));
        }
    }

    if !summary.budget_progress.is_empty() {
        println!();
        println!("Budget Progress:");
        for progress in &summary.budget_progress {
            println!(
                "  {:<24} {} of {} ({}%)",
                progress.category,
                format_amount(progress.spent),
                format_amount(progress.budgeted),
                progress.percentage
            );
        }
    }
    Ok(())
}

/// Optional month argument shared by the list commands, matched as a plain
/// substring of each row's date (`2024-05`, `05`, `2024`).
fn month_filter(args: &[String]) -> Filter {
    args.first()
        .map(|month| Filter::new("", month.as_str(), ""))
        .unwrap_or_default()
}

fn cli_budgets(args: &[String], config: &Config) -> Result<()> {
    let filter = month_filter(args);
    let api = api::connect(config)?;
    let budgets = api.list_budgets()?;
    let visible: Vec<_> = budgets.iter().filter(|b| filter.matches_budget(b)).collect();

    println!("{:<6} {:<24} {:<8} {:>14}", "ID", "Category", "Month", "Amount");
    println!("{}", "─".repeat(55));
    for budget in &visible {
        println!(
            "{:<6} {:<24} {:<8} {:>14}",
            truncate(&budget.id, 6),
            truncate(&budget.category, 24),
            budget.month,
            format_amount(budget.amount)
        );
    }
    println!("{}", count_label(visible.len()));
    Ok(())
}

fn cli_expenses(args: &[String], config: &Config) -> Result<()> {
    let filter = month_filter(args);
    let api = api::connect(config)?;
    let expenses = api.list_expenses()?;
    let visible: Vec<_> = expenses
        .iter()
        .filter(|e| filter.matches_expense(e))
        .collect();

    println!(
        "{:<6} {:<11} {:<28} {:<14} {:>14}",
        "ID", "Date", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(77));
    for expense in &visible {
        println!(
            "{:<6} {:<11} {:<28} {:<14} {:>14}",
            truncate(&expense.id, 6),
            expense.date,
            truncate(&expense.description, 28),
            truncate(expense.category_label(), 14),
            format_amount(expense.amount)
        );
    }
    println!("{}", count_label(visible.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyExpense;
    use rust_decimal_macros::dec;

    fn expense(date: &str) -> DailyExpense {
        DailyExpense {
            id: "1".into(),
            description: "Tea".into(),
            amount: dec!(3),
            category: "Food".into(),
            date: date.into(),
        }
    }

    #[test]
    fn test_month_argument_is_a_plain_substring() {
        let filter = month_filter(&["05".to_string()]);
        assert!(filter.matches_expense(&expense("2019-05-10")));
        assert!(!filter.matches_expense(&expense("2019-06-10")));

        let filter = month_filter(&["2019".to_string()]);
        assert!(filter.matches_expense(&expense("2019-06-10")));

        assert!(month_filter(&[]).is_empty());
    }
}
