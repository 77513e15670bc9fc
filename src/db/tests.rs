#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn provisioned() -> (Database, i64) {
    let mut db = Database::open_in_memory().unwrap();
    db.bootstrap(&SeedUser::default()).unwrap();
    let user_id = db.find_user("demo").unwrap().unwrap().id.unwrap();
    (db, user_id)
}

// ── Bootstrap ─────────────────────────────────────────────────

#[test]
fn test_bootstrap_creates_three_collections() {
    let mut db = Database::open_in_memory().unwrap();
    let report = db.bootstrap(&SeedUser::default()).unwrap();
    assert_eq!(
        report.collections,
        vec!["daily_expenses", "monthly_budgets", "users"]
    );
    assert!(report.seed_inserted);
}

#[test]
fn test_bootstrap_inserts_exactly_one_seed_user() {
    let (db, _) = provisioned();
    assert_eq!(db.user_count().unwrap(), 1);
    let demo = db.find_user("demo").unwrap().unwrap();
    assert_eq!(demo.password, hash_password("password"));
    assert!(!demo.created_at.is_empty());
}

#[test]
fn test_bootstrap_is_idempotent() {
    let (mut db, _) = provisioned();
    let second = db.bootstrap(&SeedUser::default()).unwrap();
    assert!(!second.seed_inserted);
    assert_eq!(second.collections.len(), 3);
    assert_eq!(db.user_count().unwrap(), 1);
}

#[test]
fn test_seed_user_hashes_demo_password() {
    let seed = SeedUser::default();
    assert_eq!(seed.username, "demo");
    assert_eq!(
        seed.password_hash,
        "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
    );
}

#[test]
fn test_bootstrap_keeps_existing_seed_credentials() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_user(&User::new("demo", "changed")).unwrap();
    let report = db.bootstrap(&SeedUser::default()).unwrap();
    assert!(!report.seed_inserted);
    assert_eq!(db.user_count().unwrap(), 1);
    let demo = db.find_user("demo").unwrap().unwrap();
    assert_eq!(demo.password, hash_password("changed"));
}

#[test]
fn test_username_is_unique() {
    let (db, _) = provisioned();
    let dup = User::new("demo", "other");
    assert!(db.insert_user(&dup).is_err());
    assert_eq!(db.user_count().unwrap(), 1);

    let other = User::new("alice", "secret");
    assert!(db.insert_user(&other).is_ok());
    assert_eq!(db.user_count().unwrap(), 2);
}

#[test]
fn test_compound_indexes_present() {
    let (db, _) = provisioned();
    assert_eq!(
        db.indexes("monthly_budgets").unwrap(),
        vec!["idx_monthly_budgets_user_month"]
    );
    assert_eq!(
        db.indexes("daily_expenses").unwrap(),
        vec!["idx_daily_expenses_user_date"]
    );
    assert_eq!(db.indexes("users").unwrap(), vec!["idx_users_username"]);
}

#[test]
fn test_reopen_on_disk_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("budget.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.bootstrap(&SeedUser::default()).unwrap();
        let uid = db.find_user("demo").unwrap().unwrap().id.unwrap();
        db.insert_budget(uid, &BudgetInput::new("Food", dec!(200), "2024-05"))
            .unwrap();
    }
    let mut db = Database::open(&path).unwrap();
    let report = db.bootstrap(&SeedUser::default()).unwrap();
    assert!(!report.seed_inserted);
    let uid = db.find_user("demo").unwrap().unwrap().id.unwrap();
    assert_eq!(db.get_budgets(uid, None).unwrap().len(), 1);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_crud() {
    let (db, uid) = provisioned();
    let created = db
        .insert_budget(uid, &BudgetInput::new("Food", dec!(500), "2024-05"))
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.amount, dec!(500));

    let id: i64 = created.id.parse().unwrap();
    let updated = db
        .update_budget(uid, id, &BudgetInput::new("Groceries", dec!(450.50), "2024-06"))
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.category, "Groceries");
    assert_eq!(updated.amount, dec!(450.50));
    assert_eq!(updated.month, "2024-06");

    assert!(db.delete_budget(uid, id).unwrap());
    assert!(db.get_budgets(uid, None).unwrap().is_empty());
}

#[test]
fn test_budget_missing_id() {
    let (db, uid) = provisioned();
    let input = BudgetInput::new("Food", dec!(1), "2024-05");
    assert!(db.update_budget(uid, 9999, &input).unwrap().is_none());
    assert!(!db.delete_budget(uid, 9999).unwrap());
}

#[test]
fn test_budgets_scoped_to_owner() {
    let (db, uid) = provisioned();
    let other = db.insert_user(&User::new("bob", "pw")).unwrap();
    let mine = db
        .insert_budget(uid, &BudgetInput::new("Food", dec!(100), "2024-05"))
        .unwrap();
    db.insert_budget(other, &BudgetInput::new("Rent", dec!(900), "2024-05"))
        .unwrap();

    let budgets = db.get_budgets(uid, None).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].category, "Food");

    // Another user cannot touch it
    let id: i64 = mine.id.parse().unwrap();
    assert!(!db.delete_budget(other, id).unwrap());
    assert_eq!(db.get_budgets(uid, None).unwrap().len(), 1);
}

#[test]
fn test_budgets_by_month() {
    let (db, uid) = provisioned();
    db.insert_budget(uid, &BudgetInput::new("Food", dec!(100), "2024-05"))
        .unwrap();
    db.insert_budget(uid, &BudgetInput::new("Food", dec!(120), "2024-06"))
        .unwrap();
    let may = db.get_budgets(uid, Some("2024-05")).unwrap();
    assert_eq!(may.len(), 1);
    assert_eq!(may[0].amount, dec!(100));
    assert_eq!(db.get_budgets(uid, None).unwrap().len(), 2);
}

#[test]
fn test_budgets_keep_insertion_order() {
    let (db, uid) = provisioned();
    for cat in ["Zoo", "Apples", "Mid"] {
        db.insert_budget(uid, &BudgetInput::new(cat, dec!(1), "2024-05"))
            .unwrap();
    }
    let names: Vec<String> = db
        .get_budgets(uid, None)
        .unwrap()
        .into_iter()
        .map(|b| b.category)
        .collect();
    assert_eq!(names, vec!["Zoo", "Apples", "Mid"]);
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_expense_crud() {
    let (db, uid) = provisioned();
    let created = db
        .insert_expense(
            uid,
            &ExpenseInput::new("Coffee", dec!(4.25), "Food", "2024-05-03"),
        )
        .unwrap();
    let id: i64 = created.id.parse().unwrap();

    let fetched = db.get_expense(uid, id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = db
        .update_expense(
            uid,
            id,
            &ExpenseInput::new("Latte", dec!(5.10), "Coffee", "2024-05-04"),
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.description, "Latte");
    assert_eq!(updated.amount, dec!(5.10));

    assert!(db.delete_expense(uid, id).unwrap());
    assert!(db.get_expense(uid, id).unwrap().is_none());
    assert!(!db.delete_expense(uid, id).unwrap());
}

#[test]
fn test_expenses_by_month_prefix() {
    let (db, uid) = provisioned();
    db.insert_expense(uid, &ExpenseInput::new("A", dec!(1), "Food", "2024-05-01"))
        .unwrap();
    db.insert_expense(uid, &ExpenseInput::new("B", dec!(2), "Food", "2024-05-31"))
        .unwrap();
    db.insert_expense(uid, &ExpenseInput::new("C", dec!(3), "Food", "2024-06-01"))
        .unwrap();
    assert_eq!(db.get_expenses(uid, Some("2024-05")).unwrap().len(), 2);
    assert_eq!(db.get_expenses(uid, None).unwrap().len(), 3);
}

#[test]
fn test_expense_amount_precision_preserved() {
    let (db, uid) = provisioned();
    db.insert_expense(uid, &ExpenseInput::new("Tiny", dec!(0.01), "", "2024-05-01"))
        .unwrap();
    let all = db.get_expenses(uid, None).unwrap();
    assert_eq!(all[0].amount, dec!(0.01));
    assert!(all[0].category.is_empty());
}
