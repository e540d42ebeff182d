mod common;

use anyhow::Result;
use common::{parse_date, test_expense_log};
use moneymate::{ExpenseCategory, ExpenseLog, FileStore};

#[test]
fn test_expenses_survive_reopen() -> Result<()> {
    let (mut log, temp) = test_expense_log()?;

    log.add_expense(1200, ExpenseCategory::Food)?;
    log.add_expense(4500, ExpenseCategory::from_str("Gym").unwrap())?;

    let reopened = ExpenseLog::open(FileStore::new(temp.path()));
    assert_eq!(reopened.expenses(), log.expenses());
    assert_eq!(
        reopened.expenses()[1].category,
        ExpenseCategory::Other("Gym".into())
    );

    Ok(())
}

#[test]
fn test_expenses_grouped_by_day() -> Result<()> {
    let (mut log, _temp) = test_expense_log()?;

    log.add_expense_at(800, ExpenseCategory::Transport, parse_date("2024-06-02"))?;
    log.add_expense_at(1500, ExpenseCategory::Food, parse_date("2024-06-01"))?;
    log.add_expense_at(2200, ExpenseCategory::Shopping, parse_date("2024-06-02"))?;

    let days = log.by_day();
    assert_eq!(days.len(), 2);

    let (first_day, first) = days.iter().next().unwrap();
    assert_eq!(first_day.to_string(), "2024-06-01");
    assert_eq!(first.len(), 1);

    let june_second: Vec<&ExpenseCategory> = days
        .values()
        .last()
        .unwrap()
        .iter()
        .map(|e| &e.category)
        .collect();
    assert_eq!(
        june_second,
        vec![&ExpenseCategory::Transport, &ExpenseCategory::Shopping]
    );

    Ok(())
}

#[test]
fn test_expense_log_ignores_loans_file() -> Result<()> {
    let (mut log, temp) = test_expense_log()?;
    log.add_expense(300, ExpenseCategory::Entertainment)?;

    let ledger = moneymate::LoanLedger::open(FileStore::new(temp.path()));
    assert!(ledger.is_empty());

    Ok(())
}
