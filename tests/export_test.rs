mod common;

use anyhow::Result;
use common::{parse_date, test_ledger};
use moneymate::io::Exporter;
use moneymate::{Expense, ExpenseCategory};

#[test]
fn test_export_loans_csv() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    let loan = ledger.add_loan(15000, "Alex", "rent, March")?;
    ledger.apply_repayment(loan.id, 5000)?;
    ledger.add_loan(2000, "Sam", "lunch")?;

    let mut out = Vec::new();
    let count = Exporter::new(ledger.loans(), &[]).export_loans_csv(&mut out)?;

    assert_eq!(count, 2);
    let csv = String::from_utf8(out)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,recipient,reason,amount,principal,repayments");
    assert_eq!(
        lines[1],
        format!("{},Alex,\"rent, March\",100.00,150.00,1", loan.id)
    );
    assert!(lines[2].ends_with(",Sam,lunch,20.00,20.00,0"));

    Ok(())
}

#[test]
fn test_export_repayments_csv() -> Result<()> {
    let (mut ledger, _temp) = test_ledger()?;
    let loan = ledger.add_loan(10000, "Alex", "rent")?;
    ledger.apply_repayment_at(loan.id, 2500, parse_date("2024-01-15"))?;
    ledger.apply_repayment_at(loan.id, 2500, parse_date("2024-02-15"))?;
    ledger.add_loan(2000, "Sam", "lunch")?;

    let mut out = Vec::new();
    let count = Exporter::new(ledger.loans(), &[]).export_repayments_csv(&mut out)?;

    assert_eq!(count, 2);
    let csv = String::from_utf8(out)?;
    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert!(rows[0].ends_with(",2024-01-15T00:00:00+00:00,25.00"));
    assert!(rows[1].starts_with(&loan.id.to_string()));

    Ok(())
}

#[test]
fn test_export_expenses_csv() -> Result<()> {
    let expenses = vec![
        Expense::new(1250, ExpenseCategory::Food, parse_date("2024-03-01")),
        Expense::new(900, ExpenseCategory::Other("Gym".into()), parse_date("2024-03-02")),
    ];

    let mut out = Vec::new();
    let count = Exporter::new(&[], &expenses).export_expenses_csv(&mut out)?;

    assert_eq!(count, 2);
    let csv = String::from_utf8(out)?;
    assert_eq!(csv.lines().next(), Some("id,date,category,amount"));
    assert!(csv.contains(",2024-03-02T00:00:00+00:00,Gym,9.00"));

    Ok(())
}
