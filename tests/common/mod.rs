// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use moneymate::{ExpenseLog, FileStore, LoanLedger};
use tempfile::TempDir;

/// Helper to create a loan ledger backed by a temporary directory
pub fn test_ledger() -> Result<(LoanLedger<FileStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let ledger = LoanLedger::open(FileStore::new(temp_dir.path()));
    Ok((ledger, temp_dir))
}

/// Helper to create an expense log backed by a temporary directory
pub fn test_expense_log() -> Result<(ExpenseLog<FileStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let log = ExpenseLog::open(FileStore::new(temp_dir.path()));
    Ok((log, temp_dir))
}

/// Open a fresh ledger over the same directory, as a new app launch would
pub fn reopen(temp_dir: &TempDir) -> LoanLedger<FileStore> {
    LoanLedger::open(FileStore::new(temp_dir.path()))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}
