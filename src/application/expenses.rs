use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Cents, Expense, ExpenseCategory, MAX_CENTS, sum_cents};
use crate::storage::{ByteStore, Repository};

use super::AppError;

/// Log of day-to-day expenses, saved after each new entry the same way the
/// loan ledger is.
pub struct ExpenseLog<S> {
    repo: Repository<S>,
    expenses: Vec<Expense>,
    synced: bool,
}

impl<S: ByteStore> ExpenseLog<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: Repository::new(store),
            expenses: Vec::new(),
            synced: true,
        }
    }

    pub fn open(store: S) -> Self {
        let mut log = Self::new(store);
        log.load();
        log
    }

    /// Same tolerance as the loan ledger: load failures leave the log empty.
    pub fn load(&mut self) -> &[Expense] {
        self.expenses = match self.repo.load_expenses() {
            Ok(expenses) => expenses.unwrap_or_default(),
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(error = %error, "could not load expenses, starting empty");
                Vec::new()
            }
        };
        self.synced = true;
        &self.expenses
    }

    pub fn persist(&mut self) -> Result<(), AppError> {
        let result = self.repo.save_expenses(&self.expenses);
        self.synced = result.is_ok();
        Ok(result?)
    }

    pub fn add_expense(
        &mut self,
        amount: Cents,
        category: ExpenseCategory,
    ) -> Result<Expense, AppError> {
        self.add_expense_at(amount, category, Utc::now())
    }

    pub fn add_expense_at(
        &mut self,
        amount: Cents,
        category: ExpenseCategory,
        date: DateTime<Utc>,
    ) -> Result<Expense, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Expense amount must be positive".to_string(),
            ));
        }
        if amount > MAX_CENTS {
            return Err(AppError::amount_too_large(amount));
        }
        if category.as_str().trim().is_empty() {
            return Err(AppError::EmptyField("category"));
        }

        let expense = Expense::new(amount, category, date);
        tracing::info!(expense_id = %expense.id, amount, category = %expense.category, "expense added");
        self.expenses.push(expense.clone());

        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "failed to save expenses, keeping changes in memory");
        }
        Ok(expense)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Expenses grouped by calendar day (UTC), days ascending, entries in
    /// the order they were logged.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Vec<&Expense>> {
        let mut days: BTreeMap<NaiveDate, Vec<&Expense>> = BTreeMap::new();
        for expense in &self.expenses {
            days.entry(expense.date.date_naive())
                .or_default()
                .push(expense);
        }
        days
    }

    /// Saturates at the `Cents` limits.
    pub fn total(&self) -> Cents {
        sum_cents(self.expenses.iter().map(|e| e.amount))
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }
}
