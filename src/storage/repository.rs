use std::io;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{Expense, Loan};

use super::ByteStore;

/// Store key holding the loan ledger.
pub const LOANS_KEY: &str = "loans.json";

/// Store key holding the expense log.
pub const EXPENSES_KEY: &str = "expenses.json";

/// Repository for persisting loans and expenses as JSON documents.
/// Every save rewrites the whole collection.
pub struct Repository<S> {
    store: S,
}

impl<S: ByteStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================
    // Loan operations
    // ========================

    /// Load the loan ledger. Returns `Ok(None)` when nothing has been saved yet.
    pub fn load_loans(&self) -> Result<Option<Vec<Loan>>> {
        self.load(LOANS_KEY).context("Failed to load loans")
    }

    pub fn save_loans(&self, loans: &[Loan]) -> Result<()> {
        self.save(LOANS_KEY, loans).context("Failed to save loans")
    }

    // ========================
    // Expense operations
    // ========================

    pub fn load_expenses(&self) -> Result<Option<Vec<Expense>>> {
        self.load(EXPENSES_KEY).context("Failed to load expenses")
    }

    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        self.save(EXPENSES_KEY, expenses)
            .context("Failed to save expenses")
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let bytes = match self.store.read(key) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", key)),
        };

        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to decode {}", key))?;
        Ok(Some(value))
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)
            .with_context(|| format!("Failed to encode {}", key))?;
        self.store
            .write(key, &bytes)
            .with_context(|| format!("Failed to write {}", key))?;
        tracing::debug!(key, bytes = bytes.len(), "saved document");
        Ok(())
    }
}
