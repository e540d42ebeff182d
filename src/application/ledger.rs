use chrono::{DateTime, Utc};

use crate::domain::{Cents, Loan, LoanId, MAX_CENTS, Repayment, format_cents, sum_cents};
use crate::storage::{ByteStore, Repository};

use super::AppError;

/// The loan ledger: the in-memory list of outstanding loans plus the store it
/// is mirrored to. Loans are kept in insertion order.
///
/// Every successful mutation is followed by a full save. A failed save is
/// logged and leaves the in-memory change in place; [`LoanLedger::is_synced`]
/// reports whether the store currently matches memory.
pub struct LoanLedger<S> {
    repo: Repository<S>,
    loans: Vec<Loan>,
    synced: bool,
}

/// Result of applying a repayment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepaymentOutcome {
    /// The loan still has a positive balance
    Outstanding(Loan),
    /// The repayment brought the balance to zero or below and the loan was
    /// removed. Holds its final state, including the settling repayment.
    Settled(Loan),
}

impl RepaymentOutcome {
    pub fn loan(&self) -> &Loan {
        match self {
            RepaymentOutcome::Outstanding(loan) | RepaymentOutcome::Settled(loan) => loan,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, RepaymentOutcome::Settled(_))
    }

    /// The repayment that produced this outcome.
    pub fn repayment(&self) -> Option<&Repayment> {
        self.loan().last_repayment()
    }
}

impl<S: ByteStore> LoanLedger<S> {
    /// Create an empty ledger over `store` without reading it.
    pub fn new(store: S) -> Self {
        Self {
            repo: Repository::new(store),
            loans: Vec::new(),
            synced: true,
        }
    }

    /// Create a ledger and load whatever the store holds.
    pub fn open(store: S) -> Self {
        let mut ledger = Self::new(store);
        ledger.load();
        ledger
    }

    /// Replace the in-memory loans with the stored ones. A missing, unreadable
    /// or undecodable store yields an empty ledger rather than an error.
    pub fn load(&mut self) -> &[Loan] {
        self.loans = match self.repo.load_loans() {
            Ok(Some(loans)) => {
                tracing::debug!(count = loans.len(), "loaded loans");
                loans
            }
            Ok(None) => {
                tracing::debug!("no saved loans, starting empty");
                Vec::new()
            }
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(error = %error, "could not load loans, starting empty");
                Vec::new()
            }
        };
        self.synced = true;
        &self.loans
    }

    /// Write the full ledger to the store, replacing what was there.
    pub fn persist(&mut self) -> Result<(), AppError> {
        let result = self.repo.save_loans(&self.loans);
        self.synced = result.is_ok();
        Ok(result?)
    }

    // ========================
    // Mutations
    // ========================

    /// Lend `amount` to `recipient`. The new loan goes to the end of the ledger.
    pub fn add_loan(
        &mut self,
        amount: Cents,
        recipient: &str,
        reason: &str,
    ) -> Result<Loan, AppError> {
        if amount < 0 {
            return Err(AppError::InvalidAmount(
                "Loan amount cannot be negative".to_string(),
            ));
        }
        if amount > MAX_CENTS {
            return Err(AppError::amount_too_large(amount));
        }
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(AppError::EmptyField("recipient"));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::EmptyField("reason"));
        }

        let loan = Loan::new(amount, recipient, reason);
        tracing::info!(loan_id = %loan.id, amount, recipient, "loan added");
        self.loans.push(loan.clone());
        self.persist_logged();
        Ok(loan)
    }

    /// Apply a repayment dated now. See [`LoanLedger::apply_repayment_at`].
    pub fn apply_repayment(
        &mut self,
        id: LoanId,
        amount: Cents,
    ) -> Result<RepaymentOutcome, AppError> {
        self.apply_repayment_at(id, amount, Utc::now())
    }

    /// Subtract `amount` from the loan's balance and record the repayment.
    /// Once the balance reaches zero or below the loan leaves the ledger,
    /// history included. Overpaying is allowed and simply settles the loan.
    pub fn apply_repayment_at(
        &mut self,
        id: LoanId,
        amount: Cents,
        date: DateTime<Utc>,
    ) -> Result<RepaymentOutcome, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Repayment amount must be positive".to_string(),
            ));
        }
        if amount > MAX_CENTS {
            return Err(AppError::amount_too_large(amount));
        }
        let index = self
            .position(id)
            .ok_or(AppError::LoanNotFound(id))?;

        let loan = &mut self.loans[index];
        if loan.apply_repayment(amount, date).is_none() {
            return Err(AppError::InvalidAmount(format!(
                "Repayment of {} overflows the loan balance",
                format_cents(amount)
            )));
        }
        tracing::info!(loan_id = %id, amount, balance = loan.amount, "repayment applied");

        let outcome = if loan.is_settled() {
            let loan = self.loans.remove(index);
            tracing::info!(loan_id = %id, "loan settled");
            RepaymentOutcome::Settled(loan)
        } else {
            RepaymentOutcome::Outstanding(loan.clone())
        };

        self.persist_logged();
        Ok(outcome)
    }

    /// Remove a loan regardless of its balance. Absent ids are a no-op and do
    /// not touch the store.
    pub fn delete_loan(&mut self, id: LoanId) -> Option<Loan> {
        let index = self.position(id)?;
        let loan = self.loans.remove(index);
        tracing::info!(loan_id = %id, "loan deleted");
        self.persist_logged();
        Some(loan)
    }

    // ========================
    // Queries
    // ========================

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn get(&self, id: LoanId) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.id == id)
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Sum of the balances still owed. Saturates at the `Cents` limits.
    pub fn total_outstanding(&self) -> Cents {
        sum_cents(self.loans.iter().map(|loan| loan.amount))
    }

    /// False when the last save failed and memory holds unsaved changes.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    fn position(&self, id: LoanId) -> Option<usize> {
        self.loans.iter().position(|loan| loan.id == id)
    }

    fn persist_logged(&mut self) {
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "failed to save loans, keeping changes in memory");
        }
    }
}
