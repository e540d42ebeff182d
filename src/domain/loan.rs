use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, as_units, sum_cents};

pub type LoanId = Uuid;
pub type RepaymentId = Uuid;

/// Money lent to someone. `amount` is the outstanding balance: it starts at
/// the lent principal and goes down with every repayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    #[serde(with = "as_units")]
    pub amount: Cents,
    /// Who received the money
    pub recipient: String,
    pub reason: String,
    /// Chronological, append-only
    #[serde(default)]
    pub repayment_history: Vec<Repayment>,
}

/// A single payment received back against a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repayment {
    pub id: RepaymentId,
    #[serde(with = "as_units")]
    pub amount: Cents,
    pub date: DateTime<Utc>,
}

impl Loan {
    /// Create a new loan with an empty repayment history. Input validation is
    /// the ledger's job; this only assigns a fresh id.
    pub fn new(amount: Cents, recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            recipient: recipient.into(),
            reason: reason.into(),
            repayment_history: Vec::new(),
        }
    }

    /// Subtract `amount` from the balance and record it in the history.
    /// The balance may go negative; callers decide what a settled loan means.
    ///
    /// Returns `None` and leaves the loan untouched if the new balance would
    /// not fit in [`Cents`].
    pub fn apply_repayment(&mut self, amount: Cents, date: DateTime<Utc>) -> Option<Repayment> {
        let balance = self.amount.checked_sub(amount)?;
        let repayment = Repayment {
            id: Uuid::new_v4(),
            amount,
            date,
        };
        self.amount = balance;
        self.repayment_history.push(repayment.clone());
        Some(repayment)
    }

    /// True once the balance has reached zero or below.
    pub fn is_settled(&self) -> bool {
        self.amount <= 0
    }

    pub fn total_repaid(&self) -> Cents {
        sum_cents(self.repayment_history.iter().map(|r| r.amount))
    }

    /// The amount originally lent: current balance plus everything repaid.
    pub fn principal(&self) -> Cents {
        self.amount.saturating_add(self.total_repaid())
    }

    pub fn last_repayment(&self) -> Option<&Repayment> {
        self.repayment_history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_loan_has_empty_history() {
        let loan = Loan::new(10000, "Sam", "lunch");

        assert_eq!(loan.amount, 10000);
        assert_eq!(loan.recipient, "Sam");
        assert_eq!(loan.reason, "lunch");
        assert!(loan.repayment_history.is_empty());
        assert!(!loan.is_settled());
    }

    #[test]
    fn test_loans_get_distinct_ids() {
        let a = Loan::new(100, "A", "x");
        let b = Loan::new(100, "A", "x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_repayment_reduces_balance() {
        let mut loan = Loan::new(10000, "Sam", "lunch");
        let now = Utc::now();

        let repayment = loan.apply_repayment(3000, now).unwrap();

        assert_eq!(loan.amount, 7000);
        assert_eq!(repayment.amount, 3000);
        assert_eq!(repayment.date, now);
        assert_eq!(loan.repayment_history, vec![repayment.clone()]);
        assert_eq!(loan.last_repayment(), Some(&repayment));
    }

    #[test]
    fn test_principal_is_balance_plus_repaid() {
        let mut loan = Loan::new(10000, "Sam", "lunch");
        loan.apply_repayment(2500, Utc::now());
        loan.apply_repayment(1500, Utc::now());

        assert_eq!(loan.total_repaid(), 4000);
        assert_eq!(loan.principal(), 10000);
    }

    #[test]
    fn test_overpayment_settles_with_negative_balance() {
        let mut loan = Loan::new(5000, "Alex", "rent");
        loan.apply_repayment(8000, Utc::now());

        assert_eq!(loan.amount, -3000);
        assert!(loan.is_settled());
    }

    #[test]
    fn test_repayment_that_would_overflow_is_refused() {
        let mut loan = Loan::new(i64::MIN + 10, "Alex", "rent");

        assert_eq!(loan.apply_repayment(100, Utc::now()), None);
        assert_eq!(loan.amount, i64::MIN + 10);
        assert!(loan.repayment_history.is_empty());
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut loan = Loan::new(i64::MAX, "Alex", "rent");
        loan.repayment_history = vec![
            Repayment { id: Uuid::new_v4(), amount: i64::MAX, date: Utc::now() },
            Repayment { id: Uuid::new_v4(), amount: i64::MAX, date: Utc::now() },
        ];

        assert_eq!(loan.total_repaid(), i64::MAX);
        assert_eq!(loan.principal(), i64::MAX);
    }

    #[test]
    fn test_zero_principal_is_already_settled() {
        assert!(Loan::new(0, "Alex", "rent").is_settled());
    }

    #[test]
    fn test_serializes_with_camel_case_history() {
        let mut loan = Loan::new(15000, "Alex", "rent");
        loan.apply_repayment(5000, Utc::now());

        let value = serde_json::to_value(&loan).unwrap();
        assert_eq!(value["amount"], 100.0);
        assert_eq!(value["recipient"], "Alex");
        assert_eq!(value["repaymentHistory"][0]["amount"], 50.0);
        assert!(value.get("repayment_history").is_none());
    }

    #[test]
    fn test_missing_history_decodes_as_empty() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "amount": 20.5,
            "recipient": "Sam",
            "reason": "taxi"
        }"#;

        let loan: Loan = serde_json::from_str(json).unwrap();
        assert_eq!(loan.amount, 2050);
        assert!(loan.repayment_history.is_empty());
    }
}
