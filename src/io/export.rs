use anyhow::Result;
use std::io::Write;

use crate::domain::{Expense, Loan, format_cents};

/// Exporter for writing loans and expenses out as CSV
pub struct Exporter<'a> {
    loans: &'a [Loan],
    expenses: &'a [Expense],
}

impl<'a> Exporter<'a> {
    pub fn new(loans: &'a [Loan], expenses: &'a [Expense]) -> Self {
        Self { loans, expenses }
    }

    /// One row per outstanding loan
    pub fn export_loans_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "recipient",
            "reason",
            "amount",
            "principal",
            "repayments",
        ])?;

        for loan in self.loans {
            csv_writer.write_record([
                loan.id.to_string(),
                loan.recipient.clone(),
                loan.reason.clone(),
                format_cents(loan.amount),
                format_cents(loan.principal()),
                loan.repayment_history.len().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.loans.len())
    }

    /// One row per repayment, across all outstanding loans
    pub fn export_repayments_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["loan_id", "repayment_id", "date", "amount"])?;

        let mut count = 0;
        for loan in self.loans {
            for repayment in &loan.repayment_history {
                csv_writer.write_record([
                    loan.id.to_string(),
                    repayment.id.to_string(),
                    repayment.date.to_rfc3339(),
                    format_cents(repayment.amount),
                ])?;
                count += 1;
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }

    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "category", "amount"])?;

        for expense in self.expenses {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.date.to_rfc3339(),
                expense.category.to_string(),
                format_cents(expense.amount),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.expenses.len())
    }
}
