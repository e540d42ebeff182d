use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{AppError, ExpenseLog, LoanLedger, RepaymentOutcome};
use crate::config::Config;
use crate::domain::{ExpenseCategory, Loan, LoanId, format_cents, parse_cents};
use crate::storage::{ByteStore, FileStore};

/// MoneyMate - track expenses and money lent to friends
#[derive(Parser)]
#[command(name = "moneymate")]
#[command(about = "A local-first tracker for expenses and loans given to friends")]
#[command(version)]
pub struct Cli {
    /// Directory holding the data files (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Loans given to friends
    #[command(subcommand)]
    Loan(LoanCommands),

    /// Expense tracking
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Export data to CSV
    Export {
        /// What to export: loans, repayments, expenses
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum LoanCommands {
    /// Record money lent to someone
    Add {
        /// Amount lent (e.g., "50.00" or "50")
        amount: String,

        /// Friend's name
        #[arg(long)]
        to: String,

        /// Reason for the loan
        #[arg(short, long)]
        reason: String,
    },

    /// Record a repayment against a loan
    Repay {
        /// Loan ID (a unique prefix is enough)
        id: String,

        /// Amount repaid
        amount: String,

        /// Date of the repayment (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a loan and its repayment history
    Delete {
        /// Loan ID (a unique prefix is enough)
        id: String,
    },

    /// List outstanding loans
    List,

    /// Show a loan with its repayment history
    Show {
        /// Loan ID (a unique prefix is enough)
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Log an expense
    Add {
        /// Amount spent
        amount: String,

        /// Food, Transport, Entertainment, Shopping, or any custom name
        #[arg(short, long, default_value = "Food")]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List expenses grouped by day
    List,
}

impl Cli {
    pub fn run(self, config: &Config) -> Result<()> {
        let store = FileStore::new(&config.data_dir);
        tracing::debug!(data_dir = %config.data_dir.display(), "using data directory");

        match self.command {
            Commands::Loan(cmd) => run_loan_command(LoanLedger::open(store), cmd),
            Commands::Expense(cmd) => run_expense_command(ExpenseLog::open(store), cmd),
            Commands::Export {
                export_type,
                output,
            } => run_export_command(&store, &export_type, output),
        }
    }
}

fn run_loan_command<S: ByteStore>(mut ledger: LoanLedger<S>, cmd: LoanCommands) -> Result<()> {
    match cmd {
        LoanCommands::Add { amount, to, reason } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let loan = ledger.add_loan(amount_cents, &to, &reason)?;
            ensure_saved(ledger.is_synced())?;

            println!(
                "Recorded loan: {} to {} for {} ({})",
                format_cents(loan.amount),
                loan.recipient,
                loan.reason,
                short_id(loan.id)
            );
        }

        LoanCommands::Repay { id, amount, date } => {
            let loan_id = resolve_loan_id(ledger.loans(), &id)?;
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let date = match date {
                Some(date_str) => parse_date(&date_str).with_context(|| {
                    format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                })?,
                None => Utc::now(),
            };

            let outcome = ledger.apply_repayment_at(loan_id, amount_cents, date)?;
            ensure_saved(ledger.is_synced())?;

            match &outcome {
                RepaymentOutcome::Outstanding(loan) => println!(
                    "Recorded repayment: {} from {}, {} still owed",
                    format_cents(amount_cents),
                    loan.recipient,
                    format_cents(loan.amount)
                ),
                RepaymentOutcome::Settled(loan) => println!(
                    "Recorded repayment: {} from {}, loan settled and removed",
                    format_cents(amount_cents),
                    loan.recipient
                ),
            }
        }

        LoanCommands::Delete { id } => {
            let loan_id = resolve_loan_id(ledger.loans(), &id)?;
            let loan = ledger
                .delete_loan(loan_id)
                .ok_or(AppError::LoanNotFound(loan_id))?;
            ensure_saved(ledger.is_synced())?;
            println!(
                "Deleted loan: {} to {} ({} repayments discarded)",
                format_cents(loan.amount),
                loan.recipient,
                loan.repayment_history.len()
            );
        }

        LoanCommands::List => {
            if ledger.is_empty() {
                println!("No outstanding loans.");
            } else {
                println!(
                    "{:<10} {:<20} {:>12} REASON",
                    "ID", "RECIPIENT", "OWED"
                );
                println!("{}", "-".repeat(60));
                for loan in ledger.loans() {
                    println!(
                        "{:<10} {:<20} {:>12} {}",
                        short_id(loan.id),
                        truncate(&loan.recipient, 20),
                        format_cents(loan.amount),
                        truncate(&loan.reason, 30)
                    );
                }
                println!("{}", "-".repeat(60));
                println!(
                    "{:<10} {:<20} {:>12}",
                    "",
                    "TOTAL",
                    format_cents(ledger.total_outstanding())
                );
            }
        }

        LoanCommands::Show { id } => {
            let loan_id = resolve_loan_id(ledger.loans(), &id)?;
            let loan = ledger
                .get(loan_id)
                .ok_or(AppError::LoanNotFound(loan_id))?;
            print_loan(loan);
        }
    }
    Ok(())
}

fn print_loan(loan: &Loan) {
    println!("Loan to {}", loan.recipient);
    println!("  ID:        {}", loan.id);
    println!("  Reason:    {}", loan.reason);
    println!("  Lent:      {}", format_cents(loan.principal()));
    println!("  Repaid:    {}", format_cents(loan.total_repaid()));
    println!("  Owed:      {}", format_cents(loan.amount));

    if !loan.repayment_history.is_empty() {
        println!();
        println!("  Repayment history:");
        for repayment in &loan.repayment_history {
            println!(
                "    {}  {:>12}",
                repayment.date.format("%Y-%m-%d"),
                format_cents(repayment.amount)
            );
        }
    }
}

fn run_expense_command<S: ByteStore>(mut log: ExpenseLog<S>, cmd: ExpenseCommands) -> Result<()> {
    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
        } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let category = ExpenseCategory::from_str(&category)
                .ok_or_else(|| anyhow::anyhow!("Category must not be empty"))?;
            let date = match date {
                Some(date_str) => parse_date(&date_str).with_context(|| {
                    format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                })?,
                None => Utc::now(),
            };

            let expense = log.add_expense_at(amount_cents, category, date)?;
            ensure_saved(log.is_synced())?;

            println!(
                "Recorded expense: {} on {} ({})",
                format_cents(expense.amount),
                expense.category,
                expense.date.format("%Y-%m-%d")
            );
        }

        ExpenseCommands::List => {
            let days = log.by_day();
            if days.is_empty() {
                println!("No expenses found.");
            } else {
                for (day, expenses) in days {
                    println!("{}", day.format("%b %-d, %Y"));
                    for expense in expenses {
                        println!(
                            "  {:<20} {:>12}",
                            truncate(expense.category.as_str(), 20),
                            format_cents(expense.amount)
                        );
                    }
                }
                println!();
                println!("Total: {}", format_cents(log.total()));
            }
        }
    }
    Ok(())
}

fn run_export_command<S: ByteStore>(
    store: &S,
    export_type: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(stdout()),
    };

    let ledger = LoanLedger::open(store);
    let log = ExpenseLog::open(store);
    let exporter = Exporter::new(ledger.loans(), log.expenses());

    let count = match export_type {
        "loans" => exporter.export_loans_csv(writer)?,
        "repayments" => exporter.export_repayments_csv(writer)?,
        "expenses" => exporter.export_expenses_csv(writer)?,
        other => bail!(
            "Unknown export type '{}'. Valid types: loans, repayments, expenses",
            other
        ),
    };

    if let Some(path) = output {
        eprintln!("Exported {} {} to {}", count, export_type, path.display());
    }
    Ok(())
}

fn ensure_saved(synced: bool) -> Result<()> {
    if !synced {
        bail!("Changes could not be saved; see the log above for details");
    }
    Ok(())
}

/// Accept a full UUID or an unambiguous prefix of one.
fn resolve_loan_id(loans: &[Loan], input: &str) -> Result<LoanId> {
    let input = input.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&input) {
        return Ok(id);
    }
    if input.is_empty() {
        bail!("Loan ID must not be empty");
    }

    let mut matches = loans
        .iter()
        .filter(|loan| loan.id.to_string().starts_with(&input));
    match (matches.next(), matches.next()) {
        (Some(loan), None) => Ok(loan.id),
        (None, _) => bail!("Loan not found: {}", input),
        (Some(_), Some(_)) => bail!("Loan ID '{}' is ambiguous, use more characters", input),
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    // Parse YYYY-MM-DD format
    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD format")?;

    // Convert to UTC datetime at midnight
    let naive_datetime = naive_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date"))?;

    Ok(DateTime::from_naive_utc_and_offset(naive_datetime, Utc))
}
