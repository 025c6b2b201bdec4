use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use uuid::Uuid;

use crate::application::LedgerService;
use crate::domain::{Cents, Transaction, format_cents};

/// Club Ledger - shared cash book for a club
#[derive(Parser)]
#[command(name = "club-ledger")]
#[command(about = "Track a club's deposits and expenses and its running balance")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "club-ledger.db")]
    pub database: String,

    /// Currency label shown next to amounts
    #[arg(long, default_value = "BDT", global = true)]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a transaction (positive for a deposit, negative for an expense)
    Add {
        /// Amount (e.g., "500", "-120.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Description of the transaction
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Delete a transaction permanently
    Delete {
        /// Transaction ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the transaction history
    List,

    /// Show balance, deposits and expenses
    Summary,

    /// Export transactions to CSV or JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                ref amount,
                ref description,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let transaction = service.create(amount, &description.join(" ")).await?;
                println!(
                    "Recorded {}: {} {} ({})",
                    transaction.kind().as_str(),
                    format_signed(transaction.amount_cents),
                    self.currency,
                    transaction.id
                );
            }

            Commands::Delete { ref id, yes } => {
                let service = LedgerService::connect(&self.database).await?;
                let transaction_id =
                    Uuid::parse_str(id).context("Invalid transaction ID format (expected UUID)")?;
                run_delete_command(&service, transaction_id, yes, &self.currency).await?;
            }

            Commands::List => {
                let service = LedgerService::connect(&self.database).await?;
                run_list_command(&service, &self.currency).await?;
            }

            Commands::Summary => {
                let service = LedgerService::connect(&self.database).await?;
                run_summary_command(&service, &self.currency).await?;
            }

            Commands::Export {
                ref output,
                ref format,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, output.as_deref(), format).await?;
            }
        }

        Ok(())
    }
}

async fn run_delete_command(
    service: &LedgerService,
    id: Uuid,
    yes: bool,
    currency: &str,
) -> Result<()> {
    let transactions = service.load().await?;
    let target = transactions.iter().find(|t| t.id == id);

    if !yes {
        let prompt = match target {
            Some(t) => format!(
                "Delete '{}' ({} {})? This cannot be undone. [y/N] ",
                t.description,
                format_signed(t.amount_cents),
                currency
            ),
            None => format!("Delete transaction {}? This cannot be undone. [y/N] ", id),
        };
        if !confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    service.delete(id).await?;
    match target {
        Some(t) => println!("Deleted transaction: {}", t.description),
        None => println!("Transaction {} was not in the ledger.", id),
    }
    Ok(())
}

async fn run_list_command(service: &LedgerService, currency: &str) -> Result<()> {
    let transactions = service.load().await?;

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<30} {:>14} {:<36}",
        "DATE", "DESCRIPTION", "AMOUNT", "ID"
    );
    println!("{}", "-".repeat(95));
    for t in &transactions {
        println!(
            "{:<12} {:<30} {:>14} {:<36}",
            local_date(t),
            truncate(&t.description, 30),
            format!("{} {}", format_signed(t.amount_cents), currency),
            t.id
        );
    }
    Ok(())
}

async fn run_summary_command(service: &LedgerService, currency: &str) -> Result<()> {
    let overview = service.overview().await?;
    let summary = overview.summary;

    println!("Balance:  {} {}", currency, format_cents(summary.balance));
    println!("Deposits: {} {}", currency, format_cents(summary.total_deposits));
    println!("Expenses: {} {}", currency, format_cents(summary.total_expenses));

    println!();
    println!("DEPOSITS");
    print_partition(&overview.deposits, currency);
    println!(
        "{:>56}",
        format!("Subtotal: {} {}", currency, format_cents(summary.total_deposits))
    );

    println!();
    println!("EXPENSES");
    print_partition(&overview.expenses, currency);
    println!(
        "{:>56}",
        format!("Subtotal: {} {}", currency, format_cents(summary.total_expenses))
    );

    Ok(())
}

fn print_partition(transactions: &[Transaction], currency: &str) {
    if transactions.is_empty() {
        println!("  (none)");
        return;
    }
    for t in transactions {
        println!(
            "  {:<12} {:<26} {:>16}",
            local_date(t),
            truncate(&t.description, 26),
            format!("{} {}", currency, format_cents(t.amount_cents.saturating_abs()))
        );
    }
}

async fn run_export_command(
    service: &LedgerService,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        "csv" => exporter.export_transactions_csv(writer).await?,
        "json" => exporter.export_json(writer).await?.transactions.len(),
        other => anyhow::bail!("Unknown export format '{}'. Valid formats: csv, json", other),
    };

    if output.is_some() {
        eprintln!("Exported {} transactions", count);
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Deposits get an explicit plus sign in the history table.
fn format_signed(cents: Cents) -> String {
    if cents > 0 {
        format!("+{}", format_cents(cents))
    } else {
        format_cents(cents)
    }
}

fn local_date(transaction: &Transaction) -> String {
    transaction
        .date
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
