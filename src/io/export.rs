use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{LedgerSummary, Transaction, format_cents};
use crate::storage::LedgerStore;

/// Ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub summary: LedgerSummary,
}

/// Exporter for converting ledger data to various formats.
/// Every export reloads the ledger from the store first.
pub struct Exporter<'a, S: LedgerStore> {
    service: &'a LedgerService<S>,
}

impl<'a, S: LedgerStore> Exporter<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Export transactions to CSV format
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.load().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "amount_cents", "amount", "description"])?;

        for transaction in &transactions {
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.date.to_rfc3339(),
                transaction.amount_cents.to_string(),
                format_cents(transaction.amount_cents),
                transaction.description.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export the ledger and its totals as a JSON snapshot
    pub async fn export_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let transactions = self.service.load().await?;

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            summary: LedgerSummary::from_transactions(&transactions),
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    async fn seeded_service() -> LedgerService<MemoryStore> {
        let service = LedgerService::new(MemoryStore::new());
        service.create("500", "deposit A").await.unwrap();
        service.create("-120.50", "shuttlecocks, feather").await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_export_transactions_csv() {
        let service = seeded_service().await;
        let mut buffer = Vec::new();

        let count = Exporter::new(&service)
            .export_transactions_csv(&mut buffer)
            .await
            .unwrap();

        assert_eq!(count, 2);
        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,amount_cents,amount,description")
        );
        assert!(output.contains(",50000,500.00,deposit A"));
        assert!(output.contains(",-12050,-120.50,\"shuttlecocks, feather\""));
    }

    #[tokio::test]
    async fn test_export_json_snapshot() {
        let service = seeded_service().await;
        let mut buffer = Vec::new();

        let snapshot = Exporter::new(&service)
            .export_json(&mut buffer)
            .await
            .unwrap();

        assert_eq!(snapshot.transactions.len(), 2);
        assert_eq!(snapshot.summary.balance, 37950);

        let parsed: LedgerSnapshot = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.summary, snapshot.summary);
        assert_eq!(parsed.transactions, snapshot.transactions);
    }
}
