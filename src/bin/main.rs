// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use chrono::{DateTime, Utc};
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use points_ledger_rs::{
    Grant, Ledger, LedgerError, Operation, PayerId, Points, Spend, UserId,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Points Ledger - Replay grant and spend CSV files
///
/// Reads grants and spends from a CSV file in order and writes the resulting
/// per-payer balances to stdout.
#[derive(Parser, Debug)]
#[command(name = "points-ledger-rs")]
#[command(about = "Replays point grants and spends and reports balances", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: type,user,payer,points,date
    /// Example: cargo run -- operations.csv > balances.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Only report balances for this user
    #[arg(long, value_name = "ID")]
    user: Option<String>,

    /// Log filter directive (e.g. `info`, `points_ledger_rs=debug`)
    #[arg(long, env = "POINTS_LEDGER_LOG", default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            error!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let ledger = match process_operations(BufReader::new(file)) {
        Ok(ledger) => ledger,
        Err(e) => {
            error!("Error processing operations: {}", e);
            process::exit(1);
        }
    };

    let user = match args.user.map(UserId::new).transpose() {
        Ok(user) => user,
        Err(e) => {
            error!("Invalid --user: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_balances(&ledger, user.as_ref(), std::io::stdout()) {
        error!("Error writing output: {}", e);
        process::exit(1);
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Why a CSV row was not applied.
#[derive(Debug, Error)]
enum RowError {
    #[error("unknown record type '{0}'")]
    UnknownType(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Raw CSV record matching the input format.
///
/// Fields: `type, user, payer, points, date`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    op_type: String,
    user: String,
    #[serde(default)]
    payer: Option<String>,
    points: i64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    date: Option<DateTime<Utc>>,
}

impl CsvRecord {
    /// Converts CSV record to an [`Operation`].
    ///
    /// Grants without a date are stamped with the current time.
    fn into_operation(self) -> Result<Operation, RowError> {
        let user = UserId::new(self.user)?;

        match self.op_type.to_lowercase().as_str() {
            "grant" => {
                let payer = PayerId::new(self.payer.unwrap_or_default())?;
                let date = self.date.unwrap_or_else(Utc::now);
                Ok(Grant::new(user, payer, self.points, date).into())
            }
            "spend" => Ok(Spend::from_signed(user, self.points)?.into()),
            _ => Err(RowError::UnknownType(self.op_type)),
        }
    }
}

/// Replays operations from a CSV reader into a fresh ledger.
///
/// Rows are applied strictly in file order, since a negative grant or a spend
/// only sees lots from earlier rows. Malformed rows are logged and skipped.
///
/// # CSV Format
///
/// Expected columns: `type, user, payer, points, date`
/// - `type`: `grant` or `spend`
/// - `user`: User identifier
/// - `payer`: Payer identifier (grants only)
/// - `points`: Signed delta for grants, non-negative amount for spends
/// - `date`: RFC 3339 timestamp (optional)
///
/// # Example
///
/// ```csv
/// type,user,payer,points,date
/// grant,alice,DANNON,1000,2020-11-02T14:00:00Z
/// grant,alice,UNILEVER,200,2020-10-31T11:00:00Z
/// grant,alice,DANNON,-200,2020-10-31T15:00:00Z
/// spend,alice,,500,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn process_operations<R: Read>(reader: R) -> Result<Ledger, csv::Error> {
    let ledger = Ledger::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed row: {}", e);
                continue;
            }
        };

        let operation = match record.into_operation() {
            Ok(operation) => operation,
            Err(e) => {
                warn!("Skipping invalid record: {}", e);
                continue;
            }
        };

        let user = operation.user().clone();
        let is_spend = matches!(operation, Operation::Spend(_));
        let items = ledger.apply(operation);
        if is_spend {
            for item in &items {
                info!(user = %user, payer = %item.payer, points = item.points, date = %item.date, "spent");
            }
            if items.is_empty() {
                debug!(user = %user, "spend found no points");
            }
        }
    }

    Ok(ledger)
}

/// One output row.
#[derive(Debug, Serialize)]
struct BalanceRow<'a> {
    user: &'a str,
    payer: &'a str,
    points: Points,
}

/// Writes per-payer balances to a CSV writer.
///
/// Users are sorted; payers keep first-seen order within each user. When
/// `only` is set, just that user is written.
///
/// # CSV Format
///
/// Columns: `user, payer, points`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_balances<W: Write>(
    ledger: &Ledger,
    only: Option<&UserId>,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    let mut users: Vec<UserId> = match only {
        Some(user) => vec![user.clone()],
        None => ledger.wallets().map(|wallet| wallet.key().clone()).collect(),
    };
    users.sort();

    for user in &users {
        for item in ledger.balance(user) {
            wtr.serialize(BalanceRow {
                user: user.as_str(),
                payer: item.payer.as_str(),
                points: item.points,
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}
