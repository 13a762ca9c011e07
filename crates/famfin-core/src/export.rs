//! CSV export and restore
//!
//! Exports are UTF-8 with a byte-order mark so spreadsheet programs pick the
//! right encoding, header first, newest transaction first. Header labels and
//! kind labels follow the chosen locale; reading accepts either locale.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{parse_timestamp, Database};
use crate::error::{Error, Result};
use crate::models::{Kind, Transaction, TransactionInput};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Language of header and kind labels in an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportLocale {
    #[default]
    Zh,
    En,
}

impl ExportLocale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    pub fn header(&self) -> [&'static str; 5] {
        match self {
            Self::Zh => ["日期", "类型", "类别", "金额", "描述"],
            Self::En => ["date", "type", "category", "amount", "description"],
        }
    }

    pub fn kind_label(&self, kind: Kind) -> &'static str {
        match self {
            Self::Zh => kind.storage_tag(),
            Self::En => kind.as_str(),
        }
    }
}

impl std::str::FromStr for ExportLocale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Ok(Self::Zh),
            "en" | "en-us" => Ok(Self::En),
            _ => Err(format!("Unknown export locale: {} (use zh or en)", s)),
        }
    }
}

impl std::fmt::Display for ExportLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One data row of an export file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    pub date: NaiveDateTime,
    pub kind: Kind,
    pub category: String,
    pub amount: f64,
    pub description: String,
}

impl From<&Transaction> for ExportRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date,
            kind: tx.kind,
            category: tx.category.clone(),
            amount: tx.amount,
            description: tx.description.clone(),
        }
    }
}

/// Writes and restores CSV exports of the whole ledger
pub struct ExportService<'a> {
    db: &'a Database,
}

impl<'a> ExportService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Write every transaction to `path`, returning the number of rows
    ///
    /// The file is created or truncated in place. On failure the file may be
    /// left partially written.
    pub fn export_csv(&self, path: &Path, locale: ExportLocale) -> Result<usize> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        let rows = self.export_csv_to_writer(&mut out, locale)?;
        out.flush()?;

        info!(path = %path.display(), rows, locale = %locale, "Exported transactions");
        Ok(rows)
    }

    /// Write every transaction as CSV to any writer
    pub fn export_csv_to_writer<W: Write>(&self, mut out: W, locale: ExportLocale) -> Result<usize> {
        let transactions = self.db.list_transactions(None)?;

        out.write_all(UTF8_BOM)?;
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(locale.header()).map_err(write_error)?;

        for tx in &transactions {
            writer
                .write_record([
                    tx.date_str().as_str(),
                    locale.kind_label(tx.kind),
                    tx.category.as_str(),
                    tx.amount.to_string().as_str(),
                    tx.description.as_str(),
                ])
                .map_err(write_error)?;
        }
        writer.flush()?;

        Ok(transactions.len())
    }

    /// Restore transactions from an export file, keeping their dates
    ///
    /// Every row is validated first; if any row is invalid nothing is
    /// inserted.
    pub fn import_csv(&self, path: &Path) -> Result<usize> {
        let file = File::open(path)?;
        let records = read_csv(file)?;

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                TransactionInput::new(r.kind, &r.category, r.amount, &r.description)
                    .validated()
                    .map(|input| (r.date, input))
                    .map_err(|e| Error::Validation(format!("row {}: {}", i + 1, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let inserted = self.db.insert_transactions(&rows)?;
        info!(path = %path.display(), inserted, "Imported transactions");
        Ok(inserted)
    }
}

/// A failed export write is an I/O failure whatever layer reported it
fn write_error(e: csv::Error) -> Error {
    match e.into_kind() {
        csv::ErrorKind::Io(err) => Error::Io(err),
        other => Error::Io(io::Error::new(io::ErrorKind::Other, format!("{:?}", other))),
    }
}

/// Parse an export file written in either locale
pub fn read_csv<R: Read>(mut reader: R) -> Result<Vec<ExportRecord>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes.as_slice());

    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(body);

    let headers = rdr.headers()?.clone();
    let known = [ExportLocale::Zh, ExportLocale::En]
        .iter()
        .any(|l| headers.iter().eq(l.header().iter().copied()));
    if !known {
        return Err(Error::Validation(format!(
            "unrecognized export header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let bad = |what: &str, value: &str| {
            Error::Validation(format!("line {}: invalid {} {:?}", line, what, value))
        };

        let date = &record[0];
        let kind = &record[1];
        let amount = &record[3];

        records.push(ExportRecord {
            date: parse_timestamp(date).map_err(|_| bad("date", date))?,
            kind: kind.parse().map_err(|_| bad("type", kind))?,
            category: record[2].to_string(),
            amount: amount.trim().parse().map_err(|_| bad("amount", amount))?,
            description: record[4].to_string(),
        });
    }

    Ok(records)
}
