//! Export row projection: the included ledger as spreadsheet rows plus a
//! computed `TOTAL NET` row. Writers live in `ledgerlift-export`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::time::display_date;
use crate::transaction::Transaction;

pub const HEADERS: [&str; 5] = ["Date", "Description", "Category", "Amount", "Flow"];
pub const TOTAL_LABEL: &str = "TOTAL NET";
pub const SHEET_NAME: &str = "Transactions";

/// Zero-based column of the Flow cells
pub const FLOW_COLUMN: u16 = 4;
const FLOW_COLUMN_LETTER: char = 'E';

/// One data row of the export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// `MM/DD` display form
    pub date: String,
    pub description: String,
    /// Raw category; no "Uncategorized" substitution here
    pub category: Option<String>,
    pub amount: f64,
    /// `+amount` for inflows, `-amount` for outflows
    pub flow: f64,
}

impl From<&Transaction> for ExportRow {
    fn from(t: &Transaction) -> Self {
        Self {
            date: display_date(&t.date),
            description: t.description.clone(),
            category: t.category.clone(),
            amount: t.amount,
            flow: t.flow(),
        }
    }
}

/// Synthetic terminal row; never stored as a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalRow {
    pub label: &'static str,
    /// Sum of the Flow column, used as the formula's cached value
    pub flow: f64,
    /// e.g. `SUM(E2:E11)` for ten data rows under the header
    pub formula: String,
}

/// Header + data rows + total row, ready for a writer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSheet {
    pub rows: Vec<ExportRow>,
    pub total: TotalRow,
}

impl ExportSheet {
    /// Project the included ledger. Excluded transactions are never exported.
    pub fn from_ledger(ledger: &[Transaction]) -> Self {
        let rows: Vec<ExportRow> = ledger.iter().map(ExportRow::from).collect();
        let flow = rows.iter().map(|r| r.flow).sum();
        // Data starts on spreadsheet row 2 (row 1 is the header)
        let last_data_row = rows.len() + 1;
        let formula = format!("SUM({c}2:{c}{last_data_row})", c = FLOW_COLUMN_LETTER);

        Self {
            rows,
            total: TotalRow {
                label: TOTAL_LABEL,
                flow,
                formula,
            },
        }
    }

    pub fn headers(&self) -> &'static [&'static str; 5] {
        &HEADERS
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Zero-based sheet row index of the total row
    pub fn total_row_index(&self) -> u32 {
        self.rows.len() as u32 + 1
    }
}

/// `Bank_Statement_<YYYY-MM-DD>.<ext>`
pub fn export_filename(today: NaiveDate, extension: &str) -> String {
    format!("Bank_Statement_{}.{}", today.format("%Y-%m-%d"), extension)
}
