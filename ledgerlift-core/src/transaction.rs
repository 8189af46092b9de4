//! Transaction record types shared by every stage of the pipeline

use serde::{Deserialize, Deserializer, Serialize};

/// Direction of money movement. The sign of a transaction lives here, never in `amount`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Credit / deposit: increases the balance
    #[serde(rename = "INFLOW")]
    Inflow,
    /// Debit / withdrawal: decreases the balance
    #[serde(rename = "OUTFLOW")]
    Outflow,
}

impl TransactionType {
    /// +1.0 for inflows, -1.0 for outflows
    pub fn sign(&self) -> f64 {
        match self {
            TransactionType::Inflow => 1.0,
            TransactionType::Outflow => -1.0,
        }
    }
}

/// A single statement row as produced by the extraction model.
///
/// Field-level oddities (missing or null date, empty description, no category)
/// are tolerated and flow through the pipeline untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Canonical `YYYY-MM-DD`; compared as a string
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Unsigned magnitude
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    /// Create a new uncategorized transaction
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        kind: TransactionType,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            kind,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_inflow(&self) -> bool {
        self.kind == TransactionType::Inflow
    }

    /// Signed value: `+amount` for inflows, `-amount` for outflows
    pub fn flow(&self) -> f64 {
        self.kind.sign() * self.amount
    }

    /// Category label for display; storage keeps `None`
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }
}

/// Models emit `null` for fields they could not read
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Output of one extraction call, one per source document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawExtractionResult {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

/// Final partitioned, sorted ledger pair
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub transactions: Vec<Transaction>,
    pub excluded_transactions: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

impl ExtractionResult {
    /// Number of rows across both ledgers
    pub fn total_count(&self) -> usize {
        self.transactions.len() + self.excluded_transactions.len()
    }
}
