//! Aggregator: merge per-document extraction results into one raw set.

use serde::{Deserialize, Serialize};

use crate::transaction::RawExtractionResult;

pub const DEFAULT_CURRENCY: &str = "$";
pub const DEFAULT_BANK_NAME: &str = "Multiple Statements";

/// Values used when no input document reports a currency / bank name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fallbacks {
    pub currency: String,
    pub bank_name: String,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            bank_name: DEFAULT_BANK_NAME.to_string(),
        }
    }
}

/// Keep `a` if it holds a non-empty value, otherwise take `b`.
fn pick_first(a: Option<String>, b: Option<&String>) -> Option<String> {
    match a {
        Some(v) if !v.is_empty() => Some(v),
        _ => b.filter(|s| !s.is_empty()).cloned(),
    }
}

/// Concatenate transactions in input order (no dedup) and resolve metadata
/// first-non-empty-wins.
///
/// Order-sensitive: pass results in upload order. An empty concatenation is
/// returned as-is; `pipeline::run` is what turns it into an error.
pub fn aggregate(results: &[RawExtractionResult], fallbacks: &Fallbacks) -> RawExtractionResult {
    let total: usize = results.iter().map(|r| r.transactions.len()).sum();

    let (transactions, currency, bank_name) = results.iter().fold(
        (Vec::with_capacity(total), None, None),
        |(mut txns, currency, bank_name), r| {
            txns.extend(r.transactions.iter().cloned());
            (
                txns,
                pick_first(currency, r.currency.as_ref()),
                pick_first(bank_name, r.bank_name.as_ref()),
            )
        },
    );

    tracing::debug!(
        documents = results.len(),
        transactions = total,
        "aggregated extraction results"
    );

    RawExtractionResult {
        transactions,
        currency: Some(currency.unwrap_or_else(|| fallbacks.currency.clone())),
        bank_name: Some(bank_name.unwrap_or_else(|| fallbacks.bank_name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Transaction, TransactionType};

    fn raw(currency: Option<&str>, bank: Option<&str>, descs: &[&str]) -> RawExtractionResult {
        RawExtractionResult {
            transactions: descs
                .iter()
                .map(|d| Transaction::new("2024-01-01", *d, 1.0, TransactionType::Outflow))
                .collect(),
            currency: currency.map(str::to_string),
            bank_name: bank.map(str::to_string),
        }
    }

    #[test]
    fn test_first_non_empty_currency_wins() {
        let results = vec![
            raw(None, None, &["a"]),
            raw(Some("EUR"), None, &["b"]),
            raw(Some("USD"), None, &["c"]),
        ];
        let agg = aggregate(&results, &Fallbacks::default());
        assert_eq!(agg.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_empty_string_does_not_win() {
        let results = vec![
            raw(Some(""), Some(""), &["a"]),
            raw(Some("GBP"), Some("Barclays"), &[]),
        ];
        let agg = aggregate(&results, &Fallbacks::default());
        assert_eq!(agg.currency.as_deref(), Some("GBP"));
        assert_eq!(agg.bank_name.as_deref(), Some("Barclays"));
    }

    #[test]
    fn test_fallbacks_when_nothing_reported() {
        let results = vec![raw(None, None, &["a"]), raw(None, Some(""), &["b"])];
        let agg = aggregate(&results, &Fallbacks::default());
        assert_eq!(agg.currency.as_deref(), Some("$"));
        assert_eq!(agg.bank_name.as_deref(), Some("Multiple Statements"));
    }

    #[test]
    fn test_concatenates_in_order_without_dedup() {
        let results = vec![raw(None, None, &["a", "b"]), raw(None, None, &["b", "c"])];
        let agg = aggregate(&results, &Fallbacks::default());
        let descs: Vec<_> = agg.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["a", "b", "b", "c"]);
    }

    #[test]
    fn test_all_empty_yields_empty_list() {
        let results = vec![raw(Some("USD"), None, &[]), raw(None, None, &[])];
        let agg = aggregate(&results, &Fallbacks::default());
        assert!(agg.transactions.is_empty());
    }
}
