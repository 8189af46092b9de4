//! Inflow / outflow / net totals over the included ledger

use serde::Serialize;

use crate::aggregate::DEFAULT_CURRENCY;
use crate::transaction::{ExtractionResult, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub currency: String,
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub net: f64,
    pub included_count: usize,
    pub excluded_count: usize,
}

impl Summary {
    pub fn from_result(result: &ExtractionResult) -> Self {
        let (total_inflow, total_outflow) = totals(&result.transactions);
        let currency = result
            .currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_string();

        Self {
            currency,
            total_inflow,
            total_outflow,
            net: total_inflow - total_outflow,
            included_count: result.transactions.len(),
            excluded_count: result.excluded_transactions.len(),
        }
    }
}

/// (sum of inflow amounts, sum of outflow amounts)
pub fn totals(txns: &[Transaction]) -> (f64, f64) {
    txns.iter().fold((0.0, 0.0), |(inflow, outflow), t| {
        if t.is_inflow() {
            (inflow + t.amount, outflow)
        } else {
            (inflow, outflow + t.amount)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;

    #[test]
    fn test_summary_over_included_only() {
        let result = ExtractionResult {
            transactions: vec![
                Transaction::new("2024-03-01", "Payroll", 2000.0, TransactionType::Inflow),
                Transaction::new("2024-03-02", "Rent", 1500.0, TransactionType::Outflow),
                Transaction::new("2024-03-03", "Groceries", 120.5, TransactionType::Outflow),
            ],
            excluded_transactions: vec![Transaction::new(
                "2024-03-05",
                "BP Fuel",
                40.0,
                TransactionType::Outflow,
            )],
            currency: None,
            bank_name: None,
        };

        let s = Summary::from_result(&result);
        assert_eq!(s.total_inflow, 2000.0);
        assert_eq!(s.total_outflow, 1620.5);
        assert_eq!(s.net, 379.5);
        assert_eq!(s.currency, "$");
        assert_eq!(s.included_count, 3);
        assert_eq!(s.excluded_count, 1);
    }
}
