//! Classifier/normalizer: split a raw set into included / excluded ledgers and
//! sort each chronologically.

use crate::rules::ExclusionRuleSet;
use crate::time::is_canonical_date;
use crate::transaction::{ExtractionResult, RawExtractionResult, Transaction};

/// Partition by the exclusion rules, then stable-sort both sides by date.
///
/// Never fails: odd dates sort by their literal text, an empty description
/// only matches an empty rule.
pub fn normalize(raw: RawExtractionResult, rules: &ExclusionRuleSet) -> ExtractionResult {
    let RawExtractionResult {
        transactions,
        currency,
        bank_name,
    } = raw;

    for t in transactions.iter().filter(|t| !is_canonical_date(&t.date)) {
        tracing::warn!(
            date = %t.date,
            description = %t.description,
            "non-canonical transaction date; ordering falls back to string comparison"
        );
    }

    let (mut included, mut excluded): (Vec<Transaction>, Vec<Transaction>) = transactions
        .into_iter()
        .partition(|t| !rules.excludes(&t.description));

    sort_by_date(&mut included);
    sort_by_date(&mut excluded);

    tracing::debug!(
        included = included.len(),
        excluded = excluded.len(),
        "normalized transactions"
    );

    ExtractionResult {
        transactions: included,
        excluded_transactions: excluded,
        currency,
        bank_name,
    }
}

/// Ascending by date string. `sort_by` is stable, so same-day rows keep
/// their aggregation order.
pub fn sort_by_date(txns: &mut [Transaction]) {
    txns.sort_by(|a, b| a.date.cmp(&b.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;
    use proptest::prelude::*;

    fn txn(date: &str, desc: &str) -> Transaction {
        Transaction::new(date, desc, 10.0, TransactionType::Outflow)
    }

    fn raw(txns: Vec<Transaction>) -> RawExtractionResult {
        RawExtractionResult {
            transactions: txns,
            currency: Some("USD".into()),
            bank_name: Some("Chase".into()),
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let input = raw(vec![
            Transaction::new("2024-03-05", "BP Fuel Purchase", 40.0, TransactionType::Outflow),
            Transaction::new("2024-03-01", "Payroll Deposit", 2000.0, TransactionType::Inflow),
        ]);
        let rules = ExclusionRuleSet::new(["bp fuel"], Vec::<&str>::new());

        let out = normalize(input, &rules);
        assert_eq!(out.transactions.len(), 1);
        assert_eq!(out.excluded_transactions.len(), 1);
        assert_eq!(out.transactions[0].description, "Payroll Deposit");
        assert_eq!(out.transactions[0].date, "2024-03-01");
        assert_eq!(out.excluded_transactions[0].description, "BP Fuel Purchase");
        assert_eq!(out.currency.as_deref(), Some("USD"));
        assert_eq!(out.bank_name.as_deref(), Some("Chase"));
    }

    #[test]
    fn test_both_rules_match_excluded_once() {
        let rules = ExclusionRuleSet::new(["fuel"], ["bp#"]);
        let out = normalize(raw(vec![txn("2024-01-02", "BP#12 fuel stop")]), &rules);
        assert_eq!(out.excluded_transactions.len(), 1);
        assert!(out.transactions.is_empty());
    }

    #[test]
    fn test_empty_rules_include_everything() {
        let out = normalize(
            raw(vec![txn("2024-01-02", "BP#12"), txn("2024-01-01", "bp fuel")]),
            &ExclusionRuleSet::empty(),
        );
        assert_eq!(out.transactions.len(), 2);
        assert!(out.excluded_transactions.is_empty());
        assert_eq!(out.transactions[0].date, "2024-01-01");
    }

    #[test]
    fn test_same_date_keeps_input_order() {
        let out = normalize(
            raw(vec![
                txn("2024-02-01", "first"),
                txn("2024-01-15", "early"),
                txn("2024-02-01", "second"),
                txn("2024-02-01", "third"),
            ]),
            &ExclusionRuleSet::empty(),
        );
        let descs: Vec<_> = out.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["early", "first", "second", "third"]);
    }

    #[test]
    fn test_malformed_rows_flow_through() {
        let out = normalize(
            raw(vec![txn("2024-01-02", "Coffee"), txn("", ""), txn("March 3", "Cash")]),
            &ExclusionRuleSet::default(),
        );
        assert_eq!(out.transactions.len(), 3);
        // Empty date sorts first by its literal value, text dates after digits
        assert_eq!(out.transactions[0].date, "");
        assert_eq!(out.transactions[2].date, "March 3");
    }

    fn arb_txn() -> impl Strategy<Value = Transaction> {
        (
            prop::sample::select(vec!["2024-01-01", "2024-01-02", "2024-02-10", "2023-12-31"]),
            prop::sample::select(vec![
                "BP#100",
                "Grocery BP#99",
                "bp fuel 12",
                "Payroll",
                "TOTAL WINE",
                "",
                "Coffee",
            ]),
            0u32..10_000,
            any::<bool>(),
        )
            .prop_map(|(date, desc, cents, inflow)| {
                let kind = if inflow {
                    TransactionType::Inflow
                } else {
                    TransactionType::Outflow
                };
                Transaction::new(date, desc, cents as f64 / 100.0, kind)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Every raw row lands in exactly one ledger.
        #[test]
        fn partition_is_total_and_disjoint(txns in prop::collection::vec(arb_txn(), 0..40)) {
            let rules = ExclusionRuleSet::default();
            // Tag each row with its input position so duplicates stay distinguishable.
            let tagged: Vec<Transaction> = txns
                .into_iter()
                .enumerate()
                .map(|(i, t)| t.with_category(i.to_string()))
                .collect();
            let n = tagged.len();

            let out = normalize(raw(tagged), &rules);
            prop_assert_eq!(out.transactions.len() + out.excluded_transactions.len(), n);

            let mut seen: Vec<usize> = out
                .transactions
                .iter()
                .chain(out.excluded_transactions.iter())
                .map(|t| t.category.as_deref().unwrap().parse().unwrap())
                .collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..n).collect::<Vec<_>>());

            for t in &out.excluded_transactions {
                prop_assert!(rules.excludes(&t.description));
            }
            for t in &out.transactions {
                prop_assert!(!rules.excludes(&t.description));
            }
        }

        /// Both ledgers are non-decreasing by date; equal dates keep input order.
        #[test]
        fn ledgers_sorted_and_stable(txns in prop::collection::vec(arb_txn(), 0..40)) {
            let tagged: Vec<Transaction> = txns
                .into_iter()
                .enumerate()
                .map(|(i, t)| t.with_category(i.to_string()))
                .collect();

            let out = normalize(raw(tagged), &ExclusionRuleSet::default());
            for ledger in [&out.transactions, &out.excluded_transactions] {
                for w in ledger.windows(2) {
                    prop_assert!(w[0].date <= w[1].date);
                    if w[0].date == w[1].date {
                        let a: usize = w[0].category.as_deref().unwrap().parse().unwrap();
                        let b: usize = w[1].category.as_deref().unwrap().parse().unwrap();
                        prop_assert!(a < b);
                    }
                }
            }
        }
    }
}
