//! Terminal rendering of the summary cards and both ledgers

use ledgerlift_core::{display_date, ExtractionResult, Summary, Transaction};

const DESCRIPTION_WIDTH: usize = 42;

pub fn print_result(result: &ExtractionResult) {
    let summary = Summary::from_result(result);
    let currency = summary.currency.as_str();

    if let Some(bank) = &result.bank_name {
        println!("{}\n", bank);
    }

    println!("Total inflow:   +{}{:.2}", currency, summary.total_inflow);
    println!("Total outflow:  -{}{:.2}", currency, summary.total_outflow);
    println!("Net flow:        {}", signed_money(currency, summary.net));

    println!("\n## Transactions ({} items)\n", result.transactions.len());
    print_table(&result.transactions, currency);

    if !result.excluded_transactions.is_empty() {
        println!(
            "\n## Excluded ({} items, not exported)\n",
            result.excluded_transactions.len()
        );
        print_table(&result.excluded_transactions, currency);
    }
}

fn print_table(txns: &[Transaction], currency: &str) {
    if txns.is_empty() {
        println!("(none)");
        return;
    }

    println!(
        "{:<6}  {:<width$}  {:<16}  {:>14}",
        "Date",
        "Description",
        "Category",
        "Amount",
        width = DESCRIPTION_WIDTH
    );
    for t in txns {
        println!(
            "{:<6}  {:<width$}  {:<16}  {:>14}",
            display_date(&t.date),
            truncate(&t.description, DESCRIPTION_WIDTH),
            truncate(t.category_label(), 16),
            signed_money(currency, t.flow()),
            width = DESCRIPTION_WIDTH
        );
    }
}

fn signed_money(currency: &str, v: f64) -> String {
    if v < 0.0 {
        format!("-{}{:.2}", currency, v.abs())
    } else {
        format!("+{}{:.2}", currency, v)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
