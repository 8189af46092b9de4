//! CSV writer. Same rows as the workbook; the total row carries the computed
//! net since CSV has no formulas.

use ledgerlift_core::ExportSheet;
use std::path::Path;

use crate::error::Result;

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn write_csv(sheet: &ExportSheet, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(sheet.headers())?;

    for row in &sheet.rows {
        wtr.write_record([
            row.date.as_str(),
            row.description.as_str(),
            row.category.as_deref().unwrap_or(""),
            money(row.amount).as_str(),
            money(row.flow).as_str(),
        ])?;
    }

    wtr.write_record(["", sheet.total.label, "", "", money(sheet.total.flow).as_str()])?;
    wtr.flush()?;
    Ok(())
}
