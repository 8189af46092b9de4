//! Single-sheet workbook writer

use ledgerlift_core::{ExportSheet, SHEET_NAME};
use rust_xlsxwriter::{Format, Formula, Workbook};
use std::path::Path;

use crate::error::Result;

const COL_DATE: u16 = 0;
const COL_DESCRIPTION: u16 = 1;
const COL_CATEGORY: u16 = 2;
const COL_AMOUNT: u16 = 3;
const COL_FLOW: u16 = 4;

pub fn write_xlsx(sheet: &ExportSheet, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, header) in sheet.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (i, row) in sheet.rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, COL_DATE, &row.date)?;
        worksheet.write_string(r, COL_DESCRIPTION, &row.description)?;
        if let Some(category) = &row.category {
            worksheet.write_string(r, COL_CATEGORY, category)?;
        }
        worksheet.write_number(r, COL_AMOUNT, row.amount)?;
        worksheet.write_number(r, COL_FLOW, row.flow)?;
    }

    let total_row = sheet.total_row_index();
    worksheet.write_string_with_format(total_row, COL_DESCRIPTION, sheet.total.label, &bold)?;
    worksheet.write_formula_with_format(
        total_row,
        COL_FLOW,
        Formula::new(&sheet.total.formula).set_result(sheet.total.flow.to_string()),
        &bold,
    )?;

    worksheet.set_column_width(COL_DESCRIPTION, 40)?;
    worksheet.set_column_width(COL_CATEGORY, 18)?;

    workbook.save(path)?;
    Ok(())
}
