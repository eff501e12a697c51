//! Spreadsheet export of saved business cards.

use crate::db::BusinessCardRecord;
use crate::error::CardError;
use rust_xlsxwriter::{Format, Workbook};

pub const SHEET_NAME: &str = "Business Cards";
pub const EXPORT_FILE_NAME: &str = "business_cards.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Excel refuses string cells longer than this many characters.
const MAX_CELL_CHARS: usize = 32_767;

/// Render `records` as a single-sheet workbook with a header row.
pub fn cards_to_xlsx<'a, I>(records: I) -> Result<Vec<u8>, CardError>
where
    I: IntoIterator<Item = &'a BusinessCardRecord>,
{
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, name) in BusinessCardRecord::COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (idx, record) in records.into_iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number(row, 0, record.id as f64)?;
        for (col, value) in record.text_columns().into_iter().enumerate() {
            sheet.write_string(row, col as u16 + 1, fit_cell(value))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Cut `value` to the cell limit on a char boundary.
fn fit_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}
