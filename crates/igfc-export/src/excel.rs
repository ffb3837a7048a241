use igfc_core::{CollectedProfile, RECORD_FIELDS};
use rust_xlsxwriter::{Format, Workbook};

use crate::cells::{cells, Cell};
use crate::error::ExportError;

const SHEET_NAME: &str = "profiles";

/// Single-sheet `.xlsx` workbook built in memory. Counts and rates are
/// written as numbers so they sort and sum in a spreadsheet.
///
/// # Errors
///
/// Returns [`ExportError::Excel`] if the workbook cannot be assembled.
#[allow(clippy::cast_precision_loss)]
pub fn render_excel(records: &[CollectedProfile]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in (0u16..).zip(RECORD_FIELDS) {
        sheet.write_string_with_format(0, col, name, &bold)?;
    }

    for (row, record) in (1u32..).zip(records) {
        for (col, (_, cell)) in (0u16..).zip(cells(record)) {
            match cell {
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
                Cell::Int(n) => {
                    sheet.write_number(row, col, n as f64)?;
                }
                Cell::Float(f) => {
                    sheet.write_number(row, col, f)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(row, col, b)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_records;

    #[test]
    fn produces_a_zip_container() {
        let bytes = render_excel(&sample_records()).unwrap();
        // .xlsx is a ZIP archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_input_still_has_header_sheet() {
        let bytes = render_excel(&[]).unwrap();
        assert!(bytes.len() > 100);
    }
}
