use igfc_core::{CollectedProfile, RECORD_FIELDS};

use crate::cells::cells;
use crate::error::ExportError;

/// CSV with a header row in export column order. Missing optional values
/// are empty cells; quoting follows RFC 4180.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] or [`ExportError::Io`] if writing fails.
pub fn render_csv(records: &[CollectedProfile]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(RECORD_FIELDS)?;
    for record in records {
        writer.write_record(cells(record).iter().map(|(_, cell)| cell.to_text()))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_records;

    #[test]
    fn reparses_to_the_same_values() {
        let records = sample_records();
        let bytes = render_csv(&records).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, RECORD_FIELDS);

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);

        let nike = &rows[0];
        assert_eq!(&nike[0], "nike");
        assert_eq!(&nike[2], "306000000");
        assert_eq!(&nike[4], "Just do it, \"always\"");
        assert_eq!(&nike[7], "2.1");
        assert_eq!(&nike[8], "true");
        assert_eq!(&nike[10], "2026-10-19T08:30:00Z");
        assert_eq!(&nike[11], "live");

        let cafe = &rows[1];
        assert_eq!(&cafe[1], "Café <Zoé> & Co");
        assert_eq!(&cafe[4], "line one\nline two");
        assert_eq!(&cafe[7], "");
        assert_eq!(&cafe[8], "false");
        assert_eq!(&cafe[9], "");
        assert_eq!(&cafe[11], "mock");
    }

    #[test]
    fn empty_input_is_header_only() {
        let text = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, format!("{}\n", RECORD_FIELDS.join(",")));
    }
}
