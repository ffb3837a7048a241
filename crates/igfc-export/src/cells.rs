//! Flattening of a [`CollectedProfile`] into typed cells in export column
//! order.

use igfc_core::{CollectedProfile, RECORD_FIELDS};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Int(u64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    /// Text form shared by CSV, XML and HTML. `Empty` renders as `""`.
    pub(crate) fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(n) => n.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// `(column, cell)` pairs in [`RECORD_FIELDS`] order.
pub(crate) fn cells(record: &CollectedProfile) -> [(&'static str, Cell); 12] {
    let p = &record.profile;
    let values = [
        Cell::Text(p.username.clone()),
        Cell::Text(p.full_name.clone()),
        Cell::Int(p.followers_count),
        Cell::Int(p.following_count),
        Cell::Text(p.bio.clone()),
        Cell::Text(p.profile_url.clone()),
        Cell::Int(p.posts_count),
        p.engagement_rate.map_or(Cell::Empty, Cell::Float),
        Cell::Bool(p.is_verified),
        p.profile_image.clone().map_or(Cell::Empty, Cell::Text),
        Cell::Text(record.fetched_at_rfc3339()),
        Cell::Text(record.source.to_string()),
    ];
    let mut columns = RECORD_FIELDS.into_iter();
    values.map(|cell| (columns.next().unwrap_or_default(), cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_records;

    #[test]
    fn cells_follow_column_order() {
        let record = &sample_records()[0];
        let names: Vec<_> = cells(record).iter().map(|(name, _)| *name).collect();
        assert_eq!(names, RECORD_FIELDS);
    }

    #[test]
    fn optional_fields_become_empty() {
        let record = &sample_records()[1];
        let cells = cells(record);
        assert_eq!(cells[7].1, Cell::Empty);
        assert_eq!(cells[9].1, Cell::Empty);
        assert_eq!(cells[7].1.to_text(), "");
    }

    #[test]
    fn text_forms() {
        assert_eq!(Cell::Float(2.1).to_text(), "2.1");
        assert_eq!(Cell::Bool(true).to_text(), "true");
        assert_eq!(Cell::Int(12_345).to_text(), "12345");
    }
}
