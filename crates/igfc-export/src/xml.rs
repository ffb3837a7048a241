use igfc_core::CollectedProfile;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::cells::cells;
use crate::error::ExportError;

const ROOT: &str = "profiles";
const ITEM: &str = "profile";

/// `<profiles><profile><field>value</field>...</profile>...</profiles>`
/// with an XML declaration and two-space indentation. Missing optional
/// values become empty elements.
///
/// # Errors
///
/// Returns [`ExportError::Xml`] or [`ExportError::Io`] if writing fails.
pub fn render_xml(records: &[CollectedProfile]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT)))?;

    for record in records {
        writer.write_event(Event::Start(BytesStart::new(ITEM)))?;
        for (name, cell) in cells(record) {
            let text = cell.to_text();
            if text.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(name)))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(ITEM)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_records;
    use quick_xml::Reader;

    fn render_text() -> String {
        String::from_utf8(render_xml(&sample_records()).unwrap()).unwrap()
    }

    #[test]
    fn starts_with_declaration_and_root() {
        let text = render_text();
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(text.contains("<profiles>"));
        assert!(text.trim_end().ends_with("</profiles>"));
        assert_eq!(text.matches("<profile>").count(), 2);
    }

    #[test]
    fn escapes_text_and_empties_missing_values() {
        let text = render_text();
        assert!(text.contains("<full_name>Café &lt;Zoé&gt; &amp; Co</full_name>"));
        assert!(text.contains("<engagement_rate>2.1</engagement_rate>"));
        assert!(text.contains("<engagement_rate/>"));
        assert!(text.contains("<profile_image/>"));
        assert!(text.contains("<source>mock</source>"));
    }

    #[test]
    fn output_is_well_formed() {
        let text = render_text();
        let mut reader = Reader::from_str(&text);
        let mut usernames = Vec::new();
        let mut in_username = false;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => in_username = e.name().as_ref() == b"username",
                Event::Text(e) if in_username => {
                    usernames.push(e.unescape().unwrap().into_owned());
                }
                Event::End(_) => in_username = false,
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(usernames, ["nike", "cafe_zoé"]);
    }
}
