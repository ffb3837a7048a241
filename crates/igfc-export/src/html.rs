use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use igfc_core::{CollectedProfile, RECORD_FIELDS};

use crate::cells::cells;

const STYLE: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.4rem; }
p.meta { color: #666; font-size: 0.9rem; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }
th { background: #f4f4f4; }
tr:nth-child(even) td { background: #fafafa; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }";

const NUMERIC: [&str; 4] = [
    "followers_count",
    "following_count",
    "posts_count",
    "engagement_rate",
];

/// Standalone HTML document with one table row per record.
///
/// Output depends only on its inputs, so a fixed `generated_at` gives
/// byte-identical pages.
#[must_use]
pub fn render_html(records: &[CollectedProfile], generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut out = String::with_capacity(4096 + records.len() * 512);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Profile Metrics Export</title>\n<style>\n");
    out.push_str(STYLE);
    out.push_str("\n</style>\n</head>\n<body>\n<h1>Profile Metrics Export</h1>\n");
    let _ = writeln!(
        out,
        "<p class=\"meta\">Generated at {} &middot; {} profile(s)</p>",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        records.len()
    );

    out.push_str("<table>\n<thead>\n<tr>");
    for name in RECORD_FIELDS {
        let _ = write!(out, "<th>{name}</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in records {
        out.push_str("<tr>");
        for (name, cell) in cells(record) {
            let text = escape(&cell.to_text());
            if name == "profile_url" && !text.is_empty() {
                let _ = write!(
                    out,
                    "<td><a href=\"{text}\" target=\"_blank\" rel=\"noreferrer\">{text}</a></td>"
                );
            } else if NUMERIC.contains(&name) {
                let _ = write!(out, "<td class=\"num\">{text}</td>");
            } else {
                let _ = write!(out, "<td>{text}</td>");
            }
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out.into_bytes()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
