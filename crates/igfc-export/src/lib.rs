//! Export writers for collected profile records.
//!
//! Each format has a pure `render_*` function returning bytes; the
//! [`Exporter`] and the `write_*` helpers add file-system placement on top.

mod cells;
pub mod delimited;
pub mod error;
pub mod excel;
pub mod html;
pub mod json;
pub mod xml;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use igfc_core::CollectedProfile;

pub use delimited::render_csv;
pub use error::ExportError;
pub use excel::render_excel;
pub use html::render_html;
pub use json::render_json;
pub use xml::render_xml;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Csv,
    Excel,
    Xml,
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Json,
        OutputFormat::Csv,
        OutputFormat::Excel,
        OutputFormat::Xml,
        OutputFormat::Html,
    ];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Excel => "xlsx",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
        }
    }

    /// Renders `records` in this format.
    ///
    /// `generated_at` only affects HTML, which prints it in the page header.
    ///
    /// # Errors
    ///
    /// Propagates the underlying renderer's [`ExportError`].
    pub fn render(
        self,
        records: &[CollectedProfile],
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, ExportError> {
        match self {
            OutputFormat::Json => render_json(records),
            OutputFormat::Csv => render_csv(records),
            OutputFormat::Excel => render_excel(records),
            OutputFormat::Xml => render_xml(records),
            OutputFormat::Html => Ok(render_html(records, generated_at)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Excel => "excel",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "excel" | "xlsx" => Ok(OutputFormat::Excel),
            "xml" => Ok(OutputFormat::Xml),
            "html" => Ok(OutputFormat::Html),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Writes timestamped export files into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    pub output_dir: PathBuf,
    pub base_filename: String,
}

impl Exporter {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, base_filename: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_filename: base_filename.into(),
        }
    }

    /// Writes `records` as `{base}_{YYYYmmddTHHMMSSZ}.{ext}` and returns the
    /// path written.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if rendering fails or the directory or file
    /// cannot be written.
    pub fn export(
        &self,
        records: &[CollectedProfile],
        format: OutputFormat,
    ) -> Result<PathBuf, ExportError> {
        self.export_at(records, format, Utc::now())
    }

    /// Like [`Exporter::export`] with an explicit timestamp for the file name
    /// and HTML header.
    ///
    /// # Errors
    ///
    /// Same as [`Exporter::export`].
    pub fn export_at(
        &self,
        records: &[CollectedProfile],
        format: OutputFormat,
        at: DateTime<Utc>,
    ) -> Result<PathBuf, ExportError> {
        let bytes = format.render(records, at)?;
        let file_name = format!(
            "{}_{}.{}",
            self.base_filename,
            at.format("%Y%m%dT%H%M%SZ"),
            format.extension()
        );
        let path = self.output_dir.join(file_name);
        write_bytes(&path, &bytes)?;
        tracing::info!(
            path = %path.display(),
            format = %format,
            records = records.len(),
            "exported records"
        );
        Ok(path)
    }
}

/// Writes the JSON export to exactly `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the write fails.
pub fn write_json(records: &[CollectedProfile], path: &Path) -> Result<(), ExportError> {
    write_bytes(path, &render_json(records)?)
}

/// Writes the CSV export to exactly `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the write fails.
pub fn write_csv(records: &[CollectedProfile], path: &Path) -> Result<(), ExportError> {
    write_bytes(path, &render_csv(records)?)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let write_err = |source| ExportError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bytes).map_err(write_err)
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::{fixed_time, sample_records};

    #[test]
    fn parses_format_names() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" CSV ".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
        assert_eq!("Excel".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "pdf".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref name) if name == "pdf"));
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn exporter_writes_timestamped_files() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("exports"), "profiles");
        let records = sample_records();

        for format in OutputFormat::ALL {
            let path = exporter.export_at(&records, format, fixed_time()).unwrap();
            let expected = format!("profiles_20261019T083000Z.{}", format.extension());
            assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected);
            assert!(std::fs::metadata(&path).unwrap().len() > 0, "{format}");
        }
    }

    #[test]
    fn write_helpers_create_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("nested/deeper/output.json");
        let csv_path = dir.path().join("nested/output.csv");

        write_json(&sample_records(), &json_path).unwrap();
        write_csv(&sample_records(), &csv_path).unwrap();

        let reloaded: Vec<CollectedProfile> =
            serde_json::from_slice(&std::fs::read(&json_path).unwrap()).unwrap();
        assert_eq!(reloaded, sample_records());
        assert!(std::fs::read_to_string(&csv_path)
            .unwrap()
            .starts_with("username,full_name,"));
    }
}
