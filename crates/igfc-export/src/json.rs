use igfc_core::CollectedProfile;

use crate::error::ExportError;

/// Pretty-printed JSON array (two-space indent, UTF-8, non-ASCII kept).
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn render_json(records: &[CollectedProfile]) -> Result<Vec<u8>, ExportError> {
    let mut bytes = serde_json::to_vec_pretty(records)?;
    bytes.push(b'\n');
    Ok(bytes)
}
