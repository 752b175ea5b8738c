//! Decoding and normalization of pinned board selections.

use super::error::GrafanaError;
use super::model::SelectedBoardConfig;

/// Decode a selection request body.
///
/// The body is a JSON array of [`SelectedBoardConfig`]; `null` is accepted
/// and treated as an empty selection.
pub fn decode_selection(body: &[u8]) -> Result<Vec<SelectedBoardConfig>, GrafanaError> {
    let boards: Option<Vec<SelectedBoardConfig>> =
        serde_json::from_slice(body).map_err(|e| GrafanaError::DecodeFailure(e.to_string()))?;
    Ok(boards.unwrap_or_default())
}

/// The single place where an empty selection becomes "absent".
pub fn normalize_selection(boards: Vec<SelectedBoardConfig>) -> Option<Vec<SelectedBoardConfig>> {
    if boards.is_empty() {
        None
    } else {
        Some(boards)
    }
}
