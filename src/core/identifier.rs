use crate::utils::error::{CaseApiError, Result};
use uuid::Uuid;

/// Parses a case id in its hyphenated textual form.
///
/// Only the 36-character hyphenated form is accepted (either case). Braced,
/// URN and unhyphenated forms are rejected so that every id reaching a store
/// has been through the same gate.
pub fn validate_case_id(raw: &str) -> Result<Uuid> {
    if raw.len() != 36 {
        return Err(CaseApiError::InvalidIdentifier(raw.to_string()));
    }

    Uuid::parse_str(raw).map_err(|_| CaseApiError::InvalidIdentifier(raw.to_string()))
}
