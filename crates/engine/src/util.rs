//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Parse an optional UUID from storage.
pub(crate) fn parse_optional_uuid(value: Option<&str>, label: &str) -> ResultEngine<Option<Uuid>> {
    value.map(|v| parse_uuid(v, label)).transpose()
}

/// Reject non-positive amounts; the sign of a movement lives in its kind.
pub(crate) fn ensure_positive_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Turns an overflowed balance computation into `InvalidAmount`.
pub(crate) fn balance_in_range(balance_minor: Option<i64>) -> ResultEngine<i64> {
    balance_minor.ok_or_else(|| EngineError::InvalidAmount("balance out of range".to_string()))
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidRequest(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Lower-cases and trims an email; rejects values without a local part and domain.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(EngineError::InvalidRequest(format!(
            "invalid email address: {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn normalize_email_rejects_missing_parts() {
        assert!(normalize_email("alice").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("alice@").is_err());
    }

    #[test]
    fn overflowed_balance_is_invalid_amount() {
        assert_eq!(balance_in_range(Some(70)), Ok(70));
        assert_eq!(
            balance_in_range(i64::MAX.checked_add(1)),
            Err(EngineError::InvalidAmount("balance out of range".to_string()))
        );
    }

    #[test]
    fn positive_amount_is_required() {
        assert!(ensure_positive_amount(1).is_ok());
        assert_eq!(
            ensure_positive_amount(0),
            Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string()
            ))
        );
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" note ")), Some("note".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
