//! Parameter parsing for the area reference endpoints and shop lookups.

use crate::api::ApiError;
use crate::validation::{normalize_code, RawQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddleAreaQuery {
    /// Parent large-area filter. `None` means "nothing selected yet".
    pub large_area_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmallAreaQuery {
    pub middle_area_code: String,
}

/// # Errors
///
/// Returns a `VALIDATION_ERROR` if `largeAreaCode` is present but malformed.
pub fn parse_middle_area_query(raw: &RawQuery) -> Result<MiddleAreaQuery, ApiError> {
    Ok(MiddleAreaQuery {
        large_area_code: normalize_code(raw.get("largeAreaCode"), "largeAreaCode", false)?,
    })
}

/// # Errors
///
/// Returns a `VALIDATION_ERROR` if `middleAreaCode` is missing or malformed.
pub fn parse_small_area_query(raw: &RawQuery) -> Result<SmallAreaQuery, ApiError> {
    let middle_area_code = normalize_code(raw.get("middleAreaCode"), "middleAreaCode", true)?
        .ok_or_else(|| ApiError::invalid_field("middleAreaCode", "middleAreaCode is required"))?;
    Ok(SmallAreaQuery { middle_area_code })
}

/// Trims a shop id taken from the request path.
///
/// # Errors
///
/// Returns a `VALIDATION_ERROR` if the id is blank.
pub fn normalize_shop_id(raw: &str) -> Result<String, ApiError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ApiError::invalid_field("id", "shop id is required"));
    }
    Ok(id.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorCode;
    use serde_json::json;

    fn raw(pairs: &[(&str, serde_json::Value)]) -> RawQuery {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn middle_area_code_is_optional() {
        let query = parse_middle_area_query(&RawQuery::new()).unwrap();
        assert_eq!(query.large_area_code, None);
    }

    #[test]
    fn middle_area_code_is_trimmed() {
        let query = parse_middle_area_query(&raw(&[("largeAreaCode", json!(" Z011 "))])).unwrap();
        assert_eq!(query.large_area_code.as_deref(), Some("Z011"));
    }

    #[test]
    fn middle_area_rejects_multiple_codes() {
        let err = parse_middle_area_query(&raw(&[("largeAreaCode", json!(["Z011", "Z012"]))]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn small_area_requires_middle_code() {
        let err = parse_small_area_query(&RawQuery::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "middleAreaCode is required");
    }

    #[test]
    fn small_area_accepts_code() {
        let query = parse_small_area_query(&raw(&[("middleAreaCode", json!("Y005"))])).unwrap();
        assert_eq!(query.middle_area_code, "Y005");
    }

    #[test]
    fn shop_id_is_trimmed_and_required() {
        assert_eq!(normalize_shop_id(" J001246910 ").unwrap(), "J001246910");
        let err = normalize_shop_id("   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
