use thiserror::Error;

/// Errors from decoding a stored service list
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed service list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode a serialized service list.
///
/// Absent, blank, and JSON `null` values decode to an empty list.
pub fn decode_service_list(raw: Option<&str>) -> Result<Vec<String>, DecodeError> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(Vec::new()),
    };

    let services: Option<Vec<String>> = serde_json::from_str(raw)?;
    Ok(services.unwrap_or_default())
}

/// Decode a facility's service list, degrading to an empty list on failure
pub fn services_or_empty(facility_id: i64, raw: Option<&str>) -> Vec<String> {
    decode_service_list(raw).unwrap_or_else(|e| {
        tracing::warn!("Facility {} has an unreadable service list, returning none: {}", facility_id, e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_services() {
        let services = decode_service_list(Some(r#"["Emergency Care", "Surgery"]"#)).unwrap();
        assert_eq!(services, vec!["Emergency Care", "Surgery"]);
    }

    #[test]
    fn test_missing_services_are_empty() {
        assert!(decode_service_list(None).unwrap().is_empty());
        assert!(decode_service_list(Some("")).unwrap().is_empty());
        assert!(decode_service_list(Some("   ")).unwrap().is_empty());
        assert!(decode_service_list(Some("null")).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_services_fail_to_decode() {
        assert!(decode_service_list(Some("[\"Surgery\"")).is_err());
        assert!(decode_service_list(Some("{\"a\": 1}")).is_err());
        assert!(decode_service_list(Some("[1, 2]")).is_err());
    }

    #[test]
    fn test_corrupt_services_fall_back_to_empty() {
        assert!(services_or_empty(7, Some("not json")).is_empty());
        assert_eq!(services_or_empty(7, Some("[\"X-rays\"]")), vec!["X-rays"]);
    }
}
