use serde::Deserialize;

use super::ApiError;
use crate::config::CatalogConfig;
use crate::domain::Pagination;

/// `?skip=&limit=` shared by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

pub fn validate_id(kind: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            kind, id
        )));
    }
    Ok(id)
}

pub fn validate_limit(limit: u64, max: u64) -> Result<u64, ApiError> {
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=max).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, max
        )));
    }
    Ok(limit)
}

pub fn validate_pagination(
    skip: Option<u64>,
    limit: Option<u64>,
    catalog: &CatalogConfig,
) -> Result<Pagination, ApiError> {
    let limit = validate_limit(
        limit.unwrap_or(catalog.default_page_size),
        catalog.max_page_size,
    )?;
    Ok(Pagination::new(skip.unwrap_or(0), limit))
}

/// Blank filter values are treated as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("anime", 1).is_ok());
        assert!(validate_id("anime", 12345).is_ok());
        assert!(validate_id("anime", 0).is_err());
        assert!(validate_id("anime", -1).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1, 1000).is_ok());
        assert!(validate_limit(1000, 1000).is_ok());
        assert!(validate_limit(0, 1000).is_err());
        assert!(validate_limit(1001, 1000).is_err());
    }

    #[test]
    fn test_pagination_defaults() {
        let catalog = CatalogConfig::default();
        let page = validate_pagination(None, None, &catalog).unwrap();
        assert_eq!(page, Pagination::new(0, 100));

        let page = validate_pagination(Some(20), Some(5), &catalog).unwrap();
        assert_eq!(page, Pagination::new(20, 5));

        assert!(validate_pagination(None, Some(5000), &catalog).is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Action ".into())), Some("Action".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}
