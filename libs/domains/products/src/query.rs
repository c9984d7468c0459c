//! Typed catalog query built from raw query-string parameters.
//!
//! Every parameter arrives as an optional string. [`CatalogQuery::try_from`]
//! applies defaults and rejects malformed values with
//! [`ProductError::Validation`] instead of guessing.

use serde::Deserialize;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::IntoParams;

use crate::error::ProductError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 9;
pub const MAX_LIMIT: u64 = 100;

/// Raw `GET /products` query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogParams {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size, 1..=100 (default 9)
    pub limit: Option<String>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    /// Exact brand name
    pub brand: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Inclusive price bounds as `min-max`, e.g. `10-50`
    #[serde(rename = "priceRange")]
    pub price_range: Option<String>,
    /// Sort field: `price` or `date` (default `date`)
    #[serde(rename = "type")]
    pub sort_type: Option<String>,
    /// `asc` for price, `newest` for date; anything else reverses (default `newest`)
    pub order: Option<String>,
}

/// Predicates applied to the product collection. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.brand.is_none()
            && self.category.is_none()
            && self.price_range.is_none()
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl FromStr for PriceRange {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ProductError::Validation(format!(
                "priceRange must look like \"min-max\" with 0 <= min <= max, got \"{}\"",
                s
            ))
        };

        let (min, max) = s.split_once('-').ok_or_else(invalid)?;
        let bound = |part: &str| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or_else(invalid)
        };

        let (min, max) = (bound(min)?, bound(max)?);
        if min > max {
            return Err(invalid());
        }

        Ok(Self { min, max })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortField {
    Price,
    #[default]
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// MongoDB sort value: `1` or `-1`.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Single-key sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// `price`: `asc` ascends, anything else descends.
    /// `date`: `newest` descends, anything else ascends.
    pub fn new(field: SortField, order: &str) -> Self {
        let ascending = match field {
            SortField::Price => order == "asc",
            SortField::Date => order != "newest",
        };
        let direction = if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        Self { field, direction }
    }

    /// Document field the sort applies to.
    pub fn key(&self) -> &'static str {
        match self.field {
            SortField::Price => "price",
            SortField::Date => "createdAt",
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortField::Date, "newest")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Documents to skip as the database counts them, `None` past `i64::MAX`.
    pub fn offset(&self) -> Option<i64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .and_then(|skip| i64::try_from(skip).ok())
    }

    pub fn page_count(&self, total: u64) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        total.div_ceil(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Validated catalog request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub filter: ProductFilter,
    pub sort: SortSpec,
    pub pagination: Pagination,
}

impl TryFrom<CatalogParams> for CatalogQuery {
    type Error = ProductError;

    fn try_from(params: CatalogParams) -> Result<Self, Self::Error> {
        let page = parse_positive("page", params.page, DEFAULT_PAGE)?;
        let limit = parse_positive("limit", params.limit, DEFAULT_LIMIT)?;
        if limit > MAX_LIMIT {
            return Err(ProductError::Validation(format!(
                "limit must not exceed {}",
                MAX_LIMIT
            )));
        }
        let pagination = Pagination { page, limit };
        if pagination.offset().is_none() {
            return Err(ProductError::Validation(format!(
                "page {} is out of range for limit {}",
                page, limit
            )));
        }

        let price_range = present(params.price_range)
            .map(|raw| raw.parse::<PriceRange>())
            .transpose()?;

        let field = match present(params.sort_type) {
            Some(raw) => raw.parse::<SortField>().map_err(|_| {
                ProductError::Validation(format!(
                    "type must be \"price\" or \"date\", got \"{}\"",
                    raw
                ))
            })?,
            None => SortField::default(),
        };
        let order = present(params.order).unwrap_or_else(|| "newest".to_string());

        Ok(Self {
            filter: ProductFilter {
                search: present(params.search),
                brand: present(params.brand),
                category: present(params.category),
                price_range,
            },
            sort: SortSpec::new(field, &order),
            pagination,
        })
    }
}

/// Empty strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_positive(name: &str, raw: Option<String>, default: u64) -> Result<u64, ProductError> {
    match present(raw) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| {
                ProductError::Validation(format!(
                    "{} must be a positive integer, got \"{}\"",
                    name, raw
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CatalogParams {
        CatalogParams::default()
    }

    #[test]
    fn test_defaults() {
        let query = CatalogQuery::try_from(params()).unwrap();
        assert_eq!(query.pagination, Pagination { page: 1, limit: 9 });
        assert_eq!(query.sort.field, SortField::Date);
        assert_eq!(query.sort.direction, SortDirection::Descending);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let query = CatalogQuery::try_from(CatalogParams {
            page: Some(String::new()),
            search: Some(String::new()),
            brand: Some(String::new()),
            category: Some(String::new()),
            price_range: Some(String::new()),
            ..params()
        })
        .unwrap();

        assert_eq!(query.pagination.page, 1);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_page_and_limit_must_be_positive_integers() {
        for (page, limit) in [("0", "9"), ("abc", "9"), ("-1", "9"), ("1", "0"), ("1", "2.5")] {
            let result = CatalogQuery::try_from(CatalogParams {
                page: Some(page.to_string()),
                limit: Some(limit.to_string()),
                ..params()
            });
            assert!(
                matches!(result, Err(ProductError::Validation(_))),
                "page={page} limit={limit}"
            );
        }
    }

    #[test]
    fn test_limit_cap() {
        let ok = CatalogQuery::try_from(CatalogParams {
            limit: Some("100".to_string()),
            ..params()
        });
        assert_eq!(ok.unwrap().pagination.limit, 100);

        let too_big = CatalogQuery::try_from(CatalogParams {
            limit: Some("101".to_string()),
            ..params()
        });
        assert!(matches!(too_big, Err(ProductError::Validation(_))));
    }

    #[test]
    fn test_price_range_parsing() {
        assert_eq!(
            "10-50".parse::<PriceRange>().unwrap(),
            PriceRange { min: 10.0, max: 50.0 }
        );
        assert_eq!(
            "0-19.99".parse::<PriceRange>().unwrap(),
            PriceRange { min: 0.0, max: 19.99 }
        );
        assert_eq!(
            "25-25".parse::<PriceRange>().unwrap(),
            PriceRange { min: 25.0, max: 25.0 }
        );
    }

    #[test]
    fn test_malformed_price_ranges_are_rejected() {
        for raw in ["abc", "10", "10-", "-50", "a-b", "50-10", "NaN-5", "1-inf", "10-20-30"] {
            assert!(
                matches!(raw.parse::<PriceRange>(), Err(ProductError::Validation(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_sort_type_is_case_insensitive_and_validated() {
        let query = CatalogQuery::try_from(CatalogParams {
            sort_type: Some("PRICE".to_string()),
            order: Some("asc".to_string()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.sort.key(), "price");
        assert_eq!(query.sort.direction, SortDirection::Ascending);

        let bad = CatalogQuery::try_from(CatalogParams {
            sort_type: Some("rating".to_string()),
            ..params()
        });
        assert!(matches!(bad, Err(ProductError::Validation(_))));
    }

    #[test]
    fn test_sort_direction_rules() {
        let cases = [
            (SortField::Price, "asc", SortDirection::Ascending),
            (SortField::Price, "desc", SortDirection::Descending),
            (SortField::Price, "whatever", SortDirection::Descending),
            (SortField::Date, "newest", SortDirection::Descending),
            (SortField::Date, "oldest", SortDirection::Ascending),
            (SortField::Date, "asc", SortDirection::Ascending),
        ];
        for (field, order, expected) in cases {
            assert_eq!(SortSpec::new(field, order).direction, expected, "{field} {order}");
        }
        assert_eq!(SortSpec::new(SortField::Date, "newest").key(), "createdAt");
    }

    #[test]
    fn test_page_beyond_database_offset_is_rejected() {
        let too_far = CatalogQuery::try_from(CatalogParams {
            page: Some("100000000000000000".to_string()),
            limit: Some("100".to_string()),
            ..params()
        });
        assert!(matches!(too_far, Err(ProductError::Validation(_))));

        let far_but_valid = CatalogQuery::try_from(CatalogParams {
            page: Some("1000000".to_string()),
            limit: Some("100".to_string()),
            ..params()
        })
        .unwrap();
        assert_eq!(far_but_valid.pagination.offset(), Some(99_999_900));
    }

    #[test]
    fn test_pagination_math() {
        let pagination = Pagination { page: 2, limit: 9 };
        assert_eq!(pagination.skip(), 9);
        assert_eq!(pagination.page_count(10), 2);
        assert_eq!(pagination.page_count(9), 1);
        assert_eq!(pagination.page_count(0), 0);
        assert_eq!(Pagination { page: 1, limit: 9 }.skip(), 0);
    }
}
