use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, Decimal128};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::query::Pagination;

/// Product document as stored in the `products` collection.
///
/// Products are written by other systems, so no field is trusted to be
/// present or well-typed: a value of the wrong BSON type reads as the
/// field's empty value instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Hex ObjectId, or the stored `_id` rendered as text when it is not an ObjectId
    #[serde(rename = "_id", default, deserialize_with = "deserialize_id")]
    #[schema(example = "65f1c0ffee0000000000abcd")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub brand_name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub category: String,
    /// Stored as int, long, double or decimal; always rendered as a number
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "deserialize_created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::String(s)) => Some(s),
        _ => None,
    })
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Bson>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(bson_as_f64).unwrap_or(0.0))
}

/// Accepts a BSON datetime or an RFC 3339 string; anything else reads as absent.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Bson>::deserialize(deserializer)?;
    Ok(match value {
        Some(Bson::DateTime(dt)) => DateTime::from_timestamp_millis(dt.timestamp_millis()),
        Some(Bson::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        _ => None,
    })
}

/// Numeric BSON to f64; non-numeric values read as `None`.
pub(crate) fn bson_as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Decimal128(v) => decimal128_as_f64(v),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// IEEE 754-2008 decimal128 (BID encoding) to the nearest f64.
/// Infinities and NaN read as `None`.
fn decimal128_as_f64(value: &Decimal128) -> Option<f64> {
    const EXPONENT_BIAS: i32 = 6176;
    const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;

    let bits = u128::from_le_bytes(value.bytes());
    let negative = bits >> 127 == 1;
    let combination = (bits >> 122) & 0x1f;

    let (exponent, coefficient) = if combination >= 0b11110 {
        return None;
    } else if (bits >> 125) & 0b11 == 0b11 {
        // Coefficient would exceed 34 digits: non-canonical, reads as zero
        (((bits >> 111) & 0x3fff) as i32, 0)
    } else {
        (((bits >> 113) & 0x3fff) as i32, bits & ((1u128 << 113) - 1))
    };

    let coefficient = if coefficient > MAX_COEFFICIENT { 0 } else { coefficient };
    let exponent = exponent - EXPONENT_BIAS;
    let magnitude = if exponent < 0 {
        coefficient as f64 / 10f64.powi(-exponent)
    } else {
        coefficient as f64 * 10f64.powi(exponent)
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// One page of the catalog plus the facets used to build filter controls.
///
/// `brands`, `categories` and `max_price` describe the whole collection,
/// not just the documents matching the current filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogPage {
    /// Documents matching the filter, ignoring pagination
    pub total: u64,
    /// `ceil(total / limit)`
    pub pages: u64,
    pub products: Vec<Product>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    /// Highest price in the collection, 0 when it is empty
    #[serde(rename = "maxPrice")]
    pub max_price: f64,
}

impl CatalogPage {
    pub fn new(
        total: u64,
        pagination: Pagination,
        products: Vec<Product>,
        brands: Vec<String>,
        categories: Vec<String>,
        max_price: f64,
    ) -> Self {
        Self {
            total,
            pages: pagination.page_count(total),
            products,
            brands,
            categories,
            max_price,
        }
    }
}
