//! Data Transfer Objects
//!
//! Request and response types exchanged with the PriceTrack backend.
//! Decoding is lenient: the backend sends `null` for missing metadata and
//! serializes decimal prices either as numbers or as strings.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ============================================
// AUTH DTOs
// ============================================

/// Form body for `POST /auth/login` (OAuth2 password flow field names)
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// JSON body for `POST /auth/register`
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Access token issued at login
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Authenticated user record
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

// ============================================
// TRACKING DTOs
// ============================================

/// JSON body for `POST /track`
#[derive(Debug, Serialize)]
pub struct TrackRequest {
    pub urls: Vec<String>,
}

/// A product the user is tracking
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TrackedProduct {
    pub id: i64,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "optional_price")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_price")]
    pub initial_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_price")]
    pub mrp: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: ProductInfo,
}

/// Canonical product metadata nested in a tracked product
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ProductInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specifications: HashMap<String, String>,
}

impl TrackedProduct {
    /// Display name, falling back when the scraper found none
    pub fn name(&self) -> &str {
        self.product.name.as_deref().unwrap_or("Unnamed product")
    }

    pub fn brand(&self) -> &str {
        self.product.brand.as_deref().unwrap_or("")
    }

    /// First image, used for cards and the detail header
    pub fn primary_image(&self) -> Option<&str> {
        self.product.image_urls.first().map(String::as_str)
    }

    /// Currency code, `INR` when the backend omits it
    pub fn currency(&self) -> &str {
        if self.currency.is_empty() {
            "INR"
        } else {
            &self.currency
        }
    }
}

/// One recorded price for a tracked product
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PricePoint {
    #[serde(deserialize_with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "price")]
    pub price: f64,
}

/// Scrape result returned by `POST /track`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScrapedProduct {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub listing: Option<Listing>,
}

/// Listing details of a scraped product
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Listing {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "optional_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "optional_price")]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Confirmation body, e.g. from `DELETE /track/{id}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Message {
    #[serde(default)]
    pub msg: String,
}

// ============================================
// Lenient decoding helpers
// ============================================

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn optional_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {:?}", s))),
    }
}

fn price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    optional_price(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing price"))
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", raw)))
}

/// Parse an ISO-8601 timestamp; values without an offset are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_product_full() {
        let json = r#"{
            "id": 7,
            "url": "https://www.amazon.in/dp/B0TEST",
            "currency": "INR",
            "current_price": "1299.00",
            "initial_price": 1499,
            "mrp": 1999.5,
            "product": {
                "name": "Wireless Mouse",
                "brand": "Logi",
                "image_urls": ["https://img.example/1.jpg", "https://img.example/2.jpg"],
                "key_features": ["2.4GHz"],
                "specifications": {"Colour": "Black"}
            }
        }"#;

        let product: TrackedProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.current_price, Some(1299.0));
        assert_eq!(product.initial_price, Some(1499.0));
        assert_eq!(product.mrp, Some(1999.5));
        assert_eq!(product.name(), "Wireless Mouse");
        assert_eq!(product.primary_image(), Some("https://img.example/1.jpg"));
        assert_eq!(product.product.specifications["Colour"], "Black");
    }

    #[test]
    fn test_tracked_product_sparse() {
        let json = r#"{
            "id": 1,
            "url": "https://www.flipkart.com/p/itm1",
            "current_price": null,
            "product": {"name": null, "brand": "Not Found", "image_urls": null}
        }"#;

        let product: TrackedProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.current_price, None);
        assert_eq!(product.mrp, None);
        assert_eq!(product.currency(), "INR");
        assert_eq!(product.name(), "Unnamed product");
        assert!(product.primary_image().is_none());
        assert!(product.product.key_features.is_empty());
    }

    #[test]
    fn test_price_point_naive_timestamp() {
        let json = r#"[
            {"timestamp": "2024-05-01T10:00:00", "price": "999.00"},
            {"timestamp": "2024-05-02T10:00:00.123456", "price": 949},
            {"timestamp": "2024-05-03T10:00:00+05:30", "price": 899.0}
        ]"#;

        let points: Vec<PricePoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert_eq!(points[1].price, 949.0);
        assert_eq!(points[2].timestamp.to_rfc3339(), "2024-05-03T04:30:00+00:00");
    }

    #[test]
    fn test_price_point_rejects_garbage() {
        let json = r#"{"timestamp": "yesterday", "price": 1}"#;
        assert!(serde_json::from_str::<PricePoint>(json).is_err());

        let json = r#"{"timestamp": "2024-05-01T10:00:00", "price": "cheap"}"#;
        assert!(serde_json::from_str::<PricePoint>(json).is_err());
    }

    #[test]
    fn test_user_defaults_active() {
        let user: User = serde_json::from_str(r#"{"id": 3, "email": "a@b.co"}"#).unwrap();
        assert!(user.is_active);
    }
}
