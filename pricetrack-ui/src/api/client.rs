//! HTTP API Client
//!
//! Functions for communicating with the PriceTrack REST API. Every function
//! resolves to `Result<T, String>` where the error is the message to show.

use gloo_net::http::{Request, Response};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// localStorage key holding the session token
pub const TOKEN_KEY: &str = "token";

const API_URL_KEY: &str = "pricetrack_api_url";

/// Fallback when an error body is not JSON
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = storage()
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Session token persisted by a previous login
pub fn load_token() -> Option<String> {
    storage()
        .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
        .filter(|t| !t.trim().is_empty())
}

pub fn save_token(token: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

pub fn clear_token() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

// ============ Response Types ============

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
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

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
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
    pub fn name(&self) -> &str {
        self.product.name.as_deref().unwrap_or("Unnamed product")
    }

    pub fn brand(&self) -> &str {
        self.product.brand.as_deref().unwrap_or("")
    }

    pub fn image(&self) -> Option<&str> {
        self.product.image_urls.first().map(String::as_str)
    }

    pub fn currency(&self) -> &str {
        if self.currency.is_empty() {
            "INR"
        } else {
            &self.currency
        }
    }
}

/// One recorded price
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePoint {
    pub timestamp: String,
    #[serde(deserialize_with = "price")]
    pub price: f64,
}

impl PricePoint {
    /// Day label for chart axes, `None` when the timestamp is unreadable
    pub fn day_label(&self) -> Option<String> {
        parse_timestamp(&self.timestamp).map(|dt| dt.format("%d/%m/%Y").to_string())
    }
}

/// Scrape result returned when a URL is submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapedProduct {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub msg: String,
}

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

/// ISO-8601 with or without an offset; naive values are UTC
pub fn parse_timestamp(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// ============ Error Handling ============

/// Message for a failed response body.
///
/// `detail` (string, or validation list joined with "; ") wins, then
/// `error` / `error.message`. Other JSON falls back to the status line and
/// non-JSON to [`UNKNOWN_ERROR`].
pub fn error_message(status: u16, body: &str) -> String {
    let json: serde_json::Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return UNKNOWN_ERROR.to_string(),
    };

    let detail = match json.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    };

    let error = || match json.get("error") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    };

    detail
        .or_else(error)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

async fn handle<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(response.status(), &body);
        web_sys::console::error_1(
            &format!("{} {} -> {}", response.status(), response.url(), message).into(),
        );
        return Err(message);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

// ============ API Functions ============

/// Exchange credentials for a token (form-encoded, OAuth2 password style)
pub async fn login(email: &str, password: &str) -> Result<Token, String> {
    let body = format!(
        "username={}&password={}",
        urlencoding::encode(email),
        urlencoding::encode(password)
    );

    let response = Request::post(&format!("{}/auth/login", get_api_base()))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}

pub async fn register(email: &str, password: &str) -> Result<User, String> {
    #[derive(serde::Serialize)]
    struct RegisterRequest<'a> {
        email: &'a str,
        password: &'a str,
    }

    let response = Request::post(&format!("{}/auth/register", get_api_base()))
        .json(&RegisterRequest { email, password })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}

/// Resolve the user a token belongs to
pub async fn fetch_me(token: &str) -> Result<User, String> {
    let response = Request::get(&format!("{}/users/me", get_api_base()))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}

pub async fn fetch_products(token: &str) -> Result<Vec<TrackedProduct>, String> {
    let response = Request::get(&format!("{}/track", get_api_base()))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}

/// Submit a product URL for tracking
pub async fn track_product(token: &str, url: &str) -> Result<ScrapedProduct, String> {
    #[derive(serde::Serialize)]
    struct TrackRequest<'a> {
        urls: [&'a str; 1],
    }

    let response = Request::post(&format!("{}/track", get_api_base()))
        .header("Authorization", &bearer(token))
        .json(&TrackRequest { urls: [url] })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}

pub async fn delete_product(token: &str, id: i64) -> Result<Message, String> {
    let response = Request::delete(&format!("{}/track/{}", get_api_base(), id))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}

pub async fn fetch_product(token: &str, id: i64) -> Result<TrackedProduct, String> {
    let response = Request::get(&format!("{}/track/{}", get_api_base(), id))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}

pub async fn fetch_history(token: &str, id: i64) -> Result<Vec<PricePoint>, String> {
    let response = Request::get(&format!("{}/track/{}/history", get_api_base(), id))
        .header("Authorization", &bearer(token))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    handle(response).await
}
