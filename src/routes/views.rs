//! View models
//!
//! What each route shows for a given state: a loader while loading, the
//! error when failed, otherwise the data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::{PricePoint, TrackedProduct};
use crate::state::{AsyncStatus, AuthState, ProductsState};

/// A chart needs at least this many points to draw a line
pub const MIN_CHART_POINTS: usize = 2;

/// Shared loader/error/data switch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Ready(T),
}

/// One product card on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub id: i64,
    pub href: String,
    pub name: String,
    pub brand: String,
    pub image: Option<String>,
    pub price: String,
    pub mrp: Option<String>,
}

impl ProductCard {
    pub fn from_product(product: &TrackedProduct) -> Self {
        Self {
            id: product.id,
            href: format!("/dashboard/{}", product.id),
            name: product.name().to_string(),
            brand: product.brand().to_string(),
            image: product.primary_image().map(str::to_string),
            price: format_price(product.currency(), product.current_price),
            mrp: product.mrp.map(|mrp| format_price(product.currency(), Some(mrp))),
        }
    }
}

/// Dashboard route content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub user_email: Option<String>,
    /// Failure of the last add/delete, shown above the list
    pub notice: Option<String>,
    pub products: ViewState<Vec<ProductCard>>,
}

pub fn dashboard_view(auth: &AuthState, products: &ProductsState) -> DashboardView {
    let cards = match &products.status {
        AsyncStatus::Idle | AsyncStatus::Loading => ViewState::Loading,
        AsyncStatus::Failed(message) => ViewState::Error(message.clone()),
        AsyncStatus::Succeeded => {
            ViewState::Ready(products.items.iter().map(ProductCard::from_product).collect())
        }
    };

    DashboardView {
        user_email: auth.user.as_ref().map(|u| u.email.clone()),
        notice: products.mutation.error().map(str::to_string),
        products: cards,
    }
}

/// One plotted history entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    /// Day label, day-first as on the original product pages
    pub label: String,
    pub price: f64,
}

/// Price history section of the detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum PriceChart {
    /// Not enough history to draw
    Placeholder,
    Series(Vec<ChartPoint>),
}

/// One chart point per history entry, in the order received
pub fn price_chart(history: &[PricePoint]) -> PriceChart {
    if history.len() < MIN_CHART_POINTS {
        return PriceChart::Placeholder;
    }

    PriceChart::Series(
        history
            .iter()
            .map(|point| ChartPoint {
                timestamp: point.timestamp,
                label: point.timestamp.format("%d/%m/%Y").to_string(),
                price: point.price,
            })
            .collect(),
    )
}

/// Detail route content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub card: ProductCard,
    pub store_url: String,
    pub key_features: Vec<String>,
    pub specifications: Vec<(String, String)>,
    pub chart: PriceChart,
    pub history_error: Option<String>,
}

pub fn detail_view(products: &ProductsState) -> ViewState<DetailView> {
    let selected = &products.selected;

    if let Some(message) = selected.status.error() {
        return ViewState::Error(message.to_string());
    }

    let details = match (&selected.status, &selected.details) {
        (AsyncStatus::Loading, _) | (_, None) => return ViewState::Loading,
        (_, Some(details)) => details,
    };

    let mut specifications: Vec<(String, String)> = details
        .product
        .specifications
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    specifications.sort();

    ViewState::Ready(DetailView {
        card: ProductCard::from_product(details),
        store_url: details.url.clone(),
        key_features: details.product.key_features.clone(),
        specifications,
        chart: price_chart(&selected.history),
        history_error: selected.history_status.error().map(str::to_string),
    })
}

/// Price with the currency's symbol, or `-` when unknown
pub fn format_price(currency: &str, amount: Option<f64>) -> String {
    let Some(amount) = amount else {
        return "-".to_string();
    };

    match currency_symbol(currency) {
        Some(symbol) => format!("{}{:.2}", symbol, amount),
        None => format!("{} {:.2}", currency, amount),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "INR" | "₹" => Some("₹"),
        "USD" | "$" => Some("$"),
        "EUR" | "€" => Some("€"),
        "GBP" | "£" => Some("£"),
        _ => None,
    }
}
