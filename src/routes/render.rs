//! Terminal rendering of the route views

use std::fmt::Write;

use super::views::{ChartPoint, DashboardView, DetailView, PriceChart, ProductCard, ViewState};

/// Rows of the text chart
const CHART_HEIGHT: usize = 8;
/// Columns used by each history entry
const COLUMN_WIDTH: usize = 3;
const MARKER: char = '●';

pub fn render_home() -> String {
    [
        "Welcome to PriceTrack",
        "Never miss a deal again. We watch the prices so you don't have to.",
        "",
        "  pricetrack login <email>   Sign in",
        "  pricetrack dashboard       Go to Dashboard",
    ]
    .join("\n")
}

pub fn render_loading() -> String {
    "Loading...".to_string()
}

pub fn render_error(message: &str) -> String {
    format!("Error: {}", message)
}

pub fn render_not_found(path: &str) -> String {
    format!("Page not found: {}", path)
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();

    match &view.user_email {
        Some(email) => {
            let _ = writeln!(out, "PriceTrack - Welcome, {}", email);
        }
        None => out.push_str("PriceTrack\n"),
    }
    out.push('\n');

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{}\n", render_error(notice));
    }

    match &view.products {
        ViewState::Loading => out.push_str(&render_loading()),
        ViewState::Error(message) => out.push_str(&render_error(message)),
        ViewState::Ready(cards) if cards.is_empty() => {
            out.push_str("Your tracking list is empty\n");
            out.push_str("Track a product URL to get started: pricetrack track <url>");
        }
        ViewState::Ready(cards) => out.push_str(&render_cards(cards)),
    }

    out.trim_end().to_string()
}

fn render_cards(cards: &[ProductCard]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<40} {:<16} {:>12} {:>12}",
        "ID", "Name", "Brand", "Price", "M.R.P"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));

    for card in cards {
        let _ = writeln!(
            out,
            "{:<6} {:<40} {:<16} {:>12} {:>12}",
            card.id,
            truncate(&card.name, 40),
            truncate(&card.brand, 16),
            card.price,
            card.mrp.as_deref().unwrap_or("")
        );
    }
    out
}

pub fn render_detail(view: &DetailView) -> String {
    let mut out = String::new();
    let card = &view.card;

    let _ = writeln!(out, "{}", card.name);
    if !card.brand.is_empty() {
        let _ = writeln!(out, "{}", card.brand);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Price:  {}", card.price);
    if let Some(mrp) = &card.mrp {
        let _ = writeln!(out, "M.R.P:  {}", mrp);
    }
    if let Some(image) = &card.image {
        let _ = writeln!(out, "Image:  {}", image);
    }
    let _ = writeln!(out, "Store:  {}", view.store_url);

    if !view.key_features.is_empty() {
        let _ = writeln!(out, "\nKey features:");
        for feature in &view.key_features {
            let _ = writeln!(out, "  - {}", feature);
        }
    }

    if !view.specifications.is_empty() {
        let _ = writeln!(out, "\nSpecifications:");
        for (key, value) in &view.specifications {
            let _ = writeln!(out, "  {}: {}", key, value);
        }
    }

    let _ = writeln!(out, "\nPrice History");
    match (&view.history_error, &view.chart) {
        (Some(message), _) => out.push_str(&render_error(message)),
        (None, PriceChart::Placeholder) => {
            out.push_str("Not enough price history to draw a chart yet.")
        }
        (None, PriceChart::Series(points)) => out.push_str(&render_chart(points)),
    }

    out.trim_end().to_string()
}

/// Plot one marker per point, left to right in history order
pub fn render_chart(points: &[ChartPoint]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut min = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let mut max = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 1.0;
        max += 1.0;
    }

    let rows: Vec<usize> = points
        .iter()
        .map(|p| {
            let scaled = (max - p.price) / (max - min) * (CHART_HEIGHT - 1) as f64;
            (scaled.round() as usize).min(CHART_HEIGHT - 1)
        })
        .collect();

    let label_width = format!("{:.2}", max).len().max(format!("{:.2}", min).len());
    let mut out = String::new();

    for row in 0..CHART_HEIGHT {
        let value = max - (row as f64 / (CHART_HEIGHT - 1) as f64) * (max - min);
        let _ = write!(out, "{:>width$.2} |", value, width = label_width);
        for &point_row in &rows {
            let cell = if point_row == row { MARKER } else { ' ' };
            let _ = write!(out, "{:^width$}", cell, width = COLUMN_WIDTH);
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{} +{}",
        " ".repeat(label_width),
        "-".repeat(points.len() * COLUMN_WIDTH)
    );

    let first = &points[0].label;
    let last = &points[points.len() - 1].label;
    let _ = write!(out, "{}  {}", " ".repeat(label_width), first);
    if points.len() > 1 && last != first {
        let _ = write!(out, " .. {}", last);
    }

    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}
