//! Chart Component
//!
//! Price history line chart using HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::api::PricePoint;

/// Fewer points than this show a placeholder instead of a line
pub const MIN_CHART_POINTS: usize = 2;

const LINE_COLOR: &str = "#4f46e5";

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// Price history chart, one point per history entry
#[component]
pub fn PriceChart(#[prop(into)] history: Signal<Vec<PricePoint>>) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let points = history.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &points);
        }
    });

    view! {
        {move || {
            if history.with(|h| h.len() < MIN_CHART_POINTS) {
                view! {
                    <div class="h-64 flex items-center justify-center text-gray-500 bg-gray-50 rounded-lg">
                        "Not enough price history to draw a chart yet."
                    </div>
                }
                .into_view()
            } else {
                view! {
                    <canvas
                        node_ref=canvas_ref
                        width="800"
                        height="320"
                        class="w-full h-64 md:h-80 rounded-lg"
                    />
                }
                .into_view()
            }
        }}
    }
}

/// Value range of the y axis, padded so the line never touches the edges
fn price_range(prices: &[f64]) -> (f64, f64) {
    let mut min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let span = max - min;
    let padding = if span > 0.0 { span * 0.1 } else { 1.0 };
    min -= padding;
    max += padding;
    (min, max)
}

/// Canvas coordinates for each price, evenly spaced left to right
fn plot_points(prices: &[f64], width: f64, height: f64) -> Vec<(f64, f64)> {
    let (min, max) = price_range(prices);
    let step = if prices.len() > 1 {
        width / (prices.len() - 1) as f64
    } else {
        0.0
    };

    prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let x = i as f64 * step;
            let y = (max - price) / (max - min) * height;
            (x, y)
        })
        .collect()
}

fn draw_chart(canvas: &HtmlCanvasElement, history: &[PricePoint]) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    if history.len() < MIN_CHART_POINTS {
        return;
    }

    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
    let (min, max) = price_range(&prices);

    // Grid and y labels
    ctx.set_stroke_style(&"#e5e7eb".into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=4 {
        let y = MARGIN_TOP + (i as f64 / 4.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();

        let value = max - (i as f64 / 4.0) * (max - min);
        ctx.set_fill_style(&"#6b7280".into());
        let _ = ctx.fill_text(&format!("{:.2}", value), 5.0, y + 4.0);
    }

    let points: Vec<(f64, f64)> = plot_points(&prices, chart_width, chart_height)
        .into_iter()
        .map(|(x, y)| (x + MARGIN_LEFT, y + MARGIN_TOP))
        .collect();

    ctx.set_stroke_style(&LINE_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, (x, y)) in points.iter().enumerate() {
        if i == 0 {
            ctx.move_to(*x, *y);
        } else {
            ctx.line_to(*x, *y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&LINE_COLOR.into());
    for (x, y) in &points {
        ctx.begin_path();
        let _ = ctx.arc(*x, *y, 3.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }

    // First and last day under the axis
    ctx.set_fill_style(&"#6b7280".into());
    let first = history.first().and_then(PricePoint::day_label).unwrap_or_default();
    let last = history.last().and_then(PricePoint::day_label).unwrap_or_default();
    let _ = ctx.fill_text(&first, MARGIN_LEFT, height - 10.0);
    let _ = ctx.fill_text(&last, width - MARGIN_RIGHT - 70.0, height - 10.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_points_follow_history_order() {
        let points = plot_points(&[300.0, 100.0, 200.0], 100.0, 50.0);

        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![0.0, 50.0, 100.0]);

        // Highest price sits closest to the top
        assert!(points[0].1 < points[2].1);
        assert!(points[2].1 < points[1].1);
    }

    #[test]
    fn test_flat_series_is_centered() {
        let points = plot_points(&[500.0, 500.0], 100.0, 50.0);
        assert!(points.iter().all(|p| (p.1 - 25.0).abs() < 1e-9));
    }
}
