//! Chart Components
//!
//! Bar, pie and line charts drawn on an HTML5 canvas from the series the
//! core crate prepares.

use leptos::*;
use logscope::logs::{BarChart, Dataset, LineChart, PieChart};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const AXIS_TEXT: &str = "#9ca3af"; // gray-400
const EMPTY_TEXT: &str = "#6b7280";

/// Plot area margins: left, right, top, bottom
const MARGIN: (f64, f64, f64, f64) = (48.0, 16.0, 16.0, 40.0);

/// Grouped bar chart, one bar per dataset per label
#[component]
pub fn BarChartCanvas(chart: BarChart) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let legend = chart.datasets.clone();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_bar_chart(&canvas, &chart);
        }
    });

    view! {
        <div class="relative">
            <canvas node_ref=canvas_ref width="600" height="300" class="w-full h-64 rounded-lg" />
            <DatasetLegend datasets=legend />
        </div>
    }
}

/// Pie chart with a legend of counts and shares
#[component]
pub fn PieChartCanvas(chart: PieChart) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let rows: Vec<_> = chart
        .slices
        .iter()
        .cloned()
        .zip(chart.fractions())
        .collect();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_pie_chart(&canvas, &chart);
        }
    });

    view! {
        <div class="relative">
            <canvas node_ref=canvas_ref width="300" height="300" class="mx-auto h-64 rounded-lg" />
            <div class="flex justify-center flex-wrap gap-4 mt-4">
                {rows.into_iter().map(|(slice, fraction)| view! {
                    <div class="flex items-center space-x-2">
                        <div
                            class="w-3 h-3 rounded-full"
                            style=format!("background-color: {}", slice.color)
                        />
                        <span class="text-sm text-gray-300">
                            {format!("{} ({}, {:.0}%)", slice.label, slice.value, fraction * 100.0)}
                        </span>
                    </div>
                }).collect_view()}
            </div>
        </div>
    }
}

/// Requests per time bucket, one line per server
#[component]
pub fn LineChartCanvas(chart: LineChart) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let legend = chart.datasets.clone();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_line_chart(&canvas, &chart);
        }
    });

    view! {
        <div class="relative">
            <canvas node_ref=canvas_ref width="600" height="300" class="w-full h-64 rounded-lg" />
            <DatasetLegend datasets=legend />
        </div>
    }
}

/// Legend showing series colors
#[component]
fn DatasetLegend(datasets: Vec<Dataset>) -> impl IntoView {
    view! {
        <div class="flex justify-center flex-wrap gap-4 mt-4">
            {datasets.into_iter().map(|dataset| view! {
                <div class="flex items-center space-x-2">
                    <div
                        class="w-3 h-3 rounded-full"
                        style=format!("background-color: {}", dataset.color)
                    />
                    <span class="text-sm text-gray-300">{dataset.label}</span>
                </div>
            }).collect_view()}
        </div>
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_empty(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style(&EMPTY_TEXT.into());
    ctx.set_font("16px sans-serif");
    let _ = ctx.fill_text("Sin datos", width / 2.0 - 32.0, height / 2.0);
}

/// Horizontal grid with integer labels from 0 to `max`
fn draw_y_axis(ctx: &CanvasRenderingContext2d, width: f64, height: f64, max: f64) {
    let (left, right, top, bottom) = MARGIN;
    let plot_height = height - top - bottom;

    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    for i in 0..=4 {
        let y = top + (i as f64 / 4.0) * plot_height;
        ctx.begin_path();
        ctx.move_to(left, y);
        ctx.line_to(width - right, y);
        ctx.stroke();

        let value = max - (i as f64 / 4.0) * max;
        ctx.set_fill_style(&AXIS_TEXT.into());
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }
}

/// Label positions along the x axis, skipping labels when crowded
fn draw_x_labels(ctx: &CanvasRenderingContext2d, labels: &[String], xs: &[f64], height: f64) {
    ctx.set_fill_style(&AXIS_TEXT.into());
    ctx.set_font("12px sans-serif");

    let step = (labels.len() / 8).max(1);
    for (i, (label, x)) in labels.iter().zip(xs).enumerate() {
        if i % step == 0 {
            let text: String = label.chars().take(10).collect();
            let _ = ctx.fill_text(&text, x - 3.5 * text.len() as f64, height - 14.0);
        }
    }
}

fn draw_bar_chart(canvas: &HtmlCanvasElement, chart: &BarChart) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    clear(&ctx, width, height);

    if chart.is_empty() {
        draw_empty(&ctx, width, height);
        return;
    }

    let (left, right, top, bottom) = MARGIN;
    let plot_width = width - left - right;
    let plot_height = height - top - bottom;
    let max = chart.max_value().max(1) as f64;
    draw_y_axis(&ctx, width, height, max);

    let group_width = plot_width / chart.labels.len() as f64;
    let bar_width = group_width * 0.8 / chart.datasets.len().max(1) as f64;

    for (d, dataset) in chart.datasets.iter().enumerate() {
        ctx.set_fill_style(&dataset.color.as_str().into());
        for (i, value) in dataset.data.iter().enumerate() {
            let bar_height = (*value as f64 / max) * plot_height;
            let x = left + i as f64 * group_width + group_width * 0.1 + d as f64 * bar_width;
            ctx.fill_rect(x, top + plot_height - bar_height, bar_width, bar_height);
        }
    }

    let centers: Vec<f64> = (0..chart.labels.len())
        .map(|i| left + (i as f64 + 0.5) * group_width)
        .collect();
    draw_x_labels(&ctx, &chart.labels, &centers, height);
}

fn draw_pie_chart(canvas: &HtmlCanvasElement, chart: &PieChart) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    clear(&ctx, width, height);

    if chart.total() == 0 {
        draw_empty(&ctx, width, height);
        return;
    }

    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = width.min(height) / 2.0 - 10.0;
    let mut start = -std::f64::consts::FRAC_PI_2;

    for (slice, fraction) in chart.slices.iter().zip(chart.fractions()) {
        let end = start + fraction * std::f64::consts::TAU;
        ctx.set_fill_style(&slice.color.as_str().into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, end);
        ctx.close_path();
        ctx.fill();
        start = end;
    }
}

fn draw_line_chart(canvas: &HtmlCanvasElement, chart: &LineChart) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    clear(&ctx, width, height);

    if chart.buckets.is_empty() {
        draw_empty(&ctx, width, height);
        return;
    }

    let (left, right, top, bottom) = MARGIN;
    let plot_width = width - left - right;
    let plot_height = height - top - bottom;
    let max = chart.max_value().max(1) as f64;
    draw_y_axis(&ctx, width, height, max);

    let count = chart.buckets.len();
    let xs: Vec<f64> = (0..count)
        .map(|i| {
            if count == 1 {
                left + plot_width / 2.0
            } else {
                left + (i as f64 / (count - 1) as f64) * plot_width
            }
        })
        .collect();

    for dataset in &chart.datasets {
        let color = dataset.color.as_str();
        let points: Vec<(f64, f64)> = dataset
            .data
            .iter()
            .zip(&xs)
            .map(|(value, x)| (*x, top + plot_height - (*value as f64 / max) * plot_height))
            .collect();

        ctx.set_stroke_style(&color.into());
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

        ctx.set_fill_style(&color.into());
        for (x, y) in &points {
            ctx.begin_path();
            let _ = ctx.arc(*x, *y, 3.0, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
    }

    draw_x_labels(&ctx, &chart.labels(), &xs, height);
}
