use std::collections::HashSet;
use std::ops::RangeInclusive;

use eframe::egui::{ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use big4_dashboard::data::aggregate::GroupRow;
use big4_dashboard::data::model::FieldValue;
use big4_dashboard::data::view::{EffectivenessPoint, MetricRow, RISK_TREND_MEASURES};

use crate::color::BLUE_THEME;
use crate::state::AppState;
use crate::ui::metrics;

const CHART_HEIGHT: f32 = 260.0;

/// Share of a category slot covered by a group of side-by-side bars.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the metrics row and every chart for the current view.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the dashboard  (File → Open…)");
        });
        return;
    }
    let view = &state.view;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Key Metrics");
            metrics::metrics_row(ui, &view.metrics);
            if view.record_count == 0 {
                ui.label("No records match the current filters.");
            }

            section(ui, "Compliance & Risk Trends");
            ui.columns(2, |cols| {
                risk_trend_chart(&mut cols[0], &view.risk_trend);
                firm_bar_chart(
                    &mut cols[1],
                    "violations_by_firm",
                    "Compliance Violations by Firm",
                    &view.violations_by_firm,
                    state,
                    false,
                );
            });

            section(ui, "Fraud & Revenue Impact");
            ui.columns(2, |cols| {
                fraud_chart(&mut cols[0], &view.fraud_by_year);
                revenue_chart(&mut cols[1], &view.revenue_by_year);
            });

            section(ui, "AI Usage & Audit Effectiveness");
            ui.columns(2, |cols| {
                effectiveness_chart(&mut cols[0], &view.effectiveness, state);
                ai_audits_chart(&mut cols[1], &view.ai_audits_by_year);
            });

            section(ui, "Employee Workload Analysis");
            ui.columns(2, |cols| {
                firm_bar_chart(
                    &mut cols[0],
                    "workload_by_firm",
                    "Avg. Employee Workload by Firm",
                    &view.workload_by_firm,
                    state,
                    true,
                );
                workload_by_firm_ai_chart(&mut cols[1], &view.workload_by_firm_ai, state);
            });
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(8.0);
    ui.separator();
    ui.strong(title);
}

fn chart_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

/// Yearly high-risk cases and violations as horizontal grouped bars.
fn risk_trend_chart(ui: &mut Ui, rows: &[MetricRow]) {
    ui.label("Compliance & High Risk Cases (Yearly)");
    let n = RISK_TREND_MEASURES.len();

    let charts: Vec<BarChart> = RISK_TREND_MEASURES
        .iter()
        .enumerate()
        .map(|(i, &metric)| {
            let offset = grouped_offset(i, n);
            let bars: Vec<Bar> = rows
                .iter()
                .filter(|row| row.metric == metric)
                .map(|row| {
                    Bar::new(row.year as f64 + offset, row.value).width(GROUP_WIDTH / n as f64)
                })
                .collect();
            BarChart::new(bars)
                .name(metric.label())
                .color(BLUE_THEME[i])
                .horizontal()
        })
        .collect();

    chart_plot("risk_trend")
        .x_axis_label("Count")
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| year_label(mark.value))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// One bar per firm, coloured by firm. `horizontal` puts firms on the y axis.
fn firm_bar_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    rows: &[GroupRow],
    state: &AppState,
    horizontal: bool,
) {
    ui.label(title);
    let keyed: Vec<(&FieldValue, f64)> = rows
        .iter()
        .filter_map(|row| Some((row.key()?, row.value)))
        .collect();
    let labels: Vec<String> = keyed.iter().map(|(key, _)| key.to_string()).collect();
    let bars: Vec<Bar> = keyed
        .iter()
        .enumerate()
        .map(|(i, &(key, value))| {
            Bar::new(i as f64, value)
                .name(key)
                .fill(state.firm_colors.color_for(key))
                .width(0.6)
        })
        .collect();

    let mut chart = BarChart::new(bars).name(title);
    let mut plot = chart_plot(id);
    if horizontal {
        chart = chart.horizontal();
        plot = plot.y_axis_formatter(category_axis(labels));
    } else {
        plot = plot.x_axis_formatter(category_axis(labels));
    }
    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn fraud_chart(ui: &mut Ui, rows: &[GroupRow]) {
    ui.label("Fraud Cases Detected (Yearly)");
    let points = year_points(rows);
    let line = Line::new(PlotPoints::from(points.clone()))
        .name("Fraud Cases Detected")
        .color(BLUE_THEME[0])
        .width(2.0);
    let markers = Points::new(PlotPoints::from(points))
        .radius(4.0)
        .color(BLUE_THEME[0]);

    chart_plot("fraud_by_year")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| year_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(line);
            plot_ui.points(markers);
        });
}

fn revenue_chart(ui: &mut Ui, rows: &[GroupRow]) {
    ui.label("Revenue Loss (Yearly)");
    let area = Line::new(PlotPoints::from(year_points(rows)))
        .name("Total Revenue Impact")
        .color(BLUE_THEME[0])
        .fill(0.0_f32);

    chart_plot("revenue_by_year")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| year_label(mark.value))
        .show(ui, |plot_ui| plot_ui.line(area));
}

/// Box plot per AI flag with every score drawn as a point beside it.
fn effectiveness_chart(ui: &mut Ui, points: &[EffectivenessPoint], state: &AppState) {
    ui.label("Audit Effectiveness Score Distribution by AI Usage");
    let groups = split_by_group(points);
    let labels: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();

    let mut boxes = Vec::new();
    let mut scatter = Vec::new();
    for (i, (name, scores)) in groups.iter().enumerate() {
        let color = state.ai_colors.color_for(&FieldValue::Text(name.clone()));
        if let Some([lo, q1, median, q3, hi]) = five_number_summary(scores) {
            let elem = BoxElem::new(i as f64, BoxSpread::new(lo, q1, median, q3, hi))
                .name(name)
                .box_width(0.5)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
            boxes.push(BoxPlot::new(vec![elem]).name(name));
        }
        let pts: Vec<[f64; 2]> = scores
            .iter()
            .enumerate()
            .map(|(j, &score)| [i as f64 + jitter(j), score])
            .collect();
        scatter.push(Points::new(PlotPoints::from(pts)).radius(2.0).color(color));
    }

    chart_plot("effectiveness")
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Audit Effectiveness Score")
        .show(ui, |plot_ui| {
            for b in boxes {
                plot_ui.box_plot(b);
            }
            for p in scatter {
                plot_ui.points(p);
            }
        });
}

fn ai_audits_chart(ui: &mut Ui, rows: &[GroupRow]) {
    ui.label("Audits Using AI (Yearly)");
    let bars: Vec<Bar> = year_points(rows)
        .into_iter()
        .map(|[year, count]| Bar::new(year, count).width(0.6))
        .collect();
    let chart = BarChart::new(bars)
        .name("AI Used Audit Count")
        .color(BLUE_THEME[0]);

    chart_plot("ai_audits_by_year")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| year_label(mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Firms on the x axis, one bar per AI flag side by side.
fn workload_by_firm_ai_chart(ui: &mut Ui, rows: &[GroupRow], state: &AppState) {
    ui.label(format!(
        "Employee Workload by Firm & AI Usage ({})",
        state.config.focus_year
    ));
    let firms = distinct_keys(rows, 0);
    let flags = distinct_keys(rows, 1);

    let charts: Vec<BarChart> = flags
        .iter()
        .enumerate()
        .map(|(j, flag)| {
            let offset = grouped_offset(j, flags.len());
            let bars: Vec<Bar> = rows
                .iter()
                .filter(|row| &row.keys[1] == flag)
                .filter_map(|row| {
                    let firm_idx = firms.iter().position(|f| f == &row.keys[0])?;
                    Some(
                        Bar::new(firm_idx as f64 + offset, row.value)
                            .width(GROUP_WIDTH / flags.len() as f64),
                    )
                })
                .collect();
            BarChart::new(bars)
                .name(flag)
                .color(state.ai_colors.color_for(flag))
        })
        .collect();

    let labels: Vec<String> = firms.iter().map(ToString::to_string).collect();
    chart_plot("workload_by_firm_ai")
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Employee Workload")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| category_label(&labels, mark.value)
}

/// Label for a grid mark on a categorical axis; blank between categories.
pub fn category_label(labels: &[String], position: f64) -> String {
    let idx = position.round();
    if (position - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Years only on whole numbers.
pub fn year_label(position: f64) -> String {
    if position.fract() == 0.0 {
        format!("{position:.0}")
    } else {
        String::new()
    }
}

/// Offset of the `i`-th of `n` side-by-side bars from the category centre.
pub fn grouped_offset(i: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let step = GROUP_WIDTH / n as f64;
    (i as f64 - (n as f64 - 1.0) / 2.0) * step
}

/// Deterministic horizontal spread for strip-plot points.
fn jitter(j: usize) -> f64 {
    ((j % 7) as f64 - 3.0) * 0.03
}

/// (year, value) pairs of a year-keyed grouping.
pub fn year_points(rows: &[GroupRow]) -> Vec<[f64; 2]> {
    rows.iter()
        .filter_map(|row| {
            let year = row.key().and_then(FieldValue::as_integer)?;
            Some([year as f64, row.value])
        })
        .collect()
}

/// Distinct values of key position `pos`, in order of appearance.
pub fn distinct_keys(rows: &[GroupRow], pos: usize) -> Vec<FieldValue> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.keys.get(pos))
        .filter(|key| seen.insert((*key).clone()))
        .cloned()
        .collect()
}

/// Scores per AI flag, groups in order of first appearance.
pub fn split_by_group(points: &[EffectivenessPoint]) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for p in points {
        match groups.iter_mut().find(|(name, _)| *name == p.ai_used_for_auditing) {
            Some((_, scores)) => scores.push(p.audit_effectiveness_score),
            None => groups.push((
                p.ai_used_for_auditing.clone(),
                vec![p.audit_effectiveness_score],
            )),
        }
    }
    groups
}

/// Min, lower quartile, median, upper quartile and max, with linear
/// interpolation between order statistics.
pub fn five_number_summary(values: &[f64]) -> Option<[f64; 5]> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let quantile = |p: f64| {
        let pos = p * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    };
    Some([
        quantile(0.0),
        quantile(0.25),
        quantile(0.5),
        quantile(0.75),
        quantile(1.0),
    ])
}
