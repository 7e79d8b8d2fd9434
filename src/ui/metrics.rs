use eframe::egui::{RichText, Ui};

use big4_dashboard::data::aggregate::MetricsSummary;

/// Shown in place of a mean that has nothing to average.
pub const NO_DATA: &str = "no data";

/// Render the five headline figures side by side.
pub fn metrics_row(ui: &mut Ui, metrics: &MetricsSummary) {
    let cards = [
        ("Total Audits", format_count(metrics.total_audits)),
        ("Compliance Violations", format_count(metrics.total_violations)),
        ("Fraud Cases", format_count(metrics.total_fraud)),
        ("Avg. Employee Workload", format_workload(metrics.avg_workload)),
        (
            "Revenue Loss Per Year (in million)",
            format_currency(metrics.avg_revenue_loss_per_year),
        ),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            col.label(RichText::new(title).small());
            col.heading(value);
        }
    });
}

/// Whole-number total, truncated like the headline cards always were.
pub fn format_count(value: f64) -> String {
    format!("{}", value.trunc() as i64)
}

pub fn format_workload(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.1}"))
}

/// `$1,234.56`, negative amounts as `-$1,234.56`.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(v) = value else {
        return NO_DATA.to_string();
    };
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}
