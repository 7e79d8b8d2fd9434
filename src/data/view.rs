use serde::Serialize;

use super::aggregate::{
    compute_metrics, group_aggregate, restrict, GroupRow, MetricsSummary, Reducer,
};
use super::model::{AuditRecord, Dimension, FieldValue, Measure};

/// Year the firm × AI workload breakdown focuses on.
pub const DEFAULT_FOCUS_YEAR: i64 = 2025;

/// Value of `AI_Used_for_Auditing` counted as "audit used AI".
pub const DEFAULT_AI_FLAG: &str = "Yes";

/// The measures stacked into the yearly risk trend, in output order.
pub const RISK_TREND_MEASURES: [Measure; 2] =
    [Measure::HighRiskCases, Measure::ComplianceViolations];

/// Knobs of the fixed dashboard queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub focus_year: i64,
    pub ai_flag: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            focus_year: DEFAULT_FOCUS_YEAR,
            ai_flag: DEFAULT_AI_FLAG.to_string(),
        }
    }
}

/// One long-form row of the yearly risk trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub year: i64,
    pub metric: Measure,
    pub value: f64,
}

/// One point of the effectiveness-score distribution, passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectivenessPoint {
    pub ai_used_for_auditing: String,
    pub audit_effectiveness_score: f64,
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub record_count: usize,
    pub metrics: MetricsSummary,
    /// Year → {High_Risk_Cases, Compliance_Violations} → sum, long form.
    pub risk_trend: Vec<MetricRow>,
    /// Firm_Name → Compliance_Violations → sum.
    pub violations_by_firm: Vec<GroupRow>,
    /// Year → Fraud_Cases_Detected → sum.
    pub fraud_by_year: Vec<GroupRow>,
    /// Year → Total_Revenue_Impact → sum.
    pub revenue_by_year: Vec<GroupRow>,
    /// Firm_Name → Employee_Workload → mean.
    pub workload_by_firm: Vec<GroupRow>,
    /// (Firm_Name × AI_Used_for_Auditing) → Employee_Workload → mean, focus
    /// year only.
    pub workload_by_firm_ai: Vec<GroupRow>,
    /// Year → row count, AI-assisted audits only.
    pub ai_audits_by_year: Vec<GroupRow>,
    pub effectiveness: Vec<EffectivenessPoint>,
}

impl DashboardView {
    /// Run every dashboard query over an already filtered set.
    pub fn compute(rows: &[&AuditRecord], config: &ViewConfig) -> Self {
        let focus = rows_in_year(rows, config.focus_year);
        let with_ai = rows_with_ai_usage(rows, &config.ai_flag);

        DashboardView {
            record_count: rows.len(),
            metrics: compute_metrics(rows),
            risk_trend: risk_trend(rows),
            violations_by_firm: group_aggregate(
                rows,
                &[Dimension::FirmName],
                Reducer::Sum(Measure::ComplianceViolations),
            ),
            fraud_by_year: group_aggregate(
                rows,
                &[Dimension::Year],
                Reducer::Sum(Measure::FraudCasesDetected),
            ),
            revenue_by_year: group_aggregate(
                rows,
                &[Dimension::Year],
                Reducer::Sum(Measure::TotalRevenueImpact),
            ),
            workload_by_firm: group_aggregate(
                rows,
                &[Dimension::FirmName],
                Reducer::Mean(Measure::EmployeeWorkload),
            ),
            workload_by_firm_ai: group_aggregate(
                &focus,
                &[Dimension::FirmName, Dimension::AiUsedForAuditing],
                Reducer::Mean(Measure::EmployeeWorkload),
            ),
            ai_audits_by_year: group_aggregate(&with_ai, &[Dimension::Year], Reducer::Count),
            effectiveness: effectiveness_points(rows),
        }
    }

    /// An empty view, as produced for a selection that matches nothing.
    pub fn empty() -> Self {
        Self::compute(&[], &ViewConfig::default())
    }
}

/// Records from a single year.
pub fn rows_in_year<'a>(rows: &[&'a AuditRecord], year: i64) -> Vec<&'a AuditRecord> {
    restrict(rows, |rec| rec.year == year)
}

/// Records whose AI flag equals `flag` exactly.
pub fn rows_with_ai_usage<'a>(rows: &[&'a AuditRecord], flag: &str) -> Vec<&'a AuditRecord> {
    restrict(rows, |rec| rec.ai_used_for_auditing == flag)
}

/// Yearly sums of the risk-trend measures, melted to one row per
/// (measure, year): every year of the first measure, then the second.
pub fn risk_trend(rows: &[&AuditRecord]) -> Vec<MetricRow> {
    RISK_TREND_MEASURES
        .iter()
        .flat_map(|&metric| {
            group_aggregate(rows, &[Dimension::Year], Reducer::Sum(metric))
                .into_iter()
                .filter_map(move |row| {
                    let year = row.key().and_then(FieldValue::as_integer)?;
                    Some(MetricRow {
                        year,
                        metric,
                        value: row.value,
                    })
                })
        })
        .collect()
}

pub fn effectiveness_points(rows: &[&AuditRecord]) -> Vec<EffectivenessPoint> {
    rows.iter()
        .map(|rec| EffectivenessPoint {
            ai_used_for_auditing: rec.ai_used_for_auditing.clone(),
            audit_effectiveness_score: rec.audit_effectiveness_score,
        })
        .collect()
}
