//! Property-based tests for the filter-and-aggregate engine.
//!
//! Verifies invariants across arbitrary datasets and selections:
//! - filter output is an order-preserving subset that honours every selection
//! - any fully deselected dimension empties every query
//! - grouped sums stay consistent under finer sub-grouping
//! - the focus-year breakdown never leaks other years
//! - filtering is repeatable and leaves the source untouched

use std::collections::BTreeMap;

use proptest::prelude::*;

use big4_dashboard::data::aggregate::{compute_metrics, group_aggregate, Reducer};
use big4_dashboard::data::filter::{filter, FilterSelection};
use big4_dashboard::data::model::{AuditDataset, AuditRecord, Dimension, FieldValue, Measure};
use big4_dashboard::data::view::{DashboardView, ViewConfig};

// =============================================================================
// Proptest strategies
// =============================================================================

const FIRMS: [&str; 4] = ["Deloitte", "PwC", "EY", "KPMG"];
const INDUSTRIES: [&str; 4] = ["Finance", "Healthcare", "Tech", "Retail"];
const AI_FLAGS: [&str; 2] = ["Yes", "No"];

/// Generate one record with small integral numbers so sums are exact.
fn arb_record() -> impl Strategy<Value = AuditRecord> {
    (
        0..FIRMS.len(),
        2020i64..=2025,
        0..INDUSTRIES.len(),
        0..AI_FLAGS.len(),
        prop::collection::vec(0u32..500, 7),
    )
        .prop_map(|(firm, year, industry, ai, n)| AuditRecord {
            firm_name: FIRMS[firm].to_string(),
            year,
            industry_affected: INDUSTRIES[industry].to_string(),
            ai_used_for_auditing: AI_FLAGS[ai].to_string(),
            total_audit_engagements: f64::from(n[0]),
            compliance_violations: f64::from(n[1]),
            fraud_cases_detected: f64::from(n[2]),
            employee_workload: f64::from(n[3]),
            total_revenue_impact: f64::from(n[4]) - 250.0,
            high_risk_cases: f64::from(n[5]),
            audit_effectiveness_score: f64::from(n[6]) / 50.0,
        })
}

fn arb_dataset() -> impl Strategy<Value = AuditDataset> {
    prop::collection::vec(arb_record(), 0..60).prop_map(AuditDataset::from_records)
}

/// A dataset plus a selection built by dropping an arbitrary subset of each
/// dimension's observed values.
fn arb_dataset_and_selection() -> impl Strategy<Value = (AuditDataset, FilterSelection)> {
    arb_dataset().prop_flat_map(|ds| {
        let masks: Vec<_> = Dimension::ALL
            .iter()
            .map(|&dim| prop::collection::vec(any::<bool>(), ds.options(dim).len()))
            .collect();
        (Just(ds), masks).prop_map(|(ds, masks)| {
            let mut sel = FilterSelection::default();
            for (dim, mask) in Dimension::ALL.iter().zip(&masks) {
                for (value, keep) in ds.options(*dim).iter().zip(mask) {
                    if *keep {
                        sel.insert(*dim, value);
                    }
                }
            }
            (ds, sel)
        })
    })
}

fn arb_dimension() -> impl Strategy<Value = Dimension> {
    prop_oneof![
        Just(Dimension::FirmName),
        Just(Dimension::Year),
        Just(Dimension::IndustryAffected),
        Just(Dimension::AiUsedForAuditing),
    ]
}

fn arb_measure() -> impl Strategy<Value = Measure> {
    prop_oneof![
        Just(Measure::TotalAuditEngagements),
        Just(Measure::ComplianceViolations),
        Just(Measure::FraudCasesDetected),
        Just(Measure::EmployeeWorkload),
        Just(Measure::TotalRevenueImpact),
        Just(Measure::HighRiskCases),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_filter_output_is_ordered_subset_matching_selection(
        (ds, sel) in arb_dataset_and_selection()
    ) {
        let rows = filter(&ds.records, &sel);

        // Every output record comes from the source, in source order.
        let mut cursor = ds.records.iter();
        for rec in &rows {
            prop_assert!(cursor.any(|src| std::ptr::eq(src, *rec)));
        }

        for rec in &rows {
            prop_assert!(sel.firm_names.contains(&rec.firm_name));
            prop_assert!(sel.years.contains(&rec.year));
            prop_assert!(sel.industries.contains(&rec.industry_affected));
            prop_assert!(sel.ai_usage.contains(&rec.ai_used_for_auditing));
        }

        let expected = ds.records.iter().filter(|rec| sel.allows(rec)).count();
        prop_assert_eq!(rows.len(), expected);
    }

    #[test]
    fn prop_empty_dimension_empties_every_query(
        ds in arb_dataset(),
        dim in arb_dimension(),
    ) {
        let mut sel = FilterSelection::all(&ds);
        sel.clear(dim);

        let rows = filter(&ds.records, &sel);
        prop_assert!(rows.is_empty());

        let view = DashboardView::compute(&rows, &ViewConfig::default());
        prop_assert!(view.risk_trend.is_empty());
        prop_assert!(view.violations_by_firm.is_empty());
        prop_assert!(view.fraud_by_year.is_empty());
        prop_assert!(view.revenue_by_year.is_empty());
        prop_assert!(view.workload_by_firm.is_empty());
        prop_assert!(view.workload_by_firm_ai.is_empty());
        prop_assert!(view.ai_audits_by_year.is_empty());
        prop_assert!(view.effectiveness.is_empty());
        prop_assert_eq!(view.metrics.avg_workload, None);
        prop_assert_eq!(view.metrics.avg_revenue_loss_per_year, None);
    }

    #[test]
    fn prop_grouped_sum_is_consistent_with_finer_grouping(
        ds in arb_dataset(),
        coarse in arb_dimension(),
        fine in arb_dimension(),
        measure in arb_measure(),
    ) {
        let rows: Vec<&AuditRecord> = ds.records.iter().collect();
        let by_coarse = group_aggregate(&rows, &[coarse], Reducer::Sum(measure));
        let by_both = group_aggregate(&rows, &[coarse, fine], Reducer::Sum(measure));

        let mut rolled_up: BTreeMap<FieldValue, f64> = BTreeMap::new();
        for row in &by_both {
            *rolled_up.entry(row.keys[0].clone()).or_default() += row.value;
        }

        prop_assert_eq!(by_coarse.len(), rolled_up.len());
        for row in &by_coarse {
            prop_assert_eq!(Some(&row.value), row.key().and_then(|key| rolled_up.get(key)));
        }
    }

    #[test]
    fn prop_metric_totals_match_grouped_totals(ds in arb_dataset()) {
        let rows: Vec<&AuditRecord> = ds.records.iter().collect();
        let metrics = compute_metrics(&rows);
        let by_firm: f64 = group_aggregate(
            &rows,
            &[Dimension::FirmName],
            Reducer::Sum(Measure::ComplianceViolations),
        )
        .iter()
        .map(|row| row.value)
        .sum();
        prop_assert_eq!(metrics.total_violations, by_firm);
        prop_assert_eq!(metrics.avg_workload.is_none(), rows.is_empty());
    }

    #[test]
    fn prop_focus_year_breakdown_never_leaks_other_years(
        (ds, sel) in arb_dataset_and_selection(),
        focus_year in 2020i64..=2025,
    ) {
        let rows = filter(&ds.records, &sel);
        let config = ViewConfig { focus_year, ..ViewConfig::default() };
        let view = DashboardView::compute(&rows, &config);

        for row in &view.workload_by_firm_ai {
            let firm = row.keys[0].as_text().unwrap_or_default();
            let ai = row.keys[1].as_text().unwrap_or_default();
            let present = rows.iter().any(|rec| {
                rec.year == focus_year && rec.firm_name == firm && rec.ai_used_for_auditing == ai
            });
            prop_assert!(present, "group {}/{} has no {} record", firm, ai, focus_year);
        }

        let expected: usize = rows.iter().filter(|rec| rec.year == focus_year).count();
        let counted = group_aggregate(
            &rows.iter().copied().filter(|rec| rec.year == focus_year).collect::<Vec<_>>(),
            &[Dimension::FirmName, Dimension::AiUsedForAuditing],
            Reducer::Count,
        )
        .iter()
        .map(|row| row.value as usize)
        .sum::<usize>();
        prop_assert_eq!(counted, expected);
    }

    #[test]
    fn prop_filter_is_idempotent_and_pure(
        (ds, sel) in arb_dataset_and_selection()
    ) {
        let before = ds.records.clone();
        let first: Vec<AuditRecord> = filter(&ds.records, &sel).into_iter().cloned().collect();
        let second: Vec<AuditRecord> = filter(&ds.records, &sel).into_iter().cloned().collect();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&ds.records, &before);
    }
}

// =============================================================================
// Worked examples
// =============================================================================

fn record(firm: &str, year: i64) -> AuditRecord {
    AuditRecord {
        firm_name: firm.to_string(),
        year,
        industry_affected: "Finance".to_string(),
        ai_used_for_auditing: "Yes".to_string(),
        total_audit_engagements: 0.0,
        compliance_violations: 0.0,
        fraud_cases_detected: 0.0,
        employee_workload: 0.0,
        total_revenue_impact: 0.0,
        high_risk_cases: 0.0,
        audit_effectiveness_score: 0.0,
    }
}

#[test]
fn test_violations_example_with_default_selection() {
    let mut a1 = record("A", 2024);
    a1.compliance_violations = 3.0;
    let mut a2 = record("A", 2025);
    a2.compliance_violations = 5.0;
    let mut b1 = record("B", 2024);
    b1.compliance_violations = 2.0;
    let ds = AuditDataset::from_records(vec![a1, a2, b1]);

    let rows = filter(&ds.records, &FilterSelection::all(&ds));
    let view = DashboardView::compute(&rows, &ViewConfig::default());

    assert_eq!(view.metrics.total_violations, 10.0);
    let by_firm: Vec<(String, f64)> = view
        .violations_by_firm
        .iter()
        .map(|row| (row.key().unwrap().to_string(), row.value))
        .collect();
    assert_eq!(by_firm, vec![("A".to_string(), 8.0), ("B".to_string(), 2.0)]);
}

#[test]
fn test_revenue_loss_is_mean_of_yearly_sums() {
    let amounts = [(2024, 10.0), (2024, 20.0), (2025, 30.0)];
    let records = amounts
        .iter()
        .map(|&(year, amount)| {
            let mut rec = record("EY", year);
            rec.total_revenue_impact = amount;
            rec
        })
        .collect();
    let ds = AuditDataset::from_records(records);

    let rows = filter(&ds.records, &FilterSelection::all(&ds));
    let metrics = compute_metrics(&rows);
    assert_eq!(metrics.avg_revenue_loss_per_year, Some(30.0));
}

#[test]
fn test_other_years_never_reach_focus_breakdown() {
    let mut old = record("KPMG", 2024);
    old.ai_used_for_auditing = "No".to_string();
    old.employee_workload = 99.0;
    let mut current = record("KPMG", 2025);
    current.employee_workload = 40.0;
    let ds = AuditDataset::from_records(vec![old, current]);

    let rows = filter(&ds.records, &FilterSelection::all(&ds));
    let view = DashboardView::compute(&rows, &ViewConfig::default());

    assert_eq!(view.workload_by_firm_ai.len(), 1);
    assert_eq!(
        view.workload_by_firm_ai[0].keys,
        vec![FieldValue::from("KPMG"), FieldValue::from("Yes")]
    );
    assert_eq!(view.workload_by_firm_ai[0].value, 40.0);
}
