use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::model::{AuditRecord, Dimension, FieldValue, Measure};

// ---------------------------------------------------------------------------
// Reducers
// ---------------------------------------------------------------------------

/// How the rows of one group collapse into a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum(Measure),
    Mean(Measure),
    /// Number of rows in the group.
    Count,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, reducer: Reducer, rec: &AuditRecord) {
        match reducer {
            Reducer::Sum(m) | Reducer::Mean(m) => self.sum += rec.value(m),
            Reducer::Count => {}
        }
        self.count += 1;
    }

    fn finish(self, reducer: Reducer) -> f64 {
        match reducer {
            Reducer::Sum(_) => self.sum,
            // Groups only exist once a row has been pushed, so count > 0.
            Reducer::Mean(_) => self.sum / self.count as f64,
            Reducer::Count => self.count as f64,
        }
    }
}

/// One output row of [`group_aggregate`]: the group's key values (one per
/// requested dimension, in the same order) and the reduced value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub keys: Vec<FieldValue>,
    pub value: f64,
}

impl GroupRow {
    /// The first key; `None` only for a grouping over no dimensions.
    pub fn key(&self) -> Option<&FieldValue> {
        self.keys.first()
    }
}

/// Group `rows` by `keys` and reduce each group with `reducer`.
///
/// One row is produced per key combination observed in `rows`; absent
/// combinations are not zero-filled. Ordinal dimensions (`Year`) order
/// ascending by value, text dimensions by first occurrence in `rows`; with two
/// keys the first key is compared first.
pub fn group_aggregate(
    rows: &[&AuditRecord],
    keys: &[Dimension],
    reducer: Reducer,
) -> Vec<GroupRow> {
    let mut slots: HashMap<Vec<FieldValue>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<FieldValue>, Accumulator)> = Vec::new();
    let mut first_seen: Vec<HashMap<FieldValue, usize>> = vec![HashMap::new(); keys.len()];

    for rec in rows {
        let key: Vec<FieldValue> = keys.iter().map(|&dim| rec.key(dim)).collect();
        for (pos, value) in key.iter().enumerate() {
            let next = first_seen[pos].len();
            first_seen[pos].entry(value.clone()).or_insert(next);
        }

        let next = groups.len();
        let slot = *slots.entry(key.clone()).or_insert(next);
        if slot == next {
            groups.push((key, Accumulator::default()));
        }
        groups[slot].1.push(reducer, rec);
    }

    groups.sort_by(|(a, _), (b, _)| {
        for (pos, dim) in keys.iter().enumerate() {
            let ord = if dim.is_ordinal() {
                a[pos].cmp(&b[pos])
            } else {
                first_seen[pos][&a[pos]].cmp(&first_seen[pos][&b[pos]])
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    groups
        .into_iter()
        .map(|(keys, acc)| GroupRow {
            keys,
            value: acc.finish(reducer),
        })
        .collect()
}

/// Keep the rows matching `pred`, preserving order.
pub fn restrict<'a, F>(rows: &[&'a AuditRecord], pred: F) -> Vec<&'a AuditRecord>
where
    F: Fn(&AuditRecord) -> bool,
{
    rows.iter().copied().filter(|rec| pred(*rec)).collect()
}

/// Arithmetic mean, or `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn total(rows: &[&AuditRecord], measure: Measure) -> f64 {
    rows.iter().map(|rec| rec.value(measure)).sum()
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// The five headline figures. Means are `None` ("no data") when nothing is
/// selected, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_audits: f64,
    pub total_violations: f64,
    pub total_fraud: f64,
    pub avg_workload: Option<f64>,
    /// Mean over the years present of each year's summed revenue impact.
    pub avg_revenue_loss_per_year: Option<f64>,
}

/// Compute the headline metrics over an already filtered set.
pub fn compute_metrics(rows: &[&AuditRecord]) -> MetricsSummary {
    let per_year = group_aggregate(
        rows,
        &[Dimension::Year],
        Reducer::Sum(Measure::TotalRevenueImpact),
    );

    MetricsSummary {
        total_audits: total(rows, Measure::TotalAuditEngagements),
        total_violations: total(rows, Measure::ComplianceViolations),
        total_fraud: total(rows, Measure::FraudCasesDetected),
        avg_workload: mean(rows.iter().map(|rec| rec.employee_workload)),
        avg_revenue_loss_per_year: mean(per_year.iter().map(|row| row.value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn violations(firm: &str, year: i64, n: f64) -> AuditRecord {
        let mut rec = record(firm, year, "Finance", "Yes");
        rec.compliance_violations = n;
        rec
    }

    fn revenue(year: i64, amount: f64) -> AuditRecord {
        let mut rec = record("EY", year, "Finance", "No");
        rec.total_revenue_impact = amount;
        rec
    }

    #[test]
    fn test_violation_totals_and_first_seen_grouping() {
        let records = vec![
            violations("A", 2024, 3.0),
            violations("A", 2025, 5.0),
            violations("B", 2024, 2.0),
        ];
        let rows: Vec<&AuditRecord> = records.iter().collect();

        assert_eq!(compute_metrics(&rows).total_violations, 10.0);

        let by_firm = group_aggregate(
            &rows,
            &[Dimension::FirmName],
            Reducer::Sum(Measure::ComplianceViolations),
        );
        assert_eq!(
            by_firm,
            vec![
                GroupRow { keys: vec!["A".into()], value: 8.0 },
                GroupRow { keys: vec!["B".into()], value: 2.0 },
            ]
        );
    }

    #[test]
    fn test_text_keys_are_not_sorted_alphabetically() {
        let records = vec![violations("PwC", 2024, 1.0), violations("Deloitte", 2024, 1.0)];
        let rows: Vec<&AuditRecord> = records.iter().collect();
        let by_firm = group_aggregate(&rows, &[Dimension::FirmName], Reducer::Count);
        assert_eq!(by_firm[0].key(), Some(&FieldValue::from("PwC")));
        assert_eq!(by_firm[1].key(), Some(&FieldValue::from("Deloitte")));
    }

    #[test]
    fn test_years_are_sorted_numerically() {
        let records = vec![revenue(2025, 1.0), revenue(2020, 1.0), revenue(2023, 1.0)];
        let rows: Vec<&AuditRecord> = records.iter().collect();
        let years: Vec<i64> = group_aggregate(&rows, &[Dimension::Year], Reducer::Count)
            .iter()
            .filter_map(|row| row.key().and_then(FieldValue::as_integer))
            .collect();
        assert_eq!(years, vec![2020, 2023, 2025]);
    }

    #[test]
    fn test_revenue_is_mean_of_yearly_sums() {
        let records = vec![revenue(2024, 10.0), revenue(2024, 20.0), revenue(2025, 30.0)];
        let rows: Vec<&AuditRecord> = records.iter().collect();
        assert_eq!(compute_metrics(&rows).avg_revenue_loss_per_year, Some(30.0));
    }

    #[test]
    fn test_empty_input_reports_no_data() {
        let metrics = compute_metrics(&[]);
        assert_eq!(metrics.total_audits, 0.0);
        assert_eq!(metrics.avg_workload, None);
        assert_eq!(metrics.avg_revenue_loss_per_year, None);
        assert!(group_aggregate(&[], &[Dimension::Year], Reducer::Count).is_empty());
    }

    #[test]
    fn test_mean_reducer_per_group() {
        let mut a = record("KPMG", 2025, "Tech", "Yes");
        a.employee_workload = 40.0;
        let mut b = record("KPMG", 2025, "Tech", "Yes");
        b.employee_workload = 60.0;
        let mut c = record("EY", 2025, "Tech", "No");
        c.employee_workload = 45.0;
        let records = vec![a, b, c];
        let rows: Vec<&AuditRecord> = records.iter().collect();

        let by_firm = group_aggregate(
            &rows,
            &[Dimension::FirmName],
            Reducer::Mean(Measure::EmployeeWorkload),
        );
        assert_eq!(by_firm[0].value, 50.0);
        assert_eq!(by_firm[1].value, 45.0);
    }

    #[test]
    fn test_two_keys_order_by_first_seen_rank_of_each_key() {
        let records = vec![
            record("EY", 2025, "Tech", "No"),
            record("PwC", 2025, "Tech", "Yes"),
            record("EY", 2025, "Tech", "Yes"),
            record("PwC", 2025, "Tech", "No"),
        ];
        let rows: Vec<&AuditRecord> = records.iter().collect();
        let grouped = group_aggregate(
            &rows,
            &[Dimension::FirmName, Dimension::AiUsedForAuditing],
            Reducer::Count,
        );

        let keys: Vec<String> = grouped
            .iter()
            .map(|row| format!("{}/{}", row.keys[0], row.keys[1]))
            .collect();
        assert_eq!(keys, vec!["EY/No", "EY/Yes", "PwC/No", "PwC/Yes"]);
    }

    #[test]
    fn test_grouping_over_no_dimensions_is_one_unkeyed_row() {
        let records = vec![revenue(2024, 1.0), revenue(2025, 2.0)];
        let rows: Vec<&AuditRecord> = records.iter().collect();
        let grouped = group_aggregate(&rows, &[], Reducer::Count);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].key(), None);
        assert_eq!(grouped[0].value, 2.0);
    }

    #[test]
    fn test_restrict_preserves_order() {
        let records = vec![revenue(2024, 1.0), revenue(2025, 2.0), revenue(2025, 3.0)];
        let rows: Vec<&AuditRecord> = records.iter().collect();
        let in_2025 = restrict(&rows, |rec| rec.year == 2025);
        let amounts: Vec<f64> = in_2025.iter().map(|rec| rec.total_revenue_impact).collect();
        assert_eq!(amounts, vec![2.0, 3.0]);
    }

    #[test]
    fn test_mean_of_nothing_is_none() {
        assert_eq!(mean(std::iter::empty::<f64>()), None);
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
    }
}
