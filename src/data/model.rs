use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// FieldValue – a categorical cell used as filter option or group key
// ---------------------------------------------------------------------------

/// A categorical value: either free text (firm, industry, AI flag) or the
/// integer `Year`. Text sorts before integers; within a variant the natural
/// order applies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

// ---------------------------------------------------------------------------
// Column – the required source columns
// ---------------------------------------------------------------------------

/// Every column the dashboard needs from the source table. Names are matched
/// against the file header exactly (see `loader` for the fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    FirmName,
    Year,
    IndustryAffected,
    AiUsedForAuditing,
    TotalAuditEngagements,
    ComplianceViolations,
    FraudCasesDetected,
    EmployeeWorkload,
    TotalRevenueImpact,
    HighRiskCases,
    AuditEffectivenessScore,
}

impl Column {
    pub const COUNT: usize = 11;

    pub const ALL: [Column; Column::COUNT] = [
        Column::FirmName,
        Column::Year,
        Column::IndustryAffected,
        Column::AiUsedForAuditing,
        Column::TotalAuditEngagements,
        Column::ComplianceViolations,
        Column::FraudCasesDetected,
        Column::EmployeeWorkload,
        Column::TotalRevenueImpact,
        Column::HighRiskCases,
        Column::AuditEffectivenessScore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::FirmName => "Firm_Name",
            Column::Year => "Year",
            Column::IndustryAffected => "Industry_Affected",
            Column::AiUsedForAuditing => "AI_Used_for_Auditing",
            Column::TotalAuditEngagements => "Total_Audit_Engagements",
            Column::ComplianceViolations => "Compliance_Violations",
            Column::FraudCasesDetected => "Fraud_Cases_Detected",
            Column::EmployeeWorkload => "Employee_Workload",
            Column::TotalRevenueImpact => "Total_Revenue_Impact",
            Column::HighRiskCases => "High_Risk_Cases",
            Column::AuditEffectivenessScore => "Audit_Effectiveness_Score",
        }
    }

    /// Position of this column inside [`Column::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Dimension / Measure – what can be filtered, grouped and reduced
// ---------------------------------------------------------------------------

/// The four categorical fields. They back both the sidebar filters and the
/// group keys of every chart query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dimension {
    #[serde(rename = "Firm_Name")]
    FirmName,
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "Industry_Affected")]
    IndustryAffected,
    #[serde(rename = "AI_Used_for_Auditing")]
    AiUsedForAuditing,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::FirmName,
        Dimension::Year,
        Dimension::IndustryAffected,
        Dimension::AiUsedForAuditing,
    ];

    pub fn column(self) -> Column {
        match self {
            Dimension::FirmName => Column::FirmName,
            Dimension::Year => Column::Year,
            Dimension::IndustryAffected => Column::IndustryAffected,
            Dimension::AiUsedForAuditing => Column::AiUsedForAuditing,
        }
    }

    /// Human-readable label for the sidebar.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::FirmName => "Firm Name",
            Dimension::Year => "Year",
            Dimension::IndustryAffected => "Industry Affected",
            Dimension::AiUsedForAuditing => "AI Used for Auditing",
        }
    }

    /// Whether groups on this dimension are ordered by value rather than by
    /// first occurrence.
    pub fn is_ordinal(self) -> bool {
        matches!(self, Dimension::Year)
    }
}

/// The numeric fields that can be summed or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Measure {
    #[serde(rename = "Total_Audit_Engagements")]
    TotalAuditEngagements,
    #[serde(rename = "Compliance_Violations")]
    ComplianceViolations,
    #[serde(rename = "Fraud_Cases_Detected")]
    FraudCasesDetected,
    #[serde(rename = "Employee_Workload")]
    EmployeeWorkload,
    #[serde(rename = "Total_Revenue_Impact")]
    TotalRevenueImpact,
    #[serde(rename = "High_Risk_Cases")]
    HighRiskCases,
    #[serde(rename = "Audit_Effectiveness_Score")]
    AuditEffectivenessScore,
}

impl Measure {
    pub fn column(self) -> Column {
        match self {
            Measure::TotalAuditEngagements => Column::TotalAuditEngagements,
            Measure::ComplianceViolations => Column::ComplianceViolations,
            Measure::FraudCasesDetected => Column::FraudCasesDetected,
            Measure::EmployeeWorkload => Column::EmployeeWorkload,
            Measure::TotalRevenueImpact => Column::TotalRevenueImpact,
            Measure::HighRiskCases => Column::HighRiskCases,
            Measure::AuditEffectivenessScore => Column::AuditEffectivenessScore,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::TotalAuditEngagements => "Total Audit Engagements",
            Measure::ComplianceViolations => "Compliance Violations",
            Measure::FraudCasesDetected => "Fraud Cases Detected",
            Measure::EmployeeWorkload => "Employee Workload",
            Measure::TotalRevenueImpact => "Total Revenue Impact",
            Measure::HighRiskCases => "High Risk Cases",
            Measure::AuditEffectivenessScore => "Audit Effectiveness Score",
        }
    }
}

// ---------------------------------------------------------------------------
// AuditRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One audit-engagement observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    #[serde(rename = "Firm_Name")]
    pub firm_name: String,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Industry_Affected")]
    pub industry_affected: String,
    #[serde(rename = "AI_Used_for_Auditing")]
    pub ai_used_for_auditing: String,
    #[serde(rename = "Total_Audit_Engagements")]
    pub total_audit_engagements: f64,
    #[serde(rename = "Compliance_Violations")]
    pub compliance_violations: f64,
    #[serde(rename = "Fraud_Cases_Detected")]
    pub fraud_cases_detected: f64,
    #[serde(rename = "Employee_Workload")]
    pub employee_workload: f64,
    #[serde(rename = "Total_Revenue_Impact")]
    pub total_revenue_impact: f64,
    #[serde(rename = "High_Risk_Cases")]
    pub high_risk_cases: f64,
    #[serde(rename = "Audit_Effectiveness_Score")]
    pub audit_effectiveness_score: f64,
}

impl AuditRecord {
    /// The categorical value of `dim` for this record.
    pub fn key(&self, dim: Dimension) -> FieldValue {
        match dim {
            Dimension::FirmName => FieldValue::Text(self.firm_name.clone()),
            Dimension::Year => FieldValue::Integer(self.year),
            Dimension::IndustryAffected => FieldValue::Text(self.industry_affected.clone()),
            Dimension::AiUsedForAuditing => FieldValue::Text(self.ai_used_for_auditing.clone()),
        }
    }

    /// The numeric value of `measure` for this record.
    pub fn value(&self, measure: Measure) -> f64 {
        match measure {
            Measure::TotalAuditEngagements => self.total_audit_engagements,
            Measure::ComplianceViolations => self.compliance_violations,
            Measure::FraudCasesDetected => self.fraud_cases_detected,
            Measure::EmployeeWorkload => self.employee_workload,
            Measure::TotalRevenueImpact => self.total_revenue_impact,
            Measure::HighRiskCases => self.high_risk_cases,
            Measure::AuditEffectivenessScore => self.audit_effectiveness_score,
        }
    }
}

// ---------------------------------------------------------------------------
// AuditDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with the distinct values of every dimension.
#[derive(Debug, Clone, Default)]
pub struct AuditDataset {
    /// All records, in file order.
    pub records: Vec<AuditRecord>,
    /// Distinct observed values per dimension: ascending for `Year`, first-seen
    /// order for the text dimensions.
    options: BTreeMap<Dimension, Vec<FieldValue>>,
}

impl AuditDataset {
    /// Build the per-dimension option lists from the loaded records.
    pub fn from_records(records: Vec<AuditRecord>) -> Self {
        let mut options: BTreeMap<Dimension, Vec<FieldValue>> = BTreeMap::new();

        for dim in Dimension::ALL {
            let mut seen: HashSet<FieldValue> = HashSet::new();
            let mut values = Vec::new();
            for rec in &records {
                let v = rec.key(dim);
                if seen.insert(v.clone()) {
                    values.push(v);
                }
            }
            if dim.is_ordinal() {
                values.sort();
            }
            options.insert(dim, values);
        }

        AuditDataset { records, options }
    }

    /// Distinct values observed for `dim`.
    pub fn options(&self, dim: Dimension) -> &[FieldValue] {
        self.options.get(&dim).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
