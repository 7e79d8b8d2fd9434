use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use big4_dashboard::data::model::{AuditRecord, Column};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Filtered records table (central panel, "Table" view)
// ---------------------------------------------------------------------------

pub fn records_table(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view records  (File → Open…)");
        });
        return;
    }

    let rows: Vec<&AuditRecord> = state.visible_records().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(TableColumn::auto(), Column::COUNT)
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for col in Column::ALL {
                header.col(|ui| {
                    ui.strong(col.name());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let rec = rows[row.index()];
                for col in Column::ALL {
                    row.col(|ui| {
                        ui.label(cell_text(rec, col));
                    });
                }
            });
        });
}

/// Display text of one cell; whole numbers without a decimal point.
pub fn cell_text(rec: &AuditRecord, col: Column) -> String {
    let number = |v: f64| {
        if v.fract() == 0.0 {
            format!("{v:.0}")
        } else {
            v.to_string()
        }
    };
    match col {
        Column::FirmName => rec.firm_name.clone(),
        Column::Year => rec.year.to_string(),
        Column::IndustryAffected => rec.industry_affected.clone(),
        Column::AiUsedForAuditing => rec.ai_used_for_auditing.clone(),
        Column::TotalAuditEngagements => number(rec.total_audit_engagements),
        Column::ComplianceViolations => number(rec.compliance_violations),
        Column::FraudCasesDetected => number(rec.fraud_cases_detected),
        Column::EmployeeWorkload => number(rec.employee_workload),
        Column::TotalRevenueImpact => number(rec.total_revenue_impact),
        Column::HighRiskCases => number(rec.high_risk_cases),
        Column::AuditEffectivenessScore => number(rec.audit_effectiveness_score),
    }
}
