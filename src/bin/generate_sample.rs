use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use big4_dashboard::data::loader::DEFAULT_DATASET_FILE;
use big4_dashboard::data::model::{AuditRecord, Column};

/// Write a deterministic synthetic Big 4 audit dataset.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version, about)]
struct Args {
    /// Output file; `.csv` or `.parquet`
    #[arg(default_value = DEFAULT_DATASET_FILE)]
    output: PathBuf,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Records generated per firm and year
    #[arg(long, default_value_t = 4)]
    per_year: usize,
}

const FIRMS: [&str; 4] = ["Deloitte", "PwC", "EY", "KPMG"];
const INDUSTRIES: [&str; 5] = ["Finance", "Healthcare", "Tech", "Retail", "Government"];
const YEARS: std::ops::RangeInclusive<i64> = 2020..=2025;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

fn generate(rng: &mut SimpleRng, per_year: usize) -> Vec<AuditRecord> {
    let mut records = Vec::new();
    for year in YEARS {
        // AI adoption grows over the years.
        let ai_share = 0.2 + 0.12 * (year - 2020) as f64;
        for firm in FIRMS {
            for _ in 0..per_year {
                let uses_ai = rng.next_f64() < ai_share;
                let ai_boost = if uses_ai { 1.0 } else { 0.0 };

                records.push(AuditRecord {
                    firm_name: firm.to_string(),
                    year,
                    industry_affected: rng.pick(&INDUSTRIES).to_string(),
                    ai_used_for_auditing: if uses_ai { "Yes" } else { "No" }.to_string(),
                    total_audit_engagements: rng.range(1000.0, 5000.0).round(),
                    compliance_violations: rng.range(10.0, 200.0).round(),
                    fraud_cases_detected: (rng.range(5.0, 100.0) + 10.0 * ai_boost).round(),
                    employee_workload: (rng.range(40.0, 90.0) - 5.0 * ai_boost).round(),
                    total_revenue_impact: round_to(rng.range(50.0, 500.0), 2),
                    high_risk_cases: rng.range(20.0, 300.0).round(),
                    audit_effectiveness_score: round_to(rng.range(5.0, 9.5) + 0.5 * ai_boost, 1),
                });
            }
        }
    }
    records
}

fn write_csv(path: &Path, records: &[AuditRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for rec in records {
        writer.serialize(rec).context("writing CSV record")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[AuditRecord]) -> Result<()> {
    let text = |f: fn(&AuditRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&AuditRecord) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = Vec::with_capacity(Column::COUNT);
    let mut arrays = Vec::with_capacity(Column::COUNT);
    for col in Column::ALL {
        let (dt, array) = match col {
            Column::FirmName => (DataType::Utf8, text(|r| r.firm_name.as_str())),
            Column::IndustryAffected => (DataType::Utf8, text(|r| r.industry_affected.as_str())),
            Column::AiUsedForAuditing => {
                (DataType::Utf8, text(|r| r.ai_used_for_auditing.as_str()))
            }
            Column::Year => {
                let years: ArrayRef =
                    Arc::new(Int64Array::from(records.iter().map(|r| r.year).collect::<Vec<_>>()));
                (DataType::Int64, years)
            }
            Column::TotalAuditEngagements => {
                (DataType::Float64, number(|r| r.total_audit_engagements))
            }
            Column::ComplianceViolations => {
                (DataType::Float64, number(|r| r.compliance_violations))
            }
            Column::FraudCasesDetected => (DataType::Float64, number(|r| r.fraud_cases_detected)),
            Column::EmployeeWorkload => (DataType::Float64, number(|r| r.employee_workload)),
            Column::TotalRevenueImpact => (DataType::Float64, number(|r| r.total_revenue_impact)),
            Column::HighRiskCases => (DataType::Float64, number(|r| r.high_risk_cases)),
            Column::AuditEffectivenessScore => {
                (DataType::Float64, number(|r| r.audit_effectiveness_score))
            }
        };
        fields.push(Field::new(col.name(), dt, false));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let records = generate(&mut rng, args.per_year);

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &records)?,
        "parquet" | "pq" => write_parquet(&args.output, &records)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} records to {}", records.len(), args.output.display());
    Ok(())
}
