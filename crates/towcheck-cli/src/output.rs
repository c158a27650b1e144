//! Output formatting module

use serde_json::json;
use towcheck_app::batch::BatchSummary;
use towcheck_domain::{render_text, ComplianceReport, Evaluation};
use towcheck_types::{OutputFormat, Result};

pub fn output_report(
    output_format: OutputFormat,
    evaluation: &Evaluation,
    report: &ComplianceReport,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&json!({
            "evaluation": evaluation,
            "report": report,
        }))?;
        println!("{}", content);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

pub fn output_batch(output_format: OutputFormat, summary: &BatchSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("{}", summary.display());
    println!("{:<20} {:<16} {}", "Record", "Result", "Detail");
    println!("{}", "-".repeat(70));
    for entry in &summary.entries {
        let (result, detail) = match &entry.outcome {
            Ok(e) if e.compliance.overall_compliant => ("COMPLIANT", String::new()),
            Ok(e) => {
                let over: Vec<&str> = e.compliance.failing().iter().map(|r| r.metric.label()).collect();
                ("NON-COMPLIANT", format!("over {}", over.join(", ")))
            }
            Err(err) => ("FAILED", err.to_string()),
        };
        println!("{:<20} {:<16} {}", entry.header.report_id, result, detail);
    }
    Ok(())
}
