//! Fixed-width text rendering of a compliance report

use super::layout::{ComplianceReport, ReportCell};

const WIDTH: usize = 78;

pub fn render_text(report: &ComplianceReport) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(WIDTH));
    out.push('\n');
    out.push_str(&center("Towing Compliance Report"));
    out.push_str(&"=".repeat(WIDTH));
    out.push_str("\n\n");

    out.push_str(&format!("  Report:    {}\n", report.header.report_id));
    out.push_str(&format!(
        "  Created:   {}\n",
        report.header.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str(&format!("  Customer:  {}\n", report.header.customer_name));
    out.push_str(&format!("  Vehicle:   {}\n", report.vehicle_label));
    out.push_str(&format!("  Caravan:   {}\n\n", report.caravan_label));

    out.push_str(&format!("[{}]\n\n", report.verdict_text));

    out.push_str("Compliance\n");
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "{:<11} {:<26} {:>10} {:<22} {:>5}\n",
        "Metric", "Limit", "Actual", "Result", "Status"
    ));
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
    for cell in &report.cells {
        out.push_str(&metric_row(cell));
    }
    out.push('\n');

    out.push_str("Advisory (not part of the compliance result)\n");
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
    for cell in &report.advisory_cells {
        let marker = if cell.ideal { "ideal" } else { "" };
        out.push_str(&format!(
            "{:<24} {:>10}   {:<28} {}\n",
            cell.label, cell.value_text, cell.band_text, marker
        ));
    }
    out.push('\n');

    out.push_str("Legend\n");
    for entry in &report.legend {
        out.push_str(&format!("  {:<4} {}\n", entry.abbreviation, entry.definition));
    }
    out.push('\n');

    for line in &report.disclaimer {
        out.push_str(&format!("  * {}\n", line));
    }
    out.push_str(&"=".repeat(WIDTH));
    out.push('\n');
    out
}

fn metric_row(cell: &ReportCell) -> String {
    format!(
        "{:<11} {:<26} {:>10} {:<22} {:>5}\n",
        truncate_str(&cell.label, 11),
        truncate_str(&cell.measured_or_limit_text, 26),
        cell.actual_text,
        truncate_str(&cell.result_delta_text, 22),
        cell.status.text()
    )
}

fn center(title: &str) -> String {
    let pad = WIDTH.saturating_sub(title.chars().count()) / 2;
    format!("{}{}\n", " ".repeat(pad), title)
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CaravanSpec, VehicleSpec, WeighMeasurement};
    use crate::report::{build_report, ReportHeader};
    use crate::service::{evaluate, ComplianceRules};
    use chrono::{TimeZone, Utc};

    fn report() -> ComplianceReport {
        let evaluation = evaluate(
            VehicleSpec {
                gvm: Some(3000.0),
                gcm: Some(6000.0),
                ..Default::default()
            },
            CaravanSpec {
                atm: Some(2200.0),
                gtm: Some(1800.0),
                ..Default::default()
            },
            WeighMeasurement {
                vehicle_weight_unhitched: 2900.0,
                tow_ball_weight: 150.0,
                caravan_weight: 1900.0,
                ..Default::default()
            },
            &ComplianceRules::default(),
        );
        build_report(
            ReportHeader {
                report_id: "W-7".to_string(),
                created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 0).unwrap(),
                customer_name: "Alex Moore".to_string(),
            },
            &evaluation,
        )
    }

    #[test]
    fn test_render_contains_sections() {
        let text = render_text(&report());
        assert!(text.contains("Towing Compliance Report"));
        assert!(text.contains("Report:    W-7"));
        assert!(text.contains("2026-01-02 03:04 UTC"));
        assert!(text.contains("NON-COMPLIANT: over GTM"));
        assert!(text.contains("OVER"));
        assert!(text.contains("Legend"));
        assert!(text.contains("advisory only"));
    }

    #[test]
    fn test_one_row_per_metric() {
        let report = report();
        let text = render_text(&report);
        for cell in &report.cells {
            assert!(text.lines().any(|l| l.starts_with(&cell.label)));
        }
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a much longer label", 8), "a much..");
    }
}
