//! Fixed-grid compliance report layout
//!
//! The layout is surface-agnostic: it carries positions, texts and colors
//! and never draws anything itself. The terminal table and the exported
//! workbook both consume the same `ComplianceReport`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::format::{format_kg, format_percent, format_ratio};
use crate::service::{
    AdvisoryKind, AdvisoryValue, ComplianceResult, Evaluation, Metric, TbmLimitSource,
};

/// Metric cells per grid row.
pub const GRID_COLUMNS: u16 = 3;

pub const LEGEND: [(&str, &str); 6] = [
    ("GVM", "Gross Vehicle Mass: maximum laden mass of the tow vehicle alone"),
    ("TBM", "Tow-Ball Mass: downward load the coupling puts on the tow vehicle"),
    ("GTM", "Gross Trailer Mass: caravan mass on its own wheels while coupled"),
    ("ATM", "Aggregate Trailer Mass: caravan mass including the tow-ball load"),
    ("GCM", "Gross Combination Mass: maximum mass of vehicle and caravan together"),
    ("BTC", "Braked Towing Capacity: maximum braked trailer mass the vehicle may tow"),
];

pub const DISCLAIMER: [&str; 3] = [
    "This report is advisory only and is based on the weights recorded at the time of weighing.",
    "It is not a certificate for registration, licensing or insurance purposes.",
    "Resolve any overloading shown above before driving.",
];

/// Header metadata, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    pub report_id: String,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
}

impl ReportHeader {
    /// Pick header metadata off a weigh record.
    ///
    /// `fallback_id` is used when the record carries no `id`, `now` when it
    /// carries no parseable `createdAt`.
    pub fn from_record(raw: &Value, fallback_id: &str, now: DateTime<Utc>) -> Self {
        let field = |names: &[&str]| -> Option<String> {
            names.iter().find_map(|name| match raw.get(*name)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        };

        let customer_name = field(&["customerName", "customer_name"])
            .or_else(|| {
                raw.pointer("/customer/name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let created_at = field(&["createdAt", "created_at"])
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        Self {
            report_id: field(&["id", "reportId", "report_id"])
                .unwrap_or_else(|| fallback_id.to_string()),
            created_at,
            customer_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "OVER")]
    Over,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl CellStatus {
    pub fn text(&self) -> &'static str {
        match self {
            CellStatus::Ok => "OK",
            CellStatus::Over => "OVER",
            CellStatus::NotApplicable => "N/A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Success,
    Failure,
    /// Advisory figure outside its ideal band
    Caution,
    Neutral,
}

impl ColorClass {
    /// Class name for the on-screen chip.
    pub fn css_class(&self) -> &'static str {
        match self {
            ColorClass::Success => "status-ok",
            ColorClass::Failure => "status-over",
            ColorClass::Caution => "status-caution",
            ColorClass::Neutral => "status-na",
        }
    }

    /// 0xRRGGBB fill for document cells.
    pub fn rgb(&self) -> u32 {
        match self {
            ColorClass::Success => 0x16A34A,
            ColorClass::Failure => 0xDC2626,
            ColorClass::Caution => 0xD97706,
            ColorClass::Neutral => 0x6B7280,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: u16,
    pub column: u16,
}

impl GridPosition {
    fn at(index: usize, first_row: u16) -> Self {
        let index = index as u16;
        Self {
            row: first_row + index / GRID_COLUMNS,
            column: index % GRID_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCell {
    pub metric: Metric,
    pub label: String,
    pub description: String,
    pub position: GridPosition,
    pub measured_or_limit_text: String,
    pub actual_text: String,
    pub result_delta_text: String,
    pub status: CellStatus,
    pub color: ColorClass,
    /// Class name of the on-screen chip for `color`
    pub chip_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryCell {
    pub kind: AdvisoryKind,
    pub label: String,
    pub position: GridPosition,
    pub value_text: String,
    pub band_text: String,
    pub ideal: bool,
    pub color: ColorClass,
    pub chip_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub abbreviation: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub header: ReportHeader,
    pub vehicle_label: String,
    pub caravan_label: String,
    pub overall_compliant: bool,
    pub verdict_text: String,
    pub cells: Vec<ReportCell>,
    pub advisory_cells: Vec<AdvisoryCell>,
    pub legend: Vec<LegendEntry>,
    pub disclaimer: Vec<String>,
}

impl ComplianceReport {
    /// Number of grid rows used by metric and advisory cells.
    pub fn grid_rows(&self) -> u16 {
        self.cells
            .iter()
            .map(|c| c.position.row)
            .chain(self.advisory_cells.iter().map(|c| c.position.row))
            .max()
            .map_or(0, |row| row + 1)
    }
}

pub fn build_report(header: ReportHeader, evaluation: &Evaluation) -> ComplianceReport {
    let compliance = &evaluation.compliance;

    let cells: Vec<ReportCell> = compliance
        .results()
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            metric_cell(result, GridPosition::at(index, 0), evaluation)
        })
        .collect();

    let advisory_first_row = cells.last().map_or(0, |c| c.position.row + 1);
    let advisory_cells = evaluation
        .advisory
        .entries()
        .into_iter()
        .enumerate()
        .map(|(index, (kind, value))| {
            advisory_cell(kind, value, GridPosition::at(index, advisory_first_row), evaluation)
        })
        .collect();

    let verdict_text = if compliance.overall_compliant {
        "COMPLIANT: all rated limits are within capacity".to_string()
    } else {
        let over: Vec<&str> = compliance.failing().iter().map(|r| r.metric.label()).collect();
        format!("NON-COMPLIANT: over {}", over.join(", "))
    };

    ComplianceReport {
        header,
        vehicle_label: evaluation.vehicle.display_name(),
        caravan_label: evaluation.caravan.display_name(),
        overall_compliant: compliance.overall_compliant,
        verdict_text,
        cells,
        advisory_cells,
        legend: LEGEND
            .iter()
            .map(|(abbreviation, definition)| LegendEntry {
                abbreviation: abbreviation.to_string(),
                definition: definition.to_string(),
            })
            .collect(),
        disclaimer: DISCLAIMER.iter().map(|line| line.to_string()).collect(),
    }
}

fn metric_cell(result: &ComplianceResult, position: GridPosition, evaluation: &Evaluation) -> ReportCell {
    let (status, color) = match (result.limit, result.compliant) {
        (None, _) => (CellStatus::NotApplicable, ColorClass::Neutral),
        (Some(_), true) => (CellStatus::Ok, ColorClass::Success),
        (Some(_), false) => (CellStatus::Over, ColorClass::Failure),
    };

    let measured_or_limit_text = match result.limit {
        Some(limit) => {
            let fallback = result.metric == Metric::Tbm
                && evaluation.compliance.vehicle.tbm_source == TbmLimitSource::AtmFallback;
            if fallback {
                format!(
                    "Limit {} ({} of ATM)",
                    format_kg(limit),
                    format_percent(evaluation.rules.tbm_fallback_ratio)
                )
            } else {
                format!("Limit {}", format_kg(limit))
            }
        }
        None => "No rating supplied".to_string(),
    };

    let result_delta_text = match (result.headroom(), result.percentage) {
        (Some(headroom), Some(pct)) if headroom >= 0.0 => {
            format!("{} under ({}%)", format_kg(headroom), pct)
        }
        (Some(headroom), Some(pct)) => format!("{} over ({}%)", format_kg(-headroom), pct),
        _ => "N/A".to_string(),
    };

    ReportCell {
        metric: result.metric,
        label: result.name.clone(),
        description: result.metric.description().to_string(),
        position,
        measured_or_limit_text,
        actual_text: format_kg(result.actual),
        result_delta_text,
        status,
        color,
        chip_class: color.css_class().to_string(),
    }
}

fn advisory_cell(
    kind: AdvisoryKind,
    value: AdvisoryValue,
    position: GridPosition,
    evaluation: &Evaluation,
) -> AdvisoryCell {
    let value_text = match (value.applicable, kind.is_ratio()) {
        (false, _) => "N/A".to_string(),
        (true, true) => format_ratio(value.value),
        (true, false) => format_kg(value.value),
    };
    let color = match (value.applicable, value.ideal) {
        (false, _) => ColorClass::Neutral,
        (true, true) => ColorClass::Success,
        (true, false) => ColorClass::Caution,
    };
    AdvisoryCell {
        kind,
        label: kind.label().to_string(),
        position,
        value_text,
        band_text: kind.band_text(&evaluation.rules),
        ideal: value.ideal,
        color,
        chip_class: color.css_class().to_string(),
    }
}

/// Document name for an exported report: `weigh-report-<id>.<ext>`.
///
/// Characters outside `[A-Za-z0-9_-]` in the id are replaced with `_`.
pub fn document_file_name(report_id: &str, ext: &str) -> String {
    let id: String = report_id
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let id = if id.is_empty() { "unnamed".to_string() } else { id };
    format!("weigh-report-{}.{}", id, ext.trim_start_matches('.'))
}
