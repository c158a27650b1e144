//! Excel export of compliance reports
//!
//! The workbook is drawn and serialized in memory first. Only a complete
//! document is written to disk, through a temporary file in the target
//! directory that is renamed into place; on any failure the temporary file
//! is removed and nothing named `weigh-report-*` appears.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use towcheck_domain::report::{
    document_file_name, AdvisoryCell, ColorClass, ComplianceReport, GridPosition, ReportCell,
};
use towcheck_types::{Error, ExportError, Result};
use tracing::{info, warn};

use crate::batch::BatchSummary;

/// Sheet rows above the grid: title, metadata and verdict.
const HEADER_ROWS: u32 = 8;
/// Sheet rows per grid row: five lines plus a spacer.
const BLOCK_ROWS: u32 = 6;
const COLUMN_WIDTH: f64 = 34.0;

fn xlsx(e: XlsxError) -> Error {
    ExportError::Drawing(e.to_string()).into()
}

/// Draw the report into an in-memory `.xlsx` document.
pub fn render_workbook(report: &ComplianceReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_report_sheet(sheet, report)?;

    workbook.save_to_buffer().map_err(xlsx)
}

/// Export a report as `weigh-report-<id>.xlsx` in `dir`.
pub fn export_report(report: &ComplianceReport, dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(ExportError::MissingDirectory(dir.display().to_string()).into());
    }

    let bytes = render_workbook(report)?;
    let path = dir.join(document_file_name(&report.header.report_id, "xlsx"));
    let write_error = |reason: String| ExportError::Write {
        path: path.display().to_string(),
        reason,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
    file.write_all(&bytes)
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| write_error(e.to_string()))?;
    file.persist(&path)
        .map_err(|e| write_error(e.error.to_string()))?;

    info!(path = %path.display(), report = %report.header.report_id, "exported report");
    Ok(path)
}

/// Export one document per evaluated batch entry. Failed records and failed
/// exports are reported per entry; the remaining entries are still exported.
pub fn export_batch(
    summary: &BatchSummary,
    dir: &Path,
) -> Vec<(usize, Result<PathBuf>)> {
    summary
        .entries
        .iter()
        .filter_map(|entry| {
            let evaluation = entry.outcome.as_ref().ok()?;
            let report = towcheck_domain::build_report(entry.header.clone(), evaluation);
            let result = export_report(&report, dir);
            if let Err(e) = &result {
                warn!(record = %entry.header.report_id, error = %e, "failed to export report");
            }
            Some((entry.index, result))
        })
        .collect()
}

fn write_report_sheet(sheet: &mut Worksheet, report: &ComplianceReport) -> Result<()> {
    sheet.set_name("Report").map_err(xlsx)?;

    let title_format = Format::new().set_bold().set_font_size(16);
    let bold = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Towing Compliance Report", &title_format)
        .map_err(xlsx)?;

    let metadata = [
        ("Report:", report.header.report_id.clone()),
        (
            "Created:",
            report.header.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        ("Customer:", report.header.customer_name.clone()),
        ("Vehicle:", report.vehicle_label.clone()),
        ("Caravan:", report.caravan_label.clone()),
    ];
    for (offset, (label, value)) in metadata.iter().enumerate() {
        let row = 1 + offset as u32;
        sheet.write_string_with_format(row, 0, *label, &bold).map_err(xlsx)?;
        sheet.write_string(row, 1, value).map_err(xlsx)?;
    }

    let verdict_color = if report.overall_compliant {
        ColorClass::Success
    } else {
        ColorClass::Failure
    };
    sheet
        .merge_range(6, 0, 6, 2, &report.verdict_text, &chip_format(verdict_color))
        .map_err(xlsx)?;

    for cell in &report.cells {
        write_metric_block(sheet, cell)?;
    }
    for cell in &report.advisory_cells {
        write_advisory_block(sheet, cell)?;
    }

    let mut row = HEADER_ROWS + u32::from(report.grid_rows()) * BLOCK_ROWS;
    sheet.write_string_with_format(row, 0, "Legend", &bold).map_err(xlsx)?;
    row += 1;
    for entry in &report.legend {
        sheet
            .write_string_with_format(row, 0, &entry.abbreviation, &bold)
            .map_err(xlsx)?;
        sheet.merge_range(row, 1, row, 2, &entry.definition, &Format::new()).map_err(xlsx)?;
        row += 1;
    }

    row += 1;
    let note = Format::new().set_italic().set_text_wrap();
    for line in &report.disclaimer {
        sheet.merge_range(row, 0, row, 2, line, &note).map_err(xlsx)?;
        row += 1;
    }

    for col in 0..3 {
        sheet.set_column_width(col, COLUMN_WIDTH).map_err(xlsx)?;
    }

    Ok(())
}

fn block_origin(position: GridPosition) -> (u32, u16) {
    (
        HEADER_ROWS + u32::from(position.row) * BLOCK_ROWS,
        position.column,
    )
}

fn write_metric_block(sheet: &mut Worksheet, cell: &ReportCell) -> Result<()> {
    let (row, col) = block_origin(cell.position);
    let boxed = Format::new().set_border(FormatBorder::Thin);

    sheet
        .write_string_with_format(row, col, format!("{} - {}", cell.label, cell.description), &boxed.clone().set_bold())
        .map_err(xlsx)?;
    sheet
        .write_string_with_format(row + 1, col, &cell.measured_or_limit_text, &boxed)
        .map_err(xlsx)?;
    sheet
        .write_string_with_format(row + 2, col, format!("Actual {}", cell.actual_text), &boxed)
        .map_err(xlsx)?;
    sheet
        .write_string_with_format(row + 3, col, &cell.result_delta_text, &boxed)
        .map_err(xlsx)?;
    sheet
        .write_string_with_format(row + 4, col, cell.status.text(), &chip_format(cell.color))
        .map_err(xlsx)?;
    Ok(())
}

fn write_advisory_block(sheet: &mut Worksheet, cell: &AdvisoryCell) -> Result<()> {
    let (row, col) = block_origin(cell.position);
    let boxed = Format::new().set_border(FormatBorder::Thin);

    sheet
        .write_string_with_format(row, col, format!("Advisory: {}", cell.label), &boxed.clone().set_bold())
        .map_err(xlsx)?;
    sheet
        .write_string_with_format(row + 1, col, &cell.value_text, &boxed)
        .map_err(xlsx)?;
    sheet
        .write_string_with_format(row + 2, col, &cell.band_text, &boxed)
        .map_err(xlsx)?;
    let marker = if cell.ideal { "IDEAL" } else { "CHECK" };
    sheet
        .write_string_with_format(row + 3, col, marker, &chip_format(cell.color))
        .map_err(xlsx)?;
    Ok(())
}

/// Same color the on-screen chip uses.
fn chip_format(color: ColorClass) -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(color.rgb()))
}
