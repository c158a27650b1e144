//! Compliance report layout and rendering

pub mod format;
pub mod layout;
pub mod text;

pub use layout::{
    build_report, document_file_name, AdvisoryCell, CellStatus, ColorClass, ComplianceReport,
    GridPosition, LegendEntry, ReportCell, ReportHeader, DISCLAIMER, GRID_COLUMNS, LEGEND,
};
pub use text::render_text;
