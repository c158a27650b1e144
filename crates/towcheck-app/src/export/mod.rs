//! Report document export

pub mod excel;

pub use excel::{export_batch, export_report, render_workbook};
