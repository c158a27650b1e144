//! Command handlers

use crate::cli::{Cli, Commands, RecordArgs};
use crate::output::{output_batch, output_report};
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use towcheck_app::batch::evaluate_batch;
use towcheck_app::config::Config;
use towcheck_app::export::{export_batch, export_report};
use towcheck_domain::{build_report, evaluate_record, ComplianceReport, Evaluation, ReportHeader};
use towcheck_types::{Error, OutputFormat, Result};
use tracing::debug;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Check { record } => cmd_check(&config, &record, output_format),
        Commands::Export { record, output } => {
            let dir = output.unwrap_or_else(|| config.export_dir());
            cmd_export(&config, &record, &dir)
        }
        Commands::Batch {
            records,
            jobs,
            export,
        } => {
            // Use CLI jobs if specified, otherwise config value. 0 = auto CPU count.
            let job_count = jobs.unwrap_or(config.jobs);
            cmd_batch(&config, &records, job_count, export.as_deref(), output_format)
        }
        Commands::Config { show, init, set } => cmd_config(show, init, &set),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Weigh record with separately supplied vehicle/caravan records attached.
fn load_record(args: &RecordArgs) -> Result<Value> {
    let mut record = read_json(&args.record)?;
    for (key, path) in [("vehicle", &args.vehicle), ("caravan", &args.caravan)] {
        let Some(path) = path else { continue };
        let attached = read_json(path)?;
        let obj = record.as_object_mut().ok_or_else(|| {
            Error::InvalidInput(format!("{} is not a JSON object", args.record.display()))
        })?;
        obj.insert(key.to_string(), attached);
    }
    Ok(record)
}

fn prepare(config: &Config, args: &RecordArgs) -> Result<(Evaluation, ComplianceReport)> {
    let record = load_record(args)?;
    let fallback_id = args
        .record
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());

    let mut header = ReportHeader::from_record(&record, &fallback_id, Utc::now());
    if let Some(ref id) = args.report_id {
        header.report_id = id.clone();
    }
    if let Some(ref customer) = args.customer {
        header.customer_name = customer.clone();
    }

    let evaluation = evaluate_record(&record, &config.rules)?;
    debug!(
        record = %header.report_id,
        compliant = evaluation.compliance.overall_compliant,
        "evaluated record"
    );
    let report = build_report(header, &evaluation);
    Ok((evaluation, report))
}

fn cmd_check(config: &Config, args: &RecordArgs, output_format: OutputFormat) -> Result<()> {
    let (evaluation, report) = prepare(config, args)?;
    output_report(output_format, &evaluation, &report)
}

fn cmd_export(config: &Config, args: &RecordArgs, dir: &Path) -> Result<()> {
    let (_, report) = prepare(config, args)?;
    let path = export_report(&report, dir)?;
    println!("Report exported to: {}", path.display());
    Ok(())
}

fn cmd_batch(
    config: &Config,
    records: &Path,
    jobs: usize,
    export_dir: Option<&Path>,
    output_format: OutputFormat,
) -> Result<()> {
    let records = match read_json(records)? {
        Value::Array(items) => items,
        _ => {
            return Err(Error::InvalidInput(format!(
                "{} must contain a JSON array of records",
                records.display()
            )))
        }
    };

    let summary = evaluate_batch(&records, &config.rules, jobs);
    output_batch(output_format, &summary)?;

    if let Some(dir) = export_dir {
        let exported = export_batch(&summary, dir);
        let failed = exported.iter().filter(|(_, r)| r.is_err()).count();
        for (index, result) in &exported {
            match result {
                Ok(path) => eprintln!("Exported: {}", path.display()),
                Err(e) => eprintln!("Failed to generate report for record {}: {}", index + 1, e),
            }
        }
        eprintln!(
            "Exported {} of {} reports to {}",
            exported.len() - failed,
            exported.len(),
            dir.display()
        );
    }

    Ok(())
}

fn cmd_config(show: bool, init: bool, set: &[String]) -> Result<()> {
    if init {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = !set.is_empty();

    for pair in set {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::InvalidInput(format!("expected KEY=VALUE, got {}", pair)))?;
        config.set(key.trim(), value)?;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn record_args(record: PathBuf) -> RecordArgs {
        RecordArgs {
            record,
            vehicle: None,
            caravan: None,
            report_id: None,
            customer: None,
        }
    }

    #[test]
    fn test_separate_vehicle_and_caravan_files() {
        let dir = tempfile::tempdir().unwrap();
        let weigh = dir.path().join("w-9.json");
        let vehicle = dir.path().join("vehicle.json");
        let caravan = dir.path().join("caravan.json");
        std::fs::write(
            &weigh,
            json!({ "vehicleWeightUnhitched": 2900, "towBallWeight": 150, "caravanWeight": 1900 }).to_string(),
        )
        .unwrap();
        std::fs::write(&vehicle, json!({ "gvm": 3000, "gcm": 6000 }).to_string()).unwrap();
        std::fs::write(&caravan, json!({ "atm": 2200, "gtm": 1800 }).to_string()).unwrap();

        let args = RecordArgs {
            vehicle: Some(vehicle),
            caravan: Some(caravan),
            customer: Some("Kim".to_string()),
            ..record_args(weigh)
        };
        let (evaluation, report) = prepare(&Config::default(), &args).unwrap();
        assert!(!evaluation.compliance.overall_compliant);
        assert_eq!(report.header.report_id, "w-9");
        assert_eq!(report.header.customer_name, "Kim");
    }

    #[test]
    fn test_missing_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare(&Config::default(), &record_args(dir.path().join("none.json"))).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_malformed_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = prepare(&Config::default(), &record_args(path)).unwrap_err();
        assert!(matches!(err, Error::Record(_)));
    }

    #[test]
    fn test_export_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w-5.json");
        std::fs::write(
            &path,
            json!({ "id": "W-5", "vehicle": { "gvm": 3000 }, "vehicleWeightUnhitched": 2800 }).to_string(),
        )
        .unwrap();
        cmd_export(&Config::default(), &record_args(path), dir.path()).unwrap();
        assert!(dir.path().join("weigh-report-W-5.xlsx").exists());
    }
}
