//! Command implementations for the table flattener CLI
//!
//! This module contains the command execution logic, progress reporting
//! and summary output for the CLI interface.

use crate::app::adapters::filesystem::LocalFileSystem;
use crate::app::models::{Dimension, Table};
use crate::app::services::converter::Converter;
use crate::app::services::date_range::{date_range, parse_slashed};
use crate::app::services::path_pattern::DatePathTemplate;
use crate::app::services::table_aggregator::AggregateStats;
use crate::cli::args::{Args, Commands, ConvertArgs, OutputFormat, PatternArgs};
use crate::config::{EndDate, GlobalConfig, normalize_date};
use crate::constants::{LOG_TARGET, YESTERDAY_TOKEN};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Per-table line of the conversion summary
#[derive(Debug, Clone, serde::Serialize)]
pub struct TableSummary {
    pub name: String,
    #[serde(flatten)]
    pub stats: AggregateStats,
    pub distinct_columns: usize,
    pub distinct_rows: usize,
}

/// Outcome of a conversion run for reporting
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub tables: Vec<TableSummary>,
    pub processing_time: Duration,
}

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Convert(convert)) => run_convert(&convert).map(|_| ()),
        Some(Commands::Pattern(pattern)) => run_pattern(&pattern),
        None => Ok(()),
    }
}

/// Convert the configured tables and write them as JSON
///
/// 1. Set up logging and validate arguments
/// 2. Load and validate the configuration
/// 3. Build every enabled table with progress reporting
/// 4. Write the tables and report a summary
pub fn run_convert(args: &ConvertArgs) -> Result<ConversionReport> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet);
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config_path = args.resolve_config_file()?;
    let config = load_configuration(&config_path)?;

    let converter = Converter::new(LocalFileSystem);
    let dates = converter.dates(&config)?;
    let enabled: Vec<_> = config.enabled_tables().collect();
    info!(
        "Converting {} of {} tables over {} days",
        enabled.len(),
        config.tables.len(),
        dates.len()
    );

    let progress_bar = if args.show_progress() {
        let pb = ProgressBar::new(enabled.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut tables = Vec::with_capacity(enabled.len());
    let mut report = ConversionReport {
        first_date: dates.first().cloned(),
        last_date: dates.last().cloned(),
        ..Default::default()
    };

    for table_config in enabled {
        if let Some(pb) = &progress_bar {
            pb.set_message(format!("Processing {}", table_config.table_name));
        }

        let result = converter
            .convert_table(table_config, &dates)
            .with_context(|| format!("Failed to convert table '{}'", table_config.table_name))?;

        report.tables.push(summarize(&result.table, result.stats));
        tables.push(result.table);

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Conversion complete");
    }

    write_tables(&tables, args.output_path.as_deref(), args.pretty)?;

    report.processing_time = start_time.elapsed();
    if args.show_progress() {
        generate_final_report(args.summary_format, &report)?;
    }

    Ok(report)
}

/// Print the derived template and, for a date range, the resolved paths
pub fn run_pattern(args: &PatternArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false);

    let template = DatePathTemplate::derive(&args.example_path);
    println!("{} {}", "pattern:".bright_green().bold(), template);
    println!(
        "{} {}",
        "date slots:".bright_green().bold(),
        template.date_slots()
    );

    for date in pattern_dates(args, Local::now().date_naive())? {
        println!("{}  {}", date, template.instantiate(parse_slashed(&date)?));
    }
    Ok(())
}

/// Slashed dates requested with `--start`/`--end`; none without `--start`
fn pattern_dates(args: &PatternArgs, today: NaiveDate) -> Result<Vec<String>> {
    let Some(start) = &args.start else {
        return Ok(Vec::new());
    };
    let start = normalize_date(start, "--start")?;
    let end = match args.end.as_deref() {
        None => EndDate::Date(start.clone()),
        Some(end) if end.trim().eq_ignore_ascii_case(YESTERDAY_TOKEN) => EndDate::Yesterday,
        Some(end) => EndDate::Date(normalize_date(end, "--end")?),
    };

    Ok(date_range(&start, &end, today)?)
}

/// Set up structured logging on stderr
fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{LOG_TARGET}={log_level}")));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Read and validate the JSON configuration file
pub fn load_configuration(path: &Path) -> Result<GlobalConfig> {
    info!("Using config file: {}", path.display());

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    GlobalConfig::from_json_str(&text)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn write_tables(tables: &[Table], output: Option<&Path>, pretty: bool) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, tables)?;
    } else {
        serde_json::to_writer(&mut writer, tables)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = output {
        info!("Wrote {} tables to {}", tables.len(), path.display());
    }
    Ok(())
}

fn summarize(table: &Table, stats: AggregateStats) -> TableSummary {
    TableSummary {
        name: table.name.clone(),
        distinct_columns: table.meta.get(Dimension::Column).len(),
        distinct_rows: table.meta.get(Dimension::Row).len(),
        stats,
    }
}

fn generate_final_report(format: OutputFormat, report: &ConversionReport) -> Result<()> {
    match format {
        OutputFormat::Human => generate_human_report(report),
        OutputFormat::Json => generate_json_report(report),
    }
}

fn generate_human_report(report: &ConversionReport) -> Result<()> {
    let mut err = io::stderr().lock();

    writeln!(err, "\n{}", "Conversion Summary".bright_green().bold())?;
    if let (Some(first), Some(last)) = (&report.first_date, &report.last_date) {
        writeln!(err, "  Dates: {first} -- {last}")?;
    }
    for table in &report.tables {
        writeln!(
            err,
            "  {}: {} records from {} files ({} missing, {} skipped), {} columns x {} rows",
            table.name.bright_white().bold(),
            table.stats.records.to_string().bright_white().bold(),
            table.stats.files_found,
            table.stats.files_missing,
            table.stats.days_skipped,
            table.distinct_columns,
            table.distinct_rows
        )?;
    }
    writeln!(
        err,
        "  Processing time: {}",
        HumanDuration(report.processing_time)
    )?;
    Ok(())
}

fn json_report(report: &ConversionReport) -> serde_json::Value {
    serde_json::json!({
        "first_date": report.first_date,
        "last_date": report.last_date,
        "processing_time_seconds": report.processing_time.as_secs_f64(),
        "tables": report.tables,
    })
}

fn generate_json_report(report: &ConversionReport) -> Result<()> {
    let mut err = io::stderr().lock();
    serde_json::to_writer_pretty(&mut err, &json_report(report))?;
    writeln!(err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Record;
    use crate::Error;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn sample_tables() -> Vec<Table> {
        vec![
            Table::new(
                "T",
                vec![
                    Record::new("2", "1-B", "1-1", "20150312"),
                    Record::new("3", "2-C", "1-1", "20150312"),
                    Record::new("5", "1-B", "2-4", "20150313"),
                ],
            ),
            Table::new("empty", Vec::new()),
        ]
    }

    fn pattern_args(start: Option<&str>, end: Option<&str>) -> PatternArgs {
        PatternArgs {
            example_path: "/d/20150312/f.txt".to_string(),
            start: start.map(str::to_string),
            end: end.map(str::to_string),
            verbose: 0,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_configuration() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"start-date": "20150312", "tables": [{"table-name": "T", "file-pattern": "/d/20150312/f.txt", "enabled": true}]}"#,
        )
        .unwrap();

        let config = load_configuration(&path).unwrap();
        assert_eq!(config.start_date, "2015/03/12");
        assert_eq!(config.end_date, EndDate::Yesterday);
        assert_eq!(config.enabled_tables().count(), 1);
    }

    #[test]
    fn test_load_configuration_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = temp_dir.path().join("missing.json");
        let error = load_configuration(&missing).unwrap_err();
        assert!(error.downcast_ref::<std::io::Error>().is_some());

        let bad_json = temp_dir.path().join("bad.json");
        std::fs::write(&bad_json, "{ not json").unwrap();
        let error = load_configuration(&bad_json).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::Json { .. })
        ));

        let invalid = temp_dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{"tables": []}"#).unwrap();
        let error = load_configuration(&invalid).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::Configuration { .. })
        ));
        assert!(format!("{error:#}").contains("start-date"));
    }

    #[test]
    fn test_write_tables_compact_and_pretty() {
        let temp_dir = TempDir::new().unwrap();
        let tables = sample_tables();

        for pretty in [false, true] {
            let path = temp_dir.path().join(format!("out-{pretty}.json"));
            write_tables(&tables, Some(path.as_path()), pretty).unwrap();

            let text = std::fs::read_to_string(&path).unwrap();
            assert_eq!(text.lines().count() > 1, pretty);

            let written: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(written, serde_json::to_value(&tables).unwrap());
            assert_eq!(written[0]["data"][2], json!(["5", "1-B", "2-4", "20150313"]));
            assert_eq!(written[1], json!({"name": "empty", "data": [], "meta": {}}));
        }
    }

    #[test]
    fn test_summarize_counts_distinct_axes() {
        let tables = sample_tables();
        let stats = AggregateStats {
            dates: 2,
            files_found: 2,
            records: 3,
            ..Default::default()
        };

        let summary = summarize(&tables[0], stats.clone());
        assert_eq!(summary.name, "T");
        assert_eq!(summary.distinct_columns, 2);
        assert_eq!(summary.distinct_rows, 2);
        assert_eq!(summary.stats, stats);
    }

    #[test]
    fn test_json_report_shape() {
        let tables = sample_tables();
        let report = ConversionReport {
            first_date: Some("2015/03/12".to_string()),
            last_date: Some("2015/03/13".to_string()),
            tables: vec![summarize(
                &tables[0],
                AggregateStats {
                    dates: 2,
                    files_found: 1,
                    files_missing: 1,
                    rows: 2,
                    records: 3,
                    ..Default::default()
                },
            )],
            processing_time: Duration::from_millis(1500),
        };

        let json = json_report(&report);
        assert_eq!(json["first_date"], "2015/03/12");
        assert_eq!(json["last_date"], "2015/03/13");
        assert_eq!(json["processing_time_seconds"], 1.5);
        assert_eq!(
            json["tables"][0],
            json!({
                "name": "T",
                "dates": 2,
                "files_found": 1,
                "files_missing": 1,
                "days_skipped": 0,
                "rows": 2,
                "records": 3,
                "distinct_columns": 2,
                "distinct_rows": 2
            })
        );
    }

    #[test]
    fn test_pattern_dates_normalization() {
        let today = day(2015, 3, 14);

        assert!(pattern_dates(&pattern_args(None, None), today).unwrap().is_empty());
        assert_eq!(
            pattern_dates(&pattern_args(Some("20150312"), None), today).unwrap(),
            vec!["2015/03/12"]
        );
        assert_eq!(
            pattern_dates(&pattern_args(Some("20150310"), Some("2015/03/11")), today).unwrap(),
            vec!["2015/03/10", "2015/03/11"]
        );
        assert_eq!(
            pattern_dates(&pattern_args(Some("2015/03/11"), Some("Yesterday")), today).unwrap(),
            vec!["2015/03/11", "2015/03/12", "2015/03/13"]
        );
    }

    #[test]
    fn test_pattern_dates_errors() {
        let today = day(2015, 3, 14);

        let error = pattern_dates(&pattern_args(Some("12/03/2015"), None), today).unwrap_err();
        assert!(format!("{error:#}").contains("--start"));

        let error = pattern_dates(&pattern_args(Some("20150312"), Some("soon")), today).unwrap_err();
        assert!(format!("{error:#}").contains("--end"));

        let error = pattern_dates(&pattern_args(Some("20150230"), None), today).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::DateRange { .. })
        ));
    }
}
