//! chronogram CLI - weekly work chronogram generator
//!
//! Collects task hours from flags, a task file or interactive prompts,
//! packs them into fixed-capacity weeks and writes an Excel workbook plus a
//! CSV export.

mod config;
mod prompt;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use chronogram_core::{tasks_from_hours, MonthDay, Plan, Renderer, Task};
use chronogram_parser::{parse_activity_names, parse_file, parse_hours, parse_month_day, parse_year};
use chronogram_render::{CsvRenderer, ExcelRenderer, TextRenderer};
use chronogram_solver::{LabelingStrategy, Planner};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{load_config, ConfigFile};
use prompt::Prompter;

const DEFAULT_OUTPUT: &str = "chronogram.xlsx";
const DEFAULT_CSV_OUTPUT: &str = "chronogram.csv";

/// Stdout preview format
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text grid
    Text,
    /// Serialized plan
    Json,
    /// No preview
    None,
}

#[derive(Parser, Debug)]
#[command(name = "chronogram")]
#[command(author, version, about = "Weekly work chronogram generator", long_about = None)]
struct Cli {
    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Chart year (defaults to the current year)
    #[arg(long, value_parser = year_arg)]
    year: Option<i32>,

    /// First day of week 1 as MM/DD; weeks are numbered when omitted
    #[arg(long, value_name = "MM/DD", value_parser = month_day_arg)]
    start: Option<MonthDay>,

    /// Task hours, comma or space separated
    #[arg(long, value_name = "LIST", value_parser = hours_arg, conflicts_with = "tasks_file")]
    hours: Option<HoursList>,

    /// Activity names, comma separated, matched to tasks by position
    #[arg(long, value_name = "LIST", requires = "hours")]
    activities: Option<String>,

    /// Read tasks from a file with one `<hours> [activity]` per line
    #[arg(long, value_name = "PATH")]
    tasks_file: Option<PathBuf>,

    /// Workbook path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// CSV export path
    #[arg(long, value_name = "PATH", conflicts_with = "no_csv")]
    csv: Option<PathBuf>,

    /// Skip the CSV export
    #[arg(long)]
    no_csv: bool,

    /// Hours per week
    #[arg(long, value_name = "HOURS")]
    capacity: Option<u32>,

    /// Empty week columns after the last populated one
    #[arg(long, value_name = "N")]
    spare_weeks: Option<usize>,

    /// Stdout preview format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Config file (defaults to ./chronogram.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Never prompt; run with whatever the flags provide
    #[arg(long)]
    no_input: bool,
}

fn year_arg(s: &str) -> Result<i32, String> {
    match parse_year(s) {
        Ok(Some(year)) => Ok(year),
        Ok(None) => Err("year must not be empty".into()),
        Err(e) => Err(e.to_string()),
    }
}

fn month_day_arg(s: &str) -> Result<MonthDay, String> {
    parse_month_day(s).map_err(|e| e.to_string())
}

/// Parsed `--hours` value, kept whole so clap treats it as one argument
#[derive(Clone, Debug)]
struct HoursList(Vec<u32>);

fn hours_arg(s: &str) -> Result<HoursList, String> {
    parse_hours(s).map(HoursList).map_err(|e| e.to_string())
}

/// Everything the pipeline needs after merging flags, config and prompts
#[derive(Debug, PartialEq)]
struct Settings {
    year: i32,
    start: Option<MonthDay>,
    tasks: Vec<Task>,
    capacity: Option<u32>,
    spare_weeks: usize,
    output: PathBuf,
    csv_output: Option<PathBuf>,
    format: OutputFormat,
}

/// Merge settings. Flags win over the config file, which wins over defaults.
///
/// Prompts run only when no tasks were given on the command line and
/// `--no-input` is not set; `--year` and `--start` given alongside are not
/// asked again.
fn resolve<R: BufRead, W: Write>(
    cli: Cli,
    config: ConfigFile,
    prompter: &mut Prompter<R, W>,
    current_year: i32,
) -> Result<Settings> {
    let mut year = cli.year;
    let mut start = cli.start;

    let tasks = if let Some(path) = &cli.tasks_file {
        parse_file(path).with_context(|| format!("failed to read tasks from {}", path.display()))?
    } else if let Some(HoursList(hours)) = &cli.hours {
        let names = cli
            .activities
            .as_deref()
            .map(parse_activity_names)
            .unwrap_or_default();
        tasks_from_hours(hours, &names)
    } else if cli.no_input {
        Vec::new()
    } else {
        let answers = prompter.collect(year, start, current_year)?;
        year = answers.year;
        start = answers.start;
        tasks_from_hours(&answers.hours, &answers.activities)
    };

    let csv_output = if cli.no_csv {
        None
    } else {
        Some(
            cli.csv
                .or(config.csv_output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_OUTPUT)),
        )
    };

    Ok(Settings {
        year: year.unwrap_or(current_year),
        start,
        tasks,
        capacity: cli.capacity.or(config.capacity),
        spare_weeks: cli.spare_weeks.or(config.spare_weeks).unwrap_or(0),
        output: cli
            .output
            .or(config.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        csv_output,
        format: cli.format.or(config.format).unwrap_or(OutputFormat::Text),
    })
}

fn build_plan(settings: &Settings) -> Result<Plan> {
    let start = LabelingStrategy::from_month_day(settings.start, settings.year)?.start_date();

    let mut planner = Planner::new().spare_weeks(settings.spare_weeks);
    if let Some(capacity) = settings.capacity {
        planner = planner.capacity(capacity);
    }
    Ok(planner.plan(settings.tasks.clone(), settings.year, start)?)
}

/// Write the workbook and CSV, then the stdout preview.
/// Status lines go to `status` so the preview stays machine-readable.
fn write_outputs(
    plan: &Plan,
    settings: &Settings,
    out: &mut impl Write,
    status: &mut impl Write,
) -> Result<()> {
    ExcelRenderer::new()
        .save(plan, &settings.output)
        .with_context(|| format!("failed to write workbook {}", settings.output.display()))?;
    info!(path = %settings.output.display(), "Wrote workbook");
    writeln!(status, "Created: {}", settings.output.display())?;

    if let Some(path) = &settings.csv_output {
        let csv = CsvRenderer::new().render(plan)?;
        std::fs::write(path, csv)
            .with_context(|| format!("failed to write CSV {}", path.display()))?;
        info!(path = %path.display(), "Wrote CSV");
        writeln!(status, "Created: {}", path.display())?;
    }

    match settings.format {
        OutputFormat::Text => write!(out, "{}", TextRenderer::new().render(plan)?)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(plan)?)?,
        OutputFormat::None => {}
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let current_year = Local::now().year();

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stderr());
    let settings = resolve(cli, config, &mut prompter, current_year)?;
    debug!(?settings, "Resolved settings");

    let plan = build_plan(&settings)?;
    info!(
        tasks = plan.tasks.len(),
        weeks = plan.chronogram.week_count(),
        year = plan.year,
        "Built chronogram"
    );

    write_outputs(&plan, &settings, &mut io::stdout().lock(), &mut io::stderr())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chronogram").chain(args.iter().copied())).unwrap()
    }

    fn resolve_with(args: &[&str], config: ConfigFile, input: &str) -> Result<Settings> {
        let mut prompter = Prompter::new(Cursor::new(input.to_string()), Vec::new());
        resolve(cli(args), config, &mut prompter, 2024)
    }

    #[test]
    fn defaults_without_config() {
        let settings = resolve_with(&["--hours", "50,30", "--activities", "A, B"], ConfigFile::default(), "")
            .unwrap();
        assert_eq!(
            settings,
            Settings {
                year: 2024,
                start: None,
                tasks: tasks_from_hours(&[50, 30], &["A".to_string(), "B".to_string()]),
                capacity: None,
                spare_weeks: 0,
                output: PathBuf::from(DEFAULT_OUTPUT),
                csv_output: Some(PathBuf::from(DEFAULT_CSV_OUTPUT)),
                format: OutputFormat::Text,
            }
        );
    }

    #[test]
    fn flags_override_config() {
        let config = ConfigFile {
            capacity: Some(30),
            spare_weeks: Some(2),
            output: Some(PathBuf::from("cfg.xlsx")),
            csv_output: Some(PathBuf::from("cfg.csv")),
            format: Some(OutputFormat::Json),
        };
        let settings = resolve_with(
            &["--hours", "10", "--capacity", "20", "-o", "flag.xlsx", "--format", "none"],
            config,
            "",
        )
        .unwrap();

        assert_eq!(settings.capacity, Some(20));
        assert_eq!(settings.spare_weeks, 2);
        assert_eq!(settings.output, PathBuf::from("flag.xlsx"));
        assert_eq!(settings.csv_output, Some(PathBuf::from("cfg.csv")));
        assert_eq!(settings.format, OutputFormat::None);
    }

    #[test]
    fn no_csv_drops_export() {
        let settings = resolve_with(&["--hours", "10", "--no-csv"], ConfigFile::default(), "").unwrap();
        assert_eq!(settings.csv_output, None);
    }

    #[test]
    fn no_input_yields_empty_task_list() {
        let settings = resolve_with(&["--no-input", "--year", "2025"], ConfigFile::default(), "").unwrap();
        assert!(settings.tasks.is_empty());
        assert_eq!(settings.year, 2025);
    }

    #[test]
    fn prompts_fill_missing_values() {
        let settings =
            resolve_with(&[], ConfigFile::default(), "2023\n01/02\n40 8\nPlan\n").unwrap();
        assert_eq!(settings.year, 2023);
        assert_eq!(settings.start, MonthDay::new(1, 2));
        assert_eq!(settings.tasks, tasks_from_hours(&[40, 8], &["Plan".to_string()]));
    }

    #[test]
    fn year_flag_skips_year_question() {
        let settings =
            resolve_with(&["--year", "2030"], ConfigFile::default(), "\n5\n\n").unwrap();
        assert_eq!(settings.year, 2030);
        assert_eq!(settings.start, None);
        assert_eq!(settings.tasks, tasks_from_hours(&[5], &[]));
    }

    #[test]
    fn leap_day_answer_checked_against_year_flag() {
        let settings = resolve_with(
            &["--year", "2025"],
            ConfigFile::default(),
            "02/29\n03/03\n10\n\n",
        )
        .unwrap();
        assert_eq!(settings.year, 2025);
        assert_eq!(settings.start, MonthDay::new(3, 3));

        let plan = build_plan(&settings).unwrap();
        assert_eq!(plan.week_labels[0].to_string(), "03/Mar - 09/Mar");
    }

    #[test]
    fn task_file_conflicts_with_hours() {
        let parsed = Cli::try_parse_from(["chronogram", "--hours", "1", "--tasks-file", "t.txt"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn bad_flag_values_rejected() {
        assert!(Cli::try_parse_from(["chronogram", "--start", "2024-01-01"]).is_err());
        assert!(Cli::try_parse_from(["chronogram", "--hours", "10,x"]).is_err());
        assert!(Cli::try_parse_from(["chronogram", "--year", "0"]).is_err());
    }

    #[test]
    fn start_missing_from_year_is_an_error() {
        let settings = resolve_with(
            &["--hours", "10", "--year", "2025", "--start", "02/29"],
            ConfigFile::default(),
            "",
        )
        .unwrap();
        let err = build_plan(&settings).unwrap_err();
        assert!(err.to_string().contains("Invalid start date"));
    }

    #[test]
    fn plan_uses_capacity_and_spare_weeks() {
        let settings = resolve_with(
            &["--hours", "30,30", "--capacity", "20", "--spare-weeks", "1"],
            ConfigFile::default(),
            "",
        )
        .unwrap();
        let plan = build_plan(&settings).unwrap();
        assert_eq!(plan.chronogram.week_count(), 3);
        assert_eq!(plan.week_columns(), 4);
    }

    #[test]
    fn outputs_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("out.xlsx");
        let csv = dir.path().join("out.csv");
        let settings = resolve_with(
            &[
                "--hours",
                "50",
                "-o",
                xlsx.to_str().unwrap(),
                "--csv",
                csv.to_str().unwrap(),
            ],
            ConfigFile::default(),
            "",
        )
        .unwrap();
        let plan = build_plan(&settings).unwrap();

        let mut out = Vec::new();
        let mut status = Vec::new();
        write_outputs(&plan, &settings, &mut out, &mut status).unwrap();

        assert!(xlsx.is_file());
        assert_eq!(
            std::fs::read_to_string(&csv).unwrap(),
            "Task,Activity,Start Date,End Date,Week 1,Week 2\n1,,,,X,X\n"
        );
        let status = String::from_utf8(status).unwrap();
        assert!(status.contains("Created:"));
        assert!(String::from_utf8(out).unwrap().contains("Week 2"));
    }
}
