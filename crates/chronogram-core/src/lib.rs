//! # chronogram-core
//!
//! Core domain model and traits for the chronogram weekly scheduler.
//!
//! This crate provides:
//! - Domain types: `Task`, `Chronogram`, `WeekLabel`, `MonthBand`, `TaskDateRange`, `Plan`
//! - Core trait: `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chronogram_core::{tasks_from_hours, Chronogram, Marker};
//!
//! let tasks = tasks_from_hours(&[50, 30], &["Design".to_string()]);
//! assert_eq!(tasks[0].name.as_deref(), Some("Design"));
//! assert_eq!(tasks[1].name, None);
//!
//! let chronogram = Chronogram::from_rows(vec![
//!     vec![Marker::Occupied, Marker::Occupied],
//!     vec![Marker::Empty, Marker::Occupied],
//! ]);
//! assert_eq!(chronogram.week_count(), 2);
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Workable hours in one calendar week
pub const DEFAULT_WEEK_CAPACITY: u32 = 40;

/// Widest header a plan may have: the worksheet column limit minus the
/// blank column A and the four task columns
pub const MAX_WEEK_COLUMNS: usize = 16_384 - 5;

/// Display format for week range endpoints (`01/Jan`)
pub const WEEK_DATE_FORMAT: &str = "%d/%b";

/// Display format for task start/end dates (`01/07`)
pub const TASK_DATE_FORMAT: &str = "%m/%d";

// ============================================================================
// Task
// ============================================================================

/// A unit of work with a total number of hours
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// 1-based position in the input list
    pub index: usize,
    /// Total hours to allocate
    pub hours: u32,
    /// Activity name, aligned by position
    pub name: Option<String>,
}

impl Task {
    pub fn new(index: usize, hours: u32) -> Self {
        Self {
            index,
            hours,
            name: None,
        }
    }

    /// Set the activity name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Build tasks from hour totals, pairing names by position.
///
/// Surplus names are dropped; tasks without a matching name stay unnamed.
pub fn tasks_from_hours(hours: &[u32], names: &[String]) -> Vec<Task> {
    hours
        .iter()
        .enumerate()
        .map(|(i, &h)| Task {
            index: i + 1,
            hours: h,
            name: names.get(i).cloned(),
        })
        .collect()
}

// ============================================================================
// Chronogram
// ============================================================================

/// Occupancy of one week column for one task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Occupied,
    #[default]
    Empty,
}

impl Marker {
    pub fn is_occupied(self) -> bool {
        self == Marker::Occupied
    }

    /// Single-character form used by flat exports
    pub fn as_char(self) -> char {
        match self {
            Marker::Occupied => 'X',
            Marker::Empty => '_',
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Task × week occupancy matrix. Every row has the same width.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chronogram {
    rows: Vec<Vec<Marker>>,
    week_count: usize,
}

impl Chronogram {
    /// Build from possibly ragged rows, padding each with `Empty` to the widest.
    pub fn from_rows(mut rows: Vec<Vec<Marker>>) -> Self {
        let week_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(week_count, Marker::Empty);
        }
        Self { rows, week_count }
    }

    pub fn rows(&self) -> &[Vec<Marker>] {
        &self.rows
    }

    pub fn row(&self, task: usize) -> Option<&[Marker]> {
        self.rows.get(task).map(Vec::as_slice)
    }

    /// Number of week columns
    pub fn week_count(&self) -> usize {
        self.week_count
    }

    pub fn task_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last occupied column of a row
    pub fn occupied_span(&self, task: usize) -> Option<(usize, usize)> {
        let row = self.rows.get(task)?;
        let first = row.iter().position(|m| m.is_occupied())?;
        let last = row.iter().rposition(|m| m.is_occupied())?;
        Some((first, last))
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// Header label of one week column
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekLabel {
    /// Seven consecutive days, both ends inclusive
    Range { start: NaiveDate, end: NaiveDate },
    /// 1-based placeholder used when no start date is known
    Ordinal(usize),
}

impl WeekLabel {
    pub fn start(&self) -> Option<NaiveDate> {
        match self {
            WeekLabel::Range { start, .. } => Some(*start),
            WeekLabel::Ordinal(_) => None,
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match self {
            WeekLabel::Range { end, .. } => Some(*end),
            WeekLabel::Ordinal(_) => None,
        }
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekLabel::Range { start, end } => write!(
                f,
                "{} - {}",
                start.format(WEEK_DATE_FORMAT),
                end.format(WEEK_DATE_FORMAT)
            ),
            WeekLabel::Ordinal(n) => write!(f, "Week {n}"),
        }
    }
}

/// Contiguous run of week columns under one header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBand {
    pub label: String,
    /// First week column (0-based, inclusive)
    pub first_week: usize,
    /// Last week column (0-based, inclusive)
    pub last_week: usize,
}

impl MonthBand {
    pub fn new(label: impl Into<String>, first_week: usize, last_week: usize) -> Self {
        Self {
            label: label.into(),
            first_week,
            last_week,
        }
    }

    pub fn width(&self) -> usize {
        self.last_week - self.first_week + 1
    }

    pub fn contains(&self, week: usize) -> bool {
        (self.first_week..=self.last_week).contains(&week)
    }
}

/// Calendar span covered by one task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TaskDateRange {
    pub fn start_label(&self) -> String {
        self.start.format(TASK_DATE_FORMAT).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end.format(TASK_DATE_FORMAT).to_string()
    }
}

/// A month/day pair without a year, as entered by the user (`MM/DD`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Validate against a leap year so that `02/29` is accepted here and
    /// resolved per year by [`MonthDay::in_year`].
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Concrete date in `year`; `None` for Feb 29 outside leap years.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

// ============================================================================
// Plan
// ============================================================================

/// A fully derived chronogram, ready for rendering
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    /// Year shown in the banner
    pub year: i32,
    /// First day of week 1, when known
    pub start_date: Option<NaiveDate>,
    /// Hours per week used during allocation
    pub week_capacity: u32,
    pub tasks: Vec<Task>,
    pub chronogram: Chronogram,
    /// One label per header week column (at least one)
    pub week_labels: Vec<WeekLabel>,
    pub month_bands: Vec<MonthBand>,
    /// One entry per task; `None` without a start date
    pub task_dates: Vec<Option<TaskDateRange>>,
}

impl Plan {
    /// Number of week columns in the header
    pub fn week_columns(&self) -> usize {
        self.week_labels.len()
    }

    /// Marker for a task/week cell; header-only columns are `Empty`
    pub fn marker(&self, task: usize, week: usize) -> Marker {
        self.chronogram
            .row(task)
            .and_then(|row| row.get(week).copied())
            .unwrap_or(Marker::Empty)
    }

    /// Activity name for a task row, if one was supplied
    pub fn activity(&self, task: usize) -> Option<&str> {
        self.tasks.get(task).and_then(|t| t.name.as_deref())
    }

    pub fn task_dates(&self, task: usize) -> Option<TaskDateRange> {
        self.task_dates.get(task).copied().flatten()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a plan to the output format
    fn render(&self, plan: &Plan) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Scheduling error
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid week capacity: {0} (must be at least 1 hour)")]
    InvalidCapacity(u32),

    #[error("Invalid start date: {0}")]
    InvalidStartDate(String),

    #[error("Too many week columns: {columns} (limit {max})")]
    TooManyWeeks { columns: usize, max: usize },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
