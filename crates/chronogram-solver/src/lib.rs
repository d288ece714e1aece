//! # chronogram-solver
//!
//! Weekly capacity allocation and calendar mapping.
//!
//! This crate provides:
//! - Greedy first-fit allocation of task hours into fixed-capacity weeks
//! - Week labels (calendar ranges or `Week N` placeholders)
//! - Month bands for grouped headers
//! - Per-task start/end dates
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use chronogram_core::tasks_from_hours;
//! use chronogram_solver::Planner;
//!
//! let tasks = tasks_from_hours(&[50, 30], &[]);
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1);
//! let plan = Planner::new().plan(tasks, 2024, start).unwrap();
//!
//! assert_eq!(plan.chronogram.week_count(), 2);
//! assert_eq!(plan.week_labels[1].to_string(), "08/Jan - 14/Jan");
//! ```

pub mod allocator;
pub mod calendar;

pub use allocator::{allocate, Allocation, Allocator};
pub use calendar::{month_bands, week_labels, LabelingStrategy};

use chrono::NaiveDate;
use chronogram_core::{Plan, ScheduleError, Task, DEFAULT_WEEK_CAPACITY, MAX_WEEK_COLUMNS};
use tracing::debug;

/// Builds a [`Plan`] from a task list
#[derive(Clone, Debug)]
pub struct Planner {
    /// Hours available in each week
    pub week_capacity: u32,
    /// Empty week columns appended after the last populated one
    pub spare_weeks: usize,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            week_capacity: DEFAULT_WEEK_CAPACITY,
            spare_weeks: 0,
        }
    }
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set hours per week
    pub fn capacity(mut self, hours: u32) -> Self {
        self.week_capacity = hours;
        self
    }

    /// Append empty trailing week columns to the header
    pub fn spare_weeks(mut self, weeks: usize) -> Self {
        self.spare_weeks = weeks;
        self
    }

    /// Allocate tasks and derive labels, bands and task dates.
    ///
    /// The header always has at least one week column, even with no tasks.
    pub fn plan(
        &self,
        tasks: Vec<Task>,
        year: i32,
        start: Option<NaiveDate>,
    ) -> Result<Plan, ScheduleError> {
        let allocator = Allocator::new(self.week_capacity)?;
        let hours: Vec<u32> = tasks.iter().map(|t| t.hours).collect();
        let allocation = allocator.allocate_hours(&hours);
        let chronogram = allocation.chronogram();

        let strategy = LabelingStrategy::for_start(start);
        let columns = chronogram.week_count().max(1).saturating_add(self.spare_weeks);
        if columns > MAX_WEEK_COLUMNS {
            return Err(ScheduleError::TooManyWeeks {
                columns,
                max: MAX_WEEK_COLUMNS,
            });
        }
        let week_labels = strategy.week_labels(columns);
        let month_bands = strategy.month_bands(&week_labels);
        let task_dates = strategy.task_date_ranges(&chronogram, &week_labels);

        debug!(
            tasks = tasks.len(),
            total_hours = hours.iter().map(|&h| u64::from(h)).sum::<u64>(),
            weeks = chronogram.week_count(),
            columns,
            bands = month_bands.len(),
            "Allocated chronogram"
        );

        Ok(Plan {
            year,
            start_date: start,
            week_capacity: self.week_capacity,
            tasks,
            chronogram,
            week_labels,
            month_bands,
            task_dates,
        })
    }
}
