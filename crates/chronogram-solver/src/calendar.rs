//! Week labels, month bands and task date ranges
//!
//! A run picks one [`LabelingStrategy`]: calendar weeks when a start date is
//! known, numbered placeholder weeks otherwise. Both variants answer the same
//! three questions (week labels, month bands, task date ranges) so renderers
//! never branch on whether a start date was given.

use chrono::{Datelike, Duration, NaiveDate};
use chronogram_core::{Chronogram, MonthBand, MonthDay, ScheduleError, TaskDateRange, WeekLabel};

/// Days covered by one week label
pub const DAYS_PER_WEEK: i64 = 7;

/// Week columns per synthetic month when no start date is known
pub const WEEKS_PER_SYNTHETIC_MONTH: usize = 4;

/// How week columns are labelled and grouped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelingStrategy {
    /// Real 7-day ranges starting at `start`
    Calendar { start: NaiveDate },
    /// `Week N` placeholders grouped into 4-week `Month N` bands
    Ordinal,
}

impl LabelingStrategy {
    pub fn for_start(start: Option<NaiveDate>) -> Self {
        match start {
            Some(start) => LabelingStrategy::Calendar { start },
            None => LabelingStrategy::Ordinal,
        }
    }

    /// Resolve a user-supplied `MM/DD` against `year`.
    pub fn from_month_day(start: Option<MonthDay>, year: i32) -> Result<Self, ScheduleError> {
        match start {
            Some(md) => md
                .in_year(year)
                .map(|start| LabelingStrategy::Calendar { start })
                .ok_or_else(|| ScheduleError::InvalidStartDate(format!("{md} does not exist in {year}"))),
            None => Ok(LabelingStrategy::Ordinal),
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            LabelingStrategy::Calendar { start } => Some(*start),
            LabelingStrategy::Ordinal => None,
        }
    }

    /// First day of week column `week` (0-based)
    fn week_start(start: NaiveDate, week: usize) -> NaiveDate {
        start + Duration::days(DAYS_PER_WEEK * week as i64)
    }

    /// One label per week column
    pub fn week_labels(&self, count: usize) -> Vec<WeekLabel> {
        match self {
            LabelingStrategy::Calendar { start } => (0..count)
                .map(|week| {
                    let first = Self::week_start(*start, week);
                    WeekLabel::Range {
                        start: first,
                        end: first + Duration::days(DAYS_PER_WEEK - 1),
                    }
                })
                .collect(),
            LabelingStrategy::Ordinal => (1..=count).map(WeekLabel::Ordinal).collect(),
        }
    }

    /// Group week columns into contiguous, non-overlapping bands
    pub fn month_bands(&self, labels: &[WeekLabel]) -> Vec<MonthBand> {
        match self {
            LabelingStrategy::Calendar { start } => {
                let mut bands: Vec<MonthBand> = Vec::new();
                let mut current: Option<(i32, u32)> = None;

                for (week, label) in labels.iter().enumerate() {
                    let first_day = label
                        .start()
                        .unwrap_or_else(|| Self::week_start(*start, week));
                    let key = (first_day.year(), first_day.month());

                    match bands.last_mut() {
                        Some(band) if current == Some(key) => band.last_week = week,
                        _ => {
                            bands.push(MonthBand::new(
                                first_day.format("%B").to_string(),
                                week,
                                week,
                            ));
                            current = Some(key);
                        }
                    }
                }
                bands
            }
            LabelingStrategy::Ordinal => (0..labels.len())
                .step_by(WEEKS_PER_SYNTHETIC_MONTH)
                .enumerate()
                .map(|(n, first)| {
                    let last = (first + WEEKS_PER_SYNTHETIC_MONTH - 1).min(labels.len() - 1);
                    MonthBand::new(format!("Month {}", n + 1), first, last)
                })
                .collect(),
        }
    }

    /// Start/end dates per task row; `None` without calendar weeks or when
    /// the row has no occupied week.
    ///
    /// The first task never starts before the requested start date.
    pub fn task_date_ranges(
        &self,
        chronogram: &Chronogram,
        labels: &[WeekLabel],
    ) -> Vec<Option<TaskDateRange>> {
        let LabelingStrategy::Calendar { start } = self else {
            return vec![None; chronogram.task_count()];
        };

        (0..chronogram.task_count())
            .map(|task| {
                let (first, last) = chronogram.occupied_span(task)?;
                let mut range = TaskDateRange {
                    start: labels.get(first)?.start()?,
                    end: labels.get(last)?.end()?,
                };
                if task == 0 {
                    range.start = range.start.max(*start);
                }
                Some(range)
            })
            .collect()
    }
}

/// Week labels for `count` columns, starting at `start` in `year` when given.
pub fn week_labels(
    count: usize,
    start: Option<MonthDay>,
    year: i32,
) -> Result<Vec<WeekLabel>, ScheduleError> {
    Ok(LabelingStrategy::from_month_day(start, year)?.week_labels(count))
}

/// Month bands for a label sequence produced from `start`.
pub fn month_bands(labels: &[WeekLabel], start: Option<NaiveDate>) -> Vec<MonthBand> {
    LabelingStrategy::for_start(start).month_bands(labels)
}
