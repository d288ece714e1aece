//! Greedy first-fit allocation of task hours into weekly buckets
//!
//! Tasks are processed in input order. Each task scans the week columns from
//! the left and takes whatever capacity is still free, opening a new
//! full-capacity week only when every existing week is exhausted.
//!
//! ```text
//! tasks [50, 30], capacity 40
//!
//!          W1   W2
//! task 1   40   10     X X
//! task 2    0   30     _ X
//! free      0    0
//! ```

use chronogram_core::{Chronogram, Marker, ScheduleError, DEFAULT_WEEK_CAPACITY};

/// Allocate `tasks` (hours each) into weeks of `week_capacity` hours.
///
/// # Panics
///
/// Panics if `week_capacity` is zero. Use [`Allocator::new`] to get an
/// error instead.
pub fn allocate(tasks: &[u32], week_capacity: u32) -> Chronogram {
    assert!(week_capacity > 0, "week capacity must be non-zero");
    Allocator { week_capacity }.allocate(tasks)
}

/// Allocator configured with a fixed weekly capacity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocator {
    week_capacity: u32,
}

impl Default for Allocator {
    fn default() -> Self {
        Self {
            week_capacity: DEFAULT_WEEK_CAPACITY,
        }
    }
}

impl Allocator {
    pub fn new(week_capacity: u32) -> Result<Self, ScheduleError> {
        if week_capacity == 0 {
            return Err(ScheduleError::InvalidCapacity(week_capacity));
        }
        Ok(Self { week_capacity })
    }

    pub fn week_capacity(&self) -> u32 {
        self.week_capacity
    }

    /// Run the allocation pass and keep the per-week hour contributions.
    pub fn allocate_hours(&self, tasks: &[u32]) -> Allocation {
        let mut free: Vec<u32> = Vec::new();
        let mut hours: Vec<Vec<u32>> = Vec::with_capacity(tasks.len());

        for &task_hours in tasks {
            let mut remaining = task_hours;
            let mut row = vec![0; free.len()];
            let mut week = 0;

            while remaining > 0 {
                if week == free.len() {
                    free.push(self.week_capacity);
                    row.push(0);
                }
                let take = remaining.min(free[week]);
                if take > 0 {
                    free[week] -= take;
                    row[week] = take;
                    remaining -= take;
                }
                week += 1;
            }

            hours.push(row);
        }

        let week_count = free.len();
        for row in &mut hours {
            row.resize(week_count, 0);
        }

        Allocation {
            week_capacity: self.week_capacity,
            hours,
            free,
        }
    }

    pub fn allocate(&self, tasks: &[u32]) -> Chronogram {
        self.allocate_hours(tasks).chronogram()
    }
}

/// Result of an allocation pass with hour-level detail
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    week_capacity: u32,
    hours: Vec<Vec<u32>>,
    free: Vec<u32>,
}

impl Allocation {
    /// Hours each task takes from each week, one row per task
    pub fn hours(&self) -> &[Vec<u32>] {
        &self.hours
    }

    /// Unused hours left in each week
    pub fn free_capacity(&self) -> &[u32] {
        &self.free
    }

    pub fn week_count(&self) -> usize {
        self.free.len()
    }

    pub fn week_capacity(&self) -> u32 {
        self.week_capacity
    }

    /// Hours booked into one week across all tasks
    pub fn week_load(&self, week: usize) -> u32 {
        self.hours.iter().filter_map(|row| row.get(week)).sum()
    }

    /// Collapse contributions into occupancy markers
    pub fn chronogram(&self) -> Chronogram {
        let rows = self
            .hours
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&h| if h > 0 { Marker::Occupied } else { Marker::Empty })
                    .collect()
            })
            .collect();
        Chronogram::from_rows(rows)
    }
}
