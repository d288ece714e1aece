//! Interactive input collection
//!
//! Asks for year, start date, task hours and activity names in that order.
//! Invalid years, dates and hour lists are reported and asked again; an
//! empty answer keeps the optional values unset.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use chronogram_core::MonthDay;
use chronogram_parser::{parse_activity_names, parse_hours, parse_month_day, parse_year};
use tracing::debug;

/// Answers gathered from the user
#[derive(Debug, PartialEq)]
pub struct Answers {
    pub year: Option<i32>,
    pub start: Option<MonthDay>,
    pub hours: Vec<u32>,
    pub activities: Vec<String>,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed line; `None` at end of input
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_year(&mut self) -> Result<Option<i32>> {
        let mut question = "Year for the chart (leave empty for the current year): ";
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match parse_year(&answer) {
                Ok(year) => return Ok(year),
                Err(e) => {
                    debug!(%e, "Rejected year");
                    question = "Invalid year. Enter a year such as 2025, or leave empty: ";
                }
            }
        }
    }

    /// `year` is the resolved chart year, used to reject Feb 29 outside leap years
    fn ask_start(&mut self, year: i32) -> Result<Option<MonthDay>> {
        let mut question = "First day of week 1 as MM/DD (leave empty for numbered weeks): ";
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(None);
            }
            match parse_month_day(&answer) {
                Ok(md) if md.in_year(year).is_some() => return Ok(Some(md)),
                Ok(md) => {
                    debug!(%md, year, "Start date missing from year");
                    question = "That day does not exist in the chosen year. Use MM/DD or leave empty: ";
                }
                Err(e) => {
                    debug!(%e, "Rejected start date");
                    question = "The format is incorrect. Use MM/DD or leave empty: ";
                }
            }
        }
    }

    fn ask_hours(&mut self) -> Result<Vec<u32>> {
        let mut question = "Task hours (comma or space separated): ";
        loop {
            let Some(answer) = self.ask(question)? else {
                bail!("input ended before task hours were given");
            };
            match parse_hours(&answer) {
                Ok(hours) => return Ok(hours),
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    question = "Task hours must be positive whole numbers. Try again: ";
                }
            }
        }
    }

    fn ask_activities(&mut self) -> Result<Vec<String>> {
        let answer = self.ask("Activity names (comma separated, or leave empty): ")?;
        Ok(answer.map(|a| parse_activity_names(&a)).unwrap_or_default())
    }

    /// Run the question sequence. `default_year` fills in a blank year.
    ///
    /// A `year` or `start` already known from the command line is not asked
    /// again; the start date is always checked against the year in effect.
    pub fn collect(
        &mut self,
        year: Option<i32>,
        start: Option<MonthDay>,
        default_year: i32,
    ) -> Result<Answers> {
        let year = match year {
            Some(year) => Some(year),
            None => self.ask_year()?,
        };
        let start = match start {
            Some(start) => Some(start),
            None => self.ask_start(year.unwrap_or(default_year))?,
        };
        let hours = self.ask_hours()?;
        let activities = self.ask_activities()?;
        Ok(Answers {
            year,
            start,
            hours,
            activities,
        })
    }
}
