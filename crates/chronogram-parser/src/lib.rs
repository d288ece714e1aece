//! # chronogram-parser
//!
//! Input parsing for the chronogram pipeline.
//!
//! This crate provides:
//! - Task hour lists (`"40, 12 8"`) using a pest grammar
//! - Comma-separated activity names
//! - `MM/DD` start dates and optional years
//! - Line-oriented task files (`<hours> [activity]` per line)
//!
//! ## Example
//!
//! ```rust
//! use chronogram_parser::{parse_hours, parse_month_day};
//!
//! assert_eq!(parse_hours("50, 30").unwrap(), vec![50, 30]);
//! assert_eq!(parse_month_day("01/15").unwrap().day(), 15);
//! ```

use chronogram_core::{MonthDay, Task};
use pest::iterators::Pairs;
use pest::Parser;
use pest_derive::Parser;
use std::path::Path;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "input.pest"]
struct InputParser;

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, column) = match e.line_col {
            pest::error::LineColLocation::Pos((l, c)) => (l, c),
            pest::error::LineColLocation::Span((l, c), _) => (l, c),
        };
        ParseError::Syntax {
            line,
            column,
            message: e.variant.message().to_string(),
        }
    }
}

fn parse_rule(rule: Rule, input: &str) -> Result<Pairs<'_, Rule>, ParseError> {
    Ok(InputParser::parse(rule, input)?)
}

fn hours_value(text: &str) -> Result<u32, ParseError> {
    let hours: u32 = text
        .parse()
        .map_err(|_| ParseError::InvalidValue(format!("Hours out of range: {}", text)))?;
    if hours == 0 {
        return Err(ParseError::InvalidValue(
            "Task hours must be positive".to_string(),
        ));
    }
    Ok(hours)
}

/// Parse task hours separated by commas and/or whitespace.
///
/// Empty tokens are skipped, so `"40,,8"` is two tasks. An empty input is
/// an empty list.
pub fn parse_hours(input: &str) -> Result<Vec<u32>, ParseError> {
    parse_rule(Rule::hours_list, input)?
        .flatten()
        .filter(|pair| pair.as_rule() == Rule::hours)
        .map(|pair| hours_value(pair.as_str()))
        .collect()
}

/// Split comma-separated activity names, dropping empty entries.
pub fn parse_activity_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a `MM/DD` start date.
pub fn parse_month_day(input: &str) -> Result<MonthDay, ParseError> {
    let text = input.trim();
    let mut month = 0;
    let mut day = 0;
    for pair in parse_rule(Rule::month_day, text)?.flatten() {
        match pair.as_rule() {
            Rule::month => month = pair.as_str().parse().unwrap_or(0),
            Rule::day => day = pair.as_str().parse().unwrap_or(0),
            _ => {}
        }
    }
    MonthDay::new(month, day)
        .ok_or_else(|| ParseError::InvalidValue(format!("Not a calendar day: {}", text)))
}

/// Parse an optional year; blank input means "not given".
pub fn parse_year(input: &str) -> Result<Option<i32>, ParseError> {
    let text = input.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<i32>() {
        Ok(year) if (1..=9999).contains(&year) => Ok(Some(year)),
        _ => Err(ParseError::InvalidValue(format!("Invalid year: {}", text))),
    }
}

/// Parse a task file: one `<hours> [activity]` per line.
///
/// Blank lines and `#` comments are ignored. The activity may follow the
/// hours after whitespace or a comma.
pub fn parse_task_file(input: &str) -> Result<Vec<Task>, ParseError> {
    let mut tasks = Vec::new();
    for pair in parse_rule(Rule::task_file, input)?.flatten() {
        if pair.as_rule() != Rule::task_line {
            continue;
        }
        let mut hours = 0;
        let mut name = None;
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::hours => hours = hours_value(inner.as_str())?,
                Rule::name => {
                    let trimmed = inner.as_str().trim();
                    if !trimmed.is_empty() {
                        name = Some(trimmed.to_string());
                    }
                }
                _ => {}
            }
        }
        tasks.push(Task {
            index: tasks.len() + 1,
            hours,
            name,
        });
    }
    Ok(tasks)
}

/// Read and parse a task file from disk
pub fn parse_file(path: &Path) -> Result<Vec<Task>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_task_file(&content)
}
