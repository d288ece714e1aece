//! # chronogram-render
//!
//! Rendering backends for chronogram plans.
//!
//! This crate provides:
//! - Excel workbook with merged year/month headers and highlighted weeks
//! - Flat CSV export of the same grid
//! - Plain-text grid for terminal previews
//!
//! ## Example
//!
//! ```rust,ignore
//! use chronogram_core::Renderer;
//! use chronogram_render::{CsvRenderer, ExcelRenderer, TextRenderer};
//!
//! let xlsx_bytes = ExcelRenderer::new().render(&plan)?;
//! std::fs::write("chronogram.xlsx", xlsx_bytes)?;
//!
//! let csv = CsvRenderer::new().render(&plan)?;
//! println!("{}", TextRenderer::new().render(&plan)?);
//! ```

pub mod csv;
pub mod excel;

pub use csv::CsvRenderer;
pub use excel::{ExcelRenderer, HeaderCell, HeaderKind, SheetLayout};

use chronogram_core::{Plan, RenderError, Renderer};

/// Plain-text chronogram grid
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Column separator
    pub separator: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            separator: " | ".into(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    fn cell(text: &str, width: usize) -> String {
        let clipped: String = text.chars().take(width).collect();
        format!("{:<width$}", clipped, width = width)
    }

    fn line(&self, cells: &[String]) -> String {
        cells.join(&self.separator).trim_end().to_string()
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, plan: &Plan) -> Result<String, RenderError> {
        if plan.week_labels.is_empty() {
            return Err(RenderError::InvalidData("Plan has no week columns".into()));
        }

        let headers = ["Task", "Activity", "Start", "End"];
        let rows: Vec<[String; 4]> = plan
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let dates = plan.task_dates(i);
                [
                    task.index.to_string(),
                    task.name.clone().unwrap_or_default(),
                    dates.map(|d| d.start_label()).unwrap_or_default(),
                    dates.map(|d| d.end_label()).unwrap_or_default(),
                ]
            })
            .collect();

        let fixed_widths: Vec<usize> = (0..headers.len())
            .map(|col| {
                rows.iter()
                    .map(|r| r[col].chars().count())
                    .chain(std::iter::once(headers[col].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let week_texts: Vec<String> = plan.week_labels.iter().map(|l| l.to_string()).collect();
        let mut week_widths: Vec<usize> =
            week_texts.iter().map(|t| t.chars().count().max(1)).collect();
        let sep_width = self.separator.chars().count();
        let last_week = week_widths.len() - 1;
        let span_width = |widths: &[usize], first: usize, last: usize| {
            let last = last.min(widths.len() - 1);
            if first > last {
                return 0;
            }
            widths[first..=last].iter().sum::<usize>() + sep_width * (last - first)
        };

        // Banner labels never get clipped: widen the last column of a span
        // that is narrower than its label.
        let year_text = plan.year.to_string();
        let spans = plan
            .month_bands
            .iter()
            .map(|band| (band.label.as_str(), band.first_week, band.last_week))
            .chain(std::iter::once((year_text.as_str(), 0, last_week)));
        for (label, first, last) in spans {
            let last = last.min(last_week);
            let needed = label.chars().count();
            let available = span_width(&week_widths, first, last);
            if first <= last && needed > available {
                week_widths[last] += needed - available;
            }
        }

        let blank_fixed: Vec<String> = fixed_widths.iter().map(|&w| Self::cell("", w)).collect();
        let mut lines = Vec::with_capacity(rows.len() + 3);

        // Year banner over all week columns
        let mut cells = blank_fixed.clone();
        cells.push(Self::cell(
            &year_text,
            span_width(&week_widths, 0, last_week),
        ));
        lines.push(self.line(&cells));

        let mut cells = blank_fixed;
        for band in &plan.month_bands {
            cells.push(Self::cell(
                &band.label,
                span_width(&week_widths, band.first_week, band.last_week),
            ));
        }
        lines.push(self.line(&cells));

        let mut cells: Vec<String> = headers
            .iter()
            .zip(&fixed_widths)
            .map(|(h, &w)| Self::cell(h, w))
            .collect();
        cells.extend(week_texts.iter().zip(&week_widths).map(|(t, &w)| Self::cell(t, w)));
        lines.push(self.line(&cells));

        for (i, row) in rows.iter().enumerate() {
            let mut cells: Vec<String> = row
                .iter()
                .zip(&fixed_widths)
                .map(|(text, &w)| Self::cell(text, w))
                .collect();
            cells.extend(
                week_widths
                    .iter()
                    .enumerate()
                    .map(|(week, &w)| Self::cell(&plan.marker(i, week).to_string(), w)),
            );
            lines.push(self.line(&cells));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronogram_core::tasks_from_hours;
    use chronogram_solver::Planner;

    #[test]
    fn text_render_contains_grid() {
        let names = vec!["Design".to_string()];
        let plan = Planner::new()
            .plan(tasks_from_hours(&[50, 30], &names), 2024, None)
            .unwrap();

        let text = TextRenderer::new().render(&plan).unwrap();
        assert!(text.contains("2024"));
        assert!(text.contains("Month 1"));
        assert!(text.contains("Week 2"));
        assert!(text.contains("Design"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn text_cell_pads_and_clips() {
        assert_eq!(TextRenderer::cell("ab", 4), "ab  ");
        assert_eq!(TextRenderer::cell("abcdef", 3), "abc");
    }

    #[test]
    fn text_custom_separator() {
        let plan = Planner::new()
            .plan(tasks_from_hours(&[10], &[]), 2024, None)
            .unwrap();
        let text = TextRenderer::new().separator(" ").render(&plan).unwrap();
        assert!(text.contains("Task Activity Start End Week 1"));
    }

    #[test]
    fn text_requires_week_columns() {
        let mut plan = Planner::new().plan(Vec::new(), 2024, None).unwrap();
        plan.week_labels.clear();
        assert!(TextRenderer::new().render(&plan).is_err());
    }
}
