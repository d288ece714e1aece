//! Excel chronogram renderer
//!
//! Generates a single-sheet XLSX workbook laid out as a Gantt grid:
//!
//! ```text
//!     | B     | C        | D          | E        | F ... (one column per week)
//! ----|-------|----------|------------|----------|-----------------------------
//!  1  | Tasks | Activity | Start Date | End Date | 2024 (merged over all weeks)
//!  2  |       |          |            |          | January        | February
//!  3  |       |          |            |          | 01/Jan - 07/Jan | ...
//!  4  | 1     | Design   | 01/01      | 01/14    | ####  | ####   |
//!  5  | 2     | Build    | 01/08      | 01/14    |       | ####   |
//! ```
//!
//! Columns B to E are merged over the three header rows. Occupied weeks are
//! filled with the highlight colour; empty weeks are left blank.

use chronogram_core::{Plan, RenderError, Renderer};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

const YEAR_ROW: u32 = 0;
const MONTH_ROW: u32 = 1;
const WEEK_ROW: u32 = 2;
const FIRST_TASK_ROW: u32 = 3;

const TASK_COL: u16 = 1;
const ACTIVITY_COL: u16 = 2;
const START_COL: u16 = 3;
const END_COL: u16 = 4;
const FIRST_WEEK_COL: u16 = 5;

/// Column, title and width of the fixed task columns
const FIXED_HEADERS: [(u16, &str, u16); 4] = [
    (TASK_COL, "Tasks", 5),
    (ACTIVITY_COL, "Activity", 30),
    (START_COL, "Start Date", 10),
    (END_COL, "End Date", 10),
];

/// Excel chronogram renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Worksheet name
    pub sheet_name: String,
    /// Fill for header cells (RGB)
    pub header_color: u32,
    /// Font colour for header cells (RGB)
    pub header_font_color: u32,
    /// Fill for occupied week cells (RGB)
    pub highlight_color: u32,
    /// Width of each week column
    pub week_column_width: f64,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Chronogram".into(),
            header_color: 0x0070C0,
            header_font_color: 0xFFFFFF,
            highlight_color: 0xFFA500,
            week_column_width: 18.0,
        }
    }
}

/// Formats shared across the sheet
struct ExcelFormats {
    /// Year banner
    banner: Format,
    /// Tasks/Activity/Start/End headers, text at the bottom of the merge
    column_header: Format,
    month_header: Format,
    week_header: Format,
    wrapped: Format,
    occupied: Format,
}

fn format_err(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

/// Header style of a cell range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderKind {
    /// Tasks/Activity/Start Date/End Date
    Column,
    Year,
    Month,
    Week,
}

/// Header text over an inclusive `(row, col)` range
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    pub first: (u32, u16),
    pub last: (u32, u16),
    pub text: String,
    pub kind: HeaderKind,
}

impl HeaderCell {
    fn new(first: (u32, u16), last: (u32, u16), text: impl Into<String>, kind: HeaderKind) -> Self {
        Self {
            first,
            last,
            text: text.into(),
            kind,
        }
    }

    /// Single-cell ranges are written as plain cells
    pub fn is_merged(&self) -> bool {
        self.first != self.last
    }
}

/// Cell geometry of a rendered sheet, computed before anything is written
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetLayout {
    /// Header cells in write order: fixed columns, year, months, weeks
    pub headers: Vec<HeaderCell>,
    /// `(row, col)` of every highlighted week cell, row by row
    pub occupied: Vec<(u32, u16)>,
}

impl SheetLayout {
    /// Build the layout for `plan`
    pub fn for_plan(plan: &Plan) -> Result<Self, RenderError> {
        if plan.week_labels.is_empty() {
            return Err(RenderError::InvalidData("Plan has no week columns".into()));
        }

        let mut headers = Vec::with_capacity(FIXED_HEADERS.len() + plan.week_columns() + 4);
        for (col, title, _) in FIXED_HEADERS {
            headers.push(HeaderCell::new(
                (YEAR_ROW, col),
                (WEEK_ROW, col),
                title,
                HeaderKind::Column,
            ));
        }

        let last_week_col = week_col(plan.week_columns() - 1)?;
        headers.push(HeaderCell::new(
            (YEAR_ROW, FIRST_WEEK_COL),
            (YEAR_ROW, last_week_col),
            plan.year.to_string(),
            HeaderKind::Year,
        ));

        for band in &plan.month_bands {
            headers.push(HeaderCell::new(
                (MONTH_ROW, week_col(band.first_week)?),
                (MONTH_ROW, week_col(band.last_week)?),
                band.label.as_str(),
                HeaderKind::Month,
            ));
        }

        for (week, label) in plan.week_labels.iter().enumerate() {
            let col = week_col(week)?;
            headers.push(HeaderCell::new(
                (WEEK_ROW, col),
                (WEEK_ROW, col),
                label.to_string(),
                HeaderKind::Week,
            ));
        }

        let mut occupied = Vec::new();
        for task in 0..plan.tasks.len() {
            for week in 0..plan.week_columns() {
                if plan.marker(task, week).is_occupied() {
                    occupied.push((task_row(task), week_col(week)?));
                }
            }
        }

        Ok(Self { headers, occupied })
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set header fill colour
    pub fn header_color(mut self, rgb: u32) -> Self {
        self.header_color = rgb;
        self
    }

    /// Set occupied week fill colour
    pub fn highlight_color(mut self, rgb: u32) -> Self {
        self.highlight_color = rgb;
        self
    }

    /// Set week column width
    pub fn week_column_width(mut self, width: f64) -> Self {
        self.week_column_width = width;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, plan: &Plan) -> Result<Vec<u8>, RenderError> {
        let mut workbook = self.build_workbook(plan)?;
        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Write the workbook to `path`
    pub fn save(&self, plan: &Plan, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render_to_bytes(plan)?;
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), "Wrote workbook");
        Ok(())
    }

    fn build_workbook(&self, plan: &Plan) -> Result<Workbook, RenderError> {
        let layout = SheetLayout::for_plan(plan)?;

        let mut workbook = Workbook::new();
        let formats = self.create_formats();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name).map_err(format_err)?;

        self.write_headers(sheet, &layout, &formats)?;
        self.write_task_rows(sheet, plan, &layout, &formats)?;

        Ok(workbook)
    }

    fn create_formats(&self) -> ExcelFormats {
        let banner = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(self.header_color)
            .set_font_color(self.header_font_color);

        let column_header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::Bottom)
            .set_background_color(self.header_color)
            .set_font_color(self.header_font_color);

        let month_header = Format::new()
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter)
            .set_indent(1)
            .set_background_color(self.header_color)
            .set_font_color(self.header_font_color);

        let week_header = Format::new()
            .set_align(FormatAlign::Center)
            .set_background_color(self.header_color)
            .set_font_color(self.header_font_color);

        let wrapped = Format::new().set_text_wrap();

        let occupied = Format::new().set_background_color(self.highlight_color);

        ExcelFormats {
            banner,
            column_header,
            month_header,
            week_header,
            wrapped,
            occupied,
        }
    }

    /// Merge a range, or write a single cell when the range is one cell wide
    fn merge_or_write(
        sheet: &mut Worksheet,
        cell: &HeaderCell,
        format: &Format,
    ) -> Result<(), RenderError> {
        let (first, last) = (cell.first, cell.last);
        if cell.is_merged() {
            sheet
                .merge_range(first.0, first.1, last.0, last.1, &cell.text, format)
                .map_err(format_err)?;
        } else {
            sheet
                .write_with_format(first.0, first.1, cell.text.as_str(), format)
                .map_err(format_err)?;
        }
        Ok(())
    }

    fn write_headers(
        &self,
        sheet: &mut Worksheet,
        layout: &SheetLayout,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        for cell in &layout.headers {
            let format = match cell.kind {
                HeaderKind::Column => &formats.column_header,
                HeaderKind::Year => &formats.banner,
                HeaderKind::Month => &formats.month_header,
                HeaderKind::Week => &formats.week_header,
            };
            Self::merge_or_write(sheet, cell, format)?;
            if cell.kind == HeaderKind::Week {
                sheet
                    .set_column_width(cell.first.1, self.week_column_width)
                    .map_err(format_err)?;
            }
        }

        for (col, _, width) in FIXED_HEADERS {
            sheet.set_column_width(col, width).map_err(format_err)?;
        }
        Ok(())
    }

    fn write_task_rows(
        &self,
        sheet: &mut Worksheet,
        plan: &Plan,
        layout: &SheetLayout,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        for (i, task) in plan.tasks.iter().enumerate() {
            let row = task_row(i);

            sheet
                .write_with_format(row, TASK_COL, task.index as f64, &formats.wrapped)
                .map_err(format_err)?;
            if let Some(name) = &task.name {
                sheet
                    .write_with_format(row, ACTIVITY_COL, name.as_str(), &formats.wrapped)
                    .map_err(format_err)?;
            }
            if let Some(range) = plan.task_dates(i) {
                sheet
                    .write(row, START_COL, range.start_label().as_str())
                    .map_err(format_err)?;
                sheet
                    .write(row, END_COL, range.end_label().as_str())
                    .map_err(format_err)?;
            }
        }

        for &(row, col) in &layout.occupied {
            sheet
                .write_blank(row, col, &formats.occupied)
                .map_err(format_err)?;
        }
        Ok(())
    }
}

/// Sheet row for a 0-based task index
fn task_row(task: usize) -> u32 {
    FIRST_TASK_ROW + task as u32
}

/// Sheet column for a 0-based week index
fn week_col(week: usize) -> Result<u16, RenderError> {
    u16::try_from(week)
        .ok()
        .and_then(|w| w.checked_add(FIRST_WEEK_COL))
        .ok_or_else(|| RenderError::InvalidData(format!("Too many week columns: {}", week + 1)))
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, plan: &Plan) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(plan)
    }
}
