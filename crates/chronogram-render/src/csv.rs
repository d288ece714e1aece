//! Flat CSV export of the chronogram grid
//!
//! ```text
//! Task,Activity,Start Date,End Date,01/Jan - 07/Jan,08/Jan - 14/Jan
//! 1,Design,01/01,01/14,X,X
//! 2,Build,01/08,01/14,_,X
//! ```

use chronogram_core::{Plan, RenderError, Renderer};

/// CSV renderer
#[derive(Clone, Debug)]
pub struct CsvRenderer {
    /// Field delimiter
    pub delimiter: char,
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field delimiter (e.g. `;` for some spreadsheet locales)
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Quote a field if it contains the delimiter, quotes or line breaks
    fn escape(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains(['"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn write_record(&self, out: &mut String, fields: &[String]) {
        let line: Vec<String> = fields.iter().map(|f| self.escape(f)).collect();
        out.push_str(&line.join(&self.delimiter.to_string()));
        out.push('\n');
    }
}

impl Renderer for CsvRenderer {
    type Output = String;

    fn render(&self, plan: &Plan) -> Result<String, RenderError> {
        let mut out = String::new();

        let mut header: Vec<String> = ["Task", "Activity", "Start Date", "End Date"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        header.extend(plan.week_labels.iter().map(|l| l.to_string()));
        self.write_record(&mut out, &header);

        for (i, task) in plan.tasks.iter().enumerate() {
            let dates = plan.task_dates(i);
            let mut record = vec![
                task.index.to_string(),
                task.name.clone().unwrap_or_default(),
                dates.map(|d| d.start_label()).unwrap_or_default(),
                dates.map(|d| d.end_label()).unwrap_or_default(),
            ];
            record.extend((0..plan.week_columns()).map(|week| plan.marker(i, week).to_string()));
            self.write_record(&mut out, &record);
        }

        Ok(out)
    }
}
