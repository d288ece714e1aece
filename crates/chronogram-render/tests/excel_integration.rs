//! Integration tests for Excel rendering

use chrono::NaiveDate;
use chronogram_core::{tasks_from_hours, Plan, Renderer};
use chronogram_render::{ExcelRenderer, HeaderCell, HeaderKind, SheetLayout};
use pretty_assertions::assert_eq;
use chronogram_solver::Planner;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A release plan long enough to cross month boundaries
fn create_release_plan(start: Option<NaiveDate>) -> Plan {
    let names: Vec<String> = [
        "Requirements",
        "Solution design",
        "Development",
        "Testing",
        "User training",
        "Go-live",
    ]
    .iter()
    .map(|n| n.to_string())
    .collect();

    Planner::new()
        .spare_weeks(1)
        .plan(tasks_from_hours(&[24, 60, 160, 45, 12, 8], &names), 2026, start)
        .unwrap()
}

#[test]
fn render_release_plan_with_dates() {
    let plan = create_release_plan(Some(date(2026, 2, 16)));
    assert!(plan.month_bands.len() > 1);

    let xlsx = ExcelRenderer::new().render(&plan).unwrap();

    // Verify it's a valid XLSX file (starts with PK zip signature)
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn render_release_plan_without_dates() {
    let plan = create_release_plan(None);
    let xlsx = ExcelRenderer::new().render(&plan).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn render_single_week_plan() {
    // One week column: the year banner and month band are single cells
    let plan = Planner::new()
        .plan(tasks_from_hours(&[40], &[]), 2026, Some(date(2026, 3, 2)))
        .unwrap();
    assert_eq!(plan.week_columns(), 1);

    let xlsx = ExcelRenderer::new().render(&plan).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}

// ============================================================================
// Sheet layout
// ============================================================================

fn header(first: (u32, u16), last: (u32, u16), text: &str, kind: HeaderKind) -> HeaderCell {
    HeaderCell {
        first,
        last,
        text: text.to_string(),
        kind,
    }
}

fn headers_of(layout: &SheetLayout, kind: HeaderKind) -> Vec<HeaderCell> {
    layout
        .headers
        .iter()
        .filter(|h| h.kind == kind)
        .cloned()
        .collect()
}

#[test]
fn layout_two_task_calendar_plan() {
    let names = vec!["Design".to_string(), "Build".to_string()];
    let plan = Planner::new()
        .plan(tasks_from_hours(&[50, 30], &names), 2024, Some(date(2024, 1, 1)))
        .unwrap();
    let layout = SheetLayout::for_plan(&plan).unwrap();

    assert_eq!(
        layout.headers,
        vec![
            header((0, 1), (2, 1), "Tasks", HeaderKind::Column),
            header((0, 2), (2, 2), "Activity", HeaderKind::Column),
            header((0, 3), (2, 3), "Start Date", HeaderKind::Column),
            header((0, 4), (2, 4), "End Date", HeaderKind::Column),
            header((0, 5), (0, 6), "2024", HeaderKind::Year),
            header((1, 5), (1, 6), "January", HeaderKind::Month),
            header((2, 5), (2, 5), "01/Jan - 07/Jan", HeaderKind::Week),
            header((2, 6), (2, 6), "08/Jan - 14/Jan", HeaderKind::Week),
        ]
    );
    assert_eq!(layout.occupied, vec![(3, 5), (3, 6), (4, 6)]);
}

#[test]
fn layout_single_week_is_not_merged() {
    let plan = Planner::new()
        .plan(tasks_from_hours(&[40], &[]), 2026, Some(date(2026, 3, 2)))
        .unwrap();
    let layout = SheetLayout::for_plan(&plan).unwrap();

    let year = headers_of(&layout, HeaderKind::Year);
    let months = headers_of(&layout, HeaderKind::Month);
    assert_eq!(year, vec![header((0, 5), (0, 5), "2026", HeaderKind::Year)]);
    assert_eq!(months, vec![header((1, 5), (1, 5), "March", HeaderKind::Month)]);
    assert!(!year[0].is_merged());
    assert!(!months[0].is_merged());

    // Fixed columns always span the three header rows
    assert!(headers_of(&layout, HeaderKind::Column)
        .iter()
        .all(HeaderCell::is_merged));
    assert_eq!(layout.occupied, vec![(3, 5)]);
}

#[test]
fn layout_month_bands_cross_boundary() {
    // 22/Jan, 29/Jan, 05/Feb, 12/Feb
    let plan = Planner::new()
        .plan(tasks_from_hours(&[160], &[]), 2024, Some(date(2024, 1, 22)))
        .unwrap();
    let layout = SheetLayout::for_plan(&plan).unwrap();

    assert_eq!(
        headers_of(&layout, HeaderKind::Month),
        vec![
            header((1, 5), (1, 6), "January", HeaderKind::Month),
            header((1, 7), (1, 8), "February", HeaderKind::Month),
        ]
    );
    assert_eq!(layout.occupied, vec![(3, 5), (3, 6), (3, 7), (3, 8)]);
}

#[test]
fn layout_ordinal_bands_and_spare_weeks() {
    let plan = Planner::new()
        .spare_weeks(2)
        .plan(tasks_from_hours(&[100, 20], &[]), 2024, None)
        .unwrap();
    // 100 -> weeks 1..3 (40, 40, 20); 20 fills the rest of week 3
    let layout = SheetLayout::for_plan(&plan).unwrap();

    assert_eq!(
        headers_of(&layout, HeaderKind::Year),
        vec![header((0, 5), (0, 9), "2024", HeaderKind::Year)]
    );
    assert_eq!(
        headers_of(&layout, HeaderKind::Month),
        vec![
            header((1, 5), (1, 8), "Month 1", HeaderKind::Month),
            header((1, 9), (1, 9), "Month 2", HeaderKind::Month),
        ]
    );
    assert_eq!(headers_of(&layout, HeaderKind::Week).len(), 5);
    assert_eq!(layout.occupied, vec![(3, 5), (3, 6), (3, 7), (4, 7)]);
}

#[test]
fn layout_requires_week_columns() {
    let mut plan = create_release_plan(None);
    plan.week_labels.clear();
    assert!(SheetLayout::for_plan(&plan).is_err());
}

#[test]
fn save_workbook_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chronogram.xlsx");

    let plan = create_release_plan(None);
    ExcelRenderer::new()
        .highlight_color(0x92D050)
        .save(&plan, &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn save_into_missing_directory_fails() {
    let plan = create_release_plan(None);
    let result = ExcelRenderer::new().save(&plan, std::path::Path::new("/nonexistent/dir/out.xlsx"));
    assert!(result.is_err());
}
