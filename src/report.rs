//! Presentation helpers: status wording, timestamps, the schedule table and
//! a text timeline.

use crate::calculations::TaskStatus;
use crate::pass::ScheduleEntry;
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn status_label(entry: &ScheduleEntry) -> String {
    match entry.status {
        TaskStatus::Completed => "Completed".to_string(),
        TaskStatus::InProgress => "In Progress".to_string(),
        TaskStatus::RunningLate => "Running Late".to_string(),
        TaskStatus::Waiting => format!("Waiting for {} to be completed", entry.blocked_by.join(", ")),
    }
}

fn to_millis(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp_millis()
}

fn datetime_series(name: &'static str, values: Vec<i64>) -> PolarsResult<Series> {
    Series::new(PlSmallStr::from_static(name), values)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

/// One row per entry, in schedule order.
pub fn schedule_frame(entries: &[ScheduleEntry]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let starts: Vec<i64> = entries.iter().map(|e| to_millis(e.start)).collect();
    let ends: Vec<i64> = entries.iter().map(|e| to_millis(e.end)).collect();
    let durations: Vec<f64> = entries.iter().map(|e| e.duration_hours).collect();
    let statuses: Vec<String> = entries.iter().map(status_label).collect();
    let markable: Vec<bool> = entries.iter().map(|e| e.markable).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("task"), names).into_column(),
        datetime_series("start_time", starts)?.into_column(),
        datetime_series("end_time", ends)?.into_column(),
        Series::new(PlSmallStr::from_static("duration_hours"), durations).into_column(),
        Series::new(PlSmallStr::from_static("status"), statuses).into_column(),
        Series::new(PlSmallStr::from_static("markable"), markable).into_column(),
    ])
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Datetime(ms, TimeUnit::Milliseconds, _) => DateTime::from_timestamp_millis(*ms)
            .map(|at| format_timestamp(at.naive_utc()))
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Boxed plain-text rendering of a frame.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| {
                    col.get(row_idx)
                        .map(|av| cell_text(&av))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            let pad = widths[ci].saturating_sub(value.chars().count());
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

/// Text Gantt chart: one bar per entry, scaled from the earliest start to the
/// latest end across `width` cells. Waiting tasks are drawn with `-`.
pub fn render_timeline(entries: &[ScheduleEntry], width: usize) -> String {
    let (Some(first), Some(last)) = (
        entries.iter().map(|e| e.start).min(),
        entries.iter().map(|e| e.end).max(),
    ) else {
        return String::new();
    };
    let width = width.max(1);
    let span = (to_millis(last) - to_millis(first)).max(0) as i128;
    let label_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or_default();

    // Position of `at` on the axis, in cells.
    let cell = |at: NaiveDateTime| -> usize {
        if span == 0 {
            return 0;
        }
        let offset = (to_millis(at) - to_millis(first)) as i128;
        (offset * width as i128 / span) as usize
    };

    let mut out = format!(
        "{:label_width$}  {} .. {}\n",
        "",
        format_timestamp(first),
        format_timestamp(last)
    );
    for entry in entries {
        let from = cell(entry.start).min(width - 1);
        let to = cell(entry.end).clamp(from + 1, width);
        let fill = if entry.status == TaskStatus::Waiting { '-' } else { '#' };
        let mut bar = " ".repeat(from);
        bar.extend(std::iter::repeat_n(fill, to - from));
        bar.push_str(&" ".repeat(width - to));
        let pad = label_width - entry.name.chars().count();
        out.push_str(&format!(
            "{}{} |{}| {}h\n",
            entry.name,
            " ".repeat(pad),
            bar,
            entry.duration_hours
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn entry(name: &str, status: TaskStatus, blocked_by: &[&str]) -> ScheduleEntry {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        ScheduleEntry {
            name: name.to_string(),
            start,
            end: start + Duration::hours(2),
            duration_hours: 2.0,
            status,
            blocked_by: blocked_by.iter().map(|s| s.to_string()).collect(),
            markable: status != TaskStatus::Waiting,
            implicit: false,
        }
    }

    #[test]
    fn labels_match_display_wording() {
        assert_eq!(status_label(&entry("A", TaskStatus::InProgress, &[])), "In Progress");
        assert_eq!(status_label(&entry("A", TaskStatus::RunningLate, &[])), "Running Late");
        assert_eq!(
            status_label(&entry("C", TaskStatus::Waiting, &["A", "B"])),
            "Waiting for A, B to be completed"
        );
    }

    #[test]
    fn frame_has_one_row_per_entry() {
        let entries = vec![
            entry("A", TaskStatus::InProgress, &[]),
            entry("B", TaskStatus::Waiting, &["A"]),
        ];
        let df = schedule_frame(&entries).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.column("start_time").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        let status = df.column("status").unwrap().str().unwrap();
        assert_eq!(status.get(1), Some("Waiting for A to be completed"));
        let markable = df.column("markable").unwrap().bool().unwrap();
        assert_eq!(markable.get(0), Some(true));
        assert_eq!(markable.get(1), Some(false));
    }

    #[test]
    fn text_table_formats_timestamps() {
        let df = schedule_frame(&[entry("A", TaskStatus::InProgress, &[])]).unwrap();
        let table = render_text_table(&df);
        assert!(table.contains("| task "));
        assert!(table.contains("2025-01-06 09:30"));
        assert!(table.contains("2025-01-06 11:30"));
        assert!(table.contains("In Progress"));
    }

    fn timed(name: &str, offset_hours: i64, hours: i64, status: TaskStatus) -> ScheduleEntry {
        let mut e = entry(name, status, &[]);
        e.start += Duration::hours(offset_hours);
        e.end = e.start + Duration::hours(hours);
        e.duration_hours = hours as f64;
        e
    }

    #[test]
    fn timeline_scales_bars_to_the_full_span() {
        let entries = vec![
            timed("A", 0, 2, TaskStatus::InProgress),
            timed("Build", 2, 2, TaskStatus::Waiting),
        ];
        let timeline = render_timeline(&entries, 10);
        let lines: Vec<&str> = timeline.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2025-01-06 09:30 .. 2025-01-06 13:30"));
        assert_eq!(lines[1], "A     |#####     | 2h");
        assert_eq!(lines[2], "Build |     -----| 2h");
    }

    #[test]
    fn single_entry_fills_the_width() {
        let timeline = render_timeline(&[timed("A", 0, 3, TaskStatus::RunningLate)], 6);
        assert_eq!(timeline.lines().nth(1), Some("A |######| 3h"));
    }

    #[test]
    fn zero_span_still_draws_one_cell() {
        let mut e = entry("Blip", TaskStatus::InProgress, &[]);
        e.end = e.start;
        e.duration_hours = 0.0;
        let timeline = render_timeline(&[e], 4);
        assert_eq!(timeline.lines().nth(1), Some("Blip |#   | 0h"));
    }

    #[test]
    fn empty_timeline_is_blank() {
        assert_eq!(render_timeline(&[], 20), "");
    }

    #[test]
    fn empty_frame_renders_header_only() {
        let df = schedule_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        let table = render_text_table(&df);
        assert_eq!(table.lines().count(), 4);
    }
}
