//! Spreadsheet export of a generated roster.
//!
//! The export is a CSV grid: one row per day of the month, one column per
//! doctor (sorted by name), with `X` marking an assigned shift.
//!
//! ```text
//! Date,Weekday,Green,Ross
//! 2024-02-01,Thursday,X,
//! 2024-02-02,Friday,,X
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;

use super::calendar::{CalendarDay, calendar_days};
use super::{Doctor, DoctorId, Schedule, SchedulingError, ShiftAssignment};

const ASSIGNED_MARK: &str = "X";

/// Rendered export ready to be served as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleExport {
    /// Suggested download file name, e.g. `rota-2024-02.csv`.
    pub filename: String,
    /// CSV document with CRLF line endings.
    pub csv: String,
}

/// Render `assignments` for `schedule` as a CSV grid.
///
/// Assignments referencing doctors not in `doctors` are ignored.
pub fn render_csv(
    schedule: &Schedule,
    doctors: &[Doctor],
    assignments: &[ShiftAssignment],
) -> Result<ScheduleExport, SchedulingError> {
    let days = calendar_days(schedule.month(), schedule.year())?;
    let mut columns: Vec<&Doctor> = doctors.iter().collect();
    columns.sort_by(|a, b| {
        a.name()
            .normalized()
            .cmp(&b.name().normalized())
            .then_with(|| a.id().cmp(&b.id()))
    });
    let worked: HashSet<(DoctorId, NaiveDate)> = assignments
        .iter()
        .map(|shift| (shift.doctor_id, shift.date))
        .collect();

    let mut csv = String::new();
    let header = ["Date", "Weekday"]
        .into_iter()
        .map(str::to_owned)
        .chain(columns.iter().map(|doctor| doctor.name().to_string()));
    push_row(&mut csv, header);
    for CalendarDay { date, .. } in days {
        let cells = [date.format("%Y-%m-%d").to_string(), date.format("%A").to_string()]
            .into_iter()
            .chain(columns.iter().map(|doctor| {
                if worked.contains(&(doctor.id(), date)) {
                    ASSIGNED_MARK.to_owned()
                } else {
                    String::new()
                }
            }));
        push_row(&mut csv, cells);
    }

    Ok(ScheduleExport {
        filename: format!(
            "rota-{}-{:02}.csv",
            schedule.year(),
            schedule.month().number()
        ),
        csv,
    })
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    for (index, cell) in cells.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&quote(&cell));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
