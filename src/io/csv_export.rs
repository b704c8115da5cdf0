//! CSV export of a solved roster: the filled-shift list, the penalty
//! breakdown and its per-component summary, and the unplanned-day
//! diagnostics.
//!
//! The `testers` column on a filled shift is written in one of two shapes
//! and both are accepted back on import, matching how a spreadsheet-style
//! consumer and a re-import of our own export both need to work.

use std::collections::BTreeSet;
use std::path::Path;

use crate::diagnostics::DiagnosticRow;
use crate::domain::FilledShift;
use crate::error::Result;
use crate::project::PenaltyRow;

/// How the `testers` column of a filled-shift export is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestersColumnShape {
    /// One column, e.g. `['Amy', 'Beth']`.
    Bracketed,
    /// One column per slot, `tester_1`, `tester_2`, ... up to the widest row.
    Split,
}

fn format_bracketed(names: &[String]) -> String {
    if names.is_empty() {
        return "[]".to_string();
    }
    let inner = names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

fn parse_bracketed(cell: &str) -> Vec<String> {
    let trimmed = cell.trim().trim_start_matches('[').trim_end_matches(']');
    if trimmed.trim().is_empty() {
        return Vec::new();
    }
    trimmed
        .split(',')
        .map(|s| s.trim().trim_matches('\'').trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Writes filled shifts, one row per slot, in date/location/team order.
pub fn export_filled_shifts_csv(
    path: &Path,
    shifts: &[FilledShift],
    shape: TestersColumnShape,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    match shape {
        TestersColumnShape::Bracketed => {
            writer.write_record(["date", "location", "weekday", "iso_week", "team_index", "testers"])?;
            for shift in shifts {
                writer.write_record([
                    shift.date.to_string(),
                    shift.location.clone(),
                    shift.weekday.to_string(),
                    format!("{}-W{:02}", shift.iso_week.year, shift.iso_week.week),
                    shift.team_index.to_string(),
                    format_bracketed(&shift.testers),
                ])?;
            }
        }
        TestersColumnShape::Split => {
            let width = shifts.iter().map(|s| s.testers.len()).max().unwrap_or(0);
            let mut header = vec!["date".to_string(), "location".to_string(), "weekday".to_string(), "iso_week".to_string(), "team_index".to_string()];
            for i in 1..=width {
                header.push(format!("tester_{i}"));
            }
            writer.write_record(&header)?;
            for shift in shifts {
                let mut row = vec![
                    shift.date.to_string(),
                    shift.location.clone(),
                    shift.weekday.to_string(),
                    format!("{}-W{:02}", shift.iso_week.year, shift.iso_week.week),
                    shift.team_index.to_string(),
                ];
                for i in 0..width {
                    row.push(shift.testers.get(i).cloned().unwrap_or_default());
                }
                writer.write_record(&row)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Reads back a filled-shift export written by either column shape.
pub fn import_filled_shifts_csv(path: &Path) -> Result<Vec<FilledShift>> {
    use crate::domain::IsoWeek;

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let bracketed = headers.iter().any(|h| h == "testers");
    let split_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with("tester_"))
        .map(|(i, _)| i)
        .collect();

    let idx = |name: &str| headers.iter().position(|h| h == name);
    let date_idx = idx("date").ok_or_else(|| crate::error::RosterError::InputValidation("missing 'date' column".to_string()))?;
    let location_idx = idx("location").ok_or_else(|| crate::error::RosterError::InputValidation("missing 'location' column".to_string()))?;
    let iso_week_idx = idx("iso_week");
    let team_idx = idx("team_index");
    let testers_idx = idx("testers");

    let mut out = Vec::new();
    for result in reader.records() {
        let record = result?;
        let date: chrono::NaiveDate = record.get(date_idx).unwrap_or("").parse().map_err(|_| {
            crate::error::RosterError::InputValidation(format!("bad date: {}", record.get(date_idx).unwrap_or("")))
        })?;
        let location = record.get(location_idx).unwrap_or("").to_string();
        let iso_week = iso_week_idx
            .and_then(|i| record.get(i))
            .and_then(parse_iso_week)
            .unwrap_or_else(|| IsoWeek::of(date));
        let team_index = team_idx
            .and_then(|i| record.get(i))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let testers = if bracketed {
            testers_idx.and_then(|i| record.get(i)).map(parse_bracketed).unwrap_or_default()
        } else {
            split_columns
                .iter()
                .filter_map(|&i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        out.push(FilledShift {
            location,
            date,
            weekday: crate::domain::weekday_name(date),
            iso_week,
            team_index,
            testers,
        });
    }
    Ok(out)
}

fn parse_iso_week(s: &str) -> Option<crate::domain::IsoWeek> {
    let (year_s, week_s) = s.split_once("-W")?;
    Some(crate::domain::IsoWeek {
        year: year_s.parse().ok()?,
        week: week_s.parse().ok()?,
    })
}

/// Writes the long-form penalty breakdown.
pub fn export_penalty_breakdown_csv(path: &Path, rows: &[PenaltyRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["component", "person", "scope", "units", "weighted"])?;
    for row in rows {
        writer.write_record([
            row.component.to_string(),
            row.person.clone(),
            row.scope.clone(),
            row.units.to_string(),
            row.weighted.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the compact per-component summary, plus a trailing `__total__` row.
pub fn export_penalty_summary_csv(path: &Path, rows: &[PenaltyRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["component", "weighted_total"])?;

    let mut seen: BTreeSet<&'static str> = BTreeSet::new();
    let mut order: Vec<&'static str> = Vec::new();
    for row in rows {
        if seen.insert(row.component) {
            order.push(row.component);
        }
    }
    let mut total = 0i64;
    for component in order {
        let sum: i64 = rows.iter().filter(|r| r.component == component).map(|r| r.weighted).sum();
        total += sum;
        writer.write_record([component.to_string(), sum.to_string()])?;
    }
    writer.write_record(["__total__".to_string(), total.to_string()])?;
    writer.flush()?;
    Ok(())
}

/// Writes unplanned-day diagnostics.
pub fn export_diagnostics_csv(path: &Path, rows: &[DiagnosticRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "date",
        "location",
        "required",
        "assigned",
        "available",
        "available_senior",
        "available_peer",
        "reason",
        "c_availability",
        "c_max_per_day",
        "c_max_per_week",
        "c_single_first",
        "c_exclusions",
    ])?;
    for row in rows {
        writer.write_record([
            row.date.to_string(),
            row.location.clone(),
            row.required.to_string(),
            row.assigned.to_string(),
            row.available.to_string(),
            row.available_senior.to_string(),
            row.available_peer.to_string(),
            row.reason.clone(),
            row.c_availability.to_string(),
            row.c_max_per_day.to_string(),
            row.c_max_per_week.to_string(),
            row.c_single_first.to_string(),
            row.c_exclusions.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IsoWeek;

    fn sample_shift(testers: Vec<&str>) -> FilledShift {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        FilledShift {
            location: "Utrecht".to_string(),
            date,
            weekday: crate::domain::weekday_name(date),
            iso_week: IsoWeek::of(date),
            team_index: 0,
            testers: testers.into_iter().map(str::to_string).collect(),
        }
    }

    #[test]
    fn bracketed_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracketed.csv");
        let shifts = vec![sample_shift(vec!["Amy", "Beth"])];
        export_filled_shifts_csv(&path, &shifts, TestersColumnShape::Bracketed).unwrap();
        let back = import_filled_shifts_csv(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].testers, vec!["Amy".to_string(), "Beth".to_string()]);
    }

    #[test]
    fn split_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split.csv");
        let shifts = vec![sample_shift(vec!["Amy"]), sample_shift(vec!["Beth", "Carl"])];
        export_filled_shifts_csv(&path, &shifts, TestersColumnShape::Split).unwrap();
        let back = import_filled_shifts_csv(&path).unwrap();
        assert_eq!(back[0].testers, vec!["Amy".to_string()]);
        assert_eq!(back[1].testers, vec!["Beth".to_string(), "Carl".to_string()]);
    }

    #[test]
    fn summary_aggregates_by_component() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let rows = vec![
            PenaltyRow { component: "location", person: "Amy".to_string(), scope: "total".to_string(), units: 2, weighted: 2 },
            PenaltyRow { component: "location", person: "Beth".to_string(), scope: "total".to_string(), units: 1, weighted: 1 },
            PenaltyRow { component: "monthly", person: "Amy".to_string(), scope: "month 1".to_string(), units: 1, weighted: 5 },
        ];
        export_penalty_summary_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("location,3"));
        assert!(text.contains("monthly,5"));
        assert!(text.contains("__total__,8"));
    }
}
