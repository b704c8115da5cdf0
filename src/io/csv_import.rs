//! Person CSV import.
//!
//! Accepts comma, tab, or semicolon delimited files with a BOM-stripped
//! UTF-8 header row. Recognizes `Name`/`name`, `Tester`/`tester`, the legacy
//! scalar `Pref_Loc` column, dynamically-numbered `Pref_Loc_<n>` columns (one
//! per configured location, in `location_names` order), `Month_max`,
//! `Month_avg`, and any column whose header looks like a `day-month` date.

use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{LocationFlag, Person, Role};
use crate::error::{Result, RosterError};

const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b'\t', b';'];

/// Reads a person roster from `path`. `location_names` must be given in the
/// same order as the `Pref_Loc_<n>` columns were generated; `default_year`
/// fills in the year part of bare `day-month` date columns.
pub fn import_persons_csv(path: &Path, location_names: &[String], default_year: i32) -> Result<Vec<Person>> {
    let raw = std::fs::read_to_string(path)?;
    let content = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    let delimiter = sniff_delimiter(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut persons = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let get = |key: &str| -> Option<&str> {
            headers.iter().position(|h| h == key).and_then(|i| record.get(i))
        };
        let get_ci = |names: &[&str]| -> Option<&str> {
            names.iter().find_map(|n| get(n))
        };

        let name = get_ci(&["Name", "name"]).unwrap_or("").trim().to_string();
        if name.is_empty() {
            return Err(RosterError::InputValidation(format!(
                "CSV row {row_idx}: missing or empty 'Name' column"
            )));
        }

        let tester_val = get_ci(&["Tester", "tester"]).unwrap_or("").trim();
        let role = if tester_val.eq_ignore_ascii_case("true") || tester_val == "1" {
            Role::Senior
        } else {
            Role::Peer
        };

        let pref_loc = get("Pref_Loc").map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        let mut pref_location_flags = std::collections::HashMap::new();
        for (idx, loc_name) in location_names.iter().enumerate() {
            let col = format!("Pref_Loc_{idx}");
            let flag = get(&col)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|s| s.parse::<i64>().ok())
                .map(LocationFlag::from_raw)
                .unwrap_or(LocationFlag::Neutral);
            pref_location_flags.insert(loc_name.clone(), flag);
        }

        let month_max = get("Month_max").and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0);
        let month_avg = get("Month_avg").and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0);

        let mut availability = std::collections::HashMap::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if let Some(date) = parse_date_field(header, default_year) {
                let raw_val = record.get(col_idx).unwrap_or("");
                availability.insert(date, to_bool(raw_val));
            }
        }

        let mut person = Person::new(persons.len(), name, role);
        person.availability = availability;
        person.pref_location_flags = pref_location_flags;
        person.pref_location = pref_loc;
        person.month_max = month_max;
        person.month_avg = month_avg;
        persons.push(person);
    }

    Ok(persons)
}

fn sniff_delimiter(sample: &str) -> u8 {
    let first_line = sample.lines().next().unwrap_or("");
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .max_by_key(|&d| first_line.bytes().filter(|&b| b == d).count())
        .filter(|&d| first_line.bytes().any(|b| b == d))
        .unwrap_or(b',')
}

fn to_bool(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "ja"
    )
}

/// Matches headers like `1-11` or `12-1` (day-month, 1..=31 / 1..=12, optional
/// leading zero) and resolves them against `default_year`.
fn parse_date_field(header: &str, default_year: i32) -> Option<NaiveDate> {
    let (day_s, month_s) = header.trim().split_once('-')?;
    let day: u32 = day_s.parse().ok()?;
    let month: u32 = month_s.parse().ok()?;
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    NaiveDate::from_ymd_opt(default_year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_basic_columns() {
        let csv_text = "Name,Tester,Pref_Loc_0,Pref_Loc_1,Month_max,Month_avg,1-1,2-1\n\
                         Amy,TRUE,0,2,4,3,TRUE,FALSE\n";
        let tmp = write_temp(csv_text);
        let locations = vec!["Utrecht".to_string(), "Amersfoort".to_string()];
        let persons = import_persons_csv(tmp.path(), &locations, 2025).unwrap();
        assert_eq!(persons.len(), 1);
        let p = &persons[0];
        assert_eq!(p.name, "Amy");
        assert!(p.role.is_senior());
        assert_eq!(p.location_flag("Utrecht"), LocationFlag::Forbidden);
        assert_eq!(p.location_flag("Amersfoort"), LocationFlag::Neutral);
        assert_eq!(p.month_max, 4);
        assert_eq!(p.month_avg, 3);
        assert!(p.is_available(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(!p.is_available(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()));
    }

    #[test]
    fn rejects_missing_name() {
        let tmp = write_temp("Name,Tester\n,FALSE\n");
        let err = import_persons_csv(tmp.path(), &[], 2025).unwrap_err();
        assert!(matches!(err, RosterError::InputValidation(_)));
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let tmp = write_temp("Name;Tester\nBeth;FALSE\n");
        let persons = import_persons_csv(tmp.path(), &[], 2025).unwrap();
        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].name, "Beth");
    }

    #[test]
    fn defaults_unnumbered_location_flag_to_neutral() {
        let tmp = write_temp("Name,Tester\nCarl,FALSE\n");
        let locations = vec!["Utrecht".to_string()];
        let persons = import_persons_csv(tmp.path(), &locations, 2025).unwrap();
        assert_eq!(persons[0].location_flag("Utrecht"), LocationFlag::Neutral);
    }
}
