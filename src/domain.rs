//! Domain model for the roster scheduling problem.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A person's role on a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Senior / "first" tester. Authorized to act alone on a shift.
    #[serde(rename = "T")]
    Senior,
    /// Peer. Pairs with a senior.
    #[serde(rename = "P")]
    Peer,
}

impl Role {
    pub fn is_senior(&self) -> bool {
        matches!(self, Role::Senior)
    }
}

/// Per-(person, location) preference flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationFlag {
    /// Flag 0: hard ban, the person can never be assigned there.
    Forbidden,
    /// Flag 1: allowed, but penalized in the soft objective.
    Penalized,
    /// Flag 2: no penalty. The default when a location is unlisted.
    Neutral,
}

impl LocationFlag {
    pub fn from_raw(v: i64) -> Self {
        match v {
            0 => LocationFlag::Forbidden,
            1 => LocationFlag::Penalized,
            _ => LocationFlag::Neutral,
        }
    }
}

/// A person who can be assigned to shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Index of this person in `SolveContext.persons` for O(1) lookup.
    #[serde(skip)]
    pub index: usize,
    pub name: String,
    pub role: Role,
    /// Missing date defaults to available.
    #[serde(default)]
    pub availability: HashMap<NaiveDate, bool>,
    /// Missing location defaults to `Neutral`.
    #[serde(default)]
    pub pref_location_flags: HashMap<String, LocationFlag>,
    /// Legacy scalar preferred-location field. Only consulted by T1/T7 when
    /// `pref_location_flags` is empty for this person entirely.
    #[serde(default)]
    pub pref_location: Option<String>,
    pub month_max: u32,
    pub month_avg: u32,
}

impl Person {
    pub fn new(index: usize, name: impl Into<String>, role: Role) -> Self {
        Self {
            index,
            name: name.into(),
            role,
            availability: HashMap::new(),
            pref_location_flags: HashMap::new(),
            pref_location: None,
            month_max: 0,
            month_avg: 0,
        }
    }

    /// Availability on a date, defaulting to `true` when unspecified.
    pub fn is_available(&self, date: NaiveDate) -> bool {
        self.availability.get(&date).copied().unwrap_or(true)
    }

    /// The preference flag for a location, defaulting to `Neutral`.
    pub fn location_flag(&self, location: &str) -> LocationFlag {
        self.pref_location_flags
            .get(location)
            .copied()
            .unwrap_or(LocationFlag::Neutral)
    }

    /// `true` when this location should be penalized for this person, applying
    /// the legacy `pref_location` fallback when `pref_location_flags` is empty.
    pub fn penalized_at(&self, location: &str) -> bool {
        if self.pref_location_flags.is_empty() {
            self.pref_location
                .as_deref()
                .is_some_and(|preferred| preferred != location)
        } else {
            self.location_flag(location) == LocationFlag::Penalized
        }
    }
}

/// A location where shifts take place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default = "default_true")]
    pub allow_tester: bool,
    #[serde(default = "default_true")]
    pub allow_peer: bool,
    /// Number of teams required on each date. Dates absent from this map
    /// contribute no shift slots.
    #[serde(default)]
    pub teams_per_date: HashMap<NaiveDate, u32>,
}

fn default_true() -> bool {
    true
}

impl Location {
    /// Persons required per team instance: 1 if peers are disallowed, else 2.
    pub fn headcount(&self) -> u32 {
        if self.allow_peer {
            2
        } else {
            1
        }
    }
}

/// One required team instance at a (date, location).
///
/// `team_index` distinguishes multiple teams on the same (date, location);
/// it ranges over `0 .. teams_required`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub location: String,
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub iso_week: IsoWeek,
    pub team_index: u32,
    /// Persons required to staff this slot (1 or 2).
    pub headcount: u32,
}

/// `(iso_year, iso_week_number)`, as defined by ISO 8601.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IsoWeek {
    pub year: i32,
    pub week: u32,
}

impl IsoWeek {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        IsoWeek {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    use chrono::Datelike;
    match date.weekday() {
        chrono::Weekday::Mon => "mon",
        chrono::Weekday::Tue => "tue",
        chrono::Weekday::Wed => "wed",
        chrono::Weekday::Thu => "thu",
        chrono::Weekday::Fri => "fri",
        chrono::Weekday::Sat => "sat",
        chrono::Weekday::Sun => "sun",
    }
}

/// Builds the full, index-stable list of shift slots from a set of locations.
///
/// Slots are emitted in `locations` order, then date order, then team index,
/// matching the caller-provided sort that the rest of the core relies on for
/// determinism.
pub fn build_shift_slots(locations: &[Location]) -> Vec<ShiftSlot> {
    let mut slots = Vec::new();
    for location in locations {
        let mut dates: Vec<&NaiveDate> = location.teams_per_date.keys().collect();
        dates.sort();
        for date in dates {
            let required = location.teams_per_date[date];
            for team_index in 0..required {
                slots.push(ShiftSlot {
                    location: location.name.clone(),
                    date: *date,
                    weekday: weekday_name(*date),
                    iso_week: IsoWeek::of(*date),
                    team_index,
                    headcount: location.headcount(),
                });
            }
        }
    }
    slots
}

/// One filled shift in the projected result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledShift {
    pub location: String,
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub iso_week: IsoWeek,
    pub team_index: u32,
    /// Assigned persons, in person-input order (not solver order).
    pub testers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(name: &str, allow_peer: bool, dates: &[(&str, u32)]) -> Location {
        Location {
            name: name.to_string(),
            allow_tester: true,
            allow_peer,
            teams_per_date: dates
                .iter()
                .map(|(d, c)| (d.parse().unwrap(), *c))
                .collect(),
        }
    }

    #[test]
    fn shift_slots_are_sorted_and_counted() {
        let locations = vec![loc(
            "Utrecht",
            true,
            &[("2026-01-05", 2), ("2026-01-01", 1)],
        )];
        let slots = build_shift_slots(&locations);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].date.to_string(), "2026-01-01");
        assert_eq!(slots[0].team_index, 0);
        assert_eq!(slots[1].date.to_string(), "2026-01-05");
        assert_eq!(slots[1].team_index, 0);
        assert_eq!(slots[2].team_index, 1);
        assert_eq!(slots[0].headcount, 2);
    }

    #[test]
    fn peer_less_location_requires_one_headcount() {
        let locations = vec![loc("Solo", false, &[("2026-01-01", 1)])];
        let slots = build_shift_slots(&locations);
        assert_eq!(slots[0].headcount, 1);
    }

    #[test]
    fn penalized_at_falls_back_to_legacy_pref_location() {
        let mut p = Person::new(0, "Amy", Role::Peer);
        p.pref_location = Some("Utrecht".to_string());
        assert!(p.penalized_at("Amersfoort"));
        assert!(!p.penalized_at("Utrecht"));

        p.pref_location_flags
            .insert("Amersfoort".to_string(), LocationFlag::Neutral);
        // Flags present (even partially) disable the legacy fallback entirely.
        assert!(!p.penalized_at("Amersfoort"));
    }
}
