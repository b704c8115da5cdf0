//! Bundles the inputs to a solve into one immutable, passed-by-reference
//! context, with the derived date->month/week indices computed once.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{build_shift_slots, IsoWeek, Location, Person, ShiftSlot};
use crate::error::{Result, RosterError};

/// Everything a solve needs, computed once up front. Passed by reference to
/// every stage of the pipeline; nothing here is mutated after construction.
#[derive(Debug, Clone)]
pub struct SolveContext {
    pub persons: Vec<Person>,
    pub locations: Vec<Location>,
    pub slots: Vec<ShiftSlot>,
    /// month number (1..=12) -> indices into `slots`.
    pub month_to_slots: HashMap<u32, Vec<usize>>,
    /// ISO (year, week) -> indices into `slots`.
    pub week_to_slots: HashMap<IsoWeek, Vec<usize>>,
    /// date -> indices into `slots`, for the daily-cap constraint.
    pub date_to_slots: HashMap<NaiveDate, Vec<usize>>,
}

impl SolveContext {
    /// Builds a context from raw persons and locations, validating names and
    /// reassigning stable person indices in input order.
    pub fn build(mut persons: Vec<Person>, locations: Vec<Location>) -> Result<Self> {
        if persons.is_empty() {
            return Err(RosterError::InputValidation(
                "at least one person is required".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for (i, p) in persons.iter_mut().enumerate() {
            p.index = i;
            if p.name.trim().is_empty() {
                return Err(RosterError::InputValidation(format!(
                    "person at index {i} has an empty name"
                )));
            }
            if !seen.insert(p.name.clone()) {
                return Err(RosterError::InputValidation(format!(
                    "duplicate person name: {}",
                    p.name
                )));
            }
        }

        let slots = build_shift_slots(&locations);

        let mut month_to_slots: HashMap<u32, Vec<usize>> = HashMap::new();
        let mut week_to_slots: HashMap<IsoWeek, Vec<usize>> = HashMap::new();
        let mut date_to_slots: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
        for (idx, slot) in slots.iter().enumerate() {
            month_to_slots.entry(slot.date.month()).or_default().push(idx);
            week_to_slots.entry(slot.iso_week).or_default().push(idx);
            date_to_slots.entry(slot.date).or_default().push(idx);
        }

        Ok(SolveContext {
            persons,
            locations,
            slots,
            month_to_slots,
            week_to_slots,
            date_to_slots,
        })
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct calendar months spanned by the shift list, used to
    /// scale the monthly-average target.
    pub fn month_count(&self) -> usize {
        let mut ym: std::collections::HashSet<(i32, u32)> = std::collections::HashSet::new();
        for slot in &self.slots {
            ym.insert((slot.date.year(), slot.date.month()));
        }
        ym.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn loc(name: &str, dates: &[&str]) -> Location {
        Location {
            name: name.to_string(),
            allow_tester: true,
            allow_peer: true,
            teams_per_date: dates.iter().map(|d| (d.parse().unwrap(), 1)).collect(),
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let persons = vec![
            Person::new(0, "Amy", Role::Senior),
            Person::new(1, "Amy", Role::Peer),
        ];
        let err = SolveContext::build(persons, vec![]).unwrap_err();
        assert!(matches!(err, RosterError::InputValidation(_)));
    }

    #[test]
    fn indexes_slots_by_month_week_and_date() {
        let persons = vec![Person::new(0, "Amy", Role::Senior)];
        let locations = vec![loc("Utrecht", &["2026-01-05", "2026-02-01"])];
        let ctx = SolveContext::build(persons, locations).unwrap();
        assert_eq!(ctx.slot_count(), 2);
        assert_eq!(ctx.month_count(), 2);
        assert_eq!(ctx.month_to_slots.get(&1).unwrap().len(), 1);
        assert_eq!(ctx.month_to_slots.get(&2).unwrap().len(), 1);
    }
}
