//! Diagnoses why a day/location could not be fully staffed.
//!
//! Lightweight on purpose: when the model is infeasible (or only partially
//! satisfied within the time limit) this inspects per-(date, location)
//! coverage against availability and flags the likely culprit constraints,
//! rather than extracting an unsatisfiable core from the solver.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::context::SolveContext;
use crate::domain::Role;
use crate::solver::{SolveRun, SolveStatus};

/// One under-staffed (date, location) pair and the constraints most likely
/// responsible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticRow {
    pub date: NaiveDate,
    pub location: String,
    pub required: u32,
    pub assigned: u32,
    pub available: u32,
    pub available_senior: u32,
    pub available_peer: u32,
    pub reason: String,
    pub c_availability: bool,
    pub c_max_per_day: bool,
    pub c_max_per_week: bool,
    pub c_single_first: bool,
    pub c_exclusions: bool,
}

/// Builds diagnostic rows for every (date, location) where required staffing
/// was not met, or for every slot when the solve found no solution at all.
pub fn diagnose(ctx: &SolveContext, model: &crate::model::AssignmentModel, run: &SolveRun) -> Vec<DiagnosticRow> {
    let mut required: HashMap<(NaiveDate, &str), u32> = HashMap::new();
    for slot in &ctx.slots {
        *required.entry((slot.date, slot.location.as_str())).or_insert(0) += slot.headcount;
    }

    let mut available_senior: HashMap<(NaiveDate, &str), u32> = HashMap::new();
    let mut available_peer: HashMap<(NaiveDate, &str), u32> = HashMap::new();
    for person in &ctx.persons {
        for &(date, location) in required.keys() {
            if !person.is_available(date) {
                continue;
            }
            let consider = if person.pref_location_flags.is_empty() {
                true
            } else {
                person.location_flag(location) != crate::domain::LocationFlag::Forbidden
            };
            if !consider {
                continue;
            }
            let bucket = if person.role.is_senior() {
                &mut available_senior
            } else {
                &mut available_peer
            };
            *bucket.entry((date, location)).or_insert(0) += 1;
        }
    }

    let mut assigned: HashMap<(NaiveDate, &str), u32> = HashMap::new();
    if run.status.has_solution() {
        for (s_idx, slot) in ctx.slots.iter().enumerate() {
            for person in &ctx.persons {
                if model.var(person.index, s_idx).solution_value(&run.response) {
                    *assigned.entry((slot.date, slot.location.as_str())).or_insert(0) += 1;
                }
            }
        }
    }

    let mut tester_weeks: HashMap<usize, HashMap<crate::domain::IsoWeek, u32>> = HashMap::new();
    if run.status.has_solution() {
        for person in &ctx.persons {
            for (week, slot_indices) in &ctx.week_to_slots {
                let count = slot_indices
                    .iter()
                    .filter(|&&s_idx| model.var(person.index, s_idx).solution_value(&run.response))
                    .count() as u32;
                tester_weeks.entry(person.index).or_default().insert(*week, count);
            }
        }
    }

    let mut rows = Vec::new();
    let mut keys: Vec<(NaiveDate, &str)> = required.keys().copied().collect();
    keys.sort();
    for key @ (date, location) in keys {
        let req = required[&key];
        if req == 0 {
            continue;
        }
        let got = *assigned.get(&key).unwrap_or(&0);
        if run.status.has_solution() && got >= req {
            continue;
        }
        let senior = *available_senior.get(&key).unwrap_or(&0);
        let peer = *available_peer.get(&key).unwrap_or(&0);
        let available = senior + peer;

        let mut reasons = Vec::new();
        let mut c_availability = false;
        let mut c_max_per_day = false;
        let mut c_max_per_week = false;
        let mut c_single_first = false;
        let mut c_exclusions = false;

        if available == 0 {
            reasons.push("no testers available for this location on this date");
            c_availability = true;
        } else if available * 2 < req {
            reasons.push("too few available testers relative to the number of teams required");
            c_availability = true;
        }

        if got < req && available > 0 {
            c_max_per_day = true;
        }

        if run.status.has_solution() {
            if let Some(week) = ctx
                .slots
                .iter()
                .find(|s| s.date == date && s.location == location)
                .map(|s| s.iso_week)
            {
                let capped = ctx
                    .persons
                    .iter()
                    .filter(|p| {
                        tester_weeks
                            .get(&p.index)
                            .and_then(|weeks| weeks.get(&week))
                            .copied()
                            .unwrap_or(0)
                            >= 2
                    })
                    .count();
                if capped > 0 && got < req {
                    c_max_per_week = true;
                }
            }
        }

        if !c_availability && got < req {
            c_single_first = true;
            c_exclusions = true;
        }

        if reasons.is_empty() {
            reasons.push("likely conflict among max-per-day/week, single-senior, or exclusion constraints");
        }

        rows.push(DiagnosticRow {
            date,
            location: location.to_string(),
            required: req,
            assigned: got,
            available,
            available_senior: senior,
            available_peer: peer,
            reason: reasons.join("; "),
            c_availability,
            c_max_per_day,
            c_max_per_week,
            c_single_first,
            c_exclusions,
        });
    }
    rows
}

/// Counts persons in a given role, used by callers reporting solve summaries.
pub fn role_counts(ctx: &SolveContext) -> (usize, usize) {
    let seniors = ctx.persons.iter().filter(|p| p.role == Role::Senior).count();
    (seniors, ctx.persons.len() - seniors)
}

pub fn status_is_unsolved(status: SolveStatus) -> bool {
    !status.has_solution()
}
