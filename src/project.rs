//! Projects a solved model back into domain-shaped results: the filled
//! shift list and a penalty breakdown, one row per non-zero soft-term
//! instance.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::context::SolveContext;
use crate::domain::FilledShift;
use crate::objective::monthly_avg_term_cost;
use crate::solver::SolveRun;

/// One non-zero contribution to the objective, attributable to a single
/// person (and, where relevant, a month/week scope).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyRow {
    pub component: &'static str,
    pub person: String,
    pub scope: String,
    pub units: i64,
    pub weighted: i64,
}

/// Builds the filled-shift list from a solved assignment grid, in slot
/// order with each slot's `testers` emitted in person-input order.
pub fn project_filled_shifts(
    ctx: &SolveContext,
    model: &crate::model::AssignmentModel,
    run: &SolveRun,
) -> Vec<FilledShift> {
    ctx.slots
        .iter()
        .enumerate()
        .map(|(s_idx, slot)| {
            let testers = ctx
                .persons
                .iter()
                .enumerate()
                .filter(|(p_idx, _)| model.var(*p_idx, s_idx).solution_value(&run.response))
                .map(|(_, person)| person.name.clone())
                .collect();
            FilledShift {
                location: slot.location.clone(),
                date: slot.date,
                weekday: slot.weekday,
                iso_week: slot.iso_week,
                team_index: slot.team_index,
                testers,
            }
        })
        .collect()
}

/// Rebuilds the T1..T7 penalty breakdown by inspecting the solved assignment
/// grid directly, rather than reading back the auxiliary model variables
/// (which is equivalent but keeps this module independent from the exact
/// shape of objective.rs's internal variables).
pub fn project_penalty_breakdown(
    ctx: &SolveContext,
    model: &crate::model::AssignmentModel,
    run: &SolveRun,
    weights: &crate::weights::Weights,
) -> Vec<PenaltyRow> {
    let assigned = |p_idx: usize, s_idx: usize| model.var(p_idx, s_idx).solution_value(&run.response);

    let mut rows = Vec::new();

    // T1: location preference penalty, per person.
    for person in &ctx.persons {
        let units: i64 = ctx
            .slots
            .iter()
            .enumerate()
            .filter(|(s_idx, slot)| person.penalized_at(&slot.location) && assigned(person.index, *s_idx))
            .count() as i64;
        if units > 0 {
            rows.push(PenaltyRow {
                component: "location",
                person: person.name.clone(),
                scope: "total".to_string(),
                units,
                weighted: units * weights.location,
            });
        }
    }

    // T3: monthly cap excess, per (person, month).
    for person in &ctx.persons {
        for (month, slot_indices) in &ctx.month_to_slots {
            let count = slot_indices
                .iter()
                .filter(|&&s_idx| assigned(person.index, s_idx))
                .count() as i64;
            let excess = (count - person.month_max as i64).max(0);
            if excess > 0 {
                rows.push(PenaltyRow {
                    component: "monthly",
                    person: person.name.clone(),
                    scope: format!("month {month}"),
                    units: excess,
                    weighted: excess * weights.monthly,
                });
            }
        }
    }

    // T4: monthly-average shortfall, per person, quadratic weighting.
    let n_months = ctx.month_count() as i64;
    for person in &ctx.persons {
        let assigned_total = ctx
            .slots
            .iter()
            .enumerate()
            .filter(|(s_idx, _)| assigned(person.index, *s_idx))
            .count() as i64;
        let target_total = person.month_avg as i64 * n_months;
        let deficit = (target_total - assigned_total).max(0);
        if deficit > 0 {
            rows.push(PenaltyRow {
                component: "monthly_avg",
                person: person.name.clone(),
                scope: "total".to_string(),
                units: deficit,
                weighted: monthly_avg_term_cost(weights.monthly_avg, deficit),
            });
        }
    }

    // T5: more than one shift in an ISO week, per (person, week).
    for person in &ctx.persons {
        for (week, slot_indices) in &ctx.week_to_slots {
            let count = slot_indices
                .iter()
                .filter(|&&s_idx| assigned(person.index, s_idx))
                .count() as i64;
            let excess = (count - 1).max(0);
            if excess > 0 {
                rows.push(PenaltyRow {
                    component: "weekly_multi",
                    person: person.name.clone(),
                    scope: format!("{}-W{:02}", week.year, week.week),
                    units: excess,
                    weighted: excess * weights.weekly_multi,
                });
            }
        }
    }

    // T6: available-but-unassigned month, per (person, month).
    for person in &ctx.persons {
        for (month, slot_indices) in &ctx.month_to_slots {
            let available_this_month = ctx
                .slots
                .iter()
                .any(|slot| slot.date.month() == *month && person.is_available(slot.date));
            if !available_this_month {
                continue;
            }
            let assigned_count = slot_indices
                .iter()
                .filter(|&&s_idx| assigned(person.index, s_idx))
                .count();
            if assigned_count == 0 {
                rows.push(PenaltyRow {
                    component: "monthly_min_avail",
                    person: person.name.clone(),
                    scope: format!("month {month}"),
                    units: 1,
                    weighted: weights.monthly_min_avail,
                });
            }
        }
    }

    // T2 / T7: fairness spans are global, not per-person; emit one summary
    // row each when non-zero.
    let counts: Vec<i64> = ctx
        .persons
        .iter()
        .map(|p| {
            ctx.slots
                .iter()
                .enumerate()
                .filter(|(s_idx, _)| assigned(p.index, *s_idx))
                .count() as i64
        })
        .collect();
    if let (Some(&max_c), Some(&min_c)) = (counts.iter().max(), counts.iter().min()) {
        let span = max_c - min_c;
        if span > 0 {
            rows.push(PenaltyRow {
                component: "fairness",
                person: "*".to_string(),
                scope: "total".to_string(),
                units: span,
                weighted: span * weights.fairness,
            });
        }
    }

    let loc_counts: Vec<i64> = ctx
        .persons
        .iter()
        .map(|p| {
            ctx.slots
                .iter()
                .enumerate()
                .filter(|(s_idx, slot)| p.penalized_at(&slot.location) && assigned(p.index, *s_idx))
                .count() as i64
        })
        .collect();
    if let (Some(&max_c), Some(&min_c)) = (loc_counts.iter().max(), loc_counts.iter().min()) {
        let span = max_c - min_c;
        if span > 0 {
            rows.push(PenaltyRow {
                component: "location_fairness",
                person: "*".to_string(),
                scope: "total".to_string(),
                units: span,
                weighted: span * weights.location_fairness(),
            });
        }
    }

    rows
}
