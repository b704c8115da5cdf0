//! Hard constraints over the assignment grid (H1..H8).
//!
//! Each function adds linear constraints directly to the model builder; none
//! of them return a value, mirroring how the original per-constraint
//! functions mutate a shared model in place.

use std::collections::HashMap;

use cp_sat::builder::{BoolVar, LinearExpr};

use crate::context::SolveContext;
use crate::domain::LocationFlag;
use crate::model::AssignmentModel;
use crate::weights::{EnabledSet, HardConstraint};

/// Sums a set of boolean decision variables into a linear expression.
fn sum_vars<'a>(vars: impl IntoIterator<Item = &'a BoolVar>) -> LinearExpr {
    vars.into_iter()
        .fold(LinearExpr::from(0), |acc, v| acc + LinearExpr::from(v.clone()))
}

/// A pair of person indices that may never share a shift on the same date.
#[derive(Debug, Clone, Copy)]
pub struct Exclusion {
    pub a: usize,
    pub b: usize,
}

/// Adds every enabled hard constraint to `model`.
pub fn apply_constraints(
    model: &mut AssignmentModel,
    ctx: &SolveContext,
    enabled: &EnabledSet<HardConstraint>,
    week_max: u32,
    exclusions: &[Exclusion],
) {
    if enabled.contains(HardConstraint::Availability) {
        add_availability_constraints(model, ctx);
    }
    if enabled.contains(HardConstraint::MaxPerDay) {
        add_max_shifts_per_day_constraints(model, ctx);
    }
    if enabled.contains(HardConstraint::ExactTesters) {
        add_exact_headcount_constraints(model, ctx);
    }
    if enabled.contains(HardConstraint::MinFirst) {
        add_minimum_senior_per_shift_constraints(model, ctx);
    }
    if enabled.contains(HardConstraint::MaxPerWeek) {
        add_max_shifts_per_week_constraints(model, ctx, week_max);
    }
    if enabled.contains(HardConstraint::SingleFirst) {
        add_single_senior_constraints(model, ctx);
        add_mutual_exclusion_constraints(model, ctx, exclusions);
    }
}

/// H1 + H2: unavailable dates and hard-banned locations force `x[p, s] = 0`.
fn add_availability_constraints(model: &mut AssignmentModel, ctx: &SolveContext) {
    for (p_idx, person) in ctx.persons.iter().enumerate() {
        for (s_idx, slot) in ctx.slots.iter().enumerate() {
            let banned = person.location_flag(&slot.location) == LocationFlag::Forbidden;
            if !person.is_available(slot.date) || banned {
                model
                    .builder
                    .add_eq(model.var(p_idx, s_idx).clone(), LinearExpr::from(0));
            }
        }
    }
}

/// H3: at most one shift per person per calendar date.
fn add_max_shifts_per_day_constraints(model: &mut AssignmentModel, ctx: &SolveContext) {
    for (p_idx, _) in ctx.persons.iter().enumerate() {
        for slot_indices in ctx.date_to_slots.values() {
            let expr = sum_vars(slot_indices.iter().map(|&s_idx| model.var(p_idx, s_idx)));
            model.builder.add_le(expr, LinearExpr::from(1));
        }
    }
}

/// H4: every shift is staffed with exactly its required headcount.
fn add_exact_headcount_constraints(model: &mut AssignmentModel, ctx: &SolveContext) {
    for (s_idx, slot) in ctx.slots.iter().enumerate() {
        let expr = sum_vars((0..ctx.person_count()).map(|p_idx| model.var(p_idx, s_idx)));
        model
            .builder
            .add_eq(expr, LinearExpr::from(slot.headcount as i64));
    }
}

/// H5: at least one senior on every shift.
fn add_minimum_senior_per_shift_constraints(model: &mut AssignmentModel, ctx: &SolveContext) {
    let senior_idx: Vec<usize> = ctx
        .persons
        .iter()
        .filter(|p| p.role.is_senior())
        .map(|p| p.index)
        .collect();
    for s_idx in 0..ctx.slot_count() {
        let expr = sum_vars(senior_idx.iter().map(|&p_idx| model.var(p_idx, s_idx)));
        model.builder.add_ge(expr, LinearExpr::from(1));
    }
}

/// H7: at most `week_max` shifts per person per ISO week.
fn add_max_shifts_per_week_constraints(model: &mut AssignmentModel, ctx: &SolveContext, week_max: u32) {
    for p_idx in 0..ctx.person_count() {
        for slot_indices in ctx.week_to_slots.values() {
            let expr = sum_vars(slot_indices.iter().map(|&s_idx| model.var(p_idx, s_idx)));
            model.builder.add_le(expr, LinearExpr::from(week_max as i64));
        }
    }
}

/// H6: at most one senior per shift, unless no peer is available that date
/// (a static, input-derived condition, not a decision-variable guard).
fn add_single_senior_constraints(model: &mut AssignmentModel, ctx: &SolveContext) {
    let senior_idx: Vec<usize> = ctx
        .persons
        .iter()
        .filter(|p| p.role.is_senior())
        .map(|p| p.index)
        .collect();
    let peers: Vec<&crate::domain::Person> = ctx
        .persons
        .iter()
        .filter(|p| !p.role.is_senior())
        .collect();

    for (s_idx, slot) in ctx.slots.iter().enumerate() {
        let any_peer_available = peers.iter().any(|p| p.is_available(slot.date));
        if !any_peer_available {
            continue;
        }
        let expr = sum_vars(senior_idx.iter().map(|&p_idx| model.var(p_idx, s_idx)));
        model.builder.add_le(expr, LinearExpr::from(1));
    }
}

/// H8: two excluded persons never both work on the same date.
fn add_mutual_exclusion_constraints(
    model: &mut AssignmentModel,
    ctx: &SolveContext,
    exclusions: &[Exclusion],
) {
    for pair in exclusions {
        if pair.a >= ctx.person_count() || pair.b >= ctx.person_count() {
            continue;
        }
        for slot_indices in ctx.date_to_slots.values() {
            let expr = sum_vars(
                slot_indices
                    .iter()
                    .flat_map(|&s_idx| [model.var(pair.a, s_idx), model.var(pair.b, s_idx)]),
            );
            model.builder.add_le(expr, LinearExpr::from(1));
        }
    }
}

/// Resolves exclusion name pairs against the context's person list, silently
/// dropping pairs that reference an unknown name (mirroring the reference
/// source's tolerant `if a not in name_to_idx: continue`).
pub fn resolve_exclusions(ctx: &SolveContext, pairs: &[(String, String)]) -> Vec<Exclusion> {
    let name_to_idx: HashMap<&str, usize> = ctx
        .persons
        .iter()
        .map(|p| (p.name.as_str(), p.index))
        .collect();
    pairs
        .iter()
        .filter_map(|(a, b)| {
            let a_idx = *name_to_idx.get(a.as_str())?;
            let b_idx = *name_to_idx.get(b.as_str())?;
            Some(Exclusion { a: a_idx, b: b_idx })
        })
        .collect()
}
