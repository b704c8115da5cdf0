//! Soft objective terms (T1..T7) built over the same assignment grid that
//! constraints.rs constrains.

use std::collections::HashMap;

use chrono::Datelike;
use cp_sat::builder::LinearExpr;

use crate::context::SolveContext;
use crate::domain::LocationFlag;
use crate::model::AssignmentModel;
use crate::weights::{EnabledSet, ObjectiveTerm, Weights};

/// Adds every enabled soft term to the model's minimization objective and
/// returns the per-term expressions, kept around for the penalty breakdown
/// projected after solving.
pub struct ObjectiveTerms {
    pub location: LinearExpr,
    pub fairness: LinearExpr,
    pub monthly: LinearExpr,
    pub monthly_avg: LinearExpr,
    pub weekly_multi: LinearExpr,
    pub monthly_min_avail: LinearExpr,
    pub location_fairness: LinearExpr,
}

pub fn apply_objective(
    model: &mut AssignmentModel,
    ctx: &SolveContext,
    weights: &Weights,
    enabled: &EnabledSet<ObjectiveTerm>,
) -> ObjectiveTerms {
    let location = build_location_penalty(model, ctx);
    let (max_shifts, min_shifts) = build_fairness_span(model, ctx);
    let fairness = max_shifts - min_shifts;
    let (max_loc_pen, min_loc_pen) = build_location_penalty_span(model, ctx);
    let location_fairness = max_loc_pen - min_loc_pen;
    let monthly = build_monthly_max_excess(model, ctx);
    let monthly_avg = build_monthly_avg_cost(model, ctx, weights.monthly_avg);
    let weekly_multi = build_weekly_multi_excess(model, ctx);
    let monthly_min_avail = build_monthly_min_avail_missing(model, ctx);

    let loc_fairness_w = weights.location_fairness();

    let mut expr = LinearExpr::from(0);
    if enabled.contains(ObjectiveTerm::Location) {
        expr = expr + location.clone() * weights.location;
    }
    if enabled.contains(ObjectiveTerm::Fairness) {
        expr = expr + fairness.clone() * weights.fairness;
    }
    if enabled.contains(ObjectiveTerm::LocationFairness) {
        expr = expr + location_fairness.clone() * loc_fairness_w;
    }
    if enabled.contains(ObjectiveTerm::Monthly) {
        expr = expr + monthly.clone() * weights.monthly;
    }
    if enabled.contains(ObjectiveTerm::MonthlyAvg) {
        // already scaled by monthly_avg weight inside build_monthly_avg_cost
        expr = expr + monthly_avg.clone();
    }
    if enabled.contains(ObjectiveTerm::WeeklyMulti) {
        expr = expr + weekly_multi.clone() * weights.weekly_multi;
    }
    if enabled.contains(ObjectiveTerm::MonthlyMinAvail) {
        expr = expr + monthly_min_avail.clone() * weights.monthly_min_avail;
    }
    model.builder.minimize(expr);

    ObjectiveTerms {
        location,
        fairness,
        monthly,
        monthly_avg,
        weekly_multi,
        monthly_min_avail,
        location_fairness,
    }
}

fn sum_vars<'a>(vars: impl IntoIterator<Item = &'a cp_sat::builder::BoolVar>) -> LinearExpr {
    vars.into_iter()
        .fold(LinearExpr::from(0), |acc, v| acc + LinearExpr::from(v.clone()))
}

/// True when a (person, location) pair should contribute to T1/T7, applying
/// the legacy `pref_location` fallback only when flags are entirely absent.
fn is_bad_location(person: &crate::domain::Person, location: &str) -> bool {
    person.penalized_at(location)
}

/// T1: sum of `x[p, s]` over pairs where the location is penalized for `p`.
fn build_location_penalty(model: &mut AssignmentModel, ctx: &SolveContext) -> LinearExpr {
    let mut terms = Vec::new();
    for (p_idx, person) in ctx.persons.iter().enumerate() {
        for (s_idx, slot) in ctx.slots.iter().enumerate() {
            if is_bad_location(person, &slot.location) {
                terms.push(model.var(p_idx, s_idx).clone());
            }
        }
    }
    sum_vars(terms.iter())
}

/// T2: `max_p c_p - min_p c_p` where `c_p` is total shifts assigned to `p`.
fn build_fairness_span(model: &mut AssignmentModel, ctx: &SolveContext) -> (LinearExpr, LinearExpr) {
    let n_slots = ctx.slot_count() as i64;
    let per_person: Vec<_> = (0..ctx.person_count())
        .map(|p_idx| {
            let count = model
                .builder
                .new_int_var(vec![(0, n_slots)]);
            let expr = sum_vars((0..ctx.slot_count()).map(|s_idx| model.var(p_idx, s_idx)));
            model.builder.add_eq(count.clone(), expr);
            count
        })
        .collect();
    let max_shifts = model.builder.new_int_var(vec![(0, n_slots)]);
    let min_shifts = model.builder.new_int_var(vec![(0, n_slots)]);
    model.builder.add_max_equality(max_shifts.clone(), per_person.clone());
    model.builder.add_min_equality(min_shifts.clone(), per_person);
    (LinearExpr::from(max_shifts), LinearExpr::from(min_shifts))
}

/// T7: same max/min span, but counting only penalized-location assignments.
fn build_location_penalty_span(
    model: &mut AssignmentModel,
    ctx: &SolveContext,
) -> (LinearExpr, LinearExpr) {
    let n_slots = ctx.slot_count() as i64;
    let mut counts = Vec::new();
    for (p_idx, person) in ctx.persons.iter().enumerate() {
        let bad_slots: Vec<usize> = ctx
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| is_bad_location(person, &slot.location))
            .map(|(s_idx, _)| s_idx)
            .collect();
        if bad_slots.is_empty() {
            counts.push(model.builder.new_int_var(vec![(0, 0)]));
            continue;
        }
        let cap = bad_slots.len() as i64;
        let count = model.builder.new_int_var(vec![(0, cap)]);
        let expr = sum_vars(bad_slots.iter().map(|&s_idx| model.var(p_idx, s_idx)));
        model.builder.add_eq(count.clone(), expr);
        counts.push(count);
    }
    if counts.is_empty() {
        let zero = model.builder.new_int_var(vec![(0, 0)]);
        return (LinearExpr::from(zero.clone()), LinearExpr::from(zero));
    }
    let max_loc = model.builder.new_int_var(vec![(0, n_slots)]);
    let min_loc = model.builder.new_int_var(vec![(0, n_slots)]);
    model.builder.add_max_equality(max_loc.clone(), counts.clone());
    model.builder.add_min_equality(min_loc.clone(), counts);
    (LinearExpr::from(max_loc), LinearExpr::from(min_loc))
}

/// T3: `sum_{p,m} max(0, a_{p,m} - p.month_max)`.
fn build_monthly_max_excess(model: &mut AssignmentModel, ctx: &SolveContext) -> LinearExpr {
    let mut excess_vars = Vec::new();
    for (p_idx, person) in ctx.persons.iter().enumerate() {
        let cap = person.month_max as i64;
        for slot_indices in ctx.month_to_slots.values() {
            let m_count = slot_indices.len() as i64;
            let diff = model
                .builder
                .new_int_var(vec![(-cap, m_count - cap)]);
            let expr = sum_vars(slot_indices.iter().map(|&s_idx| model.var(p_idx, s_idx)));
            model.builder.add_eq(diff.clone(), expr - cap);
            let excess = model.builder.new_int_var(vec![(0, (m_count - cap).max(0))]);
            let zero = model.builder.new_int_var(vec![(0, 0)]);
            model
                .builder
                .add_max_equality(excess.clone(), vec![diff, zero]);
            excess_vars.push(excess);
        }
    }
    sum_int_vars(excess_vars)
}

/// Cost contributed by a single person's monthly-average shortfall: quadratic
/// in the deficit, so each additional unit of shortfall costs more than the
/// last. Shared by the element table built below and the post-solve penalty
/// breakdown in `project.rs`, so both sides agree on the same formula.
pub fn monthly_avg_term_cost(weight: i64, deficit: i64) -> i64 {
    weight * deficit * deficit
}

/// T4: quadratic monthly-average shortfall, via a precomputed element table.
fn build_monthly_avg_cost(model: &mut AssignmentModel, ctx: &SolveContext, weight: i64) -> LinearExpr {
    let n_months = ctx.month_count() as i64;
    let total_shifts = ctx.slot_count() as i64;
    let mut cost_vars = Vec::new();
    for (p_idx, person) in ctx.persons.iter().enumerate() {
        let target_total = person.month_avg as i64 * n_months;
        let diff_lb = target_total - total_shifts;
        let diff = model.builder.new_int_var(vec![(diff_lb, target_total)]);
        let expr = sum_vars((0..ctx.slot_count()).map(|s_idx| model.var(p_idx, s_idx)));
        model.builder.add_eq(diff.clone(), expr * -1 + target_total);

        let deficit_ub = target_total.max(0);
        let deficit = model.builder.new_int_var(vec![(0, deficit_ub)]);
        let zero = model.builder.new_int_var(vec![(0, 0)]);
        model
            .builder
            .add_max_equality(deficit.clone(), vec![diff, zero]);

        let costs: Vec<i64> = (0..=deficit_ub).map(|i| monthly_avg_term_cost(weight, i)).collect();
        let cost_ub = costs.last().copied().unwrap_or(0);
        let cost_var = model.builder.new_int_var(vec![(0, cost_ub)]);
        model.builder.add_element(deficit, costs, cost_var.clone());
        cost_vars.push(cost_var);
    }
    sum_int_vars(cost_vars)
}

/// T5: `sum_{p,w} max(0, shifts in week w - 1)`.
fn build_weekly_multi_excess(model: &mut AssignmentModel, ctx: &SolveContext) -> LinearExpr {
    let mut excess_vars = Vec::new();
    for p_idx in 0..ctx.person_count() {
        for slot_indices in ctx.week_to_slots.values() {
            let m_count = slot_indices.len() as i64;
            let diff = model.builder.new_int_var(vec![(-1, (m_count - 1).max(0))]);
            let expr = sum_vars(slot_indices.iter().map(|&s_idx| model.var(p_idx, s_idx)));
            model.builder.add_eq(diff.clone(), expr - 1);
            let excess = model.builder.new_int_var(vec![(0, (m_count - 1).max(0))]);
            let zero = model.builder.new_int_var(vec![(0, 0)]);
            model
                .builder
                .add_max_equality(excess.clone(), vec![diff, zero]);
            excess_vars.push(excess);
        }
    }
    sum_int_vars(excess_vars)
}

/// T6: one boolean per (person, month) where the person is available at
/// least once but assigned nowhere, reified via the usual pair of
/// implications.
fn build_monthly_min_avail_missing(model: &mut AssignmentModel, ctx: &SolveContext) -> LinearExpr {
    let mut month_to_available: HashMap<u32, bool> = HashMap::new();
    let mut missing_vars = Vec::new();
    for (p_idx, person) in ctx.persons.iter().enumerate() {
        month_to_available.clear();
        for slot in &ctx.slots {
            let m = slot.date.month();
            let avail = person.is_available(slot.date);
            let entry = month_to_available.entry(m).or_insert(false);
            *entry = *entry || avail;
        }
        for (m, slot_indices) in &ctx.month_to_slots {
            if !month_to_available.get(m).copied().unwrap_or(false) {
                continue;
            }
            let n = slot_indices.len() as i64;
            let assigned_sum = model.builder.new_int_var(vec![(0, n)]);
            let expr = sum_vars(slot_indices.iter().map(|&s_idx| model.var(p_idx, s_idx)));
            model.builder.add_eq(assigned_sum.clone(), expr);

            let missing = model.builder.new_bool_var(format!("miss_p{p_idx}_m{m}"));
            model
                .builder
                .add_eq(assigned_sum.clone(), LinearExpr::from(0))
                .only_enforce_if(missing.clone());
            model
                .builder
                .add_ge(assigned_sum, LinearExpr::from(1))
                .only_enforce_if(missing.not());
            missing_vars.push(missing);
        }
    }
    sum_vars(missing_vars.iter())
}

fn sum_int_vars(vars: Vec<cp_sat::builder::IntVar>) -> LinearExpr {
    vars.into_iter()
        .fold(LinearExpr::from(0), |acc, v| acc + LinearExpr::from(v))
}
