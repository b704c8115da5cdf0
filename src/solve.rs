//! The single top-level entry point: takes validated inputs and a config,
//! builds the model, solves it, and projects the result.

use crate::config::SolveConfig;
use crate::constraints::{apply_constraints, resolve_exclusions, Exclusion};
use crate::context::SolveContext;
use crate::diagnostics::{self, DiagnosticRow};
use crate::domain::{FilledShift, Location, Person};
use crate::error::Result;
use crate::model::AssignmentModel;
use crate::objective::apply_objective;
use crate::project::{project_filled_shifts, project_penalty_breakdown, PenaltyRow};
use crate::solver::{self, SolveStatus};

/// What a solve produced.
pub enum SolveOutcome {
    /// A solution was found (optimal or not).
    Solved {
        status: SolveStatus,
        filled_shifts: Vec<FilledShift>,
        penalty_breakdown: Vec<PenaltyRow>,
    },
    /// No solution exists (or none was found within the time limit); the
    /// diagnostics describe the likely culprit (date, location) pairs.
    Unsolved {
        status: SolveStatus,
        diagnostics: Vec<DiagnosticRow>,
    },
}

/// Runs one full solve: build context, build model, constrain, optimize,
/// solve, and project the result.
pub fn solve(
    persons: Vec<Person>,
    locations: Vec<Location>,
    config: &SolveConfig,
    exclusion_names: &[(String, String)],
) -> Result<SolveOutcome> {
    let ctx = SolveContext::build(persons, locations)?;
    let exclusions: Vec<Exclusion> = resolve_exclusions(&ctx, exclusion_names);

    let mut model = AssignmentModel::new(&ctx);
    apply_constraints(
        &mut model,
        &ctx,
        &config.enabled_constraints,
        config.week_max,
        &exclusions,
    );
    apply_objective(&mut model, &ctx, &config.weights, &config.enabled_objectives);

    let run = solver::run(&mut model, config);

    if run.status.has_solution() {
        let filled_shifts = project_filled_shifts(&ctx, &model, &run);
        let penalty_breakdown = project_penalty_breakdown(&ctx, &model, &run, &config.weights);
        Ok(SolveOutcome::Solved {
            status: run.status,
            filled_shifts,
            penalty_breakdown,
        })
    } else {
        let rows = diagnostics::diagnose(&ctx, &model, &run);
        Ok(SolveOutcome::Unsolved {
            status: run.status,
            diagnostics: rows,
        })
    }
}
