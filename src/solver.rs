//! Drives the CP/SAT solve: wires time limits into `SatParameters` and maps
//! the raw `CpSolverStatus` to a small status enum the rest of the core can
//! match on without depending on `cp_sat` directly.

use cp_sat::proto::{CpSolverResponse, CpSolverStatus, SatParameters};

use crate::config::SolveConfig;
use crate::model::AssignmentModel;

/// Outcome of a single solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A provably optimal solution was found.
    Optimal,
    /// A solution was found, but optimality was not proven (usually because
    /// the time limit was hit first).
    Feasible,
    /// The model has no feasible solution.
    Infeasible,
    /// The solver gave up without finding or ruling out a solution.
    Unknown,
}

impl SolveStatus {
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    fn from_raw(status: CpSolverStatus) -> Self {
        match status {
            CpSolverStatus::Optimal => SolveStatus::Optimal,
            CpSolverStatus::Feasible => SolveStatus::Feasible,
            CpSolverStatus::Infeasible => SolveStatus::Infeasible,
            _ => SolveStatus::Unknown,
        }
    }
}

/// Result of running the solver: the status plus the raw response needed to
/// read back variable values.
pub struct SolveRun {
    pub status: SolveStatus,
    pub response: CpSolverResponse,
}

/// Runs the solver over `model` with the time budget from `config`.
pub fn run(model: &mut AssignmentModel, config: &SolveConfig) -> SolveRun {
    let mut params = SatParameters::default();
    if let Some(limit) = config.time_limit {
        params.max_time_in_seconds = Some(limit.as_secs_f64());
    }
    params.num_search_workers = Some(8);
    params.random_seed = Some(42);

    let response = model.builder.solve_with_parameters(&params);
    let status = SolveStatus::from_raw(response.status());
    SolveRun { status, response }
}
