//! Builds the dense `x[person, slot]` boolean decision grid on a
//! [`CpModelBuilder`], the shared substrate that constraints.rs and
//! objective.rs both add to.

use cp_sat::builder::{BoolVar, CpModelBuilder};

use crate::context::SolveContext;

/// The decision-variable grid plus the model it lives in.
///
/// `assignment[p][s]` is 1 iff person `p` is assigned to slot `s`.
pub struct AssignmentModel {
    pub builder: CpModelBuilder,
    pub assignment: Vec<Vec<BoolVar>>,
}

impl AssignmentModel {
    pub fn new(ctx: &SolveContext) -> Self {
        let mut builder = CpModelBuilder::new();
        let assignment = (0..ctx.person_count())
            .map(|p| {
                (0..ctx.slot_count())
                    .map(|s| builder.new_bool_var(format!("x_p{p}_s{s}")))
                    .collect()
            })
            .collect();
        AssignmentModel { builder, assignment }
    }

    pub fn var(&self, person: usize, slot: usize) -> &BoolVar {
        &self.assignment[person][slot]
    }
}
