//! Benchmark for CP/SAT model build and solve time on generated demo data.
//!
//! Run with: cargo run --release --bin bench -- large

use std::env;
use std::time::Instant;

use roster_scheduling::config::SolveConfig;
use roster_scheduling::constraints::{apply_constraints, resolve_exclusions};
use roster_scheduling::context::SolveContext;
use roster_scheduling::demo_data::{self, DemoSize};
use roster_scheduling::model::AssignmentModel;
use roster_scheduling::objective::apply_objective;
use roster_scheduling::solver;

fn main() {
    let size: DemoSize = env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DemoSize::Large);

    let (persons, locations) = demo_data::generate(size);
    let person_count = persons.len();

    println!("Benchmark: CP/SAT build + solve ({})", size.as_str());
    println!("  Persons: {person_count}");
    println!("  Locations: {}", locations.len());
    println!();

    let build_start = Instant::now();
    let ctx = SolveContext::build(persons, locations).expect("valid demo data");
    println!("  Shift slots: {}", ctx.slot_count());

    let config = SolveConfig::default().with_time_limit_seconds(30);
    let exclusions = resolve_exclusions(&ctx, &[]);

    let mut model = AssignmentModel::new(&ctx);
    println!("  Decision variables: {}", ctx.person_count() * ctx.slot_count());
    apply_constraints(&mut model, &ctx, &config.enabled_constraints, config.week_max, &exclusions);
    apply_objective(&mut model, &ctx, &config.weights, &config.enabled_objectives);
    let build_elapsed = build_start.elapsed();
    println!("  Model build time: {build_elapsed:?}");
    println!();

    let solve_start = Instant::now();
    let run = solver::run(&mut model, &config);
    let solve_elapsed = solve_start.elapsed();

    println!("Results:");
    println!("  Status: {:?}", run.status);
    println!("  Solve time: {solve_elapsed:?}");
    println!("  Total time: {:?}", build_elapsed + solve_elapsed);
}
