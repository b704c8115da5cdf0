//! Integration tests for the named solve scenarios: minimal feasible,
//! peer-less location, single-senior squeeze, monthly-average quadratic
//! cost, mutual exclusion, and deterministic tie-breaking.

use chrono::NaiveDate;

use roster_scheduling::config::SolveConfig;
use roster_scheduling::domain::{Location, Person, Role};
use roster_scheduling::solve::{solve, SolveOutcome};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn location(name: &str, allow_peer: bool, dates: &[(&str, u32)]) -> Location {
    Location {
        name: name.to_string(),
        allow_tester: true,
        allow_peer,
        teams_per_date: dates.iter().map(|(d, c)| (date(d), *c)).collect(),
    }
}

#[test]
fn minimal_feasible_pairs_one_senior_with_one_peer() {
    let persons = vec![
        Person::new(0, "Amy", Role::Senior),
        Person::new(1, "Beth", Role::Senior),
        Person::new(2, "Carl", Role::Peer),
    ];
    let locations = vec![location("Utrecht", true, &[("2026-01-05", 1), ("2026-01-06", 1)])];
    let config = SolveConfig::default();

    match solve(persons, locations, &config, &[]).unwrap() {
        SolveOutcome::Solved { filled_shifts, .. } => {
            assert_eq!(filled_shifts.len(), 2);
            for shift in &filled_shifts {
                assert_eq!(shift.testers.len(), 2);
            }
        }
        SolveOutcome::Unsolved { status, .. } => panic!("expected a solution, got {status:?}"),
    }
}

#[test]
fn peer_less_location_staffs_a_single_senior() {
    let persons = vec![
        Person::new(0, "Amy", Role::Senior),
        Person::new(1, "Beth", Role::Senior),
    ];
    let locations = vec![location("Solo", false, &[("2026-01-05", 1)])];
    let config = SolveConfig::default();

    match solve(persons, locations, &config, &[]).unwrap() {
        SolveOutcome::Solved { filled_shifts, .. } => {
            assert_eq!(filled_shifts.len(), 1);
            assert_eq!(filled_shifts[0].testers.len(), 1);
        }
        SolveOutcome::Unsolved { status, .. } => panic!("expected a solution, got {status:?}"),
    }
}

#[test]
fn single_senior_squeeze_is_infeasible() {
    let persons = vec![
        Person::new(0, "Amy", Role::Senior),
        Person::new(1, "Beth", Role::Peer),
        Person::new(2, "Carl", Role::Peer),
        Person::new(3, "Dan", Role::Peer),
    ];
    let locations = vec![location("Utrecht", true, &[("2026-01-05", 2)])];
    let config = SolveConfig::default();

    match solve(persons, locations, &config, &[]).unwrap() {
        SolveOutcome::Unsolved { diagnostics, .. } => {
            assert!(!diagnostics.is_empty());
            let row = diagnostics
                .iter()
                .find(|r| r.location == "Utrecht" && r.date == date("2026-01-05"))
                .expect("diagnostic row for the squeezed date/location");
            assert!(row.c_availability || row.c_single_first);
        }
        SolveOutcome::Solved { .. } => panic!("expected infeasibility: H5+H6 both need 2 distinct seniors"),
    }
}

#[test]
fn mutual_exclusion_forces_infeasibility_when_no_substitute_exists() {
    let persons = vec![
        Person::new(0, "Amy", Role::Senior),
        Person::new(1, "Beth", Role::Peer),
    ];
    let locations = vec![location("Utrecht", true, &[("2026-01-05", 1)])];
    let config = SolveConfig::default();
    let exclusions = vec![("Amy".to_string(), "Beth".to_string())];

    match solve(persons, locations, &config, &exclusions).unwrap() {
        SolveOutcome::Unsolved { diagnostics, .. } => {
            let row = diagnostics.iter().find(|r| r.location == "Utrecht").unwrap();
            assert!(row.c_exclusions);
        }
        SolveOutcome::Solved { .. } => panic!("expected infeasibility: the only T/P pair is mutually excluded"),
    }
}

#[test]
fn monthly_average_deficit_is_penalized_quadratically() {
    // 2 people, month_avg=4, 4 slots at one peer-allowed location (8 person-slots).
    // Person B is unavailable on half the dates, forcing a 4/2 split.
    let mut amy = Person::new(0, "Amy", Role::Senior);
    amy.month_avg = 4;
    let mut beth = Person::new(1, "Beth", Role::Senior);
    beth.month_avg = 4;
    beth.availability.insert(date("2026-01-15"), false);
    beth.availability.insert(date("2026-01-22"), false);

    // allow_peer=false keeps headcount at 1 per slot, so the 4 slots hold
    // exactly 4 person-assignments split between the two people, the shape
    // the quadratic monthly-average cost is meant to trade off.
    let locations = vec![location(
        "Utrecht",
        false,
        &[("2026-01-01", 1), ("2026-01-08", 1), ("2026-01-15", 1), ("2026-01-22", 1)],
    )];

    let mut config = SolveConfig::default();
    config.weights.monthly_avg = 10;
    config.enabled_objectives = roster_scheduling::weights::EnabledSet::only(vec![
        roster_scheduling::weights::ObjectiveTerm::MonthlyAvg,
    ]);

    match solve(vec![amy, beth], locations, &config, &[]).unwrap() {
        SolveOutcome::Solved { penalty_breakdown, .. } => {
            // The unique cost-minimizing split is Amy=2 (forced days already
            // cover 2) / Beth=2, giving each a deficit of 2 against month_avg=4.
            let beth_row = penalty_breakdown
                .iter()
                .find(|r| r.component == "monthly_avg" && r.person == "Beth")
                .expect("Beth should have a nonzero monthly_avg deficit");
            assert_eq!(beth_row.units, 2);
            assert_eq!(beth_row.weighted, 10 * 2 * 2);
        }
        SolveOutcome::Unsolved { status, .. } => panic!("expected a solution, got {status:?}"),
    }
}

#[test]
fn identical_inputs_produce_identical_output() {
    let make_persons = || {
        vec![
            Person::new(0, "Amy", Role::Senior),
            Person::new(1, "Beth", Role::Senior),
            Person::new(2, "Carl", Role::Peer),
        ]
    };
    let make_locations = || vec![location("Utrecht", true, &[("2026-01-05", 1), ("2026-01-06", 1)])];
    let config = SolveConfig::default();

    let first = solve(make_persons(), make_locations(), &config, &[]).unwrap();
    let second = solve(make_persons(), make_locations(), &config, &[]).unwrap();

    match (first, second) {
        (SolveOutcome::Solved { filled_shifts: a, .. }, SolveOutcome::Solved { filled_shifts: b, .. }) => {
            assert_eq!(a, b);
        }
        _ => panic!("expected both runs to solve"),
    }
}

