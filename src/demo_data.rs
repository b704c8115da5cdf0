//! Demo data generators: seeded, reproducible person/location sets for
//! trying the solver without a real CSV/JSON import.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{Location, LocationFlag, Person, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoSize {
    Small,
    Large,
}

impl std::str::FromStr for DemoSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoSize::Small),
            "LARGE" => Ok(DemoSize::Large),
            _ => Err(()),
        }
    }
}

impl DemoSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoSize::Small => "SMALL",
            DemoSize::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoParameters {
        match self {
            DemoSize::Small => DemoParameters {
                location_names: vec!["Utrecht".to_string(), "Amersfoort".to_string()],
                days_in_schedule: 28,
                person_count: 10,
                senior_fraction: 0.3,
                teams_per_date_distribution: vec![(1, 3.0), (2, 1.0)],
                unavailable_count_distribution: vec![(1, 4.0), (2, 3.0), (3, 2.0), (4, 1.0)],
            },
            DemoSize::Large => DemoParameters {
                location_names: vec![
                    "Utrecht".to_string(),
                    "Amersfoort".to_string(),
                    "Rotterdam".to_string(),
                    "Amsterdam".to_string(),
                ],
                days_in_schedule: 84,
                person_count: 30,
                senior_fraction: 0.25,
                teams_per_date_distribution: vec![(1, 0.5), (2, 0.3), (3, 0.2)],
                unavailable_count_distribution: vec![(5, 4.0), (10, 3.0), (15, 2.0), (20, 1.0)],
            },
        }
    }
}

struct DemoParameters {
    location_names: Vec<String>,
    days_in_schedule: i64,
    person_count: usize,
    senior_fraction: f64,
    teams_per_date_distribution: Vec<(u32, f64)>,
    unavailable_count_distribution: Vec<(usize, f64)>,
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a reproducible demo (persons, locations) pair for the given
/// size, seeded so repeated calls always produce the same data.
pub fn generate(size: DemoSize) -> (Vec<Person>, Vec<Location>) {
    let params = size.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    let start_date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let name_permutations = generate_name_permutations(&mut rng);

    let senior_count = ((params.person_count as f64) * params.senior_fraction).round() as usize;
    let mut persons = Vec::with_capacity(params.person_count);
    for i in 0..params.person_count {
        let name = name_permutations[i % name_permutations.len()].clone();
        let role = if i < senior_count { Role::Senior } else { Role::Peer };
        let mut person = Person::new(i, &name, role);
        person.month_max = 4;
        person.month_avg = 3;
        for loc in &params.location_names {
            let flag = match rng.gen_range(0..10) {
                0 => LocationFlag::Penalized,
                _ => LocationFlag::Neutral,
            };
            person.pref_location_flags.insert(loc.clone(), flag);
        }
        persons.push(person);
    }

    for day in 0..params.days_in_schedule {
        let date = start_date + Duration::days(day);
        let unavailable_count = pick_count(&mut rng, &params.unavailable_count_distribution);
        let chosen: Vec<usize> = (0..params.person_count)
            .collect::<Vec<_>>()
            .choose_multiple(&mut rng, unavailable_count.min(params.person_count))
            .copied()
            .collect();
        for idx in chosen {
            persons[idx].availability.insert(date, false);
        }
    }

    let mut locations = Vec::with_capacity(params.location_names.len());
    for (i, name) in params.location_names.iter().enumerate() {
        let allow_peer = !(params.location_names.len() > 1 && i == params.location_names.len() - 1);
        let mut teams_per_date = std::collections::HashMap::new();
        for day in 0..params.days_in_schedule {
            let date = start_date + Duration::days(day);
            let required = pick_count(&mut rng, &params.teams_per_date_distribution);
            teams_per_date.insert(date, required);
        }
        locations.push(Location {
            name: name.clone(),
            allow_tester: true,
            allow_peer,
            teams_per_date,
        });
    }

    (persons, locations)
}

/// Pick a count based on a weighted distribution.
fn pick_count<T: Copy>(rng: &mut StdRng, distribution: &[(T, f64)]) -> T {
    let total_weight: f64 = distribution.iter().map(|(_, w)| w).sum();
    let mut choice = rng.gen::<f64>() * total_weight;

    for (count, weight) in distribution {
        if choice < *weight {
            return *count;
        }
        choice -= weight;
    }
    distribution.last().map(|(c, _)| *c).unwrap()
}

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

fn generate_name_permutations(rng: &mut StdRng) -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{first} {last}"));
        }
    }
    names.shuffle(rng);
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_demo_has_expected_shape() {
        let (persons, locations) = generate(DemoSize::Small);
        assert_eq!(persons.len(), 10);
        assert_eq!(locations.len(), 2);
        assert!(persons.iter().any(|p| p.role.is_senior()));
        assert!(persons.iter().any(|p| !p.role.is_senior()));
    }

    #[test]
    fn large_demo_has_more_persons_and_locations() {
        let (persons, locations) = generate(DemoSize::Large);
        assert_eq!(persons.len(), 30);
        assert_eq!(locations.len(), 4);
    }

    #[test]
    fn demo_size_from_str() {
        assert_eq!("SMALL".parse::<DemoSize>(), Ok(DemoSize::Small));
        assert_eq!("large".parse::<DemoSize>(), Ok(DemoSize::Large));
        assert!("invalid".parse::<DemoSize>().is_err());
    }

    #[test]
    fn is_reproducible() {
        let (a, _) = generate(DemoSize::Small);
        let (b, _) = generate(DemoSize::Small);
        assert_eq!(a.iter().map(|p| p.name.clone()).collect::<Vec<_>>(), b.iter().map(|p| p.name.clone()).collect::<Vec<_>>());
    }
}
