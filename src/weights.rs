//! Objective weights and the enabled-constraint / enabled-objective subsets.

use serde::{Deserialize, Serialize};

/// Integer weights for the soft objective terms T1..T7.
///
/// A missing key defaults to 0, which disables that term's contribution
/// without removing its auxiliary variables (see T4 in particular: the cost
/// table is still built, it just always evaluates to 0).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Weights {
    #[serde(default)]
    pub location: i64,
    #[serde(default)]
    pub fairness: i64,
    #[serde(default)]
    pub monthly: i64,
    #[serde(default)]
    pub monthly_avg: i64,
    #[serde(default)]
    pub weekly_multi: i64,
    #[serde(default)]
    pub monthly_min_avail: i64,
    /// Falls back to `fairness` when absent, mirroring the reference source's
    /// `weights.get("location_fairness", weights.get("fairness", 0))`.
    #[serde(default)]
    pub location_fairness: Option<i64>,
}

impl Weights {
    pub fn location_fairness(&self) -> i64 {
        self.location_fairness.unwrap_or(self.fairness)
    }
}

/// A hard constraint producer, named as in the external interface contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardConstraint {
    Availability,
    MaxPerDay,
    ExactTesters,
    MinFirst,
    MaxPerWeek,
    SingleFirst,
}

impl HardConstraint {
    pub const ALL: [HardConstraint; 6] = [
        HardConstraint::Availability,
        HardConstraint::MaxPerDay,
        HardConstraint::ExactTesters,
        HardConstraint::MinFirst,
        HardConstraint::MaxPerWeek,
        HardConstraint::SingleFirst,
    ];
}

/// A soft objective term, T1..T7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveTerm {
    Location,
    Fairness,
    Monthly,
    MonthlyAvg,
    WeeklyMulti,
    MonthlyMinAvail,
    LocationFairness,
}

impl ObjectiveTerm {
    pub const ALL: [ObjectiveTerm; 7] = [
        ObjectiveTerm::Location,
        ObjectiveTerm::Fairness,
        ObjectiveTerm::Monthly,
        ObjectiveTerm::MonthlyAvg,
        ObjectiveTerm::WeeklyMulti,
        ObjectiveTerm::MonthlyMinAvail,
        ObjectiveTerm::LocationFairness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ObjectiveTerm::Location => "location",
            ObjectiveTerm::Fairness => "fairness",
            ObjectiveTerm::Monthly => "monthly",
            ObjectiveTerm::MonthlyAvg => "monthly_avg",
            ObjectiveTerm::WeeklyMulti => "weekly_multi",
            ObjectiveTerm::MonthlyMinAvail => "monthly_min_avail",
            ObjectiveTerm::LocationFairness => "location_fairness",
        }
    }
}

/// A set of named items that defaults to "all enabled" when not otherwise
/// constructed, mirroring the reference CLI's `--use-constraints` /
/// `--use-objectives` flags (whose argparse defaults list every name).
#[derive(Debug, Clone)]
pub struct EnabledSet<T> {
    enabled: Vec<T>,
}

impl<T: PartialEq + Copy> EnabledSet<T> {
    pub fn all(items: &[T]) -> Self {
        EnabledSet {
            enabled: items.to_vec(),
        }
    }

    pub fn only(items: Vec<T>) -> Self {
        EnabledSet { enabled: items }
    }

    pub fn contains(&self, item: T) -> bool {
        self.enabled.contains(&item)
    }
}

impl Default for EnabledSet<HardConstraint> {
    fn default() -> Self {
        EnabledSet::all(&HardConstraint::ALL)
    }
}

impl Default for EnabledSet<ObjectiveTerm> {
    fn default() -> Self {
        EnabledSet::all(&ObjectiveTerm::ALL)
    }
}
