//! Solve configuration: objective weights, enabled constraint/objective
//! subsets, and the solver time budget.
//!
//! Loaded from TOML files to keep tuning knobs out of code, the way
//! SolverForge's own solver configuration is loaded.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::weights::{EnabledSet, HardConstraint, ObjectiveTerm, Weights};

/// Default hard cap on weekly assignments per person, used by H7.
pub const DEFAULT_WEEK_MAX: u32 = 2;

/// Top-level solve configuration.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub weights: Weights,
    pub enabled_constraints: EnabledSet<HardConstraint>,
    pub enabled_objectives: EnabledSet<ObjectiveTerm>,
    /// Wall-clock budget handed to the solver. `None` means no limit.
    pub time_limit: Option<Duration>,
    /// Hard cap on assignments in any single ISO week (H7).
    pub week_max: u32,
}

impl Default for SolveConfig {
    fn default() -> Self {
        SolveConfig {
            weights: Weights::default(),
            enabled_constraints: EnabledSet::default(),
            enabled_objectives: EnabledSet::default(),
            time_limit: None,
            week_max: DEFAULT_WEEK_MAX,
        }
    }
}

impl SolveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(s)?;
        raw.try_into()
    }

    pub fn with_time_limit_seconds(mut self, seconds: u64) -> Self {
        self.time_limit = Some(Duration::from_secs(seconds));
        self
    }

    /// Restricts the enabled hard constraints to `names`, each matched
    /// case-insensitively against [`HardConstraint`]'s snake_case names.
    pub fn restrict_constraints(&mut self, names: &[String]) -> Result<()> {
        self.enabled_constraints = EnabledSet::only(parse_names(names)?);
        Ok(())
    }

    /// Restricts the enabled soft objectives to `names`.
    pub fn restrict_objectives(&mut self, names: &[String]) -> Result<()> {
        self.enabled_objectives = EnabledSet::only(parse_objective_names(names)?);
        Ok(())
    }
}

fn parse_names(names: &[String]) -> Result<Vec<HardConstraint>> {
    names
        .iter()
        .map(|n| match n.as_str() {
            "availability" => Ok(HardConstraint::Availability),
            "max_per_day" => Ok(HardConstraint::MaxPerDay),
            "exact_testers" => Ok(HardConstraint::ExactTesters),
            "min_first" => Ok(HardConstraint::MinFirst),
            "max_per_week" => Ok(HardConstraint::MaxPerWeek),
            "single_first" => Ok(HardConstraint::SingleFirst),
            other => Err(RosterError::Config(format!(
                "unknown constraint name: {other}"
            ))),
        })
        .collect()
}

fn parse_objective_names(names: &[String]) -> Result<Vec<ObjectiveTerm>> {
    names
        .iter()
        .map(|n| match n.as_str() {
            "location" => Ok(ObjectiveTerm::Location),
            "fairness" => Ok(ObjectiveTerm::Fairness),
            "monthly" => Ok(ObjectiveTerm::Monthly),
            "monthly_avg" => Ok(ObjectiveTerm::MonthlyAvg),
            "weekly_multi" => Ok(ObjectiveTerm::WeeklyMulti),
            "monthly_min_avail" => Ok(ObjectiveTerm::MonthlyMinAvail),
            "location_fairness" => Ok(ObjectiveTerm::LocationFairness),
            other => Err(RosterError::Config(format!(
                "unknown objective name: {other}"
            ))),
        })
        .collect()
}

/// Wire shape for the TOML file; kept separate from [`SolveConfig`] so the
/// defaulting logic (constraint/objective subset "all enabled when absent")
/// lives in one place.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
struct RawConfig {
    #[serde(default)]
    weights: Weights,
    #[serde(default)]
    use_constraints: Option<Vec<String>>,
    #[serde(default)]
    use_objectives: Option<Vec<String>>,
    #[serde(default)]
    time_limit_seconds: Option<u64>,
    #[serde(default)]
    week_max: Option<u32>,
}

impl TryFrom<RawConfig> for SolveConfig {
    type Error = RosterError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        let enabled_constraints = match raw.use_constraints {
            Some(names) => EnabledSet::only(parse_names(&names)?),
            None => EnabledSet::default(),
        };
        let enabled_objectives = match raw.use_objectives {
            Some(names) => EnabledSet::only(parse_objective_names(&names)?),
            None => EnabledSet::default(),
        };
        Ok(SolveConfig {
            weights: raw.weights,
            enabled_constraints,
            enabled_objectives,
            time_limit: raw.time_limit_seconds.map(Duration::from_secs),
            week_max: raw.week_max.unwrap_or(DEFAULT_WEEK_MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let config = SolveConfig::default();
        assert!(config
            .enabled_constraints
            .contains(HardConstraint::MaxPerWeek));
        assert!(config.enabled_objectives.contains(ObjectiveTerm::Fairness));
        assert_eq!(config.week_max, DEFAULT_WEEK_MAX);
    }

    #[test]
    fn parses_weights_and_subsets() {
        let toml = r#"
            [weights]
            location = 3
            fairness = 5

            use_constraints = ["availability", "max_per_day"]
            use_objectives = ["fairness"]
            time_limit_seconds = 30
            week_max = 3
        "#;
        let config = SolveConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.weights.location, 3);
        assert_eq!(config.weights.fairness, 5);
        assert!(config
            .enabled_constraints
            .contains(HardConstraint::Availability));
        assert!(!config
            .enabled_constraints
            .contains(HardConstraint::MaxPerWeek));
        assert!(config.enabled_objectives.contains(ObjectiveTerm::Fairness));
        assert!(!config
            .enabled_objectives
            .contains(ObjectiveTerm::Monthly));
        assert_eq!(config.time_limit, Some(Duration::from_secs(30)));
        assert_eq!(config.week_max, 3);
    }

    #[test]
    fn rejects_unknown_constraint_name() {
        let toml = r#"
            use_constraints = ["not_a_real_constraint"]
        "#;
        assert!(SolveConfig::from_toml_str(toml).is_err());
    }
}
