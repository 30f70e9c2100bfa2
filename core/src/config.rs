use crate::{
    calendar::TermPattern,
    error::{SimError, SimResult},
};
use serde::{Deserialize, Serialize};

/// Every knob of a simulation run. All scalars; a JSON file may set any
/// subset of them and the rest keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Number of terms to simulate.
    pub total_terms: usize,
    /// Calendar year of the first (fall) term.
    pub start_year: i32,
    pub term_pattern: TermPattern,

    /// Base count of first-time freshmen admitted each fall.
    pub new_freshmen_each_fall: u32,
    /// Admitted freshmen vary uniformly by ± this many per fall.
    pub freshman_variation: u32,
    /// Base count of transfer-in / continuing entrants admitted each fall.
    pub new_transfers_each_fall: u32,
    pub transfer_variation: u32,

    pub freshman_to_soph_prob: f64,
    pub soph_to_junior_prob: f64,
    pub junior_to_senior_prob: f64,
    pub senior_grad_prob: f64,

    /// Subtracted from the retention probability of students in the
    /// penalized race/ethnicity category. 0 removes the disparity.
    pub race_penalty_for_retention: f64,
    /// Non-academic attrition: retention probability is capped at
    /// `1 - base_dropout_prob`.
    pub base_dropout_prob: f64,
    /// Per-entrant probability of an IPEDS cohort exclusion.
    pub cohort_exclusion_prob: f64,
    /// Term GPA substituted when a term carries no credit hours.
    pub default_gpa: f64,

    pub random_seed: u64,
    /// Target SQLite file.
    pub db_path: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_terms: 8,
            start_year: 2019,
            term_pattern: TermPattern::FallOnly,
            new_freshmen_each_fall: 250,
            freshman_variation: 20,
            new_transfers_each_fall: 0,
            transfer_variation: 5,
            freshman_to_soph_prob: 0.80,
            soph_to_junior_prob: 0.85,
            junior_to_senior_prob: 0.90,
            senior_grad_prob: 0.70,
            race_penalty_for_retention: 0.05,
            base_dropout_prob: 0.05,
            cohort_exclusion_prob: 0.02,
            default_gpa: 2.0,
            random_seed: 42,
            db_path: "ipeds_data.db".into(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing keys fall back to `Default`.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Small, fast configuration for tests: 4 fall terms, 40 freshmen
    /// per fall, everything else at its default.
    pub fn default_test() -> Self {
        Self {
            total_terms: 4,
            new_freshmen_each_fall: 40,
            freshman_variation: 5,
            db_path: ":memory:".into(),
            ..Self::default()
        }
    }

    /// Reject nonsensical parameters before the run starts.
    pub fn validate(&self) -> SimResult<()> {
        if self.total_terms == 0 {
            return Err(SimError::invalid_config("total_terms", "must be at least 1"));
        }
        if !(1900..=9000).contains(&self.start_year) {
            return Err(SimError::invalid_config(
                "start_year",
                format!("{} is outside 1900..=9000", self.start_year),
            ));
        }

        let probabilities = [
            ("freshman_to_soph_prob", self.freshman_to_soph_prob),
            ("soph_to_junior_prob", self.soph_to_junior_prob),
            ("junior_to_senior_prob", self.junior_to_senior_prob),
            ("senior_grad_prob", self.senior_grad_prob),
            ("race_penalty_for_retention", self.race_penalty_for_retention),
            ("base_dropout_prob", self.base_dropout_prob),
            ("cohort_exclusion_prob", self.cohort_exclusion_prob),
        ];
        for (field, p) in probabilities {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(SimError::invalid_config(field, format!("{p} is not in [0, 1]")));
            }
        }

        if !self.default_gpa.is_finite() || !(0.0..=4.0).contains(&self.default_gpa) {
            return Err(SimError::invalid_config(
                "default_gpa",
                format!("{} is not on the 0.0-4.0 scale", self.default_gpa),
            ));
        }
        if self.db_path.trim().is_empty() {
            return Err(SimError::invalid_config("db_path", "must not be empty"));
        }
        Ok(())
    }
}
