//! Retention and progression: the per-student state machine evaluated once
//! per active student per term.
//!
//!   Active@Y (Y in 1..=4) --graduation draw (Y == 4)-----> Graduated
//!                         --retention draw fails---------> Withdrawn
//!                         --retained, advancement draw---> Active@Y+1 (Y < 4)
//!                         --retained otherwise-----------> Active@Y
//!
//! Graduated and Withdrawn are terminal.

use crate::{
    config::SimConfig,
    demographics::PENALIZED_RACE,
    rng::SimRng,
    types::{ClassYear, SENIOR},
};

/// Term GPA floors, descending, and the retention probability each earns.
/// A GPA below every floor earns `LOWEST_RETENTION_PROB`.
pub const GPA_RETENTION_THRESHOLDS: &[(f64, f64)] = &[
    (3.5, 0.90),
    (2.5, 0.75),
    (1.5, 0.55),
    (0.5, 0.35),
];
pub const LOWEST_RETENTION_PROB: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Graduated,
    Retained { next_class_year: ClassYear },
    Withdrawn,
}

impl Transition {
    pub fn is_retained(&self) -> bool {
        matches!(self, Self::Retained { .. })
    }
}

#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    advancement: [f64; 3],
    senior_grad_prob: f64,
    race_penalty: f64,
    retention_cap: f64,
}

impl RetentionPolicy {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            advancement: [
                config.freshman_to_soph_prob,
                config.soph_to_junior_prob,
                config.junior_to_senior_prob,
            ],
            senior_grad_prob: config.senior_grad_prob,
            race_penalty: config.race_penalty_for_retention,
            retention_cap: 1.0 - config.base_dropout_prob,
        }
    }

    /// Base retention probability for a term GPA.
    pub fn gpa_retention_prob(gpa: f64) -> f64 {
        GPA_RETENTION_THRESHOLDS
            .iter()
            .find(|(floor, _)| gpa >= *floor)
            .map(|(_, p)| *p)
            .unwrap_or(LOWEST_RETENTION_PROB)
    }

    /// Retention probability after the demographic penalty and the
    /// non-academic attrition cap, clamped to [0, 1].
    pub fn retention_prob(&self, gpa: f64, race_ethnicity: &str) -> f64 {
        let mut p = Self::gpa_retention_prob(gpa);
        if race_ethnicity == PENALIZED_RACE {
            p -= self.race_penalty;
        }
        p.min(self.retention_cap).clamp(0.0, 1.0)
    }

    /// Run the state machine for one student-term.
    ///
    /// Draws, in order: graduation (seniors only), retention (unless
    /// graduated), advancement (retained class years 1-3 only).
    pub fn transition(
        &self,
        rng: &mut SimRng,
        class_year: ClassYear,
        gpa: f64,
        race_ethnicity: &str,
    ) -> Transition {
        if class_year >= SENIOR && rng.chance(self.senior_grad_prob) {
            return Transition::Graduated;
        }

        if !rng.chance(self.retention_prob(gpa, race_ethnicity)) {
            return Transition::Withdrawn;
        }

        let next_class_year = match class_year {
            1..=3 if rng.chance(self.advancement[class_year as usize - 1]) => class_year + 1,
            _ => class_year,
        };
        Transition::Retained { next_class_year }
    }
}
